//! Explicit "could not classify" results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label shown for [`Classified::Unclassified`].
pub const UNKNOWN_LABEL: &str = "Unknown";

/// The outcome of a classification lookup.
///
/// `Unclassified` is a valid, displayable category (rendered as `Unknown`),
/// not an error. Keeping it as its own variant lets consumers tell it apart
/// from a real value instead of comparing sentinel strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classified<T> {
    Classified(T),
    Unclassified,
}

impl<T> Classified<T> {
    pub fn is_classified(&self) -> bool {
        matches!(self, Classified::Classified(_))
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Classified::Classified(value) => Some(value),
            Classified::Unclassified => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Classified::Classified(value) => Some(value),
            Classified::Unclassified => None,
        }
    }
}

impl<T> From<Option<T>> for Classified<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Classified::Unclassified, Classified::Classified)
    }
}

impl<T> Default for Classified<T> {
    fn default() -> Self {
        Classified::Unclassified
    }
}

impl<T: fmt::Display> fmt::Display for Classified<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classified::Classified(value) => value.fmt(f),
            Classified::Unclassified => f.write_str(UNKNOWN_LABEL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rir;

    #[test]
    fn displays_unknown_for_unclassified() {
        let value: Classified<Rir> = Classified::Unclassified;
        assert_eq!(value.to_string(), "Unknown");
        assert_eq!(Classified::Classified(Rir::Apnic).to_string(), "APNIC");
    }

    #[test]
    fn converts_from_option() {
        assert_eq!(Classified::from(Some(Rir::Arin)), Classified::Classified(Rir::Arin));
        assert_eq!(Classified::<Rir>::from(None), Classified::Unclassified);
        assert_eq!(Classified::Classified(3).into_option(), Some(3));
    }
}
