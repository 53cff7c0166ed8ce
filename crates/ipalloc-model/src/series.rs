//! Year-indexed reconciled rows.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::classified::Classified;
use crate::enums::{ResourceType, Rir, Status};
use crate::error::{ModelError, Result};

/// Inclusive range of calendar years a series covers.
///
/// Deserialization goes through [`YearRange::new`], so `start <= end` holds
/// for every value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawYearRange")]
pub struct YearRange {
    start: i32,
    end: i32,
}

#[derive(Deserialize)]
struct RawYearRange {
    start: i32,
    end: i32,
}

impl TryFrom<RawYearRange> for YearRange {
    type Error = ModelError;

    fn try_from(raw: RawYearRange) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl YearRange {
    pub const DEFAULT_START: i32 = 1982;
    pub const DEFAULT_END: i32 = 2023;

    pub fn new(start: i32, end: i32) -> Result<Self> {
        if start > end {
            return Err(ModelError::InvalidYearRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

    pub fn len(&self) -> usize {
        let span = i64::from(self.end) - i64::from(self.start) + 1;
        usize::try_from(span).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + use<> {
        self.start..=self.end
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            start: Self::DEFAULT_START,
            end: Self::DEFAULT_END,
        }
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Provenance of a statistic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatSource {
    Observed,
    /// Taken from the nearest later observed year.
    BackFilled,
    /// Taken from the nearest earlier observed year.
    ForwardFilled,
    /// No observation for the country at all; value is zero.
    Placeholder,
}

impl StatSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatSource::Observed => "observed",
            StatSource::BackFilled => "backfilled",
            StatSource::ForwardFilled => "forwardfilled",
            StatSource::Placeholder => "placeholder",
        }
    }
}

impl fmt::Display for StatSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A population or GDP value with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistic {
    pub value: f64,
    pub source: StatSource,
}

impl Statistic {
    pub fn observed(value: f64) -> Self {
        Self {
            value,
            source: StatSource::Observed,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            value: 0.0,
            source: StatSource::Placeholder,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.source == StatSource::Placeholder
    }
}

/// One observation of a long-format statistics table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatObservation {
    pub iso3: String,
    pub country: String,
    pub year: i32,
    pub value: f64,
}

/// Reconciled (country, year) row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryYearRow {
    pub iso3: String,
    pub year: i32,
    pub country: String,
    /// Registry that delegated the country's blocks.
    pub registry: Classified<Rir>,
    /// Registry the country belongs to by region.
    pub rir: Classified<Rir>,
    pub resource_type: ResourceType,
    pub status: Option<Status>,
    /// Amount delegated in this year.
    pub value: u64,
    /// Amount held as of the end of this year.
    pub cumulative: u64,
    pub population: Statistic,
    pub gdp_per_capita: Statistic,
}

/// Per-registry delta and running total for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryYearRow {
    pub registry: Classified<Rir>,
    pub resource_type: ResourceType,
    pub year: i32,
    pub value: u64,
    pub cumulative: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_range_is_1982_to_2023() {
        let range = YearRange::default();
        assert_eq!(range.len(), 42);
        assert_eq!(range.years().next(), Some(1982));
        assert_eq!(range.years().last(), Some(2023));
        assert!(range.contains(1995));
        assert!(!range.contains(2024));
    }

    #[test]
    fn rejects_inverted_range() {
        assert!(YearRange::new(2000, 1999).is_err());
        assert_eq!(YearRange::new(2000, 2000).unwrap().len(), 1);
    }

    #[test]
    fn full_i32_span_does_not_overflow() {
        let range = YearRange::new(i32::MIN, i32::MAX).unwrap();
        assert_eq!(range.len() as u64, 1u64 << 32);
    }

    #[test]
    fn deserialization_checks_order() {
        let range: YearRange = serde_json::from_str(r#"{"start": 1990, "end": 1995}"#).unwrap();
        assert_eq!(range.len(), 6);
        let err = serde_json::from_str::<YearRange>(r#"{"start": 2000, "end": 1999}"#).unwrap_err();
        assert!(err.to_string().contains("invalid year range 2000..=1999"));
    }

    #[test]
    fn placeholder_is_zero() {
        let stat = Statistic::placeholder();
        assert_eq!(stat.value, 0.0);
        assert!(stat.is_placeholder());
        assert!(!Statistic::observed(0.0).is_placeholder());
    }
}
