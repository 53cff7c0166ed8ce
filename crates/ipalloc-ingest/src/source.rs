//! Input locations.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use ipalloc_model::Rir;
use serde::{Deserialize, Serialize};

/// A remote URL or a local file.
///
/// Parsed from a plain string: `http://` and `https://` prefixes make a
/// URL, everything else is a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SourceLocation {
    Url(String),
    Path(PathBuf),
}

impl SourceLocation {
    pub fn is_remote(&self) -> bool {
        matches!(self, SourceLocation::Url(_))
    }
}

impl From<String> for SourceLocation {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            SourceLocation::Url(trimmed.to_string())
        } else {
            SourceLocation::Path(PathBuf::from(trimmed))
        }
    }
}

impl From<SourceLocation> for String {
    fn from(value: SourceLocation) -> Self {
        value.to_string()
    }
}

impl FromStr for SourceLocation {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SourceLocation::from(s.to_string()))
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Url(url) => f.write_str(url),
            SourceLocation::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// What a source contributes to the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Registry(Rir),
    Summary,
    Population,
    PopulationAdditions,
    Gdp,
}

impl SourceKind {
    /// Short name used in logs and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Registry(rir) => rir.feed_token(),
            SourceKind::Summary => "summary",
            SourceKind::Population => "population",
            SourceKind::PopulationAdditions => "population_additions",
            SourceKind::Gdp => "gdp",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A source to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub kind: SourceKind,
    pub location: SourceLocation,
}

impl SourceSpec {
    pub fn new(kind: SourceKind, location: impl Into<SourceLocation>) -> Self {
        Self {
            kind,
            location: location.into(),
        }
    }
}

/// Public `delegated-*-extended-latest` feed URL of a registry.
pub fn default_registry_url(rir: Rir) -> &'static str {
    match rir {
        Rir::Afrinic => "https://ftp.afrinic.net/pub/stats/afrinic/delegated-afrinic-extended-latest",
        Rir::Apnic => "https://ftp.apnic.net/stats/apnic/delegated-apnic-extended-latest",
        Rir::Arin => "https://ftp.arin.net/pub/stats/arin/delegated-arin-extended-latest",
        Rir::Lacnic => "https://ftp.lacnic.net/pub/stats/lacnic/delegated-lacnic-extended-latest",
        Rir::RipeNcc => "https://ftp.ripe.net/pub/stats/ripencc/delegated-ripencc-extended-latest",
    }
}

/// Default location of the per-country allocation summary.
pub const DEFAULT_SUMMARY_URL: &str =
    "https://raw.githubusercontent.com/impliedchaos/ip-alloc/main/ip_alloc.json";
