//! Delegation records and their augmented form.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::classified::Classified;
use crate::enums::{ResourceType, Rir, Status};

/// Date format used by delegation feeds.
pub const FEED_DATE_FORMAT: &str = "%Y%m%d";

/// Issue date of a delegation; feeds leave it empty or zeroed when unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueDate {
    Known(NaiveDate),
    Unknown,
}

impl IssueDate {
    /// Parses a `YYYYMMDD` field. Anything else becomes `Unknown`.
    pub fn parse(field: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.len() != 8 {
            return IssueDate::Unknown;
        }
        NaiveDate::parse_from_str(trimmed, FEED_DATE_FORMAT)
            .map_or(IssueDate::Unknown, IssueDate::Known)
    }

    pub fn year(&self) -> Option<i32> {
        match self {
            IssueDate::Known(date) => Some(date.year()),
            IssueDate::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, IssueDate::Known(_))
    }

    /// ISO-8601 rendering; unknown dates render empty.
    pub fn to_iso_string(&self) -> String {
        match self {
            IssueDate::Known(date) => date.format("%Y-%m-%d").to_string(),
            IssueDate::Unknown => String::new(),
        }
    }
}

/// One delegation line, as published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRecord {
    /// Registry token from the first field of the line.
    pub registry: String,
    /// Registry whose feed the line came from.
    pub source: Rir,
    /// Raw country code (alpha-2 or pseudo-code), possibly empty.
    pub country_code: String,
    pub resource_type: ResourceType,
    /// First address or AS number of the block, as written.
    pub start: String,
    /// Block size (address count for IPv4, prefix length for IPv6, AS count for ASN).
    pub value: u64,
    pub date: IssueDate,
    pub status: Status,
    pub opaque_id: Option<String>,
    pub extensions: Option<String>,
}

/// Where a normalized country code came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeOrigin {
    /// Standard ISO-3166 alpha-2 lookup.
    Iso,
    /// One of the registry pseudo-code exceptions (`ZZ`, `AP`, `EU`, `XK`, empty).
    Exception,
    /// Input already was a known alpha-3 code.
    Alpha3,
    /// Nothing matched; mapped to the unknown sentinel.
    Unmapped,
}

/// Canonical alpha-3 code and display name for a raw country code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedCountry {
    pub alpha3: String,
    pub name: String,
    pub origin: CodeOrigin,
}

/// CIDR prefix length derived from a block size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPrefix {
    pub length: u8,
    /// Block size was not a power of two. `length` is floored, so it is too
    /// long and the CIDR block it names is smaller than the delegation.
    pub irregular: bool,
}

/// A record plus derived fields. The source record is never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentedRecord {
    pub record: AllocationRecord,
    pub country: NormalizedCountry,
    pub rir: Classified<Rir>,
    pub prefix: Option<BlockPrefix>,
    pub year: Option<i32>,
}

impl AugmentedRecord {
    pub fn alpha3(&self) -> &str {
        &self.country.alpha3
    }

    /// Registry of the delegating feed, classified from the line's registry token.
    pub fn registry(&self) -> Classified<Rir> {
        Classified::from(self.record.registry.parse::<Rir>().ok())
    }
}
