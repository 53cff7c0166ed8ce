//! Per-country pool snapshot types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::classified::Classified;
use crate::enums::Rir;

/// One entry of the JSON allocation summary, before derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    /// Alpha-2 key of the entry.
    pub code: String,
    pub name: String,
    pub ipv4: Option<u64>,
    pub pop: Option<u64>,
    pub ipv6: Option<u64>,
}

/// Discrete size class of an address holding.
///
/// Each bucket includes its upper bound: `10000` is `0-10k`, `10001` is
/// `10k-100k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SizeBucket {
    #[serde(rename = "0-10k")]
    UpTo10K,
    #[serde(rename = "10k-100k")]
    UpTo100K,
    #[serde(rename = "100k-1M")]
    UpTo1M,
    #[serde(rename = "1M-10M")]
    UpTo10M,
    #[serde(rename = "10M-100M")]
    UpTo100M,
    #[serde(rename = "100M-1B")]
    UpTo1B,
    #[serde(rename = "1B+")]
    Over1B,
}

impl SizeBucket {
    const THRESHOLDS: [(u64, SizeBucket); 6] = [
        (10_000, SizeBucket::UpTo10K),
        (100_000, SizeBucket::UpTo100K),
        (1_000_000, SizeBucket::UpTo1M),
        (10_000_000, SizeBucket::UpTo10M),
        (100_000_000, SizeBucket::UpTo100M),
        (1_000_000_000, SizeBucket::UpTo1B),
    ];

    pub fn classify(value: u64) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(limit, _)| value <= *limit)
            .map_or(SizeBucket::Over1B, |(_, bucket)| *bucket)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SizeBucket::UpTo10K => "0-10k",
            SizeBucket::UpTo100K => "10k-100k",
            SizeBucket::UpTo1M => "100k-1M",
            SizeBucket::UpTo10M => "1M-10M",
            SizeBucket::UpTo100M => "10M-100M",
            SizeBucket::UpTo1B => "100M-1B",
            SizeBucket::Over1B => "1B+",
        }
    }
}

impl fmt::Display for SizeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-country snapshot with derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSummaryRow {
    pub country_code: String,
    pub name: String,
    pub iso_alpha_3: String,
    pub rir: Classified<Rir>,
    pub ipv4: u64,
    pub pop: u64,
    pub ipv6: Option<u64>,
    /// IPv4 addresses held by every non-aggregate summary entry.
    pub pool_ipv4: u64,
    /// Share of `pool_ipv4`, in percent.
    pub percentv4: f64,
    /// Addresses per 100 inhabitants.
    pub pcv4: f64,
    pub log_ipv4: f64,
    pub log_percentv4: f64,
    pub ipv4_grouping: SizeBucket,
}

/// Pool summary totals for one RIR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RirShareRow {
    pub rir: Classified<Rir>,
    pub countries: usize,
    pub ipv4: u64,
    pub percentv4: f64,
}
