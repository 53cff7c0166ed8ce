//! Options controlling reconciliation and summary filtering.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::enums::ResourceType;
use crate::series::YearRange;

/// How gaps in a per-country statistic series are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPolicy {
    /// Nearest later value first, then nearest earlier value.
    #[default]
    BackwardThenForward,
    /// Nearest earlier value first, then nearest later value.
    ForwardThenBackward,
    /// Leave gaps as placeholders.
    None,
}

/// Parameters of one reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileSpec {
    pub resource_type: ResourceType,
    pub years: YearRange,
    pub fill: FillPolicy,
    /// Alpha-3 codes removed from the series.
    pub excluded_codes: BTreeSet<String>,
}

impl ReconcileSpec {
    pub fn new(resource_type: ResourceType) -> Self {
        Self {
            resource_type,
            years: YearRange::default(),
            fill: FillPolicy::default(),
            excluded_codes: BTreeSet::new(),
        }
    }

    pub fn with_years(mut self, years: YearRange) -> Self {
        self.years = years;
        self
    }

    pub fn with_fill(mut self, fill: FillPolicy) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_excluded_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_codes = codes
            .into_iter()
            .map(|code| code.into().trim().to_ascii_uppercase())
            .collect();
        self
    }

    pub fn is_excluded(&self, iso3: &str) -> bool {
        self.excluded_codes.contains(iso3)
    }
}

/// Filters applied to the JSON summary before metrics are computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryOptions {
    /// Entries must have a population strictly above this.
    pub min_population: u64,
    /// Alpha-2 keys to skip.
    pub excluded_codes: Vec<String>,
    /// Aggregate entry names (`World`). They are neither rows nor part of
    /// the global pool.
    pub excluded_names: Vec<String>,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            min_population: 800,
            excluded_codes: vec!["EU".to_string()],
            excluded_names: vec!["World".to_string()],
        }
    }
}

impl SummaryOptions {
    pub fn with_min_population(mut self, min_population: u64) -> Self {
        self.min_population = min_population;
        self
    }

    /// Whether the entry becomes a pool summary row.
    pub fn keeps(&self, code: &str, name: &str, population: u64) -> bool {
        population > self.min_population
            && !self
                .excluded_codes
                .iter()
                .any(|excluded| excluded.eq_ignore_ascii_case(code.trim()))
            && !self.is_aggregate(name)
    }

    /// Whether the entry totals other entries and stays out of the pool.
    pub fn is_aggregate(&self, name: &str) -> bool {
        self.excluded_names.iter().any(|excluded| excluded == name.trim())
    }
}
