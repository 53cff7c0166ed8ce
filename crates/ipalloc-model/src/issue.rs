//! Diagnostics raised while building the output tables.
//!
//! Nothing here is fatal. Each variant carries only the data it needs and
//! knows its own code, default severity and message.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::enums::{ResourceType, Rir};

/// Issue severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A source or table could not be used.
    Error,
    /// Data was dropped, coerced or is suspect.
    Warning,
    /// Expected data quirk, recorded for completeness.
    Info,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
            Severity::Info => "Info",
        }
    }
}

/// Statistic kind for fill diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    Population,
    GdpPerCapita,
}

impl StatKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatKind::Population => "Population",
            StatKind::GdpPerCapita => "GDPPerCap",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    // Ingestion
    /// A source could not be fetched or read.
    FetchFailed { source: String, message: String },
    /// Lines dropped because they could not be parsed.
    MalformedLines {
        source: String,
        count: u64,
        samples: Vec<String>,
    },
    /// Block sizes that did not parse and were coerced to zero.
    CoercedValues { source: String, count: u64 },
    /// Records whose issue date was missing or invalid.
    UnknownDates { source: String, count: u64 },
    /// Statistical aggregate rows (regions, income groups) removed.
    AggregateRowsDropped { source: String, count: u64 },
    /// Summary entries removed by the population or name filters.
    SummaryEntriesSkipped { count: u64 },

    // Classification
    /// Country codes with no ISO mapping.
    UnmappedCountryCodes { codes: Vec<String>, count: u64 },
    /// Alpha-3 codes in no RIR list.
    UnclassifiedCodes { codes: Vec<String>, count: u64 },
    /// A code listed by more than one RIR; the first list wins.
    PartitionOverlap { code: String, kept: Rir, ignored: Rir },

    // Reconciliation
    /// Records left out of the series because their date is unknown.
    UndatedRecords {
        resource_type: ResourceType,
        count: u64,
    },
    /// Records dated after the configured range.
    RecordsAfterRange {
        resource_type: ResourceType,
        end_year: i32,
        count: u64,
    },
    /// A country was delegated by more than one registry.
    RegistryConflict {
        iso3: String,
        registries: Vec<String>,
        resolved: String,
    },

    // Integrity
    /// Cumulative value went down between consecutive years.
    CumulativeDecrease {
        iso3: String,
        year: i32,
        previous: u64,
        current: u64,
    },
    /// Years missing for a country.
    NonContiguousYears { iso3: String, missing: Vec<i32> },
    /// Years appearing more than once for a country.
    DuplicateYears { iso3: String, years: Vec<i32> },
    /// Statistic still zero after both fill passes.
    PlaceholderStatistic {
        statistic: StatKind,
        iso3: String,
        years: u64,
    },
    /// Population of zero in years that are not placeholders.
    ZeroPopulation { iso3: String, years: u64 },
    /// Row percentages do not add up to the rows' share of the pool.
    PoolShareMismatch {
        total_percent: f64,
        expected_percent: f64,
    },
    /// An output table lacks a required column.
    MissingColumn { table: String, column: String },
}

impl Issue {
    /// Stable identifier for filtering and reports.
    pub fn code(&self) -> &'static str {
        match self {
            Issue::FetchFailed { .. } => "ING001",
            Issue::MalformedLines { .. } => "ING002",
            Issue::CoercedValues { .. } => "ING003",
            Issue::UnknownDates { .. } => "ING004",
            Issue::AggregateRowsDropped { .. } => "ING005",
            Issue::SummaryEntriesSkipped { .. } => "ING006",
            Issue::UnmappedCountryCodes { .. } => "CLS001",
            Issue::UnclassifiedCodes { .. } => "CLS002",
            Issue::PartitionOverlap { .. } => "CLS003",
            Issue::UndatedRecords { .. } => "REC001",
            Issue::RecordsAfterRange { .. } => "REC002",
            Issue::RegistryConflict { .. } => "REC003",
            Issue::CumulativeDecrease { .. } => "INT001",
            Issue::NonContiguousYears { .. } => "INT002",
            Issue::DuplicateYears { .. } => "INT003",
            Issue::PlaceholderStatistic { .. } => "INT004",
            Issue::PoolShareMismatch { .. } => "INT005",
            Issue::MissingColumn { .. } => "INT006",
            Issue::ZeroPopulation { .. } => "INT007",
        }
    }

    /// Count of affected items, when the issue aggregates several.
    pub fn count(&self) -> Option<u64> {
        match self {
            Issue::MalformedLines { count, .. }
            | Issue::CoercedValues { count, .. }
            | Issue::UnknownDates { count, .. }
            | Issue::AggregateRowsDropped { count, .. }
            | Issue::SummaryEntriesSkipped { count }
            | Issue::UnmappedCountryCodes { count, .. }
            | Issue::UnclassifiedCodes { count, .. }
            | Issue::UndatedRecords { count, .. }
            | Issue::RecordsAfterRange { count, .. } => Some(*count),
            Issue::PlaceholderStatistic { years, .. } | Issue::ZeroPopulation { years, .. } => {
                Some(*years)
            }
            Issue::NonContiguousYears { missing, .. } => Some(missing.len() as u64),
            Issue::DuplicateYears { years, .. } => Some(years.len() as u64),
            _ => None,
        }
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            Issue::FetchFailed { .. } | Issue::MissingColumn { .. } => Severity::Error,
            Issue::UnknownDates { .. }
            | Issue::AggregateRowsDropped { .. }
            | Issue::SummaryEntriesSkipped { .. }
            | Issue::UnclassifiedCodes { .. }
            | Issue::UndatedRecords { .. }
            | Issue::RecordsAfterRange { .. } => Severity::Info,
            Issue::PlaceholderStatistic {
                statistic: StatKind::GdpPerCapita,
                ..
            } => Severity::Info,
            _ => Severity::Warning,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Issue::FetchFailed { source, message } => {
                format!("Source {source} could not be fetched: {message}")
            }
            Issue::MalformedLines { source, count, .. } => {
                format!("{count} malformed line(s) dropped from {source}")
            }
            Issue::CoercedValues { source, count } => {
                format!("{count} unparsable block size(s) in {source} coerced to 0")
            }
            Issue::UnknownDates { source, count } => {
                format!("{count} record(s) in {source} have no valid date")
            }
            Issue::AggregateRowsDropped { source, count } => {
                format!("{count} aggregate row(s) dropped from {source}")
            }
            Issue::SummaryEntriesSkipped { count } => {
                format!("{count} summary entry(ies) filtered out")
            }
            Issue::UnmappedCountryCodes { codes, count } => format!(
                "{count} record(s) with unmapped country codes: {}",
                codes.join(", ")
            ),
            Issue::UnclassifiedCodes { codes, count } => format!(
                "{count} record(s) with codes outside every RIR: {}",
                codes.join(", ")
            ),
            Issue::PartitionOverlap { code, kept, ignored } => {
                format!("{code} is listed by both {kept} and {ignored}; using {kept}")
            }
            Issue::UndatedRecords {
                resource_type,
                count,
            } => format!("{count} {resource_type} record(s) without a date left out of the series"),
            Issue::RecordsAfterRange {
                resource_type,
                end_year,
                count,
            } => format!("{count} {resource_type} record(s) dated after {end_year} left out of the series"),
            Issue::RegistryConflict {
                iso3,
                registries,
                resolved,
            } => format!(
                "{iso3} delegated by {}; resolved to {resolved}",
                registries.join(", ")
            ),
            Issue::CumulativeDecrease {
                iso3,
                year,
                previous,
                current,
            } => format!("{iso3} cumulative value fell from {previous} to {current} in {year}"),
            Issue::NonContiguousYears { iso3, missing } => {
                format!("{iso3} is missing {} year(s), first {}", missing.len(), first_year(missing))
            }
            Issue::DuplicateYears { iso3, years } => {
                format!("{iso3} has duplicate rows for {} year(s), first {}", years.len(), first_year(years))
            }
            Issue::PlaceholderStatistic {
                statistic,
                iso3,
                years,
            } => format!("{iso3} has no {statistic} data; {years} year(s) set to 0"),
            Issue::ZeroPopulation { iso3, years } => {
                format!("{iso3} has a population of 0 in {years} year(s)")
            }
            Issue::PoolShareMismatch {
                total_percent,
                expected_percent,
            } => format!(
                "Pool percentages sum to {total_percent:.4} instead of {expected_percent:.4}"
            ),
            Issue::MissingColumn { table, column } => {
                format!("Table {table} is missing column {column}")
            }
        }
    }
}

fn first_year(years: &[i32]) -> String {
    years.first().map_or_else(String::new, ToString::to_string)
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

/// All issues collected during one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub issues: Vec<Issue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = Issue>) {
        self.issues.extend(issues);
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.default_severity() == severity)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.count_by_severity(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count_by_severity(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Issues with the given code.
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Issue> + 'a {
        self.issues.iter().filter(move |issue| issue.code() == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_severity() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Issue::FetchFailed {
            source: "arin".to_string(),
            message: "timed out".to_string(),
        });
        diagnostics.push(Issue::MalformedLines {
            source: "apnic".to_string(),
            count: 2,
            samples: vec![],
        });
        diagnostics.push(Issue::UnknownDates {
            source: "apnic".to_string(),
            count: 1,
        });
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(diagnostics.warning_count(), 1);
        assert_eq!(diagnostics.count_by_severity(Severity::Info), 1);
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.with_code("ING002").count(), 1);
    }

    #[test]
    fn gdp_placeholders_are_informational() {
        let gdp = Issue::PlaceholderStatistic {
            statistic: StatKind::GdpPerCapita,
            iso3: "XYZ".to_string(),
            years: 42,
        };
        let pop = Issue::PlaceholderStatistic {
            statistic: StatKind::Population,
            iso3: "XYZ".to_string(),
            years: 42,
        };
        assert_eq!(gdp.default_severity(), Severity::Info);
        assert_eq!(pop.default_severity(), Severity::Warning);
        let zero = Issue::ZeroPopulation {
            iso3: "XYZ".to_string(),
            years: 2,
        };
        assert_eq!(zero.default_severity(), Severity::Warning);
        insta::assert_snapshot!(zero.to_string(), @"[INT007] XYZ has a population of 0 in 2 year(s)");
    }

    #[test]
    fn formats_cumulative_decrease() {
        let issue = Issue::CumulativeDecrease {
            iso3: "JPN".to_string(),
            year: 2001,
            previous: 512,
            current: 256,
        };
        insta::assert_snapshot!(issue.to_string(), @"[INT001] JPN cumulative value fell from 512 to 256 in 2001");
    }

    #[test]
    fn serializes_with_kind_tag() {
        let issue = Issue::SummaryEntriesSkipped { count: 3 };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["kind"], "summary_entries_skipped");
        assert_eq!(json["count"], 3);
    }
}
