//! RIR delegation feed parsing.
//!
//! Extended delegation files are pipe-delimited:
//!
//! ```text
//! 2|apnic|20240101|...                          version header
//! apnic|*|ipv4|*|51234|summary                  summary line
//! apnic|JP|ipv4|1.0.16.0|4096|20110412|allocated|A91872ED
//! ```
//!
//! Only the record lines become [`AllocationRecord`]s. Problem lines are
//! dropped and counted; a feed never fails as a whole.

use ipalloc_common::parse_u64;
use ipalloc_model::{AllocationRecord, IssueDate, Issue, ResourceType, Rir, Status};
use serde::Serialize;
use tracing::{debug, trace};

use crate::fetch::{CancelFlag, FetchOutcome, SourceFetcher, fetch_all};
use crate::source::{SourceKind, SourceLocation, SourceSpec};

/// Minimum number of fields on a record line.
pub const MIN_FIELDS: usize = 7;

const MAX_SAMPLES: usize = 5;

/// Per-feed parse counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedStats {
    pub source: Rir,
    /// Non-blank, non-comment lines.
    pub lines: u64,
    pub parsed: u64,
    pub malformed: u64,
    /// Version header and summary lines.
    pub metadata: u64,
    /// Records whose block size failed to parse and became 0.
    pub coerced_values: u64,
    pub unknown_dates: u64,
    pub malformed_samples: Vec<String>,
}

impl FeedStats {
    fn new(source: Rir) -> Self {
        Self {
            source,
            lines: 0,
            parsed: 0,
            malformed: 0,
            metadata: 0,
            coerced_values: 0,
            unknown_dates: 0,
            malformed_samples: Vec::new(),
        }
    }

    fn record_malformed(&mut self, line: &str) {
        self.malformed += 1;
        if self.malformed_samples.len() < MAX_SAMPLES {
            self.malformed_samples.push(line.to_string());
        }
    }

    /// Diagnostics for the non-zero counters.
    pub fn issues(&self) -> Vec<Issue> {
        let source = self.source.feed_token().to_string();
        let mut issues = Vec::new();
        if self.malformed > 0 {
            issues.push(Issue::MalformedLines {
                source: source.clone(),
                count: self.malformed,
                samples: self.malformed_samples.clone(),
            });
        }
        if self.coerced_values > 0 {
            issues.push(Issue::CoercedValues {
                source: source.clone(),
                count: self.coerced_values,
            });
        }
        if self.unknown_dates > 0 {
            issues.push(Issue::UnknownDates {
                source,
                count: self.unknown_dates,
            });
        }
        issues
    }
}

/// Records and counters of one feed.
#[derive(Debug, Clone)]
pub struct ParsedFeed {
    pub records: Vec<AllocationRecord>,
    pub stats: FeedStats,
}

enum LineKind {
    Skip,
    Metadata,
    Malformed,
    Record(AllocationRecord, LineFlags),
}

#[derive(Default)]
struct LineFlags {
    coerced_value: bool,
    unknown_date: bool,
}

/// Parses one delegation feed, tagging every record with `source`.
pub fn parse_delegation_feed(text: &str, source: Rir) -> ParsedFeed {
    let mut stats = FeedStats::new(source);
    let mut records = Vec::new();
    for raw in text.lines() {
        let line = raw.trim();
        match classify_line(line, source) {
            LineKind::Skip => continue,
            LineKind::Metadata => {
                stats.lines += 1;
                stats.metadata += 1;
            }
            LineKind::Malformed => {
                stats.lines += 1;
                trace!(source = %source, line, "malformed delegation line");
                stats.record_malformed(line);
            }
            LineKind::Record(record, flags) => {
                stats.lines += 1;
                stats.parsed += 1;
                if flags.coerced_value {
                    stats.coerced_values += 1;
                }
                if flags.unknown_date {
                    stats.unknown_dates += 1;
                }
                records.push(record);
            }
        }
    }
    debug!(
        source = %source,
        parsed = stats.parsed,
        malformed = stats.malformed,
        metadata = stats.metadata,
        "parsed delegation feed"
    );
    ParsedFeed { records, stats }
}

fn classify_line(line: &str, source: Rir) -> LineKind {
    if line.is_empty() || line.starts_with('#') {
        return LineKind::Skip;
    }
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    if fields
        .first()
        .is_some_and(|first| !first.is_empty() && first.chars().all(|c| c.is_ascii_digit() || c == '.'))
    {
        return LineKind::Metadata;
    }
    if fields.len() >= 6 && fields[1] == "*" && fields[5].eq_ignore_ascii_case("summary") {
        return LineKind::Metadata;
    }
    if fields.len() < MIN_FIELDS {
        return LineKind::Malformed;
    }
    let Ok(resource_type) = fields[2].parse::<ResourceType>() else {
        return LineKind::Malformed;
    };
    let Ok(status) = fields[6].parse::<Status>() else {
        return LineKind::Malformed;
    };
    let mut flags = LineFlags::default();
    let value = parse_u64(fields[4]).unwrap_or_else(|| {
        flags.coerced_value = true;
        0
    });
    let date = IssueDate::parse(fields[5]);
    flags.unknown_date = !date.is_known();
    let optional = |index: usize| {
        fields
            .get(index)
            .filter(|value| !value.is_empty())
            .map(|value| (*value).to_string())
    };
    let record = AllocationRecord {
        registry: fields[0].to_ascii_lowercase(),
        source,
        country_code: fields[1].to_ascii_uppercase(),
        resource_type,
        start: fields[3].to_string(),
        value,
        date,
        status,
        opaque_id: optional(7),
        extensions: (fields.len() > 8)
            .then(|| fields[8..].join("|"))
            .filter(|joined| !joined.is_empty()),
    };
    LineKind::Record(record, flags)
}

/// Combined output of the five registry feeds.
#[derive(Debug, Default)]
pub struct RegistryIngest {
    pub records: Vec<AllocationRecord>,
    pub stats: Vec<FeedStats>,
    /// Sources that could not be fetched, with the error message.
    pub failures: Vec<(String, String)>,
}

impl RegistryIngest {
    /// Parses the registry outcomes among `outcomes`; other kinds are ignored.
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a FetchOutcome>) -> Self {
        let mut ingest = RegistryIngest::default();
        for outcome in outcomes {
            let SourceKind::Registry(rir) = outcome.spec.kind else {
                continue;
            };
            match &outcome.result {
                Ok(fetched) => {
                    let parsed = parse_delegation_feed(&fetched.body, rir);
                    ingest.records.extend(parsed.records);
                    ingest.stats.push(parsed.stats);
                }
                Err(err) => ingest
                    .failures
                    .push((rir.feed_token().to_string(), err.to_string())),
            }
        }
        ingest
    }

    /// Parse and fetch diagnostics.
    pub fn issues(&self) -> Vec<Issue> {
        self.failures
            .iter()
            .map(|(source, message)| Issue::FetchFailed {
                source: source.clone(),
                message: message.clone(),
            })
            .chain(self.stats.iter().flat_map(FeedStats::issues))
            .collect()
    }
}

/// Fetches and parses the given registry feeds concurrently.
pub fn fetch_registry_feeds(
    fetcher: &dyn SourceFetcher,
    feeds: &[(Rir, SourceLocation)],
    cancel: &CancelFlag,
) -> RegistryIngest {
    let specs: Vec<SourceSpec> = feeds
        .iter()
        .map(|(rir, location)| SourceSpec::new(SourceKind::Registry(*rir), location.clone()))
        .collect();
    let outcomes = fetch_all(fetcher, &specs, cancel);
    RegistryIngest::from_outcomes(&outcomes)
}
