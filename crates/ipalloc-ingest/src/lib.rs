//! Ingestion of delegation feeds, statistics tables and the allocation summary.

pub mod delegation;
pub mod error;
pub mod fetch;
pub mod source;
pub mod stats;
pub mod summary;

pub use delegation::{FeedStats, ParsedFeed, RegistryIngest, fetch_registry_feeds, parse_delegation_feed};
pub use error::{IngestError, Result};
pub use fetch::{
    CancelFlag, DEFAULT_TIMEOUT, FetchOutcome, FetchedSource, FileFetcher, HttpFetcher,
    SourceFetcher, decode_text, fetch_all,
};
pub use source::{
    DEFAULT_SUMMARY_URL, SourceKind, SourceLocation, SourceSpec, default_registry_url,
};
pub use stats::{
    CleanedStats, StatTable, WideTable, clean_observations, melt, read_long_table,
    read_wide_table,
};
pub use summary::{ParsedSummary, parse_summary};
