//! Data model for IP allocation reconciliation.

pub mod classified;
pub mod enums;
pub mod error;
pub mod issue;
pub mod options;
pub mod record;
pub mod series;
pub mod summary;

pub use classified::{Classified, UNKNOWN_LABEL};
pub use enums::{ResourceType, Rir, Status, UNALLOCATED};
pub use error::{ModelError, Result};
pub use issue::{Diagnostics, Issue, Severity, StatKind};
pub use options::{FillPolicy, ReconcileSpec, SummaryOptions};
pub use record::{
    AllocationRecord, AugmentedRecord, BlockPrefix, CodeOrigin, FEED_DATE_FORMAT, IssueDate,
    NormalizedCountry,
};
pub use series::{
    CountryYearRow, RegistryYearRow, StatObservation, StatSource, Statistic, YearRange,
};
pub use summary::{PoolSummaryRow, RirShareRow, SizeBucket, SummaryEntry};
