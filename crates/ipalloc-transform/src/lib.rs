//! Normalization, classification, reconciliation and aggregation.
//!
//! Every stage is a pure function of its inputs plus the injected
//! [`ClassificationTables`](ipalloc_standards::ClassificationTables).

pub mod aggregate;
pub mod augment;
pub mod classify;
pub mod fill;
pub mod frame;
pub mod normalize;
pub mod prefix;
pub mod reconcile;
pub mod status;

pub use aggregate::{
    PoolSummary, build_pool_summary, log_scale, per_capita_share, percent_of_pool, rir_shares,
};
pub use augment::{Augmented, Augmenter, distinct_countries, partition_by_type};
pub use classify::RirClassifier;
pub use fill::fill_series;
pub use frame::{
    OutputFrame, OutputTable, allocation_frame, pool_summary_frame, registry_series_frame,
    rir_share_frame, time_series_frame,
};
pub use normalize::CountryNormalizer;
pub use prefix::{block_prefix, prefix_length};
pub use reconcile::{Reconciled, reconcile, registry_series};
pub use status::registry_status_summary;
