//! Integrity checks over the produced tables.
//!
//! Checks never fail a run; every finding becomes an [`Issue`] in the
//! diagnostics report.

pub mod checks;
pub mod report;

use ipalloc_model::{Issue, YearRange};
use ipalloc_transform::{OutputFrame, OutputTable};
use tracing::info;

pub use checks::columns::check_columns;
pub use checks::pool::{SHARE_TOLERANCE, check_pool_share};
pub use checks::series::check_time_series;
pub use report::{REPORT_FILE_NAME, diagnostics_json, write_diagnostics_json};

/// Runs every check that applies to each frame.
pub fn validate_outputs(frames: &[OutputFrame], years: YearRange) -> Vec<Issue> {
    let mut issues = Vec::new();
    for frame in frames {
        let before = issues.len();
        issues.extend(check_columns(frame));
        match frame.table {
            OutputTable::TimeSeries(_) => issues.extend(check_time_series(&frame.data, years)),
            OutputTable::PoolSummary => issues.extend(check_pool_share(&frame.data)),
            _ => {}
        }
        info!(
            table = %frame.name(),
            rows = frame.record_count(),
            issues = issues.len() - before,
            "validated table"
        );
    }
    issues
}
