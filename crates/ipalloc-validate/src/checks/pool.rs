//! Pool summary share check.

use ipalloc_common::{any_to_f64, any_to_u64};
use ipalloc_model::Issue;
use polars::prelude::DataFrame;

use super::{cell, column};

/// Allowed distance of the summed `percentv4` from the expected share.
pub const SHARE_TOLERANCE: f64 = 1e-6;

/// The rows' `percentv4` must add up to their addresses as a share of
/// `pool_ipv4`. Holders left out of the rows keep the sum below 100.
pub fn check_pool_share(df: &DataFrame) -> Vec<Issue> {
    let (Some(percent), Some(ipv4), Some(pool)) = (
        column(df, "percentv4"),
        column(df, "ipv4"),
        column(df, "pool_ipv4"),
    ) else {
        return Vec::new();
    };
    let Some(pool_ipv4) = (0..df.height())
        .find_map(|idx| any_to_u64(cell(pool, idx)))
        .filter(|pool| *pool > 0)
    else {
        return Vec::new();
    };
    let total: f64 = (0..df.height())
        .filter_map(|idx| any_to_f64(cell(percent, idx)))
        .sum();
    let held: f64 = (0..df.height())
        .filter_map(|idx| any_to_f64(cell(ipv4, idx)))
        .sum();
    let expected = held / pool_ipv4 as f64 * 100.0;
    if (total - expected).abs() <= SHARE_TOLERANCE {
        return Vec::new();
    }
    vec![Issue::PoolShareMismatch {
        total_percent: total,
        expected_percent: expected,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::Column;

    fn frame(ipv4: Vec<u64>, pool: u64, percent: Vec<f64>) -> DataFrame {
        let pool = vec![pool; ipv4.len()];
        DataFrame::new(vec![
            Column::new("ipv4".into(), ipv4),
            Column::new("pool_ipv4".into(), pool),
            Column::new("percentv4".into(), percent),
        ])
        .expect("frame")
    }

    #[test]
    fn complete_pool_passes() {
        assert!(check_pool_share(&frame(vec![1, 3], 4, vec![25.0, 75.0])).is_empty());
        assert!(check_pool_share(&frame(vec![0, 0], 0, vec![0.0, 0.0])).is_empty());
    }

    #[test]
    fn partial_rows_compare_against_the_pool() {
        assert!(check_pool_share(&frame(vec![100], 200, vec![50.0])).is_empty());
        let issues = check_pool_share(&frame(vec![100], 200, vec![100.0]));
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].message(),
            "Pool percentages sum to 100.0000 instead of 50.0000"
        );
    }

    #[test]
    fn short_pool_is_reported() {
        let issues = check_pool_share(&frame(vec![1, 3], 4, vec![25.0, 70.0]));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code(), "INT005");
    }
}
