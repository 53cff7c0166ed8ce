//! Derived metrics over the per-country allocation summary.

use std::collections::BTreeMap;

use ipalloc_model::{
    Classified, Issue, PoolSummaryRow, Rir, RirShareRow, SizeBucket, SummaryEntry, SummaryOptions,
};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::augment::Augmenter;

/// `value` as a percentage of `total`; zero when the total is zero.
pub fn percent_of_pool(value: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    value as f64 / total as f64 * 100.0
}

/// Addresses per 100 inhabitants; zero when the population is zero.
pub fn per_capita_share(value: u64, population: u64) -> f64 {
    if population == 0 {
        return 0.0;
    }
    value as f64 / population as f64 * 100.0
}

pub fn log_scale(value: f64) -> f64 {
    (value + 1.0).log10()
}

/// Pool summary rows plus the number of filtered entries.
#[derive(Debug, Clone, Default)]
pub struct PoolSummary {
    pub rows: Vec<PoolSummaryRow>,
    pub skipped: u64,
    /// Global IPv4 pool the shares are taken over.
    pub pool_ipv4: u64,
}

impl PoolSummary {
    pub fn issues(&self) -> Vec<Issue> {
        if self.skipped == 0 {
            return Vec::new();
        }
        vec![Issue::SummaryEntriesSkipped {
            count: self.skipped,
        }]
    }
}

/// Filters the summary and computes per-country metrics.
///
/// Entries without a population above the threshold, and the excluded
/// codes and names, are skipped. Pool percentages are taken over every
/// entry except the aggregate rows, so skipped holders such as `EU` still
/// count towards the pool. Rows are sorted by alpha-2 code.
pub fn build_pool_summary(
    entries: &[SummaryEntry],
    options: &SummaryOptions,
    augmenter: &Augmenter,
) -> PoolSummary {
    let mut kept: Vec<(&SummaryEntry, u64)> = entries
        .iter()
        .filter_map(|entry| {
            let pop = entry.pop?;
            options.keeps(&entry.code, &entry.name, pop).then_some((entry, pop))
        })
        .collect();
    kept.sort_by(|(a, _), (b, _)| a.code.cmp(&b.code));
    let skipped = (entries.len() - kept.len()) as u64;
    let total = entries
        .iter()
        .filter(|entry| !options.is_aggregate(&entry.name))
        .fold(0u64, |acc, entry| acc.saturating_add(entry.ipv4.unwrap_or(0)));

    let rows: Vec<PoolSummaryRow> = kept
        .par_iter()
        .map(|(entry, pop)| {
            let country = augmenter.normalizer().normalize(&entry.code);
            let ipv4 = entry.ipv4.unwrap_or(0);
            let percentv4 = percent_of_pool(ipv4, total);
            PoolSummaryRow {
                country_code: entry.code.clone(),
                name: entry.name.clone(),
                rir: augmenter.classifier().classify(&country.alpha3),
                iso_alpha_3: country.alpha3,
                ipv4,
                pop: *pop,
                ipv6: entry.ipv6,
                pool_ipv4: total,
                percentv4,
                pcv4: per_capita_share(ipv4, *pop),
                log_ipv4: log_scale(ipv4 as f64),
                log_percentv4: log_scale(percentv4),
                ipv4_grouping: SizeBucket::classify(ipv4),
            }
        })
        .collect();
    info!(rows = rows.len(), skipped, pool_ipv4 = total, "built pool summary");
    PoolSummary {
        rows,
        skipped,
        pool_ipv4: total,
    }
}

/// Country count, address total and summed pool share per RIR.
pub fn rir_shares(rows: &[PoolSummaryRow]) -> Vec<RirShareRow> {
    let mut shares: BTreeMap<Classified<Rir>, RirShareRow> = BTreeMap::new();
    for row in rows {
        let share = shares.entry(row.rir).or_insert_with(|| RirShareRow {
            rir: row.rir,
            countries: 0,
            ipv4: 0,
            percentv4: 0.0,
        });
        share.countries += 1;
        share.ipv4 = share.ipv4.saturating_add(row.ipv4);
        share.percentv4 += row.percentv4;
    }
    debug!(rirs = shares.len(), "computed rir shares");
    shares.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipalloc_standards::ClassificationTables;
    use proptest::prelude::*;

    fn entry(code: &str, name: &str, ipv4: Option<u64>, pop: Option<u64>) -> SummaryEntry {
        SummaryEntry {
            code: code.to_string(),
            name: name.to_string(),
            ipv4,
            pop,
            ipv6: None,
        }
    }

    fn augmenter() -> Augmenter {
        Augmenter::new(ClassificationTables::standard())
    }

    #[test]
    fn metric_helpers_guard_zero_denominators() {
        assert_eq!(percent_of_pool(5, 0), 0.0);
        assert_eq!(per_capita_share(5, 0), 0.0);
        assert_eq!(percent_of_pool(25, 100), 25.0);
        assert_eq!(per_capita_share(3, 2), 150.0);
        assert_eq!(log_scale(0.0), 0.0);
        assert!((log_scale(99.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn filters_and_derives_rows() {
        let entries = vec![
            entry("US", "United States", Some(300), Some(1_000)),
            entry("JP", "Japan", Some(100), Some(2_000)),
            entry("EU", "Europe", Some(50), Some(5_000)),
            entry("WD", "World", Some(1_000), Some(9_000)),
            entry("TV", "Tuvalu", Some(40), Some(800)),
            entry("AQ", "Antarctica", Some(10), None),
        ];
        let summary = build_pool_summary(&entries, &SummaryOptions::default(), &augmenter());
        assert_eq!(summary.skipped, 4);
        assert_eq!(summary.pool_ipv4, 500);
        assert_eq!(summary.issues().len(), 1);
        let codes: Vec<&str> = summary.rows.iter().map(|r| r.country_code.as_str()).collect();
        assert_eq!(codes, vec!["JP", "US"]);
        let jp = &summary.rows[0];
        assert_eq!(jp.iso_alpha_3, "JPN");
        assert_eq!(jp.rir, Classified::Classified(Rir::Apnic));
        assert_eq!(jp.pool_ipv4, 500);
        assert!((jp.percentv4 - 20.0).abs() < 1e-9);
        assert!((jp.pcv4 - 5.0).abs() < 1e-9);
        assert_eq!(jp.ipv4_grouping, SizeBucket::UpTo10K);
        let us = &summary.rows[1];
        assert!((us.percentv4 - 60.0).abs() < 1e-9);
        assert_eq!(us.rir, Classified::Classified(Rir::Arin));
    }

    #[test]
    fn skipped_holders_stay_in_the_pool() {
        let entries = vec![
            entry("JP", "Japan", Some(100), Some(2_000)),
            entry("EU", "Europe", Some(100), Some(5_000)),
        ];
        let summary = build_pool_summary(&entries, &SummaryOptions::default(), &augmenter());
        assert_eq!(summary.rows.len(), 1);
        assert_eq!(summary.pool_ipv4, 200);
        assert!((summary.rows[0].percentv4 - 50.0).abs() < 1e-9);
    }

    #[test]
    fn rir_shares_total_per_registry() {
        let entries = vec![
            entry("JP", "Japan", Some(100), Some(2_000)),
            entry("AU", "Australia", Some(100), Some(2_000)),
            entry("US", "United States", Some(200), Some(2_000)),
        ];
        let summary = build_pool_summary(&entries, &SummaryOptions::default(), &augmenter());
        let shares = rir_shares(&summary.rows);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].rir, Classified::Classified(Rir::Apnic));
        assert_eq!(shares[0].countries, 2);
        assert_eq!(shares[0].ipv4, 200);
        assert!((shares[0].percentv4 - 50.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn rir_share_matches_pool_fraction(
            holdings in proptest::collection::vec((0usize..4, 0u64..1_000_000_000), 1..40)
        ) {
            let codes = ["JP", "US", "BR", "DE"];
            let entries: Vec<SummaryEntry> = holdings
                .iter()
                .enumerate()
                .map(|(i, (slot, ipv4))| {
                    entry(codes[*slot], &format!("Country {i}"), Some(*ipv4), Some(10_000))
                })
                .collect();
            let augmenter = augmenter();
            let summary = build_pool_summary(&entries, &SummaryOptions::default(), &augmenter);
            let total = summary.pool_ipv4;
            for share in rir_shares(&summary.rows) {
                let expected = percent_of_pool(share.ipv4, total);
                prop_assert!((share.percentv4 - expected).abs() < 1e-6);
            }
        }
    }
}
