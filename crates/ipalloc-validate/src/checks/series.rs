//! Per-country checks of a reconciled time-series table.
//!
//! Works on the output frame rather than the typed rows so the same checks
//! apply to anything carrying the time-series columns.

use std::collections::BTreeMap;

use ipalloc_common::{any_to_f64, any_to_string, any_to_u64};
use ipalloc_model::{Issue, StatKind, StatSource, YearRange};
use polars::prelude::DataFrame;
use tracing::debug;

use super::{cell, column};

#[derive(Debug, Default)]
struct CountryRows {
    /// (year, cumulative) in row order.
    rows: Vec<(i32, Option<u64>)>,
    population_placeholders: u64,
    /// Zero population outside the placeholder rows.
    population_zeros: u64,
    gdp_placeholders: u64,
}

/// Checks contiguity, duplicate years, cumulative monotonicity, placeholder
/// statistics and zero populations for every country in `df`.
pub fn check_time_series(df: &DataFrame, years: YearRange) -> Vec<Issue> {
    let (Some(iso3), Some(year)) = (column(df, "ISO-3"), column(df, "Year")) else {
        return Vec::new();
    };
    let cumulative = column(df, "Cumulative Value");
    let population = column(df, "Population");
    let population_source = column(df, "Population Source");
    let gdp_source = column(df, "GDPPerCap Source");
    let placeholder = StatSource::Placeholder.as_str();

    let mut countries: BTreeMap<String, CountryRows> = BTreeMap::new();
    for idx in 0..df.height() {
        let code = any_to_string(cell(iso3, idx));
        let Some(year) = any_to_f64(cell(year, idx)).map(|y| y as i32) else {
            continue;
        };
        let entry = countries.entry(code).or_default();
        entry
            .rows
            .push((year, cumulative.and_then(|c| any_to_u64(cell(c, idx)))));
        if population_source.is_some_and(|c| any_to_string(cell(c, idx)) == placeholder) {
            entry.population_placeholders += 1;
        } else if population.is_some_and(|c| any_to_f64(cell(c, idx)) == Some(0.0)) {
            entry.population_zeros += 1;
        }
        if gdp_source.is_some_and(|c| any_to_string(cell(c, idx)) == placeholder) {
            entry.gdp_placeholders += 1;
        }
    }

    let mut issues = Vec::new();
    for (code, mut country) in countries {
        issues.extend(check_years(&code, &country.rows, years));
        country.rows.sort_by_key(|(year, _)| *year);
        issues.extend(check_cumulative(&code, &country.rows));
        if country.population_placeholders > 0 {
            issues.push(Issue::PlaceholderStatistic {
                statistic: StatKind::Population,
                iso3: code.clone(),
                years: country.population_placeholders,
            });
        }
        if country.population_zeros > 0 {
            issues.push(Issue::ZeroPopulation {
                iso3: code.clone(),
                years: country.population_zeros,
            });
        }
        if country.gdp_placeholders > 0 {
            issues.push(Issue::PlaceholderStatistic {
                statistic: StatKind::GdpPerCapita,
                iso3: code,
                years: country.gdp_placeholders,
            });
        }
    }
    debug!(issues = issues.len(), "checked time series");
    issues
}

fn check_years(code: &str, rows: &[(i32, Option<u64>)], years: YearRange) -> Vec<Issue> {
    let mut seen: BTreeMap<i32, usize> = BTreeMap::new();
    for (year, _) in rows {
        *seen.entry(*year).or_default() += 1;
    }
    let mut issues = Vec::new();
    let duplicates: Vec<i32> = seen
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(year, _)| *year)
        .collect();
    if !duplicates.is_empty() {
        issues.push(Issue::DuplicateYears {
            iso3: code.to_string(),
            years: duplicates,
        });
    }
    let missing: Vec<i32> = years.years().filter(|year| !seen.contains_key(year)).collect();
    if !missing.is_empty() {
        issues.push(Issue::NonContiguousYears {
            iso3: code.to_string(),
            missing,
        });
    }
    issues
}

fn check_cumulative(code: &str, rows: &[(i32, Option<u64>)]) -> Vec<Issue> {
    rows.windows(2)
        .filter_map(|pair| {
            let (_, Some(previous)) = pair[0] else {
                return None;
            };
            let (year, Some(current)) = pair[1] else {
                return None;
            };
            (current < previous).then(|| Issue::CumulativeDecrease {
                iso3: code.to_string(),
                year,
                previous,
                current,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::Column;

    fn frame(codes: Vec<&str>, years: Vec<i32>, cumulative: Vec<u64>) -> DataFrame {
        let sources = vec!["observed"; codes.len()];
        DataFrame::new(vec![
            Column::new("ISO-3".into(), codes),
            Column::new("Year".into(), years),
            Column::new("Cumulative Value".into(), cumulative),
            Column::new("Population Source".into(), sources.clone()),
            Column::new("GDPPerCap Source".into(), sources),
        ])
        .expect("frame")
    }

    fn range(start: i32, end: i32) -> YearRange {
        YearRange::new(start, end).expect("range")
    }

    #[test]
    fn clean_series_has_no_issues() {
        let df = frame(vec!["JPN"; 3], vec![2000, 2001, 2002], vec![0, 256, 256]);
        assert!(check_time_series(&df, range(2000, 2002)).is_empty());
    }

    #[test]
    fn reports_gaps_duplicates_and_decreases() {
        let df = frame(
            vec!["JPN", "JPN", "JPN", "JPN"],
            vec![2000, 2001, 2001, 2003],
            vec![512, 256, 256, 300],
        );
        let issues = check_time_series(&df, range(2000, 2003));
        assert_eq!(
            issues,
            vec![
                Issue::DuplicateYears {
                    iso3: "JPN".to_string(),
                    years: vec![2001],
                },
                Issue::NonContiguousYears {
                    iso3: "JPN".to_string(),
                    missing: vec![2002],
                },
                Issue::CumulativeDecrease {
                    iso3: "JPN".to_string(),
                    year: 2001,
                    previous: 512,
                    current: 256,
                },
            ]
        );
    }

    #[test]
    fn counts_placeholder_years() {
        let df = DataFrame::new(vec![
            Column::new("ISO-3".into(), vec!["XYZ", "XYZ"]),
            Column::new("Year".into(), vec![2000, 2001]),
            Column::new("Cumulative Value".into(), vec![0u64, 0]),
            Column::new("Population Source".into(), vec!["placeholder", "observed"]),
            Column::new("GDPPerCap Source".into(), vec!["placeholder", "placeholder"]),
        ])
        .expect("frame");
        let issues = check_time_series(&df, range(2000, 2001));
        let counts: Vec<(&str, Option<u64>)> =
            issues.iter().map(|issue| (issue.code(), issue.count())).collect();
        assert_eq!(counts, vec![("INT004", Some(1)), ("INT004", Some(2))]);
    }

    #[test]
    fn flags_zero_population_from_any_source() {
        let df = DataFrame::new(vec![
            Column::new("ISO-3".into(), vec!["XYZ", "XYZ", "XYZ"]),
            Column::new("Year".into(), vec![2000, 2001, 2002]),
            Column::new("Cumulative Value".into(), vec![0u64, 0, 0]),
            Column::new("Population".into(), vec![0.0, 0.0, 5.0]),
            Column::new(
                "Population Source".into(),
                vec!["observed", "forwardfilled", "observed"],
            ),
            Column::new("GDPPerCap Source".into(), vec!["observed"; 3]),
        ])
        .expect("frame");
        let issues = check_time_series(&df, range(2000, 2002));
        assert_eq!(
            issues,
            vec![Issue::ZeroPopulation {
                iso3: "XYZ".to_string(),
                years: 2,
            }]
        );
    }
}
