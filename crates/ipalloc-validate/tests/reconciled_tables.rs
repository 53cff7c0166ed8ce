//! Reconciled tables pass the integrity checks; damaged ones do not.

use ipalloc_ingest::{StatTable, parse_delegation_feed};
use ipalloc_model::{ReconcileSpec, ResourceType, Rir, StatObservation, YearRange};
use ipalloc_standards::ClassificationTables;
use ipalloc_transform::{Augmenter, OutputFrame, OutputTable, reconcile, time_series_frame};
use ipalloc_validate::validate_outputs;
use polars::prelude::{Column, DataFrame};

const FEED: &str = "\
apnic|JP|ipv4|1.0.0.0|256|19990101|allocated
apnic|JP|ipv4|1.0.1.0|256|20010101|allocated
apnic|AU|ipv4|1.0.2.0|1024|20000101|assigned
";

fn years() -> YearRange {
    YearRange::new(1998, 2002).expect("range")
}

fn reconciled_frame() -> DataFrame {
    let augmenter = Augmenter::new(ClassificationTables::standard());
    let records = augmenter
        .augment(parse_delegation_feed(FEED, Rir::Apnic).records)
        .records;
    let population = StatTable::from_observations(
        years()
            .years()
            .flat_map(|year| {
                ["JPN", "AUS"].map(|iso3| StatObservation {
                    iso3: iso3.to_string(),
                    country: String::new(),
                    year,
                    value: 1_000.0,
                })
            }),
    );
    let gdp = population.clone();
    let spec = ReconcileSpec::new(ResourceType::Ipv4).with_years(years());
    let reconciled = reconcile(&records, &population, &gdp, &spec, &augmenter);
    time_series_frame(&reconciled.rows).expect("frame")
}

#[test]
fn reconciled_series_is_clean() {
    let frame = OutputFrame::new(
        OutputTable::TimeSeries(ResourceType::Ipv4),
        reconciled_frame(),
    );
    let issues = validate_outputs(&[frame], years());
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
}

#[test]
fn damaged_series_is_reported() {
    let mut df = reconciled_frame();
    let height = df.height();
    let damaged: Vec<u64> = (0..height as u64).rev().collect();
    df.with_column(Column::new("Cumulative Value".into(), damaged))
        .expect("replace column");
    let df = df.drop("Country").expect("drop column");
    let frame = OutputFrame::new(OutputTable::TimeSeries(ResourceType::Ipv4), df);
    let issues = validate_outputs(&[frame], years());
    let codes: Vec<&str> = issues.iter().map(|issue| issue.code()).collect();
    assert_eq!(codes[0], "INT006");
    assert!(codes.iter().filter(|code| **code == "INT001").count() >= 2);
}
