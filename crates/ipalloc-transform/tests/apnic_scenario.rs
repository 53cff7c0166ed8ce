//! End-to-end run of a small APNIC feed through augmentation, the status
//! summary and reconciliation.

use ipalloc_ingest::{StatTable, parse_delegation_feed};
use ipalloc_model::{Classified, ReconcileSpec, ResourceType, Rir, YearRange};
use ipalloc_standards::ClassificationTables;
use ipalloc_transform::{
    Augmenter, allocation_frame, partition_by_type, reconcile, registry_status_summary,
};

const FEED: &str = "\
2|apnic|20240101|3|19830613|20231231|+1000
apnic|*|ipv4|*|3|summary
apnic|JP|ipv4|1.0.16.0|256|20110412|allocated
apnic|AU|ipv4|1.0.0.0|256|20110811|allocated
apnic|ZZ|ipv4|1.0.1.0|256|20110414|allocated
";

#[test]
fn three_line_feed_classifies_and_prefixes() {
    let parsed = parse_delegation_feed(FEED, Rir::Apnic);
    assert_eq!(parsed.stats.parsed, 3);
    let augmented = Augmenter::new(ClassificationTables::standard()).augment(parsed.records);

    let lines: Vec<String> = augmented
        .records
        .iter()
        .map(|r| {
            let prefix = r.prefix.map(|p| p.length).unwrap_or_default();
            format!("{} {} {} /{prefix}", r.record.country_code, r.alpha3(), r.rir)
        })
        .collect();
    insta::assert_snapshot!(lines.join("\n"), @r"
    JP JPN APNIC /24
    AU AUS APNIC /24
    ZZ RES Unknown /24
    ");

    let codes: Vec<&str> = augmented.issues.iter().map(|issue| issue.code()).collect();
    assert_eq!(codes, vec!["CLS002"]);
}

#[test]
fn three_line_feed_reconciles_and_summarizes() {
    let augmenter = Augmenter::new(ClassificationTables::standard());
    let augmented = augmenter.augment(parse_delegation_feed(FEED, Rir::Apnic).records);

    let allocations = allocation_frame(&augmented.records).expect("allocation frame");
    assert_eq!(allocations.height(), 3);
    let summary = registry_status_summary(&allocations).expect("status summary");
    assert_eq!(summary.height(), 1);
    let blocks = summary.column("Blocks").expect("Blocks");
    assert_eq!(blocks.u64().expect("u64").get(0), Some(3));

    let partitions = partition_by_type(&augmented.records);
    let spec = ReconcileSpec::new(ResourceType::Ipv4)
        .with_years(YearRange::new(2010, 2012).expect("range"));
    let reconciled = reconcile(
        &partitions[&ResourceType::Ipv4],
        &StatTable::default(),
        &StatTable::default(),
        &spec,
        &augmenter,
    );
    assert_eq!(reconciled.rows.len(), 9);
    let res: Vec<_> = reconciled.rows.iter().filter(|row| row.iso3 == "RES").collect();
    assert_eq!(res.len(), 3);
    assert!(res.iter().all(|row| row.rir == Classified::Unclassified));
    assert!(res.iter().all(|row| row.registry == Classified::Classified(Rir::Apnic)));
    let cumulative: Vec<u64> = res.iter().map(|row| row.cumulative).collect();
    assert_eq!(cumulative, vec![0, 256, 256]);
}
