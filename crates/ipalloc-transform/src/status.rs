//! Registry/type/status totals over the flat allocation table.

use anyhow::{Context, Result};
use polars::prelude::{DataFrame, DataType, IntoLazy, SortMultipleOptions, col, len};

/// Groups the allocation frame by `Registry`, `Type` and `Status`, counting
/// blocks and summing block sizes. Output is sorted by the group key.
pub fn registry_status_summary(allocations: &DataFrame) -> Result<DataFrame> {
    allocations
        .clone()
        .lazy()
        .group_by([col("Registry"), col("Type"), col("Status")])
        .agg([
            len().cast(DataType::UInt64).alias("Blocks"),
            col("Value").sum().alias("Value"),
        ])
        .sort(
            ["Registry", "Type", "Status"],
            SortMultipleOptions::default(),
        )
        .collect()
        .context("aggregate allocations by registry and status")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::augment::Augmenter;
    use crate::frame::{REGISTRY_STATUS_COLUMNS, allocation_frame};
    use ipalloc_ingest::parse_delegation_feed;
    use ipalloc_model::Rir;
    use ipalloc_standards::ClassificationTables;

    #[test]
    fn groups_blocks_and_values() {
        let feed = "\
apnic|JP|ipv4|1.0.0.0|256|20000101|allocated
apnic|AU|ipv4|1.0.1.0|512|20010101|allocated
apnic|AU|ipv4|1.0.4.0|1024|20010101|assigned
apnic|AU|asn|173|1|20020801|allocated
";
        let records = Augmenter::new(ClassificationTables::standard())
            .augment(parse_delegation_feed(feed, Rir::Apnic).records)
            .records;
        let allocations = allocation_frame(&records).expect("allocations");
        let summary = registry_status_summary(&allocations).expect("summary");

        let names: Vec<String> = summary
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, REGISTRY_STATUS_COLUMNS);
        assert_eq!(summary.height(), 3);

        let types = summary.column("Type").expect("Type");
        let types = types.str().expect("utf8");
        let statuses = summary.column("Status").expect("Status");
        let statuses = statuses.str().expect("utf8");
        let blocks = summary.column("Blocks").expect("Blocks");
        let blocks = blocks.u64().expect("u64");
        let values = summary.column("Value").expect("Value");
        let values = values.u64().expect("u64");

        assert_eq!(types.get(0), Some("asn"));
        assert_eq!(types.get(1), Some("ipv4"));
        assert_eq!(statuses.get(1), Some("allocated"));
        assert_eq!(blocks.get(1), Some(2));
        assert_eq!(values.get(1), Some(768));
        assert_eq!(statuses.get(2), Some("assigned"));
        assert_eq!(values.get(2), Some(1024));
    }
}
