//! Output tables as Polars DataFrames.
//!
//! Column names are a stable contract with downstream consumers; the
//! [`OutputTable`] enum is the single place they are listed.

use anyhow::{Context, Result};
use ipalloc_model::{
    AugmentedRecord, CountryYearRow, PoolSummaryRow, RegistryYearRow, ResourceType,
    RirShareRow, Status,
};
use polars::prelude::{Column, DataFrame};

/// The tables a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutputTable {
    PoolSummary,
    RirShares,
    Allocations,
    RegistryStatus,
    TimeSeries(ResourceType),
    RegistrySeries(ResourceType),
}

pub const POOL_SUMMARY_COLUMNS: &[&str] = &[
    "country_code",
    "name",
    "iso_alpha_3",
    "RIR",
    "ipv4",
    "pop",
    "ipv6",
    "pool_ipv4",
    "percentv4",
    "pcv4",
    "log_ipv4",
    "log_percentv4",
    "ipv4_grouping",
];

pub const RIR_SHARE_COLUMNS: &[&str] = &["RIR", "Countries", "ipv4", "percentv4"];

pub const ALLOCATION_COLUMNS: &[&str] = &[
    "Registry",
    "Code",
    "Type",
    "Start",
    "Value",
    "Date",
    "Status",
    "Extensions",
    "Prefix",
    "Irregular",
    "ISO-3",
    "Country",
    "Year",
    "RIR",
];

pub const REGISTRY_STATUS_COLUMNS: &[&str] = &["Registry", "Type", "Status", "Blocks", "Value"];

pub const TIME_SERIES_COLUMNS: &[&str] = &[
    "ISO-3",
    "Year",
    "Country",
    "Registry",
    "RIR",
    "Type",
    "Status",
    "Value",
    "Cumulative Value",
    "Population",
    "Population Source",
    "GDPPerCap",
    "GDPPerCap Source",
];

pub const REGISTRY_SERIES_COLUMNS: &[&str] =
    &["Registry", "Type", "Year", "Value", "Cumulative Value"];

impl OutputTable {
    /// File stem of the table's artifacts.
    pub fn name(&self) -> String {
        match self {
            OutputTable::PoolSummary => "pool_summary".to_string(),
            OutputTable::RirShares => "rir_shares".to_string(),
            OutputTable::Allocations => "allocations".to_string(),
            OutputTable::RegistryStatus => "registry_status".to_string(),
            OutputTable::TimeSeries(resource_type) => format!("time_series_{resource_type}"),
            OutputTable::RegistrySeries(resource_type) => {
                format!("registry_series_{resource_type}")
            }
        }
    }

    /// Required columns, in output order.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            OutputTable::PoolSummary => POOL_SUMMARY_COLUMNS,
            OutputTable::RirShares => RIR_SHARE_COLUMNS,
            OutputTable::Allocations => ALLOCATION_COLUMNS,
            OutputTable::RegistryStatus => REGISTRY_STATUS_COLUMNS,
            OutputTable::TimeSeries(_) => TIME_SERIES_COLUMNS,
            OutputTable::RegistrySeries(_) => REGISTRY_SERIES_COLUMNS,
        }
    }
}

/// A produced table and its data.
#[derive(Debug, Clone)]
pub struct OutputFrame {
    pub table: OutputTable,
    pub data: DataFrame,
}

impl OutputFrame {
    pub fn new(table: OutputTable, data: DataFrame) -> Self {
        Self { table, data }
    }

    pub fn name(&self) -> String {
        self.table.name()
    }

    pub fn record_count(&self) -> usize {
        self.data.height()
    }
}

pub fn pool_summary_frame(rows: &[PoolSummaryRow]) -> Result<DataFrame> {
    let columns = vec![
        Column::new(
            "country_code".into(),
            rows.iter().map(|r| r.country_code.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "name".into(),
            rows.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "iso_alpha_3".into(),
            rows.iter().map(|r| r.iso_alpha_3.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "RIR".into(),
            rows.iter().map(|r| r.rir.to_string()).collect::<Vec<_>>(),
        ),
        Column::new("ipv4".into(), rows.iter().map(|r| r.ipv4).collect::<Vec<_>>()),
        Column::new("pop".into(), rows.iter().map(|r| r.pop).collect::<Vec<_>>()),
        Column::new("ipv6".into(), rows.iter().map(|r| r.ipv6).collect::<Vec<_>>()),
        Column::new(
            "pool_ipv4".into(),
            rows.iter().map(|r| r.pool_ipv4).collect::<Vec<_>>(),
        ),
        Column::new(
            "percentv4".into(),
            rows.iter().map(|r| r.percentv4).collect::<Vec<_>>(),
        ),
        Column::new("pcv4".into(), rows.iter().map(|r| r.pcv4).collect::<Vec<_>>()),
        Column::new(
            "log_ipv4".into(),
            rows.iter().map(|r| r.log_ipv4).collect::<Vec<_>>(),
        ),
        Column::new(
            "log_percentv4".into(),
            rows.iter().map(|r| r.log_percentv4).collect::<Vec<_>>(),
        ),
        Column::new(
            "ipv4_grouping".into(),
            rows.iter().map(|r| r.ipv4_grouping.label()).collect::<Vec<_>>(),
        ),
    ];
    DataFrame::new(columns).context("build pool summary frame")
}

pub fn rir_share_frame(rows: &[RirShareRow]) -> Result<DataFrame> {
    let columns = vec![
        Column::new(
            "RIR".into(),
            rows.iter().map(|r| r.rir.to_string()).collect::<Vec<_>>(),
        ),
        Column::new(
            "Countries".into(),
            rows.iter().map(|r| r.countries as u64).collect::<Vec<_>>(),
        ),
        Column::new("ipv4".into(), rows.iter().map(|r| r.ipv4).collect::<Vec<_>>()),
        Column::new(
            "percentv4".into(),
            rows.iter().map(|r| r.percentv4).collect::<Vec<_>>(),
        ),
    ];
    DataFrame::new(columns).context("build rir share frame")
}

/// Flat table of every augmented record.
pub fn allocation_frame(records: &[AugmentedRecord]) -> Result<DataFrame> {
    let columns = vec![
        Column::new(
            "Registry".into(),
            records.iter().map(|r| r.record.registry.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "Code".into(),
            records.iter().map(|r| r.record.country_code.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "Type".into(),
            records.iter().map(|r| r.record.resource_type.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "Start".into(),
            records.iter().map(|r| r.record.start.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "Value".into(),
            records.iter().map(|r| r.record.value).collect::<Vec<_>>(),
        ),
        Column::new(
            "Date".into(),
            records
                .iter()
                .map(|r| r.record.date.is_known().then(|| r.record.date.to_iso_string()))
                .collect::<Vec<_>>(),
        ),
        Column::new(
            "Status".into(),
            records.iter().map(|r| r.record.status.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "Extensions".into(),
            records.iter().map(|r| r.record.extensions.as_deref()).collect::<Vec<_>>(),
        ),
        Column::new(
            "Prefix".into(),
            records
                .iter()
                .map(|r| r.prefix.map(|p| u32::from(p.length)))
                .collect::<Vec<_>>(),
        ),
        Column::new(
            "Irregular".into(),
            records.iter().map(|r| r.prefix.map(|p| p.irregular)).collect::<Vec<_>>(),
        ),
        Column::new(
            "ISO-3".into(),
            records.iter().map(|r| r.country.alpha3.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "Country".into(),
            records.iter().map(|r| r.country.name.as_str()).collect::<Vec<_>>(),
        ),
        Column::new("Year".into(), records.iter().map(|r| r.year).collect::<Vec<_>>()),
        Column::new(
            "RIR".into(),
            records.iter().map(|r| r.rir.to_string()).collect::<Vec<_>>(),
        ),
    ];
    DataFrame::new(columns).context("build allocation frame")
}

pub fn time_series_frame(rows: &[CountryYearRow]) -> Result<DataFrame> {
    let columns = vec![
        Column::new(
            "ISO-3".into(),
            rows.iter().map(|r| r.iso3.as_str()).collect::<Vec<_>>(),
        ),
        Column::new("Year".into(), rows.iter().map(|r| r.year).collect::<Vec<_>>()),
        Column::new(
            "Country".into(),
            rows.iter().map(|r| r.country.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "Registry".into(),
            rows.iter().map(|r| r.registry.to_string()).collect::<Vec<_>>(),
        ),
        Column::new(
            "RIR".into(),
            rows.iter().map(|r| r.rir.to_string()).collect::<Vec<_>>(),
        ),
        Column::new(
            "Type".into(),
            rows.iter().map(|r| r.resource_type.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "Status".into(),
            rows.iter().map(|r| Status::label(r.status)).collect::<Vec<_>>(),
        ),
        Column::new("Value".into(), rows.iter().map(|r| r.value).collect::<Vec<_>>()),
        Column::new(
            "Cumulative Value".into(),
            rows.iter().map(|r| r.cumulative).collect::<Vec<_>>(),
        ),
        Column::new(
            "Population".into(),
            rows.iter().map(|r| r.population.value).collect::<Vec<_>>(),
        ),
        Column::new(
            "Population Source".into(),
            rows.iter().map(|r| r.population.source.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "GDPPerCap".into(),
            rows.iter().map(|r| r.gdp_per_capita.value).collect::<Vec<_>>(),
        ),
        Column::new(
            "GDPPerCap Source".into(),
            rows.iter().map(|r| r.gdp_per_capita.source.as_str()).collect::<Vec<_>>(),
        ),
    ];
    DataFrame::new(columns).context("build time series frame")
}

pub fn registry_series_frame(rows: &[RegistryYearRow]) -> Result<DataFrame> {
    let columns = vec![
        Column::new(
            "Registry".into(),
            rows.iter().map(|r| r.registry.to_string()).collect::<Vec<_>>(),
        ),
        Column::new(
            "Type".into(),
            rows.iter().map(|r| r.resource_type.as_str()).collect::<Vec<_>>(),
        ),
        Column::new("Year".into(), rows.iter().map(|r| r.year).collect::<Vec<_>>()),
        Column::new("Value".into(), rows.iter().map(|r| r.value).collect::<Vec<_>>()),
        Column::new(
            "Cumulative Value".into(),
            rows.iter().map(|r| r.cumulative).collect::<Vec<_>>(),
        ),
    ];
    DataFrame::new(columns).context("build registry series frame")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipalloc_model::{Classified, Rir, Statistic};

    fn row(year: i32, value: u64, cumulative: u64) -> CountryYearRow {
        CountryYearRow {
            iso3: "JPN".to_string(),
            year,
            country: "Japan".to_string(),
            registry: Classified::Classified(Rir::Apnic),
            rir: Classified::Classified(Rir::Apnic),
            resource_type: ResourceType::Ipv4,
            status: (value > 0).then_some(Status::Allocated),
            value,
            cumulative,
            population: Statistic::observed(125.0),
            gdp_per_capita: Statistic::placeholder(),
        }
    }

    #[test]
    fn time_series_frame_uses_stable_columns() {
        let df = time_series_frame(&[row(2000, 0, 0), row(2001, 256, 256)]).expect("frame");
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, TIME_SERIES_COLUMNS);
        assert_eq!(df.height(), 2);
        let status = df.column("Status").expect("Status");
        assert_eq!(status.str().expect("utf8").get(0), Some("unallocated"));
        assert_eq!(status.str().expect("utf8").get(1), Some("allocated"));
        let source = df.column("GDPPerCap Source").expect("source");
        assert_eq!(source.str().expect("utf8").get(0), Some("placeholder"));
    }

    #[test]
    fn empty_inputs_build_empty_frames() {
        assert_eq!(pool_summary_frame(&[]).expect("frame").height(), 0);
        assert_eq!(allocation_frame(&[]).expect("frame").width(), ALLOCATION_COLUMNS.len());
        assert_eq!(rir_share_frame(&[]).expect("frame").width(), RIR_SHARE_COLUMNS.len());
    }

    #[test]
    fn table_names() {
        assert_eq!(OutputTable::TimeSeries(ResourceType::Ipv6).name(), "time_series_ipv6");
        assert_eq!(OutputTable::RegistryStatus.name(), "registry_status");
    }
}
