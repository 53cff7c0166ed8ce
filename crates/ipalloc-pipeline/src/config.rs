//! Pipeline configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration that fetches the public registry feeds.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use ipalloc_ingest::{DEFAULT_SUMMARY_URL, SourceLocation, default_registry_url};
use ipalloc_model::{FillPolicy, ReconcileSpec, ResourceType, Rir, SummaryOptions, YearRange};
use ipalloc_standards::ClassificationTables;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySources {
    pub afrinic: SourceLocation,
    pub apnic: SourceLocation,
    pub arin: SourceLocation,
    pub lacnic: SourceLocation,
    pub ripencc: SourceLocation,
}

impl RegistrySources {
    pub fn get(&self, rir: Rir) -> &SourceLocation {
        match rir {
            Rir::Afrinic => &self.afrinic,
            Rir::Apnic => &self.apnic,
            Rir::Arin => &self.arin,
            Rir::Lacnic => &self.lacnic,
            Rir::RipeNcc => &self.ripencc,
        }
    }

    /// Feeds in registry order.
    pub fn feeds(&self) -> Vec<(Rir, SourceLocation)> {
        Rir::ALL
            .iter()
            .map(|rir| (*rir, self.get(*rir).clone()))
            .collect()
    }
}

impl Default for RegistrySources {
    fn default() -> Self {
        let url = |rir| SourceLocation::Url(default_registry_url(rir).to_string());
        Self {
            afrinic: url(Rir::Afrinic),
            apnic: url(Rir::Apnic),
            arin: url(Rir::Arin),
            lacnic: url(Rir::Lacnic),
            ripencc: url(Rir::RipeNcc),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub registries: RegistrySources,
    pub summary: SourceLocation,
    /// Wide population CSV; without it every population is a placeholder.
    pub population: Option<SourceLocation>,
    /// Long CSV of extra population observations.
    pub population_additions: Option<SourceLocation>,
    /// Wide GDP-per-capita CSV.
    pub gdp: Option<SourceLocation>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            registries: RegistrySources::default(),
            summary: SourceLocation::Url(DEFAULT_SUMMARY_URL.to_string()),
            population: None,
            population_additions: None,
            gdp: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YearsConfig {
    pub start: i32,
    pub end: i32,
}

impl Default for YearsConfig {
    fn default() -> Self {
        Self {
            start: YearRange::DEFAULT_START,
            end: YearRange::DEFAULT_END,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    /// Extra attempts after a network error or 5xx response.
    pub retries: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            retries: 1,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    pub resource_types: Vec<ResourceType>,
    pub fill: FillPolicy,
    /// Alpha-3 codes left out of every series.
    pub excluded_codes: Vec<String>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            resource_types: vec![ResourceType::Ipv4, ResourceType::Ipv6],
            fill: FillPolicy::default(),
            excluded_codes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub sources: SourcesConfig,
    pub years: YearsConfig,
    pub fetch: FetchConfig,
    pub reconcile: ReconcileConfig,
    pub summary: SummaryOptions,
    /// Replacement classification tables (TOML).
    pub tables: Option<PathBuf>,
    /// When set, CSV tables, diagnostics and the manifest are written here.
    pub output_dir: Option<PathBuf>,
}

impl PipelineConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("parse pipeline config")?;
        config.year_range()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("load {}", path.display()))
    }

    pub fn year_range(&self) -> Result<YearRange> {
        YearRange::new(self.years.start, self.years.end).context("invalid year range")
    }

    pub fn reconcile_spec(&self, resource_type: ResourceType) -> Result<ReconcileSpec> {
        Ok(ReconcileSpec::new(resource_type)
            .with_years(self.year_range()?)
            .with_fill(self.reconcile.fill)
            .with_excluded_codes(self.reconcile.excluded_codes.iter().cloned()))
    }

    /// Tables from `tables`, or the shipped set.
    pub fn load_tables(&self) -> Result<ClassificationTables> {
        match &self.tables {
            Some(path) => ClassificationTables::from_toml_path(path)
                .with_context(|| format!("load classification tables {}", path.display())),
            None => Ok(ClassificationTables::standard().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = PipelineConfig::from_toml_str("").expect("config");
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.fetch.timeout(), Duration::from_secs(30));
        assert_eq!(config.fetch.retries, 1);
        assert_eq!(config.summary.min_population, 800);
        assert!(config.sources.registries.apnic.is_remote());
        let range = config.year_range().expect("range");
        assert_eq!((range.start(), range.end()), (1982, 2023));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = PipelineConfig::from_toml_str(
            r#"
            output_dir = "out"

            [sources]
            population = "data/population.csv"

            [sources.registries]
            apnic = "feeds/apnic.txt"

            [years]
            start = 2000

            [reconcile]
            resource_types = ["ipv4"]
            fill = "forward_then_backward"
            excluded_codes = ["res", "UNK"]

            [summary]
            min_population = 0
            "#,
        )
        .expect("config");
        assert_eq!(
            config.sources.registries.apnic,
            SourceLocation::Path(PathBuf::from("feeds/apnic.txt"))
        );
        assert!(config.sources.registries.arin.is_remote());
        assert_eq!(config.years.end, 2023);
        assert_eq!(config.summary.excluded_names, vec!["World".to_string()]);
        let spec = config.reconcile_spec(ResourceType::Ipv4).expect("spec");
        assert!(spec.is_excluded("RES"));
        assert_eq!(spec.fill, FillPolicy::ForwardThenBackward);
        assert_eq!(spec.years.start(), 2000);
    }

    #[test]
    fn inverted_year_range_is_rejected() {
        let err = PipelineConfig::from_toml_str("[years]\nstart = 2020\nend = 2000\n").unwrap_err();
        assert!(format!("{err:#}").contains("invalid year range"));
    }
}
