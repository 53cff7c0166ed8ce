//! IP allocation reconciliation pipeline.
//!
//! Wires ingestion, transformation, validation and reporting together:
//!
//! ```no_run
//! use ipalloc_ingest::{CancelFlag, HttpFetcher};
//! use ipalloc_pipeline::{PipelineConfig, run_pipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = PipelineConfig::default();
//! let tables = config.load_tables()?;
//! let fetcher = HttpFetcher::new(config.fetch.timeout(), config.fetch.retries)?;
//! let output = run_pipeline(&config, &tables, &fetcher, &CancelFlag::new())?;
//! println!("{} issues", output.diagnostics.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod logging;
pub mod pipeline;

pub use config::{
    FetchConfig, PipelineConfig, ReconcileConfig, RegistrySources, SourcesConfig, YearsConfig,
};
pub use logging::{LogConfig, LogFormat, LogLevel, init_logging, init_logging_with_writer};
pub use pipeline::{PipelineOutput, run_pipeline};
