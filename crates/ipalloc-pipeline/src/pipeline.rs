//! Staged pipeline run.
//!
//! 1. **Fetch**: every source concurrently, failures recorded per source
//! 2. **Ingest**: parse feeds, statistics tables and the summary
//! 3. **Augment**: normalize codes, classify registries, derive prefixes
//! 4. **Reconcile**: one series per configured resource type
//! 5. **Aggregate**: pool summary and RIR shares
//! 6. **Validate**: integrity checks over the output frames
//! 7. **Output**: optional CSV, diagnostics and manifest artifacts
//!
//! Only an unusable allocation summary stops a run.

use std::collections::BTreeMap;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use ipalloc_ingest::{
    CancelFlag, FeedStats, FetchOutcome, FetchedSource, ParsedSummary, RegistryIngest,
    SourceFetcher, SourceKind, SourceSpec, StatTable, clean_observations, fetch_all,
    parse_summary, read_long_table,
};
use ipalloc_model::{
    AugmentedRecord, Diagnostics, Issue, PoolSummaryRow, ResourceType, RirShareRow,
};
use ipalloc_report::{WrittenArtifacts, write_outputs};
use ipalloc_standards::ClassificationTables;
use ipalloc_transform::{
    Augmenter, OutputFrame, OutputTable, Reconciled, allocation_frame, build_pool_summary,
    partition_by_type, pool_summary_frame, reconcile, registry_series, registry_series_frame,
    registry_status_summary, rir_share_frame, rir_shares, time_series_frame,
};
use ipalloc_validate::validate_outputs;
use tracing::{info, info_span, warn};

use crate::config::PipelineConfig;

/// Everything a run produced.
#[derive(Debug)]
pub struct PipelineOutput {
    pub frames: Vec<OutputFrame>,
    pub series: BTreeMap<ResourceType, Reconciled>,
    pub pool_summary: Vec<PoolSummaryRow>,
    pub rir_shares: Vec<RirShareRow>,
    pub feed_stats: Vec<FeedStats>,
    pub sources: Vec<FetchedSource>,
    pub diagnostics: Diagnostics,
    pub artifacts: Option<WrittenArtifacts>,
}

impl PipelineOutput {
    pub fn frame(&self, table: OutputTable) -> Option<&OutputFrame> {
        self.frames.iter().find(|frame| frame.table == table)
    }
}

/// Parsed inputs of a run.
#[derive(Debug)]
struct Inputs {
    registries: RegistryIngest,
    summary: ParsedSummary,
    population: StatTable,
    gdp: StatTable,
    sources: Vec<FetchedSource>,
}

pub fn run_pipeline(
    config: &PipelineConfig,
    tables: &ClassificationTables,
    fetcher: &dyn SourceFetcher,
    cancel: &CancelFlag,
) -> Result<PipelineOutput> {
    let started = Instant::now();
    let years = config.year_range()?;
    let mut diagnostics = Diagnostics::new();

    let outcomes = info_span!("fetch").in_scope(|| fetch_all(fetcher, &source_specs(config), cancel));
    let inputs = info_span!("ingest").in_scope(|| ingest(outcomes, tables, &mut diagnostics))?;

    let augmenter = Augmenter::new(tables);
    let records = info_span!("augment").in_scope(|| {
        diagnostics.extend(augmenter.classifier().overlap_issues());
        let augmented = augmenter.augment(inputs.registries.records);
        diagnostics.extend(augmented.issues);
        augmented.records
    });

    let series = info_span!("reconcile").in_scope(|| -> Result<_> {
        let partitions = partition_by_type(&records);
        let mut series = BTreeMap::new();
        for resource_type in &config.reconcile.resource_types {
            let spec = config.reconcile_spec(*resource_type)?;
            let records = partitions
                .get(resource_type)
                .map_or(&[][..], Vec::as_slice);
            let reconciled =
                reconcile(records, &inputs.population, &inputs.gdp, &spec, &augmenter);
            diagnostics.extend(reconciled.issues.iter().cloned());
            series.insert(*resource_type, reconciled);
        }
        Ok(series)
    })?;

    let (pool, shares) = info_span!("aggregate").in_scope(|| {
        let pool = build_pool_summary(&inputs.summary.entries, &config.summary, &augmenter);
        diagnostics.extend(pool.issues());
        let shares = rir_shares(&pool.rows);
        (pool, shares)
    });

    let frames = info_span!("frames")
        .in_scope(|| build_frames(&records, &series, &pool.rows, &shares))?;

    info_span!("validate").in_scope(|| {
        diagnostics.extend(validate_outputs(&frames, years));
    });

    let artifacts = match &config.output_dir {
        Some(output_dir) => Some(info_span!("output").in_scope(|| {
            write_outputs(output_dir, &frames, &diagnostics, &inputs.sources, years)
                .context("write run artifacts")
        })?),
        None => None,
    };

    info!(
        records = records.len(),
        tables = frames.len(),
        errors = diagnostics.error_count(),
        warnings = diagnostics.warning_count(),
        elapsed_ms = started.elapsed().as_millis(),
        "pipeline finished"
    );
    Ok(PipelineOutput {
        frames,
        series,
        pool_summary: pool.rows,
        rir_shares: shares,
        feed_stats: inputs.registries.stats,
        sources: inputs.sources,
        diagnostics,
        artifacts,
    })
}

fn source_specs(config: &PipelineConfig) -> Vec<SourceSpec> {
    let sources = &config.sources;
    let mut specs: Vec<SourceSpec> = sources
        .registries
        .feeds()
        .into_iter()
        .map(|(rir, location)| SourceSpec::new(SourceKind::Registry(rir), location))
        .collect();
    specs.push(SourceSpec::new(SourceKind::Summary, sources.summary.clone()));
    let optional = [
        (SourceKind::Population, &sources.population),
        (SourceKind::PopulationAdditions, &sources.population_additions),
        (SourceKind::Gdp, &sources.gdp),
    ];
    for (kind, location) in optional {
        if let Some(location) = location {
            specs.push(SourceSpec::new(kind, location.clone()));
        }
    }
    specs
}

fn ingest(
    outcomes: Vec<FetchOutcome>,
    tables: &ClassificationTables,
    diagnostics: &mut Diagnostics,
) -> Result<Inputs> {
    let registries = RegistryIngest::from_outcomes(&outcomes);
    diagnostics.extend(registries.issues());

    let mut summary = None;
    let mut population = StatTable::default();
    let mut additions = Vec::new();
    let mut gdp = StatTable::default();
    let mut sources = Vec::new();

    for outcome in outcomes {
        let kind = outcome.spec.kind;
        let fetched = match outcome.result {
            Ok(fetched) => fetched,
            Err(err) if kind == SourceKind::Summary => {
                return Err(err).context("allocation summary could not be read");
            }
            Err(err) => {
                if !matches!(kind, SourceKind::Registry(_)) {
                    diagnostics.push(fetch_failed(kind, &err));
                }
                continue;
            }
        };
        match kind {
            SourceKind::Registry(_) => {}
            SourceKind::Summary => {
                summary = Some(
                    parse_summary(&fetched.body).context("allocation summary could not be read")?,
                );
            }
            SourceKind::Population | SourceKind::Gdp => {
                match StatTable::from_wide_csv(&fetched.body, kind.name(), tables) {
                    Ok((table, issues)) => {
                        diagnostics.extend(issues);
                        if kind == SourceKind::Population {
                            population = table;
                        } else {
                            gdp = table;
                        }
                    }
                    Err(err) => diagnostics.push(fetch_failed(kind, &err)),
                }
            }
            SourceKind::PopulationAdditions => match read_long_table(&fetched.body, kind.name()) {
                Ok(observations) => additions = clean_observations(observations, tables).observations,
                Err(err) => diagnostics.push(fetch_failed(kind, &err)),
            },
        }
        sources.push(fetched);
    }

    if !additions.is_empty() {
        info!(observations = additions.len(), "applying population additions");
        population.extend(additions);
    }
    let summary = summary.ok_or_else(|| anyhow!("allocation summary was not fetched"))?;
    if summary.skipped > 0 {
        warn!(skipped = summary.skipped, "summary entries without details");
    }
    info!(
        records = registries.records.len(),
        summary_entries = summary.entries.len(),
        population = population.len(),
        gdp = gdp.len(),
        "ingested sources"
    );
    Ok(Inputs {
        registries,
        summary,
        population,
        gdp,
        sources,
    })
}

fn fetch_failed(kind: SourceKind, err: &dyn std::error::Error) -> Issue {
    warn!(source = %kind, error = %err, "source unusable");
    Issue::FetchFailed {
        source: kind.name().to_string(),
        message: err.to_string(),
    }
}

fn build_frames(
    records: &[AugmentedRecord],
    series: &BTreeMap<ResourceType, Reconciled>,
    pool: &[PoolSummaryRow],
    shares: &[RirShareRow],
) -> Result<Vec<OutputFrame>> {
    let allocations = allocation_frame(records)?;
    let status = registry_status_summary(&allocations)?;
    let mut frames = vec![
        OutputFrame::new(OutputTable::PoolSummary, pool_summary_frame(pool)?),
        OutputFrame::new(OutputTable::RirShares, rir_share_frame(shares)?),
        OutputFrame::new(OutputTable::Allocations, allocations),
        OutputFrame::new(OutputTable::RegistryStatus, status),
    ];
    for (resource_type, reconciled) in series {
        frames.push(OutputFrame::new(
            OutputTable::TimeSeries(*resource_type),
            time_series_frame(&reconciled.rows)?,
        ));
        frames.push(OutputFrame::new(
            OutputTable::RegistrySeries(*resource_type),
            registry_series_frame(&registry_series(&reconciled.rows))?,
        ));
    }
    Ok(frames)
}
