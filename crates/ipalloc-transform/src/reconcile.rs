//! Time-series reconciliation.
//!
//! Turns augmented records of one resource type plus the population and GDP
//! tables into exactly one [`CountryYearRow`] per country and year of the
//! configured range. One routine serves every resource type; the
//! [`ReconcileSpec`] carries the differences.

use std::collections::{BTreeMap, BTreeSet};

use ipalloc_ingest::StatTable;
use ipalloc_model::{
    AugmentedRecord, Classified, CountryYearRow, Issue, ReconcileSpec, RegistryYearRow,
    ResourceType, Rir, Status,
};
use tracing::{debug, info, warn};

use crate::augment::Augmenter;
use crate::fill::fill_series;

/// Rows sorted by (ISO-3, year) plus reconciliation diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Reconciled {
    pub rows: Vec<CountryYearRow>,
    pub issues: Vec<Issue>,
}

/// First-seen attributes and summed value of one (country, year).
#[derive(Debug)]
struct YearGroup<'a> {
    value: u64,
    registry: Classified<Rir>,
    status: Status,
    name: &'a str,
}

pub fn reconcile(
    records: &[AugmentedRecord],
    population: &StatTable,
    gdp: &StatTable,
    spec: &ReconcileSpec,
    augmenter: &Augmenter,
) -> Reconciled {
    let years = spec.years;
    let mut issues = Vec::new();
    let mut undated = 0u64;
    let mut after_range = 0u64;
    let mut groups: BTreeMap<&str, BTreeMap<i32, YearGroup<'_>>> = BTreeMap::new();

    for record in records
        .iter()
        .filter(|record| record.record.resource_type == spec.resource_type)
        .filter(|record| !spec.is_excluded(record.alpha3()))
    {
        let Some(year) = record.year else {
            undated += 1;
            continue;
        };
        if year > years.end() {
            after_range += 1;
            continue;
        }
        let year = year.max(years.start());
        groups
            .entry(record.alpha3())
            .or_default()
            .entry(year)
            .and_modify(|group| group.value = group.value.saturating_add(record.record.value))
            .or_insert_with(|| YearGroup {
                value: record.record.value,
                registry: record.registry(),
                status: record.record.status,
                name: &record.country.name,
            });
    }

    if undated > 0 {
        issues.push(Issue::UndatedRecords {
            resource_type: spec.resource_type,
            count: undated,
        });
    }
    if after_range > 0 {
        issues.push(Issue::RecordsAfterRange {
            resource_type: spec.resource_type,
            end_year: years.end(),
            count: after_range,
        });
    }

    let countries: BTreeSet<&str> = groups
        .keys()
        .copied()
        .chain(population.countries())
        .chain(gdp.countries())
        .filter(|code| !spec.is_excluded(code))
        .collect();

    let mut rows = Vec::with_capacity(countries.len() * years.len());
    for iso3 in countries {
        let observed = groups.get(iso3);
        let (registry, conflict) = resolve_registry(iso3, observed);
        issues.extend(conflict);
        let country = observed
            .and_then(|groups| groups.values().next().map(|group| group.name.to_string()))
            .or_else(|| population.name(iso3).map(str::to_string))
            .or_else(|| gdp.name(iso3).map(str::to_string))
            .or_else(|| augmenter.normalizer().name_of(iso3).map(str::to_string))
            .unwrap_or_else(|| iso3.to_string());
        let rir = augmenter.classifier().classify(iso3);
        let populations = fill_series(years, population.series(iso3), spec.fill);
        let gdps = fill_series(years, gdp.series(iso3), spec.fill);

        let mut status: Option<Status> = None;
        let mut cumulative = 0u64;
        for ((year, population_stat), gdp_stat) in years.years().zip(populations).zip(gdps) {
            let group = observed.and_then(|groups| groups.get(&year));
            let value = group.map_or(0, |group| group.value);
            if let Some(group) = group {
                status = Some(group.status);
            }
            cumulative = cumulative.saturating_add(value);
            rows.push(CountryYearRow {
                iso3: iso3.to_string(),
                year,
                country: country.clone(),
                registry,
                rir,
                resource_type: spec.resource_type,
                status,
                value,
                cumulative,
                population: population_stat,
                gdp_per_capita: gdp_stat,
            });
        }
    }

    info!(
        resource_type = %spec.resource_type,
        rows = rows.len(),
        years = %years,
        "reconciled time series"
    );
    Reconciled { rows, issues }
}

/// Statistical mode of the observed registries, ties going to the registry
/// observed first. Reports a conflict when more than one registry appears.
fn resolve_registry(
    iso3: &str,
    observed: Option<&BTreeMap<i32, YearGroup<'_>>>,
) -> (Classified<Rir>, Option<Issue>) {
    let mut counts: Vec<(Rir, usize)> = Vec::new();
    for registry in observed
        .into_iter()
        .flat_map(BTreeMap::values)
        .filter_map(|group| group.registry.as_option().copied())
    {
        match counts.iter_mut().find(|(rir, _)| *rir == registry) {
            Some((_, count)) => *count += 1,
            None => counts.push((registry, 1)),
        }
    }
    let mut resolved: Option<(Rir, usize)> = None;
    for (rir, count) in &counts {
        if resolved.is_none_or(|(_, best)| *count > best) {
            resolved = Some((*rir, *count));
        }
    }
    let Some((resolved, _)) = resolved else {
        return (Classified::Unclassified, None);
    };
    if counts.len() < 2 {
        return (Classified::Classified(resolved), None);
    }
    warn!(iso3, resolved = %resolved, "country delegated by more than one registry");
    let issue = Issue::RegistryConflict {
        iso3: iso3.to_string(),
        registries: counts.iter().map(|(rir, _)| rir.to_string()).collect(),
        resolved: resolved.to_string(),
    };
    (Classified::Classified(resolved), Some(issue))
}

/// Per-registry yearly delta and running total derived from reconciled rows.
pub fn registry_series(rows: &[CountryYearRow]) -> Vec<RegistryYearRow> {
    let mut totals: BTreeMap<(Classified<Rir>, ResourceType), BTreeMap<i32, u64>> =
        BTreeMap::new();
    for row in rows {
        let yearly = totals.entry((row.registry, row.resource_type)).or_default();
        let value = yearly.entry(row.year).or_default();
        *value = value.saturating_add(row.value);
    }
    let mut series = Vec::new();
    for ((registry, resource_type), yearly) in totals {
        let mut cumulative = 0u64;
        for (year, value) in yearly {
            cumulative = cumulative.saturating_add(value);
            series.push(RegistryYearRow {
                registry,
                resource_type,
                year,
                value,
                cumulative,
            });
        }
    }
    debug!(rows = series.len(), "built registry series");
    series
}
