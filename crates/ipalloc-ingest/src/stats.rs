//! Population and GDP-per-capita tables.
//!
//! Sources publish these wide, one column per year, often behind a few
//! preamble rows (World Bank downloads start with "Data Source" lines).
//! The header row is the first row naming a country code column.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use csv::ReaderBuilder;
use ipalloc_common::parse_f64;
use ipalloc_model::{Issue, StatObservation};
use ipalloc_standards::ClassificationTables;
use regex::Regex;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Accepted headers for the alpha-3 code column.
pub const CODE_HEADERS: &[&str] = &["ISO-3", "Country Code"];
/// Accepted headers for the country name column.
pub const NAME_HEADERS: &[&str] = &["Country", "Country Name"];
/// Accepted headers for the value column of long tables.
pub const VALUE_HEADERS: &[&str] = &["Value", "Population", "GDPPerCap", "GPDPerCap"];

/// Rows searched for the header.
const HEADER_PROBE_ROWS: usize = 10;

static YEAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})\b").expect("Invalid year regex"));

/// Extracts the year from headers such as `1995` or `1995 [YR1995]`.
pub fn header_year(header: &str) -> Option<i32> {
    YEAR_REGEX
        .captures(header.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

fn read_rows(text: &str, source_name: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv {
            source_name: source_name.to_string(),
            source,
        })?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

fn find_column(headers: &[String], candidates: &[&str]) -> Option<usize> {
    candidates.iter().find_map(|candidate| {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(candidate))
    })
}

fn detect_header(rows: &[Vec<String>]) -> Option<(usize, usize)> {
    rows.iter()
        .take(HEADER_PROBE_ROWS)
        .enumerate()
        .find_map(|(idx, row)| find_column(row, CODE_HEADERS).map(|code| (idx, code)))
}

/// A statistics table in its published wide layout.
#[derive(Debug, Clone)]
pub struct WideTable {
    pub source_name: String,
    pub headers: Vec<String>,
    pub code_column: usize,
    pub name_column: Option<usize>,
    /// `(column index, year)` for every year column.
    pub year_columns: Vec<(usize, i32)>,
    pub rows: Vec<Vec<String>>,
}

/// Reads a wide CSV. Columns that are neither code, name nor year are ignored.
pub fn read_wide_table(text: &str, source_name: &str) -> Result<WideTable> {
    let rows = read_rows(text, source_name)?;
    let (header_index, code_column) =
        detect_header(&rows).ok_or_else(|| IngestError::MissingHeader {
            source_name: source_name.to_string(),
        })?;
    let headers = rows[header_index].clone();
    let name_column = find_column(&headers, NAME_HEADERS);
    let year_columns = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != code_column && Some(*idx) != name_column)
        .filter_map(|(idx, header)| header_year(header).map(|year| (idx, year)))
        .collect::<Vec<_>>();
    let data = rows.into_iter().skip(header_index + 1).collect::<Vec<_>>();
    debug!(
        source = source_name,
        rows = data.len(),
        years = year_columns.len(),
        "read wide table"
    );
    Ok(WideTable {
        source_name: source_name.to_string(),
        headers,
        code_column,
        name_column,
        year_columns,
        rows: data,
    })
}

/// Long format: one observation per (country, year) with a value.
///
/// Empty cells and `..` markers are missing and produce no observation.
/// Rows without a code (footers, notes) are skipped.
pub fn melt(table: &WideTable) -> Vec<StatObservation> {
    let mut observations = Vec::new();
    for row in &table.rows {
        let code = row
            .get(table.code_column)
            .map(|code| code.to_ascii_uppercase())
            .unwrap_or_default();
        if code.is_empty() {
            continue;
        }
        let country = table
            .name_column
            .and_then(|idx| row.get(idx))
            .cloned()
            .unwrap_or_default();
        for (idx, year) in &table.year_columns {
            let Some(value) = row.get(*idx).and_then(|cell| parse_f64(cell)) else {
                continue;
            };
            observations.push(StatObservation {
                iso3: code.clone(),
                country: country.clone(),
                year: *year,
                value,
            });
        }
    }
    observations
}

/// Reads a long CSV with code, name, `Year` and value columns.
pub fn read_long_table(text: &str, source_name: &str) -> Result<Vec<StatObservation>> {
    let rows = read_rows(text, source_name)?;
    let (header_index, code_column) =
        detect_header(&rows).ok_or_else(|| IngestError::MissingHeader {
            source_name: source_name.to_string(),
        })?;
    let headers = &rows[header_index];
    let name_column = find_column(headers, NAME_HEADERS);
    let (Some(year_column), Some(value_column)) = (
        find_column(headers, &["Year"]),
        find_column(headers, VALUE_HEADERS),
    ) else {
        return Err(IngestError::MissingHeader {
            source_name: source_name.to_string(),
        });
    };
    let mut observations = Vec::new();
    for row in rows.iter().skip(header_index + 1) {
        let cell = |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");
        let code = cell(code_column).to_ascii_uppercase();
        let year = cell(year_column).parse::<i32>().ok();
        let value = parse_f64(cell(value_column));
        let (false, Some(year), Some(value)) = (code.is_empty(), year, value) else {
            continue;
        };
        observations.push(StatObservation {
            iso3: code,
            country: name_column.map(|idx| cell(idx).to_string()).unwrap_or_default(),
            year,
            value,
        });
    }
    Ok(observations)
}

/// Observations after code cleanup.
#[derive(Debug, Clone, Default)]
pub struct CleanedStats {
    pub observations: Vec<StatObservation>,
    pub renamed: u64,
    pub dropped_aggregates: u64,
}

/// Applies legacy renames (`CHI` → `GGY`) and drops aggregate rows (`WLD`, `EUU`, …).
pub fn clean_observations(
    observations: Vec<StatObservation>,
    tables: &ClassificationTables,
) -> CleanedStats {
    let mut cleaned = CleanedStats::default();
    for mut observation in observations {
        if tables.is_aggregate(&observation.iso3) {
            cleaned.dropped_aggregates += 1;
            continue;
        }
        let renamed = tables.rename(&observation.iso3);
        if renamed != observation.iso3 {
            observation.iso3 = renamed.to_string();
            cleaned.renamed += 1;
        }
        cleaned.observations.push(observation);
    }
    cleaned
}

/// Long statistics indexed by (ISO-3, year).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatTable {
    values: BTreeMap<String, BTreeMap<i32, f64>>,
    names: BTreeMap<String, String>,
}

impl StatTable {
    /// Later observations for the same key replace earlier ones.
    pub fn from_observations(observations: impl IntoIterator<Item = StatObservation>) -> Self {
        let mut table = Self::default();
        table.extend(observations);
        table
    }

    pub fn extend(&mut self, observations: impl IntoIterator<Item = StatObservation>) {
        for observation in observations {
            if !observation.country.is_empty() {
                self.names
                    .insert(observation.iso3.clone(), observation.country);
            }
            self.values
                .entry(observation.iso3)
                .or_default()
                .insert(observation.year, observation.value);
        }
    }

    /// Reads, melts and cleans a wide CSV, reporting dropped aggregate rows.
    pub fn from_wide_csv(
        text: &str,
        source_name: &str,
        tables: &ClassificationTables,
    ) -> Result<(Self, Vec<Issue>)> {
        let wide = read_wide_table(text, source_name)?;
        let cleaned = clean_observations(melt(&wide), tables);
        let mut issues = Vec::new();
        if cleaned.dropped_aggregates > 0 {
            issues.push(Issue::AggregateRowsDropped {
                source: source_name.to_string(),
                count: cleaned.dropped_aggregates,
            });
        }
        Ok((Self::from_observations(cleaned.observations), issues))
    }

    pub fn get(&self, iso3: &str, year: i32) -> Option<f64> {
        self.values.get(iso3).and_then(|years| years.get(&year)).copied()
    }

    pub fn series(&self, iso3: &str) -> Option<&BTreeMap<i32, f64>> {
        self.values.get(iso3)
    }

    pub fn name(&self, iso3: &str) -> Option<&str> {
        self.names.get(iso3).map(String::as_str)
    }

    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.values.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD_BANK: &str = "\
\"Data Source\",\"World Development Indicators\",
\"Last Updated Date\",\"2024-03-28\",
\"Country Name\",\"Country Code\",\"Indicator Name\",\"Indicator Code\",\"1994\",\"1995\",\"1996\",
\"Aruba\",\"ABW\",\"Population, total\",\"SP.POP.TOTL\",\"80000\",\"\",\"81000\",
\"World\",\"WLD\",\"Population, total\",\"SP.POP.TOTL\",\"5600000000\",\"5700000000\",\"5800000000\",
\"Channel Islands\",\"CHI\",\"Population, total\",\"SP.POP.TOTL\",\"150000\",\"..\",\"152000\",
";

    #[test]
    fn detects_header_after_preamble() {
        let table = read_wide_table(WORLD_BANK, "population").expect("read table");
        assert_eq!(table.headers[table.code_column], "Country Code");
        assert_eq!(table.name_column, Some(0));
        assert_eq!(
            table.year_columns.iter().map(|(_, y)| *y).collect::<Vec<_>>(),
            vec![1994, 1995, 1996]
        );
        assert_eq!(table.rows.len(), 3);
    }

    #[test]
    fn melt_skips_missing_cells() {
        let table = read_wide_table(WORLD_BANK, "population").expect("read table");
        let observations = melt(&table);
        let aruba: Vec<_> = observations.iter().filter(|o| o.iso3 == "ABW").collect();
        assert_eq!(aruba.len(), 2);
        assert_eq!(aruba[0].country, "Aruba");
        assert_eq!(observations.len(), 7);
    }

    #[test]
    fn cleaning_renames_and_drops_aggregates() {
        let tables = ClassificationTables::standard();
        let (stats, issues) =
            StatTable::from_wide_csv(WORLD_BANK, "population", tables).expect("load");
        assert_eq!(stats.get("GGY", 1994), Some(150_000.0));
        assert_eq!(stats.get("CHI", 1994), None);
        assert!(stats.series("WLD").is_none());
        assert_eq!(stats.name("ABW"), Some("Aruba"));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].count(), Some(3));
    }

    #[test]
    fn year_headers_with_databank_suffix() {
        assert_eq!(header_year("1995 [YR1995]"), Some(1995));
        assert_eq!(header_year("2023"), Some(2023));
        assert_eq!(header_year("Series Code"), None);
    }

    #[test]
    fn missing_code_column_is_an_error() {
        let err = read_wide_table("a,b\n1,2\n", "gdp").unwrap_err();
        assert!(matches!(err, IngestError::MissingHeader { .. }));
    }

    #[test]
    fn long_table_additions_override() {
        let additions = "Country,ISO-3,Year,Population\nKosovo,XKX,1995,1800000\nBad,,1995,1\n";
        let observations = read_long_table(additions, "additions").expect("read additions");
        assert_eq!(observations.len(), 1);
        let mut table = StatTable::from_observations(vec![StatObservation {
            iso3: "XKX".to_string(),
            country: String::new(),
            year: 1995,
            value: 1.0,
        }]);
        table.extend(observations);
        assert_eq!(table.get("XKX", 1995), Some(1_800_000.0));
        assert_eq!(table.name("XKX"), Some("Kosovo"));
        assert_eq!(table.len(), 1);
    }
}
