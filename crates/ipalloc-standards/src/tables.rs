//! Injectable classification data.
//!
//! `ClassificationTables` bundles every static lookup the pipeline needs.
//! The shipped set is built once and shared; callers that need different
//! data (tests, alternate partitions) load a TOML file in which any omitted
//! section falls back to the shipped values.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::OnceLock;

use ipalloc_model::Rir;
use serde::{Deserialize, Serialize};

use crate::aggregates::{CODE_RENAMES, WORLD_BANK_AGGREGATES};
use crate::error::StandardsError;
use crate::iso3166::ISO_3166;
use crate::rir::default_partition;

/// One ISO 3166-1 entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryEntry {
    pub alpha2: String,
    pub alpha3: String,
    pub name: String,
}

/// A registry pseudo-code with a fixed mapping, checked before the ISO table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeException {
    /// Upper-cased input code; empty matches a blank field.
    pub input: String,
    pub alpha3: String,
    pub name: String,
}

/// Code and name used when nothing matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fallback {
    pub alpha3: String,
    pub name: String,
}

/// Member list of one registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RirMembers {
    pub rir: Rir,
    pub codes: Vec<String>,
}

/// Legacy code rename applied to statistics tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeRename {
    pub from: String,
    pub to: String,
}

/// A code listed by more than one registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionOverlap {
    pub code: String,
    pub kept: Rir,
    pub ignored: Rir,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationTables {
    pub countries: Vec<CountryEntry>,
    /// Applied in order.
    pub exceptions: Vec<CodeException>,
    pub fallback: Fallback,
    pub partition: Vec<RirMembers>,
    pub aggregate_codes: Vec<String>,
    pub code_renames: Vec<CodeRename>,
}

static STANDARD: OnceLock<ClassificationTables> = OnceLock::new();

impl ClassificationTables {
    /// The shipped tables, built on first use.
    pub fn standard() -> &'static ClassificationTables {
        STANDARD.get_or_init(Self::build_standard)
    }

    fn build_standard() -> Self {
        let countries = ISO_3166
            .iter()
            .map(|(alpha2, alpha3, name)| CountryEntry {
                alpha2: (*alpha2).to_string(),
                alpha3: (*alpha3).to_string(),
                name: (*name).to_string(),
            })
            .collect();
        let exceptions = [
            ("", "UNK", "Unknown"),
            ("ZZ", "RES", "Reserved"),
            ("AP", "ITU", "International Telecommunication Union"),
            ("EU", "EUR", "Europe"),
            ("XK", "XKX", "Kosovo"),
        ]
        .into_iter()
        .map(|(input, alpha3, name)| CodeException {
            input: input.to_string(),
            alpha3: alpha3.to_string(),
            name: name.to_string(),
        })
        .collect();
        let partition = default_partition()
            .into_iter()
            .map(|(rir, codes)| RirMembers {
                rir,
                codes: codes.iter().map(|code| (*code).to_string()).collect(),
            })
            .collect();
        Self {
            countries,
            exceptions,
            fallback: Fallback {
                alpha3: "UNK".to_string(),
                name: "Unknown".to_string(),
            },
            partition,
            aggregate_codes: WORLD_BANK_AGGREGATES
                .iter()
                .map(|code| (*code).to_string())
                .collect(),
            code_renames: CODE_RENAMES
                .iter()
                .map(|(from, to)| CodeRename {
                    from: (*from).to_string(),
                    to: (*to).to_string(),
                })
                .collect(),
        }
    }

    /// Parses tables from TOML; omitted sections keep the shipped values.
    pub fn from_toml_str(contents: &str, origin: &Path) -> Result<Self, StandardsError> {
        let tables: Self = toml::from_str(contents).map_err(|e| StandardsError::Toml {
            path: origin.to_path_buf(),
            source: e,
        })?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn from_toml_path(path: &Path) -> Result<Self, StandardsError> {
        let contents = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
        Self::from_toml_str(&contents, path)
    }

    /// Checks code shapes and uniqueness of lookup keys.
    pub fn validate(&self) -> Result<(), StandardsError> {
        let mut seen_alpha2 = BTreeSet::new();
        for entry in &self.countries {
            if !is_code(&entry.alpha2, 2) {
                return Err(StandardsError::invalid(format!(
                    "alpha-2 code '{}' must be two ASCII letters",
                    entry.alpha2
                )));
            }
            if !is_code(&entry.alpha3, 3) {
                return Err(StandardsError::invalid(format!(
                    "alpha-3 code '{}' for {} must be three ASCII letters",
                    entry.alpha3, entry.alpha2
                )));
            }
            if !seen_alpha2.insert(entry.alpha2.as_str()) {
                return Err(StandardsError::invalid(format!(
                    "duplicate alpha-2 code {}",
                    entry.alpha2
                )));
            }
        }
        let mut seen_inputs = BTreeSet::new();
        for exception in &self.exceptions {
            if !seen_inputs.insert(exception.input.as_str()) {
                return Err(StandardsError::invalid(format!(
                    "duplicate exception for '{}'",
                    exception.input
                )));
            }
            if !is_code(&exception.alpha3, 3) {
                return Err(StandardsError::invalid(format!(
                    "exception output '{}' must be three ASCII letters",
                    exception.alpha3
                )));
            }
        }
        if !is_code(&self.fallback.alpha3, 3) {
            return Err(StandardsError::invalid("fallback code must be three ASCII letters"));
        }
        Ok(())
    }

    /// Alpha-2 index over the ISO table.
    pub fn alpha2_index(&self) -> HashMap<&str, &CountryEntry> {
        self.countries
            .iter()
            .map(|entry| (entry.alpha2.as_str(), entry))
            .collect()
    }

    /// Codes listed by more than one registry, in partition order.
    pub fn partition_overlaps(&self) -> Vec<PartitionOverlap> {
        let mut owner: HashMap<&str, Rir> = HashMap::new();
        let mut overlaps = Vec::new();
        for members in &self.partition {
            for code in &members.codes {
                match owner.get(code.as_str()) {
                    Some(kept) if *kept != members.rir => overlaps.push(PartitionOverlap {
                        code: code.clone(),
                        kept: *kept,
                        ignored: members.rir,
                    }),
                    Some(_) => {}
                    None => {
                        owner.insert(code.as_str(), members.rir);
                    }
                }
            }
        }
        overlaps
    }

    pub fn is_aggregate(&self, code: &str) -> bool {
        self.aggregate_codes.iter().any(|aggregate| aggregate == code)
    }

    /// Applies legacy renames; unknown codes pass through.
    pub fn rename<'a>(&'a self, code: &'a str) -> &'a str {
        self.code_renames
            .iter()
            .find(|rename| rename.from == code)
            .map_or(code, |rename| rename.to.as_str())
    }
}

impl Default for ClassificationTables {
    fn default() -> Self {
        Self::standard().clone()
    }
}

fn is_code(code: &str, len: usize) -> bool {
    code.len() == len && code.bytes().all(|b| b.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_tables_validate() {
        let tables = ClassificationTables::standard();
        tables.validate().expect("standard tables are valid");
        assert_eq!(tables.countries.len(), 249);
        assert_eq!(tables.partition.len(), 5);
    }

    #[test]
    fn standard_partition_has_no_overlaps() {
        assert!(ClassificationTables::standard().partition_overlaps().is_empty());
    }

    #[test]
    fn detects_overlaps_in_custom_partition() {
        let mut tables = ClassificationTables::standard().clone();
        tables.partition = vec![
            RirMembers {
                rir: Rir::Arin,
                codes: vec!["MEX".to_string(), "USA".to_string()],
            },
            RirMembers {
                rir: Rir::Lacnic,
                codes: vec!["MEX".to_string(), "BRA".to_string()],
            },
        ];
        let overlaps = tables.partition_overlaps();
        assert_eq!(
            overlaps,
            vec![PartitionOverlap {
                code: "MEX".to_string(),
                kept: Rir::Arin,
                ignored: Rir::Lacnic,
            }]
        );
    }

    #[test]
    fn renames_and_aggregates() {
        let tables = ClassificationTables::standard();
        assert_eq!(tables.rename("CHI"), "GGY");
        assert_eq!(tables.rename("JPN"), "JPN");
        assert!(tables.is_aggregate("WLD"));
        assert!(tables.is_aggregate("EUU"));
        assert!(!tables.is_aggregate("USA"));
    }

    #[test]
    fn toml_overrides_only_given_sections() {
        let toml = r#"
[[partition]]
rir = "APNIC"
codes = ["JPN"]

[fallback]
alpha3 = "XXX"
name = "Nowhere"
"#;
        let tables = ClassificationTables::from_toml_str(toml, Path::new("inline.toml"))
            .expect("parse tables");
        assert_eq!(tables.partition.len(), 1);
        assert_eq!(tables.fallback.alpha3, "XXX");
        assert_eq!(tables.countries.len(), 249);
        assert_eq!(tables.exceptions.len(), 5);
    }

    #[test]
    fn rejects_malformed_codes() {
        let toml = r#"
[[countries]]
alpha2 = "J"
alpha3 = "JPN"
name = "Japan"
"#;
        let err = ClassificationTables::from_toml_str(toml, Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, StandardsError::Invalid { .. }));
    }
}
