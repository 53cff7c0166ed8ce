//! Registry (RIR) classification of alpha-3 codes.

use std::collections::HashMap;

use ipalloc_model::{Classified, Issue, Rir};
use ipalloc_standards::{ClassificationTables, PartitionOverlap};
use tracing::warn;

/// Lookup from alpha-3 code to the registry serving it.
///
/// A code listed by more than one registry stays with the first registry
/// in partition order; the conflicts are kept for reporting.
#[derive(Debug, Clone)]
pub struct RirClassifier {
    index: HashMap<String, Rir>,
    overlaps: Vec<PartitionOverlap>,
}

impl RirClassifier {
    pub fn new(tables: &ClassificationTables) -> Self {
        let mut index = HashMap::new();
        for members in &tables.partition {
            for code in &members.codes {
                index.entry(code.clone()).or_insert(members.rir);
            }
        }
        let overlaps = tables.partition_overlaps();
        for overlap in &overlaps {
            warn!(
                code = %overlap.code,
                kept = %overlap.kept,
                ignored = %overlap.ignored,
                "code listed by more than one registry"
            );
        }
        Self { index, overlaps }
    }

    pub fn classify(&self, alpha3: &str) -> Classified<Rir> {
        self.index.get(alpha3).copied().into()
    }

    pub fn overlaps(&self) -> &[PartitionOverlap] {
        &self.overlaps
    }

    pub fn overlap_issues(&self) -> Vec<Issue> {
        self.overlaps
            .iter()
            .map(|overlap| Issue::PartitionOverlap {
                code: overlap.code.clone(),
                kept: overlap.kept,
                ignored: overlap.ignored,
            })
            .collect()
    }

    /// Number of classified codes.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
