//! Record augmentation and partitioning by resource type.

use std::collections::{BTreeMap, BTreeSet};

use ipalloc_model::{AllocationRecord, AugmentedRecord, CodeOrigin, Issue, ResourceType};
use ipalloc_standards::ClassificationTables;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::classify::RirClassifier;
use crate::normalize::CountryNormalizer;
use crate::prefix::block_prefix;

/// Normalizer and classifier built from one set of classification tables.
#[derive(Debug, Clone)]
pub struct Augmenter {
    normalizer: CountryNormalizer,
    classifier: RirClassifier,
}

/// Augmented records plus classification diagnostics.
#[derive(Debug, Default)]
pub struct Augmented {
    pub records: Vec<AugmentedRecord>,
    pub issues: Vec<Issue>,
}

impl Augmenter {
    pub fn new(tables: &ClassificationTables) -> Self {
        Self {
            normalizer: CountryNormalizer::new(tables),
            classifier: RirClassifier::new(tables),
        }
    }

    pub fn normalizer(&self) -> &CountryNormalizer {
        &self.normalizer
    }

    pub fn classifier(&self) -> &RirClassifier {
        &self.classifier
    }

    pub fn augment_record(&self, record: AllocationRecord) -> AugmentedRecord {
        let country = self.normalizer.normalize(&record.country_code);
        let rir = self.classifier.classify(&country.alpha3);
        let prefix = block_prefix(&record);
        let year = record.date.year();
        AugmentedRecord {
            record,
            country,
            rir,
            prefix,
            year,
        }
    }

    /// Augments every record, keeping input order.
    pub fn augment(&self, records: Vec<AllocationRecord>) -> Augmented {
        let records: Vec<AugmentedRecord> = records
            .into_par_iter()
            .map(|record| self.augment_record(record))
            .collect();
        let issues = classification_issues(&records);
        debug!(records = records.len(), issues = issues.len(), "augmented records");
        Augmented { records, issues }
    }
}

fn classification_issues(records: &[AugmentedRecord]) -> Vec<Issue> {
    let mut unmapped: BTreeMap<&str, u64> = BTreeMap::new();
    let mut unclassified: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        if record.country.origin == CodeOrigin::Unmapped {
            *unmapped.entry(record.record.country_code.as_str()).or_default() += 1;
        }
        if !record.rir.is_classified() {
            *unclassified.entry(record.alpha3()).or_default() += 1;
        }
    }
    let mut issues = Vec::new();
    if !unmapped.is_empty() {
        let count = unmapped.values().sum();
        warn!(codes = unmapped.len(), records = count, "unmapped country codes");
        issues.push(Issue::UnmappedCountryCodes {
            codes: unmapped.keys().map(|code| (*code).to_string()).collect(),
            count,
        });
    }
    if !unclassified.is_empty() {
        issues.push(Issue::UnclassifiedCodes {
            codes: unclassified.keys().map(|code| (*code).to_string()).collect(),
            count: unclassified.values().sum(),
        });
    }
    issues
}

/// Splits records by resource type, keeping input order within each type.
pub fn partition_by_type(
    records: &[AugmentedRecord],
) -> BTreeMap<ResourceType, Vec<AugmentedRecord>> {
    let mut partitions: BTreeMap<ResourceType, Vec<AugmentedRecord>> = BTreeMap::new();
    for record in records {
        partitions
            .entry(record.record.resource_type)
            .or_default()
            .push(record.clone());
    }
    partitions
}

/// Distinct alpha-3 codes, sorted.
pub fn distinct_countries(records: &[AugmentedRecord]) -> BTreeSet<&str> {
    records.iter().map(AugmentedRecord::alpha3).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipalloc_ingest::parse_delegation_feed;
    use ipalloc_model::{Classified, Rir};

    const FEED: &str = "\
apnic|JP|ipv4|1.0.16.0|256|20110412|allocated
apnic|AU|ipv6|2001:dc0::|32|20010503|assigned
apnic|QQ|asn|173|1|20020801|allocated
apnic|ZZ|ipv4|1.0.1.0|256||reserved
";

    #[test]
    fn augments_without_touching_the_record() {
        let parsed = parse_delegation_feed(FEED, Rir::Apnic);
        let originals = parsed.records.clone();
        let augmented = Augmenter::new(ClassificationTables::standard()).augment(parsed.records);
        assert_eq!(augmented.records.len(), 4);
        for (augmented, original) in augmented.records.iter().zip(&originals) {
            assert_eq!(&augmented.record, original);
        }
        let jp = &augmented.records[0];
        assert_eq!(jp.alpha3(), "JPN");
        assert_eq!(jp.rir, Classified::Classified(Rir::Apnic));
        assert_eq!(jp.prefix.map(|p| p.length), Some(24));
        assert_eq!(jp.year, Some(2011));
        let zz = &augmented.records[3];
        assert_eq!(zz.alpha3(), "RES");
        assert_eq!(zz.rir, Classified::Unclassified);
        assert_eq!(zz.year, None);
    }

    #[test]
    fn reports_unmapped_and_unclassified_codes() {
        let parsed = parse_delegation_feed(FEED, Rir::Apnic);
        let augmented = Augmenter::new(ClassificationTables::standard()).augment(parsed.records);
        assert_eq!(
            augmented.issues,
            vec![
                Issue::UnmappedCountryCodes {
                    codes: vec!["QQ".to_string()],
                    count: 1,
                },
                Issue::UnclassifiedCodes {
                    codes: vec!["RES".to_string(), "UNK".to_string()],
                    count: 2,
                },
            ]
        );
    }

    #[test]
    fn partitions_by_resource_type() {
        let parsed = parse_delegation_feed(FEED, Rir::Apnic);
        let augmented = Augmenter::new(ClassificationTables::standard()).augment(parsed.records);
        let partitions = partition_by_type(&augmented.records);
        assert_eq!(partitions[&ResourceType::Ipv4].len(), 2);
        assert_eq!(partitions[&ResourceType::Ipv6].len(), 1);
        assert_eq!(partitions[&ResourceType::Asn].len(), 1);
        let ipv4_codes = distinct_countries(&partitions[&ResourceType::Ipv4]);
        assert_eq!(ipv4_codes.into_iter().collect::<Vec<_>>(), vec!["JPN", "RES"]);
    }
}
