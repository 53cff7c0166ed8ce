//! Country code normalization.
//!
//! Maps raw registry country codes (alpha-2 or pseudo-codes) to a canonical
//! alpha-3 code and display name. Lookup order: exceptions, the ISO alpha-2
//! table, already-canonical alpha-3 input, then the fallback.

use std::collections::HashMap;

use ipalloc_model::{CodeOrigin, NormalizedCountry};
use ipalloc_standards::ClassificationTables;

#[derive(Debug, Clone)]
struct Target {
    alpha3: String,
    name: String,
}

/// Total, pure mapping from raw codes to [`NormalizedCountry`].
#[derive(Debug, Clone)]
pub struct CountryNormalizer {
    exceptions: Vec<(String, Target)>,
    alpha2: HashMap<String, Target>,
    alpha3_names: HashMap<String, String>,
    fallback: Target,
}

impl CountryNormalizer {
    pub fn new(tables: &ClassificationTables) -> Self {
        let exceptions = tables
            .exceptions
            .iter()
            .map(|exception| {
                (
                    exception.input.trim().to_ascii_uppercase(),
                    Target {
                        alpha3: exception.alpha3.clone(),
                        name: exception.name.clone(),
                    },
                )
            })
            .collect::<Vec<_>>();
        let alpha2 = tables
            .countries
            .iter()
            .map(|entry| {
                (
                    entry.alpha2.clone(),
                    Target {
                        alpha3: entry.alpha3.clone(),
                        name: entry.name.clone(),
                    },
                )
            })
            .collect();
        let mut alpha3_names: HashMap<String, String> = tables
            .countries
            .iter()
            .map(|entry| (entry.alpha3.clone(), entry.name.clone()))
            .collect();
        for (_, target) in &exceptions {
            alpha3_names
                .entry(target.alpha3.clone())
                .or_insert_with(|| target.name.clone());
        }
        Self {
            exceptions,
            alpha2,
            alpha3_names,
            fallback: Target {
                alpha3: tables.fallback.alpha3.clone(),
                name: tables.fallback.name.clone(),
            },
        }
    }

    pub fn normalize(&self, code: &str) -> NormalizedCountry {
        let key = code.trim().to_ascii_uppercase();
        if let Some((_, target)) = self.exceptions.iter().find(|(input, _)| *input == key) {
            return resolved(target, CodeOrigin::Exception);
        }
        if key.is_empty() {
            return resolved(&self.fallback, CodeOrigin::Unmapped);
        }
        if let Some(target) = self.alpha2.get(&key) {
            return resolved(target, CodeOrigin::Iso);
        }
        if let Some(name) = self.alpha3_names.get(&key) {
            return NormalizedCountry {
                alpha3: key,
                name: name.clone(),
                origin: CodeOrigin::Alpha3,
            };
        }
        resolved(&self.fallback, CodeOrigin::Unmapped)
    }

    /// Display name of a canonical alpha-3 code.
    pub fn name_of(&self, alpha3: &str) -> Option<&str> {
        self.alpha3_names.get(alpha3).map(String::as_str)
    }

    pub fn fallback_code(&self) -> &str {
        &self.fallback.alpha3
    }
}

fn resolved(target: &Target, origin: CodeOrigin) -> NormalizedCountry {
    NormalizedCountry {
        alpha3: target.alpha3.clone(),
        name: target.name.clone(),
        origin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn normalizer() -> CountryNormalizer {
        CountryNormalizer::new(ClassificationTables::standard())
    }

    #[test]
    fn exceptions_take_priority() {
        let n = normalizer();
        let cases = [
            ("", "UNK", "Unknown"),
            ("ZZ", "RES", "Reserved"),
            ("AP", "ITU", "International Telecommunication Union"),
            ("EU", "EUR", "Europe"),
            ("XK", "XKX", "Kosovo"),
        ];
        for (input, alpha3, name) in cases {
            let country = n.normalize(input);
            assert_eq!(country.alpha3, alpha3, "{input}");
            assert_eq!(country.name, name, "{input}");
            assert_eq!(country.origin, CodeOrigin::Exception);
        }
    }

    #[test]
    fn iso_codes_resolve() {
        let n = normalizer();
        let jp = n.normalize(" jp ");
        assert_eq!(jp.alpha3, "JPN");
        assert_eq!(jp.name, "Japan");
        assert_eq!(jp.origin, CodeOrigin::Iso);
    }

    #[test]
    fn alpha3_input_is_returned_unchanged() {
        let n = normalizer();
        let jpn = n.normalize("JPN");
        assert_eq!(jpn.alpha3, "JPN");
        assert_eq!(jpn.origin, CodeOrigin::Alpha3);
        assert_eq!(n.normalize("RES").alpha3, "RES");
    }

    #[test]
    fn unknown_codes_fall_back() {
        let n = normalizer();
        for input in ["QQ", "XYZW", "1", "A"] {
            let country = n.normalize(input);
            assert_eq!(country.alpha3, "UNK");
            assert_eq!(country.origin, CodeOrigin::Unmapped);
        }
    }

    proptest! {
        #[test]
        fn normalize_is_total(code in "\\PC{0,6}") {
            let country = normalizer().normalize(&code);
            prop_assert_eq!(country.alpha3.len(), 3);
            prop_assert!(!country.name.is_empty());
        }

        #[test]
        fn normalize_is_idempotent(code in "[A-Za-z]{2}") {
            let n = normalizer();
            let once = n.normalize(&code);
            let twice = n.normalize(&once.alpha3);
            prop_assert_eq!(once.alpha3, twice.alpha3);
            prop_assert_eq!(once.name, twice.name);
        }
    }
}
