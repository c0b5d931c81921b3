//! Session-wide identifier registry.
//!
//! Deduplicates airport identifiers across all files of one processing
//! session and maps (airport, runway-end name) pairs to the ids handed
//! out by the session, for later cross-referencing by approach and ILS
//! loaders.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct AirportIndex {
    airport_ids: HashMap<String, i64>,
    runway_end_ids: HashMap<(String, String), i64>,
}

impl AirportIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an airport identifier. Returns false if the identifier
    /// was already registered; the caller then ignores the whole block.
    pub fn add_airport(&mut self, ident: &str, id: i64) -> bool {
        if self.airport_ids.contains_key(ident) {
            return false;
        }
        self.airport_ids.insert(ident.to_string(), id);
        true
    }

    pub fn airport_id(&self, ident: &str) -> Option<i64> {
        self.airport_ids.get(ident).copied()
    }

    pub fn add_runway_end(&mut self, airport_ident: &str, name: &str, id: i64) {
        self.runway_end_ids
            .insert((airport_ident.to_string(), name.to_string()), id);
    }

    pub fn runway_end_id(&self, airport_ident: &str, name: &str) -> Option<i64> {
        self.runway_end_ids
            .get(&(airport_ident.to_string(), name.to_string()))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_airport_is_rejected() {
        let mut index = AirportIndex::new();
        assert!(index.add_airport("KSEA", 1));
        assert!(!index.add_airport("KSEA", 2));
        assert_eq!(index.airport_id("KSEA"), Some(1));
        assert_eq!(index.airport_id("KLAX"), None);
    }

    #[test]
    fn runway_ends_are_scoped_by_airport() {
        let mut index = AirportIndex::new();
        index.add_runway_end("KSEA", "16L", 10);
        index.add_runway_end("KBFI", "16L", 20);
        assert_eq!(index.runway_end_id("KSEA", "16L"), Some(10));
        assert_eq!(index.runway_end_id("KBFI", "16L"), Some(20));
        assert_eq!(index.runway_end_id("KSEA", "34R"), None);
    }
}
