//! In-memory record of caught creatures
//!
//! Lives for the duration of one session only.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::data::Pokemon;

/// A caught creature and when it was caught
#[derive(Debug, Clone)]
pub struct CaughtRecord {
    pub pokemon: Pokemon,
    pub caught_at: DateTime<Utc>,
}

/// Caught creatures keyed by the name they were caught under
#[derive(Debug, Default)]
pub struct Pokedex {
    entries: BTreeMap<String, CaughtRecord>,
}

impl Pokedex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a catch, replacing any earlier record under the same name
    pub fn insert(&mut self, name: impl Into<String>, pokemon: Pokemon) {
        let record = CaughtRecord {
            pokemon,
            caught_at: Utc::now(),
        };
        self.entries.insert(name.into(), record);
    }

    pub fn get(&self, name: &str) -> Option<&CaughtRecord> {
        self.entries.get(name)
    }

    /// Caught names in alphabetical order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pokemon(name: &str) -> Pokemon {
        Pokemon {
            name: name.to_string(),
            base_experience: Some(64),
            height: 7,
            weight: 69,
            stats: Vec::new(),
            types: Vec::new(),
        }
    }

    #[test]
    fn test_new_pokedex_is_empty() {
        let pokedex = Pokedex::new();
        assert!(pokedex.is_empty());
        assert_eq!(pokedex.names().count(), 0);
    }

    #[test]
    fn test_insert_and_get() {
        let mut pokedex = Pokedex::new();
        let before = Utc::now();

        pokedex.insert("bulbasaur", pokemon("bulbasaur"));

        let record = pokedex.get("bulbasaur").expect("record should exist");
        assert_eq!(record.pokemon.weight, 69);
        assert!(record.caught_at >= before);
        assert!(pokedex.get("ivysaur").is_none());
    }

    #[test]
    fn test_names_are_sorted() {
        let mut pokedex = Pokedex::new();
        pokedex.insert("pidgey", pokemon("pidgey"));
        pokedex.insert("abra", pokemon("abra"));
        pokedex.insert("magikarp", pokemon("magikarp"));

        let names: Vec<&str> = pokedex.names().collect();

        assert_eq!(names, vec!["abra", "magikarp", "pidgey"]);
    }

    #[test]
    fn test_recatch_replaces_record() {
        let mut pokedex = Pokedex::new();
        pokedex.insert("abra", pokemon("abra"));
        let mut stronger = pokemon("abra");
        stronger.weight = 100;

        pokedex.insert("abra", stronger);

        assert_eq!(pokedex.len(), 1);
        assert_eq!(pokedex.get("abra").map(|r| r.pokemon.weight), Some(100));
    }
}
