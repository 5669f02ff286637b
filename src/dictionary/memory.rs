//! In-memory dictionary index.

use std::path::Path;

use ahash::AHashMap;
use log::info;

use crate::dictionary::{DictionaryEntry, DictionaryIndex};
use crate::error::{Result, SubglossError};

/// Dictionary held entirely in memory.
///
/// Entries are stored once; lemma and pronunciation maps point into the
/// entry list so lookups hand out references in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryDictionary {
    entries: Vec<DictionaryEntry>,
    by_lemma: AHashMap<String, Vec<usize>>,
    by_pronunciation: AHashMap<String, Vec<usize>>,
}

impl MemoryDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary from entries.
    pub fn from_entries(entries: Vec<DictionaryEntry>) -> Self {
        let mut dictionary = Self::new();
        for entry in entries {
            dictionary.add_entry(entry);
        }
        dictionary
    }

    /// Load a dictionary from a JSON file.
    ///
    /// The file holds an array of entries:
    /// ```json
    /// [
    ///   {"lemmas": ["猫"], "senses": ["cat"], "frequency": 1, "pronunciations": ["ねこ"]}
    /// ]
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let entries: Vec<DictionaryEntry> = serde_json::from_str(&content).map_err(|e| {
            SubglossError::dictionary(format!(
                "Failed to parse dictionary JSON from '{}': {}",
                path.display(),
                e
            ))
        })?;

        let dictionary = Self::from_entries(entries);
        info!(
            "Loaded {} dictionary entries from {}",
            dictionary.len(),
            path.display()
        );
        Ok(dictionary)
    }

    /// Add an entry and index its lemmas and pronunciations.
    pub fn add_entry(&mut self, entry: DictionaryEntry) {
        let index = self.entries.len();

        for lemma in &entry.lemmas {
            Self::insert_key(&mut self.by_lemma, lemma, index);
        }
        for pronunciation in entry.pronunciations() {
            Self::insert_key(&mut self.by_pronunciation, pronunciation, index);
        }

        self.entries.push(entry);
    }

    fn insert_key(map: &mut AHashMap<String, Vec<usize>>, key: &str, index: usize) {
        let positions = map.entry(key.to_string()).or_default();
        // an entry listing the same lemma twice is indexed once
        if positions.last() != Some(&index) {
            positions.push(index);
        }
    }

    fn resolve(&self, positions: Option<&Vec<usize>>) -> Vec<&DictionaryEntry> {
        positions
            .map(|positions| positions.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }

    /// Get the total number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DictionaryIndex for MemoryDictionary {
    fn search(&self, key: &str) -> Vec<&DictionaryEntry> {
        self.resolve(self.by_lemma.get(key))
    }

    fn search_by_pronunciation(&self, key: &str) -> Vec<&DictionaryEntry> {
        self.resolve(self.by_pronunciation.get(key))
    }
}
