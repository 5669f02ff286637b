//! Dictionary entries and the read-only lookup contract used by the matcher.
//!
//! # Examples
//!
//! ```
//! use subgloss::dictionary::{DictionaryEntry, DictionaryIndex};
//! use subgloss::dictionary::memory::MemoryDictionary;
//!
//! let dictionary = MemoryDictionary::from_entries(vec![
//!     DictionaryEntry::new(vec!["猫"], vec!["cat"])
//!         .with_frequency(1)
//!         .with_pronunciations(vec!["ねこ"]),
//! ]);
//!
//! assert_eq!(dictionary.search("猫").len(), 1);
//! assert_eq!(dictionary.search_by_pronunciation("ねこ").len(), 1);
//! assert!(dictionary.search("犬").is_empty());
//! ```

pub mod memory;

use serde::{Deserialize, Serialize};

/// A dictionary definition: spellings, meanings and optional metadata.
///
/// Every field may be missing in the source file; missing fields render as
/// empty text instead of failing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// Spellings of the headword, in preference order
    #[serde(default)]
    pub lemmas: Vec<String>,

    /// Meanings, in dictionary order
    #[serde(default)]
    pub senses: Vec<String>,

    /// Commonality rank, 1 being the most common
    #[serde(default)]
    pub frequency: Option<u32>,

    /// Kana readings
    #[serde(default)]
    pub pronunciations: Option<Vec<String>>,
}

impl DictionaryEntry {
    /// Create an entry with lemmas and senses.
    pub fn new<L, S>(lemmas: Vec<L>, senses: Vec<S>) -> Self
    where
        L: Into<String>,
        S: Into<String>,
    {
        DictionaryEntry {
            lemmas: lemmas.into_iter().map(Into::into).collect(),
            senses: senses.into_iter().map(Into::into).collect(),
            frequency: None,
            pronunciations: None,
        }
    }

    /// Set the frequency rank.
    pub fn with_frequency(mut self, frequency: u32) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Set the pronunciations.
    pub fn with_pronunciations<P: Into<String>>(mut self, pronunciations: Vec<P>) -> Self {
        self.pronunciations = Some(pronunciations.into_iter().map(Into::into).collect());
        self
    }

    /// Pronunciations, empty when absent.
    pub fn pronunciations(&self) -> &[String] {
        self.pronunciations.as_deref().unwrap_or_default()
    }
}

/// Read-only dictionary lookups.
///
/// Implementations must be immutable after construction: the trait requires
/// `Send + Sync` and lookups take `&self`, so many captions can be matched
/// concurrently without locking. Lookups never fail; no result is an empty
/// vector. Results must be stable for identical input.
pub trait DictionaryIndex: Send + Sync {
    /// Entries having `key` as one of their lemmas.
    fn search(&self, key: &str) -> Vec<&DictionaryEntry>;

    /// Entries having `key` as one of their pronunciations.
    fn search_by_pronunciation(&self, key: &str) -> Vec<&DictionaryEntry>;
}
