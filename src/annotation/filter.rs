//! Acceptance rules applied to the matcher's output.
//!
//! # Examples
//!
//! ```
//! use subgloss::analysis::token::{PosTag, TextToken};
//! use subgloss::annotation::filter::MatchFilter;
//! use subgloss::annotation::matcher::DictionaryMatch;
//! use subgloss::config::AnnotationSettings;
//! use subgloss::dictionary::DictionaryEntry;
//!
//! let common = DictionaryEntry::new(vec!["猫"], vec!["cat"]).with_frequency(1);
//! let cat = DictionaryMatch::new(vec![TextToken::new("猫", None, PosTag::Noun)], vec![&common]).unwrap();
//!
//! let settings = AnnotationSettings {
//!     ignore_frequencies: [1].into_iter().collect(),
//!     ..AnnotationSettings::default()
//! };
//! let filter = MatchFilter::from_settings(&settings);
//! assert!(filter.apply(vec![cat]).is_empty());
//! ```

use std::collections::HashSet;

use log::trace;

use crate::analysis::script::{is_all_hiragana, is_all_katakana};
use crate::annotation::matcher::DictionaryMatch;
use crate::config::AnnotationSettings;

/// Drops matches that are not worth a gloss.
#[derive(Clone, Debug, Default)]
pub struct MatchFilter {
    ignore_words: HashSet<String>,
    ignore_frequencies: HashSet<u32>,
}

impl MatchFilter {
    /// Create a filter with no user ignore lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter from validated settings.
    pub fn from_settings(settings: &AnnotationSettings) -> Self {
        MatchFilter {
            ignore_words: settings.ignore_words.clone(),
            ignore_frequencies: settings.ignore_frequencies.clone(),
        }
    }

    /// Keep the accepted matches, in order.
    pub fn apply<'d>(&self, matches: Vec<DictionaryMatch<'d>>) -> Vec<DictionaryMatch<'d>> {
        matches
            .into_iter()
            .filter(|m| {
                let accepted = self.accepts(m);
                if !accepted {
                    trace!("filtered out {:?}", m.text_form());
                }
                accepted
            })
            .collect()
    }

    /// Check a single match against every rule.
    pub fn accepts(&self, m: &DictionaryMatch<'_>) -> bool {
        // grammatical words only
        if m.tokens().iter().all(|t| t.pos.is_ignore_word()) {
            return false;
        }

        let text_form = m.text_form();
        if self.ignore_words.contains(&text_form) || self.ignore_words.contains(&m.canonical_form())
        {
            return false;
        }

        // kana-only words are rarely worth a gloss unless they are verbs
        if (is_all_hiragana(&text_form) || is_all_katakana(&text_form)) && !m.has_verb() {
            return false;
        }

        // an entry without a rank keeps the match
        let all_ignored_ranks = m.entries().iter().all(|entry| {
            entry
                .frequency
                .is_some_and(|rank| self.ignore_frequencies.contains(&rank))
        });
        !all_ignored_ranks
    }
}
