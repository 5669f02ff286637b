//! Longest-match segmentation of a caption into dictionary words.
//!
//! Starting from each word token, the matcher tries the whole rest of the
//! caption as one dictionary key and shrinks it from the right until a
//! lookup succeeds:
//!
//! ```text
//! tokens:  [思い] [出し] [て] [くれ] [た]
//! try:     思い出してくれた → 思い出してくれ → 思い出して ✓
//! ```

use log::trace;

use crate::analysis::script::{char_len, is_all_hiragana};
use crate::analysis::token::{PosTag, TextToken};
use crate::dictionary::{DictionaryEntry, DictionaryIndex};

/// Longest hiragana-only key that needs a verb to be accepted.
const MAX_SHORT_KANA_LEN: usize = 3;

/// A contiguous run of tokens with the entries found for it.
#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryMatch<'d> {
    tokens: Vec<TextToken>,
    entries: Vec<&'d DictionaryEntry>,
}

impl<'d> DictionaryMatch<'d> {
    /// Create a match. Returns `None` if either side is empty.
    pub fn new(tokens: Vec<TextToken>, entries: Vec<&'d DictionaryEntry>) -> Option<Self> {
        if tokens.is_empty() || entries.is_empty() {
            return None;
        }
        Some(DictionaryMatch { tokens, entries })
    }

    pub fn tokens(&self) -> &[TextToken] {
        &self.tokens
    }

    pub fn entries(&self) -> &[&'d DictionaryEntry] {
        &self.entries
    }

    /// Number of tokens consumed.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Never true for a constructed match.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Concatenated surface spelling.
    pub fn text_form(&self) -> String {
        text_form(&self.tokens)
    }

    /// Concatenated dictionary spelling.
    pub fn canonical_form(&self) -> String {
        canonical_form(&self.tokens)
    }

    /// Whether any consumed token is a verb.
    pub fn has_verb(&self) -> bool {
        has_verb(&self.tokens)
    }
}

fn text_form(tokens: &[TextToken]) -> String {
    tokens.iter().map(|t| t.text_form.as_str()).collect()
}

fn canonical_form(tokens: &[TextToken]) -> String {
    tokens.iter().map(TextToken::canonical_form).collect()
}

fn has_verb(tokens: &[TextToken]) -> bool {
    tokens.iter().any(|t| t.pos == PosTag::Verb)
}

/// Segments normalized tokens into dictionary matches.
pub struct MatchEngine<'d> {
    dictionary: &'d dyn DictionaryIndex,
}

impl<'d> MatchEngine<'d> {
    pub fn new(dictionary: &'d dyn DictionaryIndex) -> Self {
        MatchEngine { dictionary }
    }

    /// Find the non-overlapping matches of a caption, in caption order.
    pub fn find_matches(&self, tokens: &[TextToken]) -> Vec<DictionaryMatch<'d>> {
        let mut matches = Vec::new();
        let mut position = 0;

        while position < tokens.len() {
            let pos = tokens[position].pos;
            if pos.is_not_word() || pos.is_ignore_word() {
                position += 1;
                continue;
            }

            match self.longest_match(&tokens[position..]) {
                Some(found) => {
                    position += found.len();
                    matches.push(found);
                }
                None => position += 1,
            }
        }

        matches
    }

    /// Longest accepted match starting at the first token of `rest`.
    fn longest_match(&self, rest: &[TextToken]) -> Option<DictionaryMatch<'d>> {
        (1..=rest.len()).rev().find_map(|end| {
            let window = &rest[..end];
            let entries = self.lookup(window);
            if entries.is_empty() || Self::is_grammar_grouping(window) {
                return None;
            }
            trace!("matched {:?} with {} entries", text_form(window), entries.len());
            DictionaryMatch::new(window.to_vec(), entries)
        })
    }

    /// Canonical spelling, then surface spelling, then reading.
    fn lookup(&self, window: &[TextToken]) -> Vec<&'d DictionaryEntry> {
        let canonical = canonical_form(window);
        let entries = self.dictionary.search(&canonical);
        if !entries.is_empty() {
            return entries;
        }

        let entries = self.dictionary.search(&text_form(window));
        if !entries.is_empty() {
            return entries;
        }

        // single kana readings match far too many words
        if char_len(&canonical) > 1 {
            return self.dictionary.search_by_pronunciation(&canonical);
        }
        Vec::new()
    }

    /// Short all-hiragana runs without a verb are most likely particles
    /// that happen to spell a headword.
    fn is_grammar_grouping(window: &[TextToken]) -> bool {
        let text = text_form(window);
        char_len(&text) <= MAX_SHORT_KANA_LEN && is_all_hiragana(&text) && !has_verb(window)
    }
}
