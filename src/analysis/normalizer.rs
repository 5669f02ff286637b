//! Raw analyzer output to tagged [`TextToken`]s.
//!
//! The normalizer maps the analyzer's UniDic feature codes onto Universal
//! Dependencies tags (see <https://universaldependencies.org/ja/overview/morphology.html>)
//! and then merges verb conjugation fragments so that, for example,
//! `継ぎ` + `て` is glossed as a single word.
//!
//! # Examples
//!
//! ```
//! use subgloss::analysis::normalizer::TextNormalizer;
//! use subgloss::analysis::token::{FeaturePair, PosTag, RawToken};
//!
//! let normalizer = TextNormalizer::new();
//! let raw = vec![
//!     RawToken::new("食べ", Some("食べる"), FeaturePair::new("動詞", "一般")),
//!     RawToken::new("て", Some("て"), FeaturePair::new("助詞", "接続助詞")),
//!     RawToken::new("。", None, FeaturePair::new("補助記号", "句点")),
//! ];
//!
//! let tokens = normalizer.normalize(&raw);
//! assert_eq!(tokens.len(), 2);
//! assert_eq!(tokens[0].text_form, "食べて");
//! assert_eq!(tokens[0].canonical_form(), "食べる");
//! assert_eq!(tokens[0].pos, PosTag::Verb);
//! assert_eq!(tokens[1].pos, PosTag::Sym);
//! ```

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use crate::analysis::token::{PosTag, RawToken, TextToken};

/// Punctuation the analyzer is known to misclassify.
const PUNCTUATION: &[&str] = &["｡", "…｡", "｢", "｣", "、", "（", "）", "."];

/// Adnominals that behave as determiners.
const DETERMINERS: &[&str] = &["その", "どの", "この"];

/// Case particles that join nouns.
const NOUN_CONJUNCTIONS: &[&str] = &["と", "か"];

/// Conjunctive particles that belong to the preceding verb.
const DEFAULT_VERB_FRAGMENTS: &[&str] = &["て", "で", "ちゃ"];

/// UniDic "possibly dependent" sub-category.
const DEPENDENT_FORM: &str = "非自立可能";

static PUNCTUATION_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| PUNCTUATION.iter().copied().collect());

static DETERMINER_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| DETERMINERS.iter().copied().collect());

static NOUN_CONJUNCTION_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| NOUN_CONJUNCTIONS.iter().copied().collect());

/// Default verb conjugation fragments as a HashSet.
pub static DEFAULT_VERB_FRAGMENTS_SET: LazyLock<HashSet<String>> = LazyLock::new(|| {
    DEFAULT_VERB_FRAGMENTS
        .iter()
        .map(|&s| s.to_string())
        .collect()
});

/// Maps raw analyzer tokens to tagged tokens and merges verb fragments.
#[derive(Clone, Debug)]
pub struct TextNormalizer {
    /// Sconj surfaces that are glued onto a preceding verb or auxiliary
    verb_fragments: Arc<HashSet<String>>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    /// Create a normalizer with the default fragment set (`て`, `で`, `ちゃ`).
    pub fn new() -> Self {
        TextNormalizer {
            verb_fragments: Arc::new(DEFAULT_VERB_FRAGMENTS_SET.clone()),
        }
    }

    /// Add surfaces to the verb fragment set.
    pub fn with_verb_fragments<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = Arc::make_mut(&mut self.verb_fragments);
        set.extend(fragments.into_iter().map(Into::into));
        self
    }

    /// Check if a surface is a verb fragment.
    pub fn is_verb_fragment(&self, surface: &str) -> bool {
        self.verb_fragments.contains(surface)
    }

    /// Resolve the tag of `token`, given the raw token right before it.
    pub fn pos_tag(&self, previous: Option<&RawToken>, token: &RawToken) -> PosTag {
        let surface = token.surface.as_str();
        if PUNCTUATION_SET.contains(surface) {
            return PosTag::Punct;
        }

        let fine = token.features.fine.as_str();
        match fine {
            "数詞" => return PosTag::Num,
            "固有名詞" => return PosTag::Propn,
            "副助詞" | "終助詞" => return PosTag::Part,
            "接続助詞" | "準体助詞" => return PosTag::Sconj,
            "格助詞" => {
                return if NOUN_CONJUNCTION_SET.contains(surface) {
                    PosTag::Cconj
                } else {
                    PosTag::Adp
                };
            }
            "普通名詞" => return PosTag::Noun,
            _ => {}
        }

        let previous_coarse = previous.map(|p| p.features.coarse.as_str());
        match token.features.coarse.as_str() {
            "連体詞" => {
                if DETERMINER_SET.contains(surface) {
                    PosTag::Det
                } else {
                    PosTag::Adj
                }
            }
            "形容詞" => {
                if fine == DEPENDENT_FORM && matches!(previous_coarse, Some("形容詞" | "形状詞"))
                {
                    PosTag::Aux
                } else {
                    PosTag::Adj
                }
            }
            "形状詞" => PosTag::Adj,
            "副詞" => PosTag::Adv,
            "感動詞" => PosTag::Intj,
            "接頭辞" | "接尾辞" => PosTag::Noun,
            "動詞" => {
                if fine == DEPENDENT_FORM && previous_coarse == Some("動詞") {
                    PosTag::Aux
                } else {
                    PosTag::Verb
                }
            }
            "助動詞" => PosTag::Aux,
            "接続詞" => PosTag::Cconj,
            "代名詞" => PosTag::Pron,
            "補助記号" => PosTag::Sym,
            "空白" => PosTag::X,
            _ => PosTag::Unknown,
        }
    }

    /// Tag every raw token, then merge verb fragments.
    pub fn normalize(&self, raw: &[RawToken]) -> Vec<TextToken> {
        let tagged = raw
            .iter()
            .enumerate()
            .map(|(i, token)| {
                let previous = i.checked_sub(1).map(|p| &raw[p]);
                let pos = self.pos_tag(previous, token);
                TextToken::new(token.surface.as_str(), token.lemma.as_deref(), pos)
            })
            .collect();

        self.merge_verb_fragments(tagged)
    }

    /// Glue Sconj fragments onto the preceding verb or auxiliary.
    ///
    /// The merged token keeps the verb's tag and lemma.
    pub fn merge_verb_fragments(&self, tokens: Vec<TextToken>) -> Vec<TextToken> {
        let mut merged: Vec<TextToken> = Vec::with_capacity(tokens.len());

        for token in tokens {
            let is_fragment = token.pos == PosTag::Sconj && self.is_verb_fragment(&token.text_form);
            if is_fragment {
                if let Some(last) = merged
                    .last_mut()
                    .filter(|last| matches!(last.pos, PosTag::Verb | PosTag::Aux))
                {
                    last.text_form.push_str(&token.text_form);
                    continue;
                }
            }
            merged.push(token);
        }

        merged
    }
}
