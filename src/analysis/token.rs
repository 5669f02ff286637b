//! Token types flowing from the morphological analyzer to the matcher.
//!
//! # Core Types
//!
//! - [`RawToken`] - A token exactly as the external analyzer produced it
//! - [`FeaturePair`] - The analyzer's opaque (coarse, fine) feature codes
//! - [`TextToken`] - A normalized token carrying a [`PosTag`]
//! - [`PosTag`] - Universal Dependencies part-of-speech tags
//!
//! # Examples
//!
//! ```
//! use subgloss::analysis::token::{PosTag, TextToken};
//!
//! let token = TextToken::new("食べ", Some("食べる"), PosTag::Verb);
//! assert_eq!(token.text_form, "食べ");
//! assert_eq!(token.canonical_form(), "食べる");
//! assert!(!token.pos.is_not_word());
//!
//! let unknown = TextToken::new("ほげ", None, PosTag::Unknown);
//! assert_eq!(unknown.canonical_form(), "ほげ");
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Universal Dependencies part-of-speech tag.
///
/// See <https://universaldependencies.org/u/pos/>.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PosTag {
    Noun,
    Propn,
    Verb,
    Adj,
    Adv,
    Adp,
    Pron,
    Det,
    Num,
    Part,
    Cconj,
    Sconj,
    Aux,
    Intj,
    Sym,
    Punct,
    X,
    Unknown,
}

/// Tags that never denote a word: the matcher skips them outright.
pub static NOT_WORD_TAGS: LazyLock<HashSet<PosTag>> = LazyLock::new(|| {
    [PosTag::Punct, PosTag::Sym, PosTag::Num, PosTag::X]
        .into_iter()
        .collect()
});

/// Grammatical tags that are not worth a gloss on their own.
pub static IGNORE_WORD_TAGS: LazyLock<HashSet<PosTag>> = LazyLock::new(|| {
    [
        PosTag::Part,
        PosTag::Det,
        PosTag::Cconj,
        PosTag::Sconj,
        PosTag::Aux,
    ]
    .into_iter()
    .collect()
});

impl PosTag {
    /// Whether this tag belongs to the *not-word* set.
    pub fn is_not_word(self) -> bool {
        NOT_WORD_TAGS.contains(&self)
    }

    /// Whether this tag belongs to the *ignore-word* set.
    pub fn is_ignore_word(self) -> bool {
        IGNORE_WORD_TAGS.contains(&self)
    }

    /// Upper-case UD name of the tag.
    pub fn as_str(self) -> &'static str {
        match self {
            PosTag::Noun => "NOUN",
            PosTag::Propn => "PROPN",
            PosTag::Verb => "VERB",
            PosTag::Adj => "ADJ",
            PosTag::Adv => "ADV",
            PosTag::Adp => "ADP",
            PosTag::Pron => "PRON",
            PosTag::Det => "DET",
            PosTag::Num => "NUM",
            PosTag::Part => "PART",
            PosTag::Cconj => "CCONJ",
            PosTag::Sconj => "SCONJ",
            PosTag::Aux => "AUX",
            PosTag::Intj => "INTJ",
            PosTag::Sym => "SYM",
            PosTag::Punct => "PUNCT",
            PosTag::X => "X",
            PosTag::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The analyzer's grammatical feature codes for one token.
///
/// For UniDic these are the first two part-of-speech levels
/// (e.g. `動詞` / `非自立可能`). The codes are opaque to everything except
/// the normalizer's rule table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturePair {
    /// Coarse-grained category (first level).
    pub coarse: String,
    /// Finer-grained category (second level).
    pub fine: String,
}

impl FeaturePair {
    pub fn new<C: Into<String>, F: Into<String>>(coarse: C, fine: F) -> Self {
        FeaturePair {
            coarse: coarse.into(),
            fine: fine.into(),
        }
    }
}

/// A token as produced by an external morphological analyzer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawToken {
    /// Written form as it appears in the text
    pub surface: String,
    /// Dictionary form, when the analyzer knows it
    pub lemma: Option<String>,
    /// Opaque grammatical feature codes
    pub features: FeaturePair,
}

impl RawToken {
    pub fn new<S: Into<String>>(surface: S, lemma: Option<&str>, features: FeaturePair) -> Self {
        RawToken {
            surface: surface.into(),
            lemma: lemma.map(str::to_string),
            features,
        }
    }
}

/// A normalized token tagged with its part of speech.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextToken {
    /// Surface spelling as it appears in the caption
    pub text_form: String,
    /// Dictionary spelling, if the analyzer provided one
    pub lemma: Option<String>,
    /// Part of speech
    pub pos: PosTag,
}

impl TextToken {
    /// Create a new token.
    pub fn new<S: Into<String>>(text_form: S, lemma: Option<&str>, pos: PosTag) -> Self {
        TextToken {
            text_form: text_form.into(),
            lemma: lemma.map(str::to_string),
            pos,
        }
    }

    /// The spelling used for canonical lookups: the lemma when known,
    /// otherwise the text form.
    pub fn canonical_form(&self) -> &str {
        self.lemma.as_deref().unwrap_or(&self.text_form)
    }
}

impl fmt::Display for TextToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.text_form, self.pos)
    }
}
