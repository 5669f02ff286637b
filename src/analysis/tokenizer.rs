//! Adapters to external morphological analyzers.
//!
//! Splitting Japanese text into morphemes is delegated to a real analyzer.
//! Adapters only turn the analyzer's output into [`RawToken`]s.
//!
//! # Available Tokenizers
//!
//! - [`mecab::MecabTokenizer`] - Runs a `mecab` process with a UniDic dictionary
//! - [`lindera::LinderaTokenizer`] - In-process analysis with embedded UniDic (requires `lindera` feature)

use crate::analysis::token::{FeaturePair, RawToken};
use crate::error::Result;

#[cfg(feature = "lindera")]
pub mod lindera;
pub mod mecab;

/// Trait for analyzers that split a caption into raw tokens.
///
/// The trait requires `Send + Sync` so one analyzer can serve captions
/// processed on several threads.
pub trait MorphTokenizer: Send + Sync {
    /// Split `text` into raw tokens in text order.
    fn tokenize(&self, text: &str) -> Result<Vec<RawToken>>;

    /// Get the name of this tokenizer.
    fn name(&self) -> &'static str;
}

/// Placeholder UniDic uses for a missing field.
const MISSING_FIELD: &str = "*";

/// Field positions in a UniDic feature row.
const ORTH_FIELD: usize = 8;
const ORTH_BASE_FIELD: usize = 10;

/// Build a [`RawToken`] from a surface and its UniDic feature fields.
///
/// The written form (`orth`) is preferred over the surface when present and
/// the written base form (`orthBase`) becomes the lemma.
pub fn raw_token_from_unidic<S: AsRef<str>>(surface: &str, fields: &[S]) -> RawToken {
    let field = |index: usize| {
        fields
            .get(index)
            .map(|f| f.as_ref())
            .filter(|f| !f.is_empty() && *f != MISSING_FIELD)
    };

    let written = field(ORTH_FIELD).unwrap_or(surface);
    let features = FeaturePair::new(field(0).unwrap_or_default(), field(1).unwrap_or_default());

    RawToken::new(written, field(ORTH_BASE_FIELD), features)
}
