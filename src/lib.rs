//! # subgloss
//!
//! Annotates Japanese subtitles with dictionary glosses for language
//! learners.
//!
//! ## Features
//!
//! - Morphological analysis through MeCab (UniDic) or the embedded lindera analyzer
//! - Greedy longest-match dictionary segmentation with kana reading fallback
//! - Heuristic filtering of grammar words, ignore lists and common words
//! - Gloss lines with frequency ranks and rotating highlight colors
//! - Parallel annotation of captions, SRT or ASS in and ASS out
//! - User dictionaries for proper nouns, configurable ASS styles
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use subgloss::prelude::*;
//!
//! /// Treats every space-separated word as a noun.
//! struct Words;
//!
//! impl MorphTokenizer for Words {
//!     fn tokenize(&self, text: &str) -> Result<Vec<RawToken>> {
//!         Ok(text
//!             .split_whitespace()
//!             .map(|w| RawToken::new(w, None, FeaturePair::new("名詞", "普通名詞")))
//!             .collect())
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "words"
//!     }
//! }
//!
//! let dictionary = MemoryDictionary::from_entries(vec![
//!     DictionaryEntry::new(vec!["猫"], vec!["cat"]).with_frequency(3),
//! ]);
//! let annotator = Annotator::new(
//!     Arc::new(Words),
//!     Arc::new(dictionary),
//!     &AnnotationSettings::default(),
//! )
//! .unwrap();
//!
//! let annotation = annotator.annotate_caption("猫").unwrap();
//! assert_eq!(annotation.lines.len(), 1);
//! assert!(annotation.lines[0].contains("cat"));
//! ```

pub mod analysis;
pub mod annotation;
pub mod cli;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod subtitle;

pub mod prelude {
    pub use crate::analysis::{FeaturePair, MorphTokenizer, PosTag, RawToken, TextToken};
    pub use crate::annotation::{Annotator, CaptionAnnotation, CaptionContainer, Color};
    pub use crate::config::{AnnotationConfig, AnnotationSettings};
    pub use crate::dictionary::memory::MemoryDictionary;
    pub use crate::dictionary::{DictionaryEntry, DictionaryIndex};
    pub use crate::error::{Result, SubglossError};
    pub use crate::subtitle::SubtitleFile;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
