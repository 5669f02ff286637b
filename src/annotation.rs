//! Dictionary matching and gloss formatting.
//!
//! This module holds the annotation engine proper: segmentation of a
//! normalized caption into dictionary words, the heuristics that drop
//! uninteresting matches, and the rendering of glosses with rotating
//! highlight colors.

pub mod filter;
pub mod formatter;
pub mod matcher;
pub mod pipeline;
pub mod style;

// Re-export commonly used types
pub use filter::MatchFilter;
pub use formatter::{AnnotationFormatter, CaptionAnnotation, CaptionAnnotationState, Palette};
pub use matcher::{DictionaryMatch, MatchEngine};
pub use pipeline::{Annotator, CaptionContainer};
pub use style::{Color, TextStyle};
