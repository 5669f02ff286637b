//! Text analysis for subtitle captions.
//!
//! The analysis stage turns a caption into tagged tokens:
//!
//! ```text
//! caption → MorphTokenizer (external analyzer) → RawToken* → TextNormalizer → TextToken*
//! ```

pub mod normalizer;
pub mod script;
pub mod token;
pub mod tokenizer;

// Re-export commonly used types
pub use normalizer::TextNormalizer;
pub use token::{FeaturePair, PosTag, RawToken, TextToken};
pub use tokenizer::MorphTokenizer;
