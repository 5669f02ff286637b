use std::borrow::Cow;
use std::str::FromStr;

use lindera::dictionary::{load_dictionary, load_user_dictionary};
use lindera::mode::Mode;
use lindera::segmenter::Segmenter;

use crate::analysis::token::RawToken;
use crate::analysis::tokenizer::{MorphTokenizer, raw_token_from_unidic};
use crate::error::{Result, SubglossError};

/// In-process analyzer backed by lindera.
pub struct LinderaTokenizer {
    inner: Segmenter,
}

impl LinderaTokenizer {
    /// Create a new Lindera tokenizer.
    ///
    /// `dict_uri` must point at a UniDic dictionary, e.g. `embedded://unidic`.
    /// `user_dict_uri` adds words such as proper nouns, from a lindera user
    /// dictionary (`.csv` or compiled `.bin`).
    pub fn new(mode_str: &str, dict_uri: &str, user_dict_uri: Option<&str>) -> Result<Self> {
        let mode = Mode::from_str(mode_str).map_err(|e| {
            SubglossError::tokenization(format!("Invalid mode '{}': {}", mode_str, e))
        })?;
        let dict = load_dictionary(dict_uri).map_err(|e| {
            SubglossError::tokenization(format!("Failed to load dictionary: {}", e))
        })?;
        let metadata = &dict.metadata;
        let user_dict = match user_dict_uri {
            Some(uri) => Some(load_user_dictionary(uri, metadata).map_err(|e| {
                SubglossError::tokenization(format!("Failed to load user dictionary: {}", e))
            })?),
            None => None,
        };
        let inner = Segmenter::new(mode, dict, user_dict);

        Ok(Self { inner })
    }
}

impl MorphTokenizer for LinderaTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<RawToken>> {
        let mut tokens = Vec::new();

        for mut token in self
            .inner
            .segment(Cow::Borrowed(text))
            .map_err(|e| SubglossError::tokenization(format!("Failed to segment text: {}", e)))?
        {
            let surface = token.surface.to_string();
            let details = token.details();
            tokens.push(raw_token_from_unidic(&surface, &details));
        }

        Ok(tokens)
    }

    fn name(&self) -> &'static str {
        "lindera"
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::analysis::normalizer::TextNormalizer;
    use crate::analysis::token::PosTag;

    #[test]
    fn test_tokenize_japanese() {
        let tokenizer = LinderaTokenizer::new("normal", "embedded://unidic", None).unwrap();

        let tokens = tokenizer.tokenize("猫が鳴いた。").unwrap();

        assert_eq!(tokens[0].surface, "猫");
        assert_eq!(tokens[0].features.coarse, "名詞");
    }

    #[test]
    fn test_normalized_lindera_output() {
        let tokenizer = LinderaTokenizer::new("normal", "embedded://unidic", None).unwrap();
        let normalizer = TextNormalizer::new();

        let tokens = normalizer.normalize(&tokenizer.tokenize("猫が鳴いた。").unwrap());

        assert_eq!(tokens[0].pos, PosTag::Noun);
        assert!(tokens.iter().any(|t| t.pos == PosTag::Verb));
    }

    #[test]
    fn test_user_dictionary_keeps_proper_noun_whole() {
        let mut csv = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(csv, "字幕太郎,カスタム名詞,ジマクタロウ").unwrap();
        let uri = csv.path().to_string_lossy();

        let tokenizer =
            LinderaTokenizer::new("normal", "embedded://unidic", Some(&*uri)).unwrap();
        let tokens = tokenizer.tokenize("字幕太郎が来た").unwrap();

        assert_eq!(tokens[0].surface, "字幕太郎");
    }

    #[test]
    fn test_missing_user_dictionary() {
        let result = LinderaTokenizer::new(
            "normal",
            "embedded://unidic",
            Some("/nonexistent/subgloss-names.csv"),
        );
        assert!(matches!(result, Err(SubglossError::Tokenization(_))));
    }
}
