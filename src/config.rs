//! Annotation settings.
//!
//! [`AnnotationConfig`] is the user-facing form (deserialized from JSON and
//! overridden by CLI flags). It must be turned into [`AnnotationSettings`]
//! through [`AnnotationConfig::validate`] before any caption is processed.
//!
//! ```json
//! {
//!   "ignore_words": ["する", "ある"],
//!   "ignore_frequencies": [1],
//!   "display_other_lemmas": true,
//!   "highlight_colors": ["#FFC107", "#4FC3F7", "#81C784"],
//!   "subtitle_styles": {
//!     "caption": "Arial,48,&H00FFFFFF,&H000000FF,&H00000000,&H80000000,0,0,0,0,100,100,0,0,1,2,1,2,20,20,30,1",
//!     "annotation": "Arial,26,&H00FFFFFF,&H000000FF,&H00000000,&H80000000,0,0,0,0,100,100,0,0,1,1,0,7,20,20,20,1"
//!   }
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::annotation::style::Color;
use crate::error::{Result, SubglossError};
use crate::subtitle::ass::AssStyles;

/// Default highlight palette.
pub const DEFAULT_HIGHLIGHT_COLORS: &[&str] =
    &["#FFC107", "#4FC3F7", "#81C784", "#F06292", "#BA68C8"];

/// Annotation options as written by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Words (text or canonical form) that never get a gloss.
    pub ignore_words: Vec<String>,
    /// Frequency ranks considered too common to gloss.
    pub ignore_frequencies: Vec<u32>,
    /// Show an entry's other spellings next to the matched one.
    pub display_other_lemmas: bool,
    /// Highlight palette, `#RRGGBB`, rotated per caption.
    pub highlight_colors: Vec<String>,
    /// Extra conjunctive particles merged into the preceding verb.
    pub extra_verb_fragments: Vec<String>,
    /// ASS styles of the generated scripts.
    pub subtitle_styles: AssStyles,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        AnnotationConfig {
            ignore_words: Vec::new(),
            ignore_frequencies: Vec::new(),
            display_other_lemmas: true,
            highlight_colors: DEFAULT_HIGHLIGHT_COLORS
                .iter()
                .map(|c| c.to_string())
                .collect(),
            extra_verb_fragments: Vec::new(),
            subtitle_styles: AssStyles::default(),
        }
    }
}

impl AnnotationConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file. Missing keys take defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            SubglossError::configuration(format!(
                "Failed to parse configuration '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Set the ignore words list.
    pub fn ignore_words<S: Into<String>>(mut self, words: Vec<S>) -> Self {
        self.ignore_words = words.into_iter().map(Into::into).collect();
        self
    }

    /// Set the ignored frequency ranks.
    pub fn ignore_frequencies(mut self, frequencies: Vec<u32>) -> Self {
        self.ignore_frequencies = frequencies;
        self
    }

    /// Show or hide other lemmas.
    pub fn display_other_lemmas(mut self, display: bool) -> Self {
        self.display_other_lemmas = display;
        self
    }

    /// Set the highlight palette.
    pub fn highlight_colors<S: Into<String>>(mut self, colors: Vec<S>) -> Self {
        self.highlight_colors = colors.into_iter().map(Into::into).collect();
        self
    }

    /// Set the ASS styles of the generated scripts.
    pub fn subtitle_styles(mut self, styles: AssStyles) -> Self {
        self.subtitle_styles = styles;
        self
    }

    /// Check every option and produce the settings used by the pipeline.
    pub fn validate(&self) -> Result<AnnotationSettings> {
        if let Some(word) = self.ignore_words.iter().find(|w| w.trim().is_empty()) {
            return Err(SubglossError::configuration(format!(
                "ignore_words contains an empty entry: {word:?}"
            )));
        }
        if self.ignore_frequencies.contains(&0) {
            return Err(SubglossError::configuration(
                "ignore_frequencies must only contain positive ranks",
            ));
        }
        if self.highlight_colors.is_empty() {
            return Err(SubglossError::configuration(
                "highlight_colors must contain at least one color",
            ));
        }
        if let Some(fragment) = self.extra_verb_fragments.iter().find(|f| f.is_empty()) {
            return Err(SubglossError::configuration(format!(
                "extra_verb_fragments contains an empty entry: {fragment:?}"
            )));
        }

        self.subtitle_styles.validate()?;

        let highlight_colors = self
            .highlight_colors
            .iter()
            .map(|c| c.parse::<Color>())
            .collect::<Result<Vec<_>>>()?;

        Ok(AnnotationSettings {
            ignore_words: self.ignore_words.iter().cloned().collect(),
            ignore_frequencies: self.ignore_frequencies.iter().copied().collect(),
            display_other_lemmas: self.display_other_lemmas,
            highlight_colors,
            extra_verb_fragments: self.extra_verb_fragments.clone(),
            subtitle_styles: self.subtitle_styles.clone(),
        })
    }
}

/// Validated annotation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationSettings {
    pub ignore_words: HashSet<String>,
    pub ignore_frequencies: HashSet<u32>,
    pub display_other_lemmas: bool,
    /// Never empty.
    pub highlight_colors: Vec<Color>,
    pub extra_verb_fragments: Vec<String>,
    pub subtitle_styles: AssStyles,
}

impl Default for AnnotationSettings {
    fn default() -> Self {
        AnnotationSettings {
            ignore_words: HashSet::new(),
            ignore_frequencies: HashSet::new(),
            display_other_lemmas: true,
            highlight_colors: DEFAULT_HIGHLIGHT_COLORS
                .iter()
                .filter_map(|c| c.parse().ok())
                .collect(),
            extra_verb_fragments: Vec::new(),
            subtitle_styles: AssStyles::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let settings = AnnotationConfig::default().validate().unwrap();
        assert_eq!(settings.highlight_colors.len(), DEFAULT_HIGHLIGHT_COLORS.len());
        assert_eq!(settings, AnnotationSettings::default());
    }

    #[test]
    fn test_builder() {
        let settings = AnnotationConfig::new()
            .ignore_words(vec!["する"])
            .ignore_frequencies(vec![1, 2])
            .display_other_lemmas(false)
            .highlight_colors(vec!["#FF0000"])
            .validate()
            .unwrap();

        assert!(settings.ignore_words.contains("する"));
        assert!(settings.ignore_frequencies.contains(&2));
        assert!(!settings.display_other_lemmas);
        assert_eq!(settings.highlight_colors, vec![Color::new(255, 0, 0)]);
    }

    #[test]
    fn test_empty_color_list_is_rejected() {
        let result = AnnotationConfig::new()
            .highlight_colors(Vec::<String>::new())
            .validate();
        assert!(matches!(result, Err(SubglossError::Configuration(_))));
    }

    #[test]
    fn test_malformed_lists_are_rejected() {
        let bad_color = AnnotationConfig::new().highlight_colors(vec!["#FF0000", "blue"]);
        assert!(matches!(bad_color.validate(), Err(SubglossError::Configuration(_))));

        let bad_word = AnnotationConfig::new().ignore_words(vec!["する", " "]);
        assert!(matches!(bad_word.validate(), Err(SubglossError::Configuration(_))));

        let bad_rank = AnnotationConfig::new().ignore_frequencies(vec![0]);
        assert!(matches!(bad_rank.validate(), Err(SubglossError::Configuration(_))));
    }

    #[test]
    fn test_load_from_file_with_missing_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"ignore_frequencies": [1, 2], "display_other_lemmas": false}}"#).unwrap();

        let config = AnnotationConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.ignore_frequencies, vec![1, 2]);
        assert!(!config.display_other_lemmas);
        assert_eq!(config.highlight_colors.len(), DEFAULT_HIGHLIGHT_COLORS.len());
    }

    #[test]
    fn test_subtitle_styles_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"subtitle_styles": {{"annotation": "Noto Sans CJK JP,30,&H00FFFFFF,&H000000FF,&H00000000,&H80000000,0,0,0,0,100,100,0,0,1,1,0,7,20,20,20,1"}}}}"#
        )
        .unwrap();

        let settings = AnnotationConfig::load_from_file(file.path())
            .unwrap()
            .validate()
            .unwrap();
        assert!(settings.subtitle_styles.annotation.starts_with("Noto Sans CJK JP,30,"));
        assert_eq!(settings.subtitle_styles.caption, AssStyles::default().caption);
    }

    #[test]
    fn test_malformed_subtitle_style_is_rejected() {
        let config = AnnotationConfig::new().subtitle_styles(AssStyles {
            caption: "Arial,48".to_string(),
            ..AssStyles::default()
        });
        assert!(matches!(config.validate(), Err(SubglossError::Configuration(_))));
    }

    #[test]
    fn test_load_from_file_wrong_type() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"ignore_frequencies": "1,2"}}"#).unwrap();

        let result = AnnotationConfig::load_from_file(file.path());
        assert!(matches!(result, Err(SubglossError::Configuration(_))));
    }
}
