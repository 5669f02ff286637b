//! Per-caption annotation pipeline.
//!
//! ```text
//! caption text
//!   → MorphTokenizer     (external analyzer)
//!   → TextNormalizer     (tags, verb fragment merge)
//!   → MatchEngine        (longest dictionary spans)
//!   → MatchFilter        (heuristic rejection)
//!   → AnnotationFormatter (gloss lines + highlight colors)
//! ```
//!
//! Captions are independent: each one gets a fresh
//! [`CaptionAnnotationState`], so the captions of a file are annotated in
//! parallel and written back in their original order.

use std::sync::Arc;

use log::{debug, info};
use rayon::prelude::*;

use crate::analysis::normalizer::TextNormalizer;
use crate::analysis::token::TextToken;
use crate::analysis::tokenizer::MorphTokenizer;
use crate::annotation::filter::MatchFilter;
use crate::annotation::formatter::{
    AnnotationFormatter, CaptionAnnotation, CaptionAnnotationState, Palette,
};
use crate::annotation::matcher::{DictionaryMatch, MatchEngine};
use crate::annotation::style::Color;
use crate::config::AnnotationSettings;
use crate::dictionary::DictionaryIndex;
use crate::error::{Result, SubglossError};

/// A subtitle document whose captions can be read and annotated in place.
pub trait CaptionContainer {
    /// Number of captions.
    fn caption_count(&self) -> usize;

    /// Raw text of caption `index`.
    fn caption_text(&self, index: usize) -> &str;

    /// Color every occurrence of `word` in caption `index`.
    fn highlight(&mut self, index: usize, word: &str, color: Color);

    /// Attach gloss lines to caption `index`.
    fn annotate(&mut self, index: usize, lines: Vec<String>);
}

/// Runs the whole pipeline for captions and subtitle files.
pub struct Annotator {
    tokenizer: Arc<dyn MorphTokenizer>,
    dictionary: Arc<dyn DictionaryIndex>,
    normalizer: TextNormalizer,
    filter: MatchFilter,
    formatter: AnnotationFormatter,
    palette: Palette,
}

impl Annotator {
    /// Create an annotator from validated settings.
    pub fn new(
        tokenizer: Arc<dyn MorphTokenizer>,
        dictionary: Arc<dyn DictionaryIndex>,
        settings: &AnnotationSettings,
    ) -> Result<Self> {
        let palette = Palette::new(&settings.highlight_colors).ok_or_else(|| {
            SubglossError::configuration("highlight_colors must contain at least one color")
        })?;

        Ok(Annotator {
            tokenizer,
            dictionary,
            normalizer: TextNormalizer::new()
                .with_verb_fragments(settings.extra_verb_fragments.iter().cloned()),
            filter: MatchFilter::from_settings(settings),
            formatter: AnnotationFormatter::new(settings.display_other_lemmas),
            palette,
        })
    }

    /// Tokenize and normalize a caption.
    pub fn tokens(&self, text: &str) -> Result<Vec<TextToken>> {
        let raw = self.tokenizer.tokenize(text)?;
        Ok(self.normalizer.normalize(&raw))
    }

    /// Accepted dictionary matches of a caption, in caption order.
    pub fn matches(&self, text: &str) -> Result<Vec<DictionaryMatch<'_>>> {
        let tokens = self.tokens(text)?;
        Ok(self.matches_in(&tokens))
    }

    /// Accepted dictionary matches over already normalized tokens.
    pub fn matches_in(&self, tokens: &[TextToken]) -> Vec<DictionaryMatch<'_>> {
        let engine = MatchEngine::new(self.dictionary.as_ref());
        self.filter.apply(engine.find_matches(tokens))
    }

    /// Annotate a single caption with fresh per-caption state.
    pub fn annotate_caption(&self, text: &str) -> Result<CaptionAnnotation> {
        let matches = self.matches(text)?;
        Ok(self.annotate_matches(&matches))
    }

    /// Gloss lines and highlights for the accepted matches of one caption.
    pub fn annotate_matches(&self, matches: &[DictionaryMatch<'_>]) -> CaptionAnnotation {
        let mut state = CaptionAnnotationState::new(self.palette.clone());
        self.formatter.annotate(&mut state, matches)
    }

    /// Annotate every caption of a container.
    ///
    /// Returns the number of captions that received at least one line. If any
    /// caption fails, the error is returned and the container is left
    /// untouched.
    pub fn annotate_container<C: CaptionContainer + Sync>(&self, container: &mut C) -> Result<usize> {
        let captions: &C = container;
        let annotations = (0..captions.caption_count())
            .into_par_iter()
            .map(|index| self.annotate_caption(captions.caption_text(index)))
            .collect::<Result<Vec<_>>>()?;

        let mut annotated = 0;
        for (index, annotation) in annotations.into_iter().enumerate() {
            if annotation.is_empty() {
                continue;
            }
            debug!(
                "caption {}: {} lines, {} highlights",
                index,
                annotation.lines.len(),
                annotation.highlights.len()
            );
            for highlight in &annotation.highlights {
                container.highlight(index, &highlight.word, highlight.color);
            }
            container.annotate(index, annotation.lines);
            annotated += 1;
        }

        info!(
            "annotated {} of {} captions",
            annotated,
            container.caption_count()
        );
        Ok(annotated)
    }
}
