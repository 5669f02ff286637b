//! Rendering of accepted matches into gloss lines.
//!
//! Each dictionary entry of a match becomes one line:
//!
//! ```text
//! ★ {color}猫{/color} [ねこ] {bold}①{/bold} cat --- feline
//!   └ lemmas ┘ └ reading┘ └ rank ┘   └ senses ┘
//! ```
//!
//! Every newly glossed word takes the next color of a per-caption palette;
//! the same color is used to highlight that word in the caption itself.

use std::collections::{HashSet, VecDeque};

use serde::Serialize;

use crate::annotation::matcher::DictionaryMatch;
use crate::annotation::style::{Color, TextStyle};
use crate::dictionary::DictionaryEntry;

/// Leading marker of a gloss line.
const LINE_MARKER: &str = "★ ";

const LEMMA_SEPARATOR: &str = ", ";
const PRONUNCIATION_SEPARATOR: &str = ", ";
const SENSE_SEPARATOR: &str = " --- ";

/// Glyph for rank 1; higher ranks follow it in code point order.
const FIRST_RANK_GLYPH: u32 = '①' as u32;

/// Ranks with a circled-number glyph (① to ⑳).
const GLYPH_RANKS: std::ops::RangeInclusive<u32> = 1..=20;

/// Render a frequency rank as a single glyph, or `(n)` outside ①..⑳.
pub fn rank_glyph(rank: u32) -> String {
    GLYPH_RANKS
        .contains(&rank)
        .then(|| char::from_u32(FIRST_RANK_GLYPH + rank - 1))
        .flatten()
        .map(String::from)
        .unwrap_or_else(|| format!("({rank})"))
}

/// A cyclic list of highlight colors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: VecDeque<Color>,
}

impl Palette {
    /// Create a palette. Returns `None` for an empty color list.
    pub fn new(colors: &[Color]) -> Option<Self> {
        if colors.is_empty() {
            return None;
        }
        Some(Palette {
            colors: colors.iter().copied().collect(),
        })
    }

    /// Color that the next annotated word will get.
    pub fn peek(&self) -> Color {
        self.colors[0]
    }

    /// Move the head color to the back.
    pub fn rotate(&mut self) {
        self.colors.rotate_left(1);
    }
}

/// Per-caption formatter state. Create one per caption and drop it after.
#[derive(Clone, Debug)]
pub struct CaptionAnnotationState {
    palette: Palette,
    seen: HashSet<String>,
}

impl CaptionAnnotationState {
    pub fn new(palette: Palette) -> Self {
        CaptionAnnotationState {
            palette,
            seen: HashSet::new(),
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Whether a text form was already glossed in this caption.
    pub fn is_seen(&self, text_form: &str) -> bool {
        self.seen.contains(text_form)
    }
}

/// A word of the caption to color.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub word: String,
    #[serde(serialize_with = "serialize_color")]
    pub color: Color,
}

fn serialize_color<S: serde::Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(color)
}

/// Everything one caption receives: gloss lines and highlighted words.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CaptionAnnotation {
    pub lines: Vec<String>,
    pub highlights: Vec<Highlight>,
}

impl CaptionAnnotation {
    /// Whether nothing was glossed.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Formats matches into gloss lines.
#[derive(Clone, Debug)]
pub struct AnnotationFormatter {
    display_other_lemmas: bool,
}

impl AnnotationFormatter {
    pub fn new(display_other_lemmas: bool) -> Self {
        AnnotationFormatter {
            display_other_lemmas,
        }
    }

    /// Annotate the filtered matches of one caption.
    pub fn annotate(
        &self,
        state: &mut CaptionAnnotationState,
        matches: &[DictionaryMatch<'_>],
    ) -> CaptionAnnotation {
        let mut annotation = CaptionAnnotation::default();

        for m in matches {
            let color = state.palette.peek();
            let text_form = m.text_form();
            let lines = self.format_match(m, color);

            if lines.is_empty() || state.seen.contains(&text_form) {
                continue;
            }

            annotation.lines.extend(lines);
            annotation.highlights.push(Highlight {
                word: text_form.clone(),
                color,
            });
            state.palette.rotate();
            state.seen.insert(text_form);
        }

        annotation
    }

    /// One line per entry that has anything to show.
    pub fn format_match(&self, m: &DictionaryMatch<'_>, color: Color) -> Vec<String> {
        let text_form = m.text_form();
        let canonical_form = m.canonical_form();

        m.entries()
            .iter()
            .filter_map(|entry| self.format_entry(entry, &text_form, &canonical_form, color))
            .collect()
    }

    /// Render one entry, or `None` if it would be empty.
    pub fn format_entry(
        &self,
        entry: &DictionaryEntry,
        text_form: &str,
        canonical_form: &str,
        color: Color,
    ) -> Option<String> {
        let color_style = TextStyle::Color(color);

        let lemmas = entry
            .lemmas
            .iter()
            .filter_map(|lemma| {
                if lemma == canonical_form || lemma == text_form {
                    Some(color_style.apply(lemma))
                } else if self.display_other_lemmas {
                    Some(lemma.clone())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join(LEMMA_SEPARATOR);

        let pronunciations = entry.pronunciations();
        let mut reading = String::new();
        if !pronunciations.is_empty() && !pronunciations.iter().any(|p| lemmas.contains(p.as_str()))
        {
            reading = format!(" [{}] ", pronunciations.join(PRONUNCIATION_SEPARATOR));
            // no lemma spelled like the caption: the match came from the reading
            if !lemmas.contains(canonical_form) && !lemmas.contains(text_form) {
                reading = color_style.apply(&reading);
            }
        }

        if lemmas.is_empty() && reading.is_empty() && entry.senses.is_empty() {
            return None;
        }

        let rank = match entry.frequency {
            Some(rank) => format!(" {} ", TextStyle::Bold.apply(&rank_glyph(rank))),
            None => " ".to_string(),
        };

        Some(format!(
            "{LINE_MARKER}{lemmas}{reading}{rank}{}",
            entry.senses.join(SENSE_SEPARATOR)
        ))
    }
}
