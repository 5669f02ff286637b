//! Subtitle documents: SRT or ASS in, ASS out.
//!
//! A [`SubtitleFile`] is the [`CaptionContainer`] the annotation pipeline
//! writes into. Highlights are kept apart from the raw caption text and only
//! turned into style markers when the file is rendered, so colouring one word
//! can never corrupt the markers of another.
//!
//! # Examples
//!
//! ```
//! use subgloss::annotation::{CaptionContainer, Color};
//! use subgloss::subtitle::SubtitleFile;
//!
//! let srt = "1\n00:00:01,000 --> 00:00:02,500\n猫が好き\n";
//! let mut file = SubtitleFile::parse_srt(srt).unwrap();
//!
//! file.highlight(0, "猫", Color::new(255, 0, 0));
//! file.annotate(0, vec!["★ 猫 cat".to_string()]);
//!
//! assert_eq!(file.captions()[0].styled_text(), r"{\c&H0000FF&}猫{\c}が好き");
//! assert_eq!(file.annotated_count(), 1);
//! ```

pub mod ass;
pub mod srt;

use std::fmt;
use std::ops::Range;
use std::path::Path;

use crate::annotation::pipeline::CaptionContainer;
use crate::annotation::style::{Color, TextStyle};
use crate::error::Result;
use crate::subtitle::ass::AssStyles;

/// Input subtitle formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubtitleFormat {
    Srt,
    /// Advanced SubStation Alpha, also used for `.ssa`.
    Ass,
}

impl SubtitleFormat {
    /// Format of a file, from its extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "srt" => Some(SubtitleFormat::Srt),
            "ass" | "ssa" => Some(SubtitleFormat::Ass),
            _ => None,
        }
    }
}

/// A point in time, in milliseconds from the start of the video.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Build a timestamp from clock fields.
    ///
    /// `None` when a field is out of its clock range or the total does not
    /// fit in a `u64`.
    pub fn from_parts(hours: u64, minutes: u64, seconds: u64, millis: u64) -> Option<Self> {
        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return None;
        }
        hours
            .checked_mul(3_600_000)?
            .checked_add(minutes * 60_000 + seconds * 1000 + millis)
            .map(Timestamp)
    }

    pub fn hours(self) -> u64 {
        self.0 / 3_600_000
    }

    pub fn minutes(self) -> u64 {
        self.0 / 60_000 % 60
    }

    pub fn seconds(self) -> u64 {
        self.0 / 1000 % 60
    }

    pub fn millis(self) -> u64 {
        self.0 % 1000
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02},{:03}",
            self.hours(),
            self.minutes(),
            self.seconds(),
            self.millis()
        )
    }
}

/// One timed caption with its annotation state.
#[derive(Clone, Debug, PartialEq)]
pub struct Caption {
    pub start: Timestamp,
    pub end: Timestamp,
    /// Caption text as read from the file, lines separated by `\n`
    pub text: String,
    /// Words to color, in the order they were requested
    pub highlights: Vec<(String, Color)>,
    /// Gloss lines attached to this caption
    pub annotations: Vec<String>,
}

impl Caption {
    pub fn new<S: Into<String>>(start: Timestamp, end: Timestamp, text: S) -> Self {
        Caption {
            start,
            end,
            text: text.into(),
            highlights: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Caption text with every highlighted word wrapped in its color.
    ///
    /// Occurrences overlapping an earlier highlight are left alone.
    pub fn styled_text(&self) -> String {
        let mut spans: Vec<(Range<usize>, Color)> = Vec::new();

        for (word, color) in &self.highlights {
            if word.is_empty() {
                continue;
            }
            for (start, _) in self.text.match_indices(word.as_str()) {
                let range = start..start + word.len();
                let overlaps = spans
                    .iter()
                    .any(|(taken, _)| range.start < taken.end && taken.start < range.end);
                if !overlaps {
                    spans.push((range, *color));
                }
            }
        }
        spans.sort_by_key(|(range, _)| range.start);

        let mut styled = String::with_capacity(self.text.len());
        let mut cursor = 0;
        for (range, color) in spans {
            styled.push_str(&self.text[cursor..range.start]);
            styled.push_str(&TextStyle::Color(color).apply(&self.text[range.clone()]));
            cursor = range.end;
        }
        styled.push_str(&self.text[cursor..]);
        styled
    }

    pub fn is_annotated(&self) -> bool {
        !self.annotations.is_empty()
    }
}

/// A subtitle document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubtitleFile {
    captions: Vec<Caption>,
}

impl SubtitleFile {
    pub fn new(captions: Vec<Caption>) -> Self {
        SubtitleFile { captions }
    }

    /// Parse SRT content.
    pub fn parse_srt(content: &str) -> Result<Self> {
        srt::parse(content).map(Self::new)
    }

    /// Parse the dialogue events of an ASS or SSA script.
    pub fn parse_ass(content: &str) -> Result<Self> {
        ass::parse(content).map(Self::new)
    }

    pub fn parse(content: &str, format: SubtitleFormat) -> Result<Self> {
        match format {
            SubtitleFormat::Srt => Self::parse_srt(content),
            SubtitleFormat::Ass => Self::parse_ass(content),
        }
    }

    pub fn captions(&self) -> &[Caption] {
        &self.captions
    }

    /// Number of captions that received gloss lines.
    pub fn annotated_count(&self) -> usize {
        self.captions.iter().filter(|c| c.is_annotated()).count()
    }

    /// Render as an ASS script.
    pub fn to_ass(&self, styles: &AssStyles) -> String {
        ass::render(&self.captions, styles)
    }
}

impl CaptionContainer for SubtitleFile {
    fn caption_count(&self) -> usize {
        self.captions.len()
    }

    fn caption_text(&self, index: usize) -> &str {
        &self.captions[index].text
    }

    fn highlight(&mut self, index: usize, word: &str, color: Color) {
        self.captions[index]
            .highlights
            .push((word.to_string(), color));
    }

    fn annotate(&mut self, index: usize, lines: Vec<String>) {
        self.captions[index].annotations.extend(lines);
    }
}
