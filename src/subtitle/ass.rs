//! Advanced SubStation Alpha (`.ass`/`.ssa`) reader and writer.
//!
//! Captions are written with the `Default` style at the bottom of the
//! screen; their gloss lines go to a separate `Annotation` event at the top
//! left, shown for the same time range. Both styles come from
//! [`AssStyles`].
//!
//! Reading keeps the timing and the plain text of each `Dialogue` event.
//! Override blocks (`{...}`) are dropped, so a script styled by another tool
//! is annotated on its bare words.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SubglossError};
use crate::subtitle::{Caption, Timestamp};

/// First line of the `[Script Info]` section of every generated script.
pub const GENERATOR_MARKER: &str = "; Script generated by subgloss";

/// Fields of a `Style:` line after its name.
pub const STYLE_FIELD_COUNT: usize = 22;

const STYLE_FORMAT: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding";

const EVENT_FIELDS: &[&str] = &[
    "Layer", "Start", "End", "Style", "Name", "MarginL", "MarginR", "MarginV", "Effect", "Text",
];

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+):(\d{1,2}):(\d{1,2})\.(\d{1,3})\s*$").expect("valid time regex")
});

static OVERRIDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]*\}").expect("valid override regex"));

/// Style fields (everything after the name) of the two generated styles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssStyles {
    /// `Default` style, used for the caption text.
    pub caption: String,
    /// `Annotation` style, used for the gloss lines.
    pub annotation: String,
}

impl Default for AssStyles {
    fn default() -> Self {
        AssStyles {
            caption: "Arial,48,&H00FFFFFF,&H000000FF,&H00000000,&H80000000,0,0,0,0,100,100,0,0,1,2,1,2,20,20,30,1"
                .to_string(),
            annotation: "Arial,26,&H00FFFFFF,&H000000FF,&H00000000,&H80000000,0,0,0,0,100,100,0,0,1,1,0,7,20,20,20,1"
                .to_string(),
        }
    }
}

impl AssStyles {
    /// Both styles must list exactly the fields of the v4+ style format.
    pub fn validate(&self) -> Result<()> {
        for (name, fields) in [("caption", &self.caption), ("annotation", &self.annotation)] {
            let count = fields.split(',').count();
            if count != STYLE_FIELD_COUNT || fields.contains('\n') {
                return Err(SubglossError::configuration(format!(
                    "subtitle_styles.{name} must have {STYLE_FIELD_COUNT} comma-separated fields, found {count}"
                )));
            }
        }
        Ok(())
    }

    fn header(&self) -> String {
        format!(
            "[Script Info]
{GENERATOR_MARKER}
ScriptType: v4.00+
WrapStyle: 0
ScaledBorderAndShadow: yes
PlayResX: 1280
PlayResY: 720

[V4+ Styles]
{STYLE_FORMAT}
Style: Default,{}
Style: Annotation,{}

[Events]
Format: {}
",
            self.caption.trim(),
            self.annotation.trim(),
            EVENT_FIELDS.join(", ")
        )
    }
}

/// Whether the script was written by this crate.
pub fn is_generated(content: &str) -> bool {
    content.lines().take(4).any(|l| l.trim() == GENERATOR_MARKER)
}

/// Parse the `Dialogue` events of an ASS or SSA script into captions.
///
/// Event fields follow the `Format:` line of the `[Events]` section, or the
/// v4+ layout when it has none. `Comment:` events and other sections are
/// skipped.
pub fn parse(content: &str) -> Result<Vec<Caption>> {
    let content = content.trim_start_matches('\u{feff}');
    let mut in_events = false;
    let mut fields: Vec<String> = EVENT_FIELDS.iter().map(|f| f.to_string()).collect();
    let mut captions = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.starts_with('[') {
            in_events = line.eq_ignore_ascii_case("[Events]");
            continue;
        }
        if !in_events {
            continue;
        }

        if let Some(format) = line.strip_prefix("Format:") {
            fields = format.split(',').map(|f| f.trim().to_string()).collect();
        } else if let Some(event) = line.strip_prefix("Dialogue:") {
            let caption = parse_dialogue(event, &fields).map_err(|reason| {
                SubglossError::subtitle(format!("Line {}: {reason}", line_num + 1))
            })?;
            captions.push(caption);
        }
    }

    Ok(captions)
}

fn parse_dialogue(event: &str, fields: &[String]) -> std::result::Result<Caption, String> {
    // the text field is last and may itself contain commas
    let values: Vec<&str> = event.splitn(fields.len(), ',').collect();
    let value = |name: &str| {
        fields
            .iter()
            .position(|f| f.eq_ignore_ascii_case(name))
            .and_then(|i| values.get(i))
            .copied()
            .ok_or_else(|| format!("Dialogue event has no {name} field"))
    };

    let start = value("Start")?;
    let end = value("End")?;
    let text = value("Text")?;

    Ok(Caption::new(parse_time(start)?, parse_time(end)?, plain_text(text)))
}

/// Parse `H:MM:SS.cc`.
fn parse_time(value: &str) -> std::result::Result<Timestamp, String> {
    let invalid = || format!("Invalid event time {value:?}");
    let caps = TIME_RE.captures(value).ok_or_else(invalid)?;
    let num = |i: usize| caps[i].parse::<u64>().ok();
    let fraction = &caps[4];
    // "5" means 500 ms, "05" means 50 ms
    let millis = num(4).map(|v| v * 10u64.pow(3 - fraction.len() as u32));

    num(1)
        .zip(num(2))
        .zip(num(3).zip(millis))
        .and_then(|((h, m), (s, ms))| Timestamp::from_parts(h, m, s, ms))
        .ok_or_else(invalid)
}

/// Event text without override blocks, with ASS breaks as newlines.
fn plain_text(text: &str) -> String {
    OVERRIDE_RE
        .replace_all(text, "")
        .replace("\\N", "\n")
        .replace("\\n", "\n")
        .replace("\\h", " ")
        .trim()
        .to_string()
}

/// ASS time: `H:MM:SS.cc` (centiseconds).
pub fn format_time(ts: Timestamp) -> String {
    format!(
        "{}:{:02}:{:02}.{:02}",
        ts.hours(),
        ts.minutes(),
        ts.seconds(),
        ts.millis() / 10
    )
}

/// ASS line breaks are `\N`.
fn event_text(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join("\\N")
}

fn push_event(out: &mut String, caption: &Caption, style: &str, text: &str) {
    // writing into a String cannot fail
    let _ = writeln!(
        out,
        "Dialogue: 0,{},{},{},,0,0,0,,{}",
        format_time(caption.start),
        format_time(caption.end),
        style,
        text
    );
}

/// Render captions as a complete ASS script.
pub fn render(captions: &[Caption], styles: &AssStyles) -> String {
    let mut out = styles.header();

    for caption in captions {
        push_event(&mut out, caption, "Default", &event_text(&caption.styled_text()));
        if caption.is_annotated() {
            push_event(&mut out, caption, "Annotation", &caption.annotations.join("\\N"));
        }
    }

    out
}
