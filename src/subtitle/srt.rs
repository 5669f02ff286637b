//! SubRip (`.srt`) reader.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, SubglossError};
use crate::subtitle::{Caption, Timestamp};

static TIMING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(\d+):(\d{1,2}):(\d{1,2})[,.](\d{1,3})\s*-->\s*(\d+):(\d{1,2}):(\d{1,2})[,.](\d{1,3})",
    )
    .expect("valid timing regex")
});

/// Parse SRT content into captions.
///
/// Blocks are separated by blank lines. The numeric counter line is
/// optional; the timing line is required.
pub fn parse(content: &str) -> Result<Vec<Caption>> {
    let content = content.trim_start_matches('\u{feff}').replace("\r\n", "\n");
    let mut captions = Vec::new();

    for (block_num, block) in content
        .split("\n\n")
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .enumerate()
    {
        let mut lines = block.lines();
        let mut timing = lines.next().unwrap_or_default();
        if !TIMING_RE.is_match(timing) {
            timing = lines.next().unwrap_or_default();
        }

        let (start, end) = parse_timing(timing).ok_or_else(|| {
            SubglossError::subtitle(format!(
                "Caption block {} has no valid timing line: {:?}",
                block_num + 1,
                block.lines().next().unwrap_or_default()
            ))
        })?;

        let text = lines.collect::<Vec<_>>().join("\n");
        captions.push(Caption::new(start, end, text));
    }

    Ok(captions)
}

fn parse_timing(line: &str) -> Option<(Timestamp, Timestamp)> {
    let caps = TIMING_RE.captures(line)?;
    let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok());
    let millis = |i: usize| {
        let digits = caps.get(i)?.as_str();
        // "5" means 500 ms, "05" means 50 ms
        let value: u64 = digits.parse().ok()?;
        Some(value * 10u64.pow(3 - digits.len() as u32))
    };

    let start = Timestamp::from_parts(num(1)?, num(2)?, num(3)?, millis(4)?)?;
    let end = Timestamp::from_parts(num(5)?, num(6)?, num(7)?, millis(8)?)?;
    Some((start, end))
}
