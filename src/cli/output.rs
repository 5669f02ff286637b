//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, SubglossArgs};
use crate::error::Result;

/// Result for one annotated subtitle file.
#[derive(Debug, Serialize, Deserialize)]
pub struct FileAnnotationResult {
    pub input: String,
    /// Written `.ass` file; `None` when nothing was annotated or on a dry run.
    pub output: Option<String>,
    pub captions: usize,
    pub annotated_captions: usize,
    /// Script written by an earlier run, left alone.
    pub skipped: bool,
}

/// Result of the `annotate` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnnotationRunResult {
    pub files: Vec<FileAnnotationResult>,
    pub files_written: usize,
    pub failed_files: Vec<FailedFile>,
    pub duration_ms: u64,
}

/// A subtitle file that could not be annotated.
#[derive(Debug, Serialize, Deserialize)]
pub struct FailedFile {
    pub input: String,
    pub error: String,
}

/// One accepted match of a looked-up sentence.
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchReport {
    pub text_form: String,
    pub canonical_form: String,
    pub tokens: Vec<String>,
    pub entries: usize,
}

/// Result of the `lookup` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct LookupResult {
    pub sentence: String,
    pub tokens: Vec<String>,
    pub matches: Vec<MatchReport>,
    pub lines: Vec<String>,
}

/// Result of the `check-config` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigCheckResult {
    pub path: String,
    pub ignore_words: usize,
    pub ignore_frequencies: Vec<u32>,
    pub display_other_lemmas: bool,
    pub highlight_colors: Vec<String>,
    pub extra_verb_fragments: Vec<String>,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &SubglossArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &SubglossArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    for line in human_lines(&value) {
        println!("{line}");
    }
    Ok(())
}

/// Lines printed for a result in human format.
fn human_lines(value: &serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::Object(obj) => {
            let mut lines = Vec::new();
            for (key, val) in obj {
                match val {
                    serde_json::Value::Array(items)
                        if items.iter().any(serde_json::Value::is_object) =>
                    {
                        lines.push(format!("{key}:"));
                        for item in items {
                            lines.push(format!("  - {}", format_object_inline(item)));
                        }
                    }
                    _ => lines.push(format!("{key}: {}", format_value(val))),
                }
            }
            lines
        }
        _ => vec![format_value(value)],
    }
}

/// Format an object as `key=value` pairs on one line.
fn format_object_inline(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Object(obj) => obj
            .iter()
            .map(|(k, v)| format!("{k}={}", format_value(v)))
            .collect::<Vec<_>>()
            .join(" "),
        _ => format_value(value),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &SubglossArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(_) => "[object]".to_string(),
        serde_json::Value::Null => "-".to_string(),
    }
}
