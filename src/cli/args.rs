//! Command line argument parsing for the subgloss CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::AnnotationConfig;

/// subgloss - Annotate Japanese subtitles with dictionary glosses
#[derive(Parser, Debug, Clone)]
#[command(name = "subgloss")]
#[command(about = "Annotate Japanese subtitles with dictionary glosses")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SubglossArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SubglossArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Annotate subtitle files and write .ass files next to them
    Annotate(AnnotateArgs),

    /// Show the glosses found for a single sentence
    Lookup(LookupArgs),

    /// Validate a configuration file
    #[command(name = "check-config")]
    CheckConfig(CheckConfigArgs),
}

/// Arguments for annotating subtitle files
#[derive(Parser, Debug, Clone)]
pub struct AnnotateArgs {
    /// Subtitle file or directory searched recursively for .srt/.ass/.ssa files
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Directory for the generated .ass files (default: next to each input)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Number of worker threads (default: number of CPUs)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Annotate but do not write any file
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub annotation: AnnotationOptions,
}

/// Arguments for looking up a sentence
#[derive(Parser, Debug, Clone)]
pub struct LookupArgs {
    /// Sentence to annotate
    #[arg(value_name = "SENTENCE")]
    pub sentence: String,

    #[command(flatten)]
    pub annotation: AnnotationOptions,
}

/// Arguments for checking a configuration file
#[derive(Parser, Debug, Clone)]
pub struct CheckConfigArgs {
    /// Configuration file (JSON)
    #[arg(value_name = "CONFIG_FILE")]
    pub config: PathBuf,
}

/// Options shared by the commands that run the annotation pipeline
#[derive(Args, Debug, Clone)]
pub struct AnnotationOptions {
    /// Dictionary file (JSON array of entries)
    #[arg(short, long, value_name = "DICT_FILE", env = "SUBGLOSS_DICTIONARY")]
    pub dictionary: PathBuf,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Morphological analyzer
    #[arg(short, long, default_value = "mecab")]
    pub tokenizer: TokenizerKind,

    /// mecab executable
    #[arg(long, default_value = "mecab")]
    pub mecab_path: PathBuf,

    /// mecab system dictionary directory (must be UniDic)
    #[arg(long, value_name = "DIR")]
    pub mecab_dict: Option<PathBuf>,

    /// User dictionary of extra words such as proper nouns
    /// (compiled .dic for mecab, .csv or .bin for lindera)
    #[arg(short = 'u', long, value_name = "FILE")]
    pub user_dict: Option<PathBuf>,

    /// Words never glossed (comma-separated, added to the config file's list)
    #[arg(long, value_delimiter = ',')]
    pub ignore_words: Vec<String>,

    /// Frequency ranks never glossed (comma-separated, replaces the config file's list)
    #[arg(long, value_delimiter = ',')]
    pub ignore_frequencies: Option<Vec<u32>>,

    /// Only show the lemma matching the subtitle word
    #[arg(long)]
    pub hide_other_lemmas: bool,

    /// Highlight colors as #RRGGBB (comma-separated, replaces the config file's list)
    #[arg(long, value_delimiter = ',')]
    pub colors: Option<Vec<String>>,
}

impl AnnotationOptions {
    /// Load the config file (or defaults) and apply command line overrides.
    pub fn load_config(&self) -> crate::error::Result<AnnotationConfig> {
        let mut config = match &self.config {
            Some(path) => AnnotationConfig::load_from_file(path)?,
            None => AnnotationConfig::default(),
        };

        config.ignore_words.extend(self.ignore_words.iter().cloned());
        if let Some(frequencies) = &self.ignore_frequencies {
            config.ignore_frequencies = frequencies.clone();
        }
        if self.hide_other_lemmas {
            config.display_other_lemmas = false;
        }
        if let Some(colors) = &self.colors {
            config.highlight_colors = colors.clone();
        }

        Ok(config)
    }
}

/// Morphological analyzers available to the CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerKind {
    /// External mecab process with a UniDic dictionary
    Mecab,
    /// Embedded lindera analyzer (requires the `lindera` feature)
    Lindera,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity() {
        let args = SubglossArgs::try_parse_from(["subgloss", "check-config", "c.json"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args =
            SubglossArgs::try_parse_from(["subgloss", "-vvv", "check-config", "c.json"]).unwrap();
        assert_eq!(args.verbosity(), 3);

        let args = SubglossArgs::try_parse_from(["subgloss", "--quiet", "-v", "check-config", "c.json"])
            .unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args = SubglossArgs::try_parse_from(["subgloss", "--format", "json", "check-config", "c.json"])
            .unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_annotate_args() {
        let args = SubglossArgs::try_parse_from([
            "subgloss",
            "annotate",
            "/subs",
            "--dictionary",
            "dict.json",
            "--ignore-frequencies",
            "1,2",
            "--colors",
            "#FF0000,#00FF00",
            "--hide-other-lemmas",
            "-j",
            "4",
            "--user-dict",
            "names.dic",
        ])
        .unwrap();

        let Command::Annotate(annotate) = args.command else {
            panic!("Expected Annotate command");
        };
        assert_eq!(annotate.path, PathBuf::from("/subs"));
        assert_eq!(annotate.threads, Some(4));
        assert_eq!(annotate.annotation.tokenizer, TokenizerKind::Mecab);
        assert_eq!(annotate.annotation.user_dict, Some(PathBuf::from("names.dic")));

        let config = annotate.annotation.load_config().unwrap();
        assert_eq!(config.ignore_frequencies, vec![1, 2]);
        assert_eq!(config.highlight_colors, vec!["#FF0000", "#00FF00"]);
        assert!(!config.display_other_lemmas);
    }

    #[test]
    fn test_lookup_requires_dictionary() {
        let result = SubglossArgs::try_parse_from(["subgloss", "lookup", "猫が好き"]);
        // the dictionary may come from the environment
        if std::env::var_os("SUBGLOSS_DICTIONARY").is_none() {
            assert!(result.is_err());
        }
    }
}
