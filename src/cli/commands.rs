//! Command implementations for the subgloss CLI.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};

use crate::analysis::tokenizer::MorphTokenizer;
use crate::analysis::tokenizer::mecab::MecabTokenizer;
use crate::annotation::pipeline::Annotator;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::AnnotationSettings;
use crate::dictionary::memory::MemoryDictionary;
use crate::error::{Result, SubglossError};
use crate::subtitle::ass::{self, AssStyles};
use crate::subtitle::{SubtitleFile, SubtitleFormat};

/// Extension of the generated files.
const OUTPUT_EXTENSION: &str = "ass";

/// Extension used instead when the output would overwrite its input.
const ANNOTATED_EXTENSION: &str = "annotated.ass";

/// Execute a CLI command.
pub fn execute_command(args: SubglossArgs) -> Result<()> {
    match &args.command {
        Command::Annotate(annotate_args) => annotate(annotate_args.clone(), &args),
        Command::Lookup(lookup_args) => lookup(lookup_args.clone(), &args),
        Command::CheckConfig(check_args) => check_config(check_args.clone(), &args),
    }
}

/// Annotate every subtitle file under a path.
fn annotate(args: AnnotateArgs, cli_args: &SubglossArgs) -> Result<()> {
    let start_time = Instant::now();
    let inputs = collect_subtitle_files(&args.path)?;
    if inputs.is_empty() {
        warn!("no subtitle files found under {}", args.path.display());
    }

    let settings = args.annotation.load_config()?.validate()?;
    let annotator = build_annotator(&args.annotation, &settings)?;

    let threads = match args.threads {
        Some(0) => return Err(SubglossError::invalid_argument("--threads must be at least 1")),
        Some(n) => n,
        None => num_cpus::get(),
    };
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("subgloss-annotate-{i}"))
        .build()
        .map_err(|e| SubglossError::other(format!("Failed to create thread pool: {e}")))?;
    debug!("annotating {} files with {} threads", inputs.len(), threads);

    let mut files = Vec::new();
    let mut failed_files = Vec::new();
    pool.install(|| {
        for input in &inputs {
            let output = output_path(input, args.output_dir.as_deref());
            match annotate_file(
                &annotator,
                &settings.subtitle_styles,
                input,
                &output,
                args.dry_run,
            ) {
                Ok(result) => files.push(result),
                Err(e) => {
                    warn!("{}: {}", input.display(), e);
                    failed_files.push(FailedFile {
                        input: input.to_string_lossy().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }
    });

    let failed = failed_files.len();
    let result = AnnotationRunResult {
        files_written: files.iter().filter(|f| f.output.is_some()).count(),
        files,
        failed_files,
        duration_ms: start_time.elapsed().as_millis() as u64,
    };
    output_result("Annotation finished", &result, cli_args)?;

    if failed > 0 {
        return Err(SubglossError::other(format!(
            "{failed} of {} files could not be annotated",
            inputs.len()
        )));
    }
    Ok(())
}

/// Annotate one SRT or ASS file and write the ASS file if anything was
/// annotated.
///
/// Nothing is written when no caption received a gloss or on a dry run.
/// Scripts generated by a previous run are skipped.
pub fn annotate_file(
    annotator: &Annotator,
    styles: &AssStyles,
    input: &Path,
    output: &Path,
    dry_run: bool,
) -> Result<FileAnnotationResult> {
    let format = SubtitleFormat::from_path(input).ok_or_else(|| {
        SubglossError::subtitle(format!(
            "Unsupported subtitle file {} (expected .srt, .ass or .ssa)",
            input.display()
        ))
    })?;
    let content = fs::read_to_string(input)?;
    if format == SubtitleFormat::Ass && ass::is_generated(&content) {
        info!("{}: already annotated, skipping", input.display());
        return Ok(FileAnnotationResult {
            input: input.to_string_lossy().to_string(),
            output: None,
            captions: 0,
            annotated_captions: 0,
            skipped: true,
        });
    }

    let mut subtitles = SubtitleFile::parse(&content, format)?;
    let annotated = annotator.annotate_container(&mut subtitles)?;

    let written = if annotated > 0 && !dry_run {
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(output, subtitles.to_ass(styles))?;
        info!("{} -> {}", input.display(), output.display());
        Some(output.to_string_lossy().to_string())
    } else {
        debug!(
            "{}: {} annotated captions, nothing written",
            input.display(),
            annotated
        );
        None
    };

    Ok(FileAnnotationResult {
        input: input.to_string_lossy().to_string(),
        output: written,
        captions: subtitles.captions().len(),
        annotated_captions: annotated,
        skipped: false,
    })
}

/// Show tokens, matches and gloss lines for one sentence.
fn lookup(args: LookupArgs, cli_args: &SubglossArgs) -> Result<()> {
    let settings = args.annotation.load_config()?.validate()?;
    let annotator = build_annotator(&args.annotation, &settings)?;
    let result = lookup_sentence(&annotator, &args.sentence)?;

    output_result("Lookup results", &result, cli_args)
}

/// Tokens, accepted matches and gloss lines of one sentence, from a single
/// analyzer run.
pub fn lookup_sentence(annotator: &Annotator, sentence: &str) -> Result<LookupResult> {
    let tokens = annotator.tokens(sentence)?;
    let matches = annotator.matches_in(&tokens);
    let annotation = annotator.annotate_matches(&matches);

    Ok(LookupResult {
        sentence: sentence.to_string(),
        tokens: tokens.iter().map(ToString::to_string).collect(),
        matches: matches
            .iter()
            .map(|m| MatchReport {
                text_form: m.text_form(),
                canonical_form: m.canonical_form(),
                tokens: m.tokens().iter().map(ToString::to_string).collect(),
                entries: m.entries().len(),
            })
            .collect(),
        lines: annotation.lines,
    })
}

/// Load and validate a configuration file.
fn check_config(args: CheckConfigArgs, cli_args: &SubglossArgs) -> Result<()> {
    let config = crate::config::AnnotationConfig::load_from_file(&args.config)?;
    let settings = config.validate()?;

    let mut ignore_frequencies: Vec<u32> = settings.ignore_frequencies.iter().copied().collect();
    ignore_frequencies.sort_unstable();

    output_result(
        "Configuration is valid",
        &ConfigCheckResult {
            path: args.config.to_string_lossy().to_string(),
            ignore_words: settings.ignore_words.len(),
            ignore_frequencies,
            display_other_lemmas: settings.display_other_lemmas,
            highlight_colors: settings
                .highlight_colors
                .iter()
                .map(ToString::to_string)
                .collect(),
            extra_verb_fragments: settings.extra_verb_fragments,
        },
        cli_args,
    )
}

/// Build the annotator described by the shared command options.
pub fn build_annotator(
    options: &AnnotationOptions,
    settings: &AnnotationSettings,
) -> Result<Annotator> {
    let tokenizer = build_tokenizer(options)?;
    let dictionary = MemoryDictionary::load_from_file(&options.dictionary)?;
    info!(
        "using {} tokenizer, {} dictionary entries",
        tokenizer.name(),
        dictionary.len()
    );

    Annotator::new(tokenizer, Arc::new(dictionary), settings)
}

fn build_tokenizer(options: &AnnotationOptions) -> Result<Arc<dyn MorphTokenizer>> {
    match options.tokenizer {
        TokenizerKind::Mecab => Ok(Arc::new(mecab_tokenizer(options))),
        #[cfg(feature = "lindera")]
        TokenizerKind::Lindera => {
            use crate::analysis::tokenizer::lindera::LinderaTokenizer;
            let user_dict = options.user_dict.as_deref().map(Path::to_string_lossy);
            Ok(Arc::new(LinderaTokenizer::new(
                "normal",
                "embedded://unidic",
                user_dict.as_deref(),
            )?))
        }
        #[cfg(not(feature = "lindera"))]
        TokenizerKind::Lindera => Err(SubglossError::configuration(
            "the lindera tokenizer requires building with the `lindera` feature",
        )),
    }
}

fn mecab_tokenizer(options: &AnnotationOptions) -> MecabTokenizer {
    let mut tokenizer = MecabTokenizer::new().program(&options.mecab_path);
    if let Some(dir) = &options.mecab_dict {
        tokenizer = tokenizer.dictionary_dir(dir);
    }
    if let Some(path) = &options.user_dict {
        tokenizer = tokenizer.user_dictionary(path);
    }
    tokenizer
}

/// Subtitle files to annotate: the path itself, or every `.srt`, `.ass` and
/// `.ssa` file below it in sorted order.
pub fn collect_subtitle_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    let mut pending = vec![path.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let entry_path = entry?.path();
            if entry_path.is_dir() {
                pending.push(entry_path);
            } else if SubtitleFormat::from_path(&entry_path).is_some() {
                files.push(entry_path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Where the annotated version of `input` is written.
///
/// An `.ass` input is never overwritten: its output becomes
/// `name.annotated.ass`.
pub fn output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let in_place = |extension: &str| {
        let file_name = input.with_extension(extension);
        match (output_dir, file_name.file_name()) {
            (Some(dir), Some(name)) => dir.join(name),
            _ => file_name,
        }
    };

    let output = in_place(OUTPUT_EXTENSION);
    if output == input {
        in_place(ANNOTATED_EXTENSION)
    } else {
        output
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use clap::Parser;

    use super::*;
    use crate::analysis::token::{FeaturePair, RawToken};
    use crate::dictionary::DictionaryEntry;

    /// Every word is a noun; counts analyzer runs.
    #[derive(Default)]
    struct CountingTokenizer {
        calls: AtomicUsize,
    }

    impl MorphTokenizer for CountingTokenizer {
        fn tokenize(&self, text: &str) -> Result<Vec<RawToken>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(text
                .split_whitespace()
                .map(|w| RawToken::new(w, None, FeaturePair::new("名詞", "普通名詞")))
                .collect())
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    fn lookup_options(extra: &[&str]) -> AnnotationOptions {
        let mut argv = vec!["subgloss", "lookup", "猫", "--dictionary", "dict.json"];
        argv.extend_from_slice(extra);
        let args = SubglossArgs::try_parse_from(argv).unwrap();
        let Command::Lookup(lookup) = args.command else {
            panic!("Expected Lookup command");
        };
        lookup.annotation
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("/subs/ep01.srt"), None),
            PathBuf::from("/subs/ep01.ass")
        );
        assert_eq!(
            output_path(Path::new("/subs/ep01.srt"), Some(Path::new("/out"))),
            PathBuf::from("/out/ep01.ass")
        );
    }

    #[test]
    fn test_output_path_never_overwrites_ass_input() {
        assert_eq!(
            output_path(Path::new("/subs/ep01.ass"), None),
            PathBuf::from("/subs/ep01.annotated.ass")
        );
        assert_eq!(
            output_path(Path::new("/subs/ep01.ass"), Some(Path::new("/subs"))),
            PathBuf::from("/subs/ep01.annotated.ass")
        );
        assert_eq!(
            output_path(Path::new("/subs/ep01.ass"), Some(Path::new("/out"))),
            PathBuf::from("/out/ep01.ass")
        );
        assert_eq!(
            output_path(Path::new("/subs/old.ssa"), None),
            PathBuf::from("/subs/old.ass")
        );
    }

    #[test]
    fn test_lookup_tokenizes_once() {
        let tokenizer = Arc::new(CountingTokenizer::default());
        let dictionary = MemoryDictionary::from_entries(vec![
            DictionaryEntry::new(vec!["猫"], vec!["cat"]),
            DictionaryEntry::new(vec!["犬"], vec!["dog"]),
        ]);
        let annotator = Annotator::new(
            tokenizer.clone(),
            Arc::new(dictionary),
            &AnnotationSettings::default(),
        )
        .unwrap();

        let result = lookup_sentence(&annotator, "猫 と 犬").unwrap();

        assert_eq!(tokenizer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.tokens.len(), 3);
        assert_eq!(result.matches.len(), 2);
        assert_eq!(result.matches[0].canonical_form, "猫");
        assert_eq!(result.lines.len(), 2);
    }

    #[test]
    fn test_mecab_tokenizer_from_options() {
        let options = lookup_options(&[
            "--mecab-path",
            "/opt/mecab/bin/mecab",
            "--mecab-dict",
            "/opt/unidic",
            "--user-dict",
            "/home/me/names.dic",
        ]);
        let tokenizer = mecab_tokenizer(&options);
        let command = tokenizer.command();

        assert_eq!(command.get_program(), "/opt/mecab/bin/mecab");
        let args: Vec<&OsStr> = command.get_args().collect();
        assert_eq!(
            &args[args.len() - 4..],
            &["-d", "/opt/unidic", "-u", "/home/me/names.dic"]
        );
    }

    #[test]
    fn test_mecab_tokenizer_without_user_dict() {
        let tokenizer = mecab_tokenizer(&lookup_options(&[]));
        assert!(tokenizer.get_user_dictionary().is_none());
        assert!(!tokenizer.command().get_args().any(|a| a == "-u"));
    }

    #[test]
    fn test_collect_subtitle_files_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let season = dir.path().join("season1");
        fs::create_dir(&season).unwrap();
        fs::write(season.join("ep02.SRT"), "").unwrap();
        fs::write(season.join("ep01.srt"), "").unwrap();
        fs::write(season.join("ep03.ass"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join("movie.srt"), "").unwrap();
        fs::write(dir.path().join("old.ssa"), "").unwrap();

        let files = collect_subtitle_files(dir.path()).unwrap();
        assert_eq!(
            files,
            vec![
                dir.path().join("movie.srt"),
                dir.path().join("old.ssa"),
                season.join("ep01.srt"),
                season.join("ep02.SRT"),
                season.join("ep03.ass"),
            ]
        );
    }

    #[test]
    fn test_collect_single_file() {
        let mut file = tempfile::Builder::new().suffix(".srt").tempfile().unwrap();
        writeln!(file, "1").unwrap();

        let files = collect_subtitle_files(file.path()).unwrap();
        assert_eq!(files, vec![file.path().to_path_buf()]);
    }

    #[test]
    fn test_collect_missing_directory() {
        let result = collect_subtitle_files(Path::new("/definitely/not/here"));
        assert!(matches!(result, Err(SubglossError::Io(_))));
    }

    #[cfg(not(feature = "lindera"))]
    #[test]
    fn test_lindera_requires_feature() {
        let options = lookup_options(&["--tokenizer", "lindera"]);

        let result = build_tokenizer(&options);
        assert!(matches!(result, Err(SubglossError::Configuration(_))));
    }
}
