//! Integration tests for annotating subtitle files on disk

use std::fs;
use std::sync::Arc;

use subgloss::cli::commands::{annotate_file, collect_subtitle_files, output_path};
use subgloss::prelude::*;
use subgloss::subtitle::ass::AssStyles;
use tempfile::TempDir;

/// Every whitespace-separated word is a common noun.
struct NounTokenizer;

impl MorphTokenizer for NounTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<RawToken>> {
        Ok(text
            .split_whitespace()
            .map(|w| RawToken::new(w, None, FeaturePair::new("名詞", "普通名詞")))
            .collect())
    }

    fn name(&self) -> &'static str {
        "noun"
    }
}

const DICTIONARY_JSON: &str = r#"[
    {"lemmas": ["猫"], "senses": ["cat"], "frequency": 3, "pronunciations": ["ねこ"]},
    {"lemmas": ["犬"], "senses": ["dog"]}
]"#;

fn annotator(dir: &TempDir) -> Result<Annotator> {
    let path = dir.path().join("dictionary.json");
    fs::write(&path, DICTIONARY_JSON)?;
    let dictionary = MemoryDictionary::load_from_file(&path)?;
    assert_eq!(dictionary.len(), 2);

    Annotator::new(
        Arc::new(NounTokenizer),
        Arc::new(dictionary),
        &AnnotationSettings::default(),
    )
}

#[test]
fn test_srt_annotated_to_ass() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let annotator = annotator(&dir)?;

    let input = dir.path().join("episode.srt");
    fs::write(
        &input,
        "1\n00:00:01,000 --> 00:00:02,000\n猫 と\n\n2\n00:00:03,000 --> 00:00:04,500\n鳥\n",
    )?;
    let output = output_path(&input, None);

    let result = annotate_file(&annotator, &AssStyles::default(), &input, &output, false)?;

    assert_eq!(result.captions, 2);
    assert_eq!(result.annotated_captions, 1);
    assert_eq!(result.output.as_deref(), Some(&*output.to_string_lossy()));

    let script = fs::read_to_string(&output)?;
    assert!(script.starts_with("[Script Info]"));
    assert!(script.contains("Dialogue: 0,0:00:01.00,0:00:02.00,Annotation,,0,0,0,,★ "));
    assert!(script.contains("[ねこ]"));
    // the first palette color #FFC107 in ASS byte order
    assert!(script.contains(
        "Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,{\\c&H07C1FF&}猫{\\c} と\n"
    ));
    assert!(script.contains("Dialogue: 0,0:00:03.00,0:00:04.50,Default,,0,0,0,,鳥\n"));
    Ok(())
}

#[test]
fn test_ass_input_annotated_next_to_it() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let annotator = annotator(&dir)?;

    let input = dir.path().join("episode.ass");
    fs::write(
        &input,
        "[Script Info]
ScriptType: v4.00+

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,{\\i1}犬{\\i0} と
Dialogue: 0,0:00:03.00,0:00:04.00,Default,,0,0,0,,鳥
",
    )?;
    let output = output_path(&input, None);
    assert_eq!(output, dir.path().join("episode.annotated.ass"));

    let styles = AssStyles {
        annotation: "Noto Sans CJK JP,30,&H00FFFFFF,&H000000FF,&H00000000,&H80000000,0,0,0,0,100,100,0,0,1,1,0,7,20,20,20,1"
            .to_string(),
        ..AssStyles::default()
    };
    let result = annotate_file(&annotator, &styles, &input, &output, false)?;

    assert_eq!(result.captions, 2);
    assert_eq!(result.annotated_captions, 1);
    assert!(!result.skipped);

    let script = fs::read_to_string(&output)?;
    assert!(script.contains("\nStyle: Annotation,Noto Sans CJK JP,30,"));
    assert!(script.contains("Dialogue: 0,0:00:01.00,0:00:02.00,Annotation,,0,0,0,,★ "));
    assert!(script.contains("Default,,0,0,0,,{\\c&H07C1FF&}犬{\\c} と\n"));

    // a second run leaves the generated script alone
    let again = annotate_file(
        &annotator,
        &styles,
        &output,
        &output_path(&output, None),
        false,
    )?;
    assert!(again.skipped);
    assert!(again.output.is_none());
    assert!(!dir.path().join("episode.annotated.annotated.ass").exists());
    Ok(())
}

#[test]
fn test_unsupported_extension_is_reported() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let annotator = annotator(&dir)?;

    let input = dir.path().join("episode.vtt");
    fs::write(&input, "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\n猫\n")?;

    let result = annotate_file(
        &annotator,
        &AssStyles::default(),
        &input,
        &output_path(&input, None),
        false,
    );

    assert!(matches!(result, Err(SubglossError::Subtitle(_))));
    Ok(())
}

#[test]
fn test_nothing_written_without_matches() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let annotator = annotator(&dir)?;

    let input = dir.path().join("quiet.srt");
    fs::write(&input, "1\n00:00:01,000 --> 00:00:02,000\n鳥\n")?;
    let output = output_path(&input, None);

    let result = annotate_file(&annotator, &AssStyles::default(), &input, &output, false)?;

    assert_eq!(result.annotated_captions, 0);
    assert!(result.output.is_none());
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_dry_run_writes_nothing() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let annotator = annotator(&dir)?;

    let input = dir.path().join("episode.srt");
    fs::write(&input, "1\n00:00:01,000 --> 00:00:02,000\n犬\n")?;
    let output = output_path(&input, Some(&dir.path().join("out")));

    let result = annotate_file(&annotator, &AssStyles::default(), &input, &output, true)?;

    assert_eq!(result.annotated_captions, 1);
    assert!(result.output.is_none());
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_directory_scan_and_output_dir() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let annotator = annotator(&dir)?;

    let season = dir.path().join("season");
    fs::create_dir(&season)?;
    fs::write(season.join("ep1.srt"), "00:00:01,000 --> 00:00:02,000\n犬\n")?;
    fs::write(season.join("ep2.srt"), "00:00:01,000 --> 00:00:02,000\n猫\n")?;

    let out_dir = dir.path().join("out");
    let inputs = collect_subtitle_files(dir.path())?;
    assert_eq!(inputs.len(), 2);

    for input in &inputs {
        let output = output_path(input, Some(&out_dir));
        annotate_file(&annotator, &AssStyles::default(), input, &output, false)?;
    }

    assert!(out_dir.join("ep1.ass").exists());
    assert!(out_dir.join("ep2.ass").exists());
    Ok(())
}

#[test]
fn test_malformed_subtitle_is_reported() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let annotator = annotator(&dir)?;

    let input = dir.path().join("broken.srt");
    fs::write(&input, "1\nthis is not a timing line\n猫\n")?;

    let output = output_path(&input, None);
    let result = annotate_file(&annotator, &AssStyles::default(), &input, &output, false);

    assert!(matches!(result, Err(SubglossError::Subtitle(_))));
    Ok(())
}
