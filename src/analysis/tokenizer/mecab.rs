//! MeCab process adapter.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::debug;

use crate::analysis::token::RawToken;
use crate::analysis::tokenizer::{MorphTokenizer, raw_token_from_unidic};
use crate::error::{Result, SubglossError};

/// Marker line MeCab prints after each analyzed sentence.
const END_OF_SENTENCE: &str = "EOS";

/// Output formats forced on MeCab so the dictionary's `dicrc` cannot change
/// the layout: `surface<TAB>full,feature,csv` per node, `EOS` per sentence.
/// MeCab expands the `\t`/`\n` escapes itself.
const OUTPUT_FORMAT_ARGS: &[&str] = &[
    "--node-format=%m\\t%H\\n",
    "--unk-format=%m\\t%H\\n",
    "--eos-format=EOS\\n",
];

/// Runs the `mecab` command on each caption.
///
/// The dictionary must use the UniDic feature layout (`unidic` or
/// `unidic-cwj`), otherwise the part-of-speech table will resolve most
/// tokens to `UNKNOWN`.
#[derive(Clone, Debug)]
pub struct MecabTokenizer {
    program: PathBuf,
    dictionary_dir: Option<PathBuf>,
    user_dictionary: Option<PathBuf>,
}

impl Default for MecabTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MecabTokenizer {
    /// Use `mecab` from `PATH` with its configured default dictionary.
    pub fn new() -> Self {
        MecabTokenizer {
            program: PathBuf::from("mecab"),
            dictionary_dir: None,
            user_dictionary: None,
        }
    }

    /// Set the mecab executable.
    pub fn program<P: Into<PathBuf>>(mut self, program: P) -> Self {
        self.program = program.into();
        self
    }

    /// Set the system dictionary directory (`mecab -d`).
    pub fn dictionary_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.dictionary_dir = Some(dir.into());
        self
    }

    /// Set a compiled user dictionary (`mecab -u`), e.g. for proper nouns.
    pub fn user_dictionary<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.user_dictionary = Some(path.into());
        self
    }

    pub fn get_user_dictionary(&self) -> Option<&Path> {
        self.user_dictionary.as_deref()
    }

    /// The process invocation used for every caption.
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(OUTPUT_FORMAT_ARGS);
        if let Some(dir) = &self.dictionary_dir {
            command.arg("-d").arg(dir);
        }
        if let Some(path) = &self.user_dictionary {
            command.arg("-u").arg(path);
        }
        command
    }

    /// Parse the output produced with the forced node format.
    ///
    /// Each line is `surface<TAB>f1,f2,...`; a line holding only `EOS`
    /// terminates a sentence.
    pub fn parse_output(output: &str) -> Result<Vec<RawToken>> {
        let mut tokens = Vec::new();

        for (line_num, line) in output.lines().enumerate() {
            if line.is_empty() || line == END_OF_SENTENCE {
                continue;
            }
            let (surface, features) = line.split_once('\t').ok_or_else(|| {
                SubglossError::tokenization(format!(
                    "Malformed analyzer output on line {}: {line}",
                    line_num + 1
                ))
            })?;
            let fields: Vec<&str> = features.split(',').collect();
            tokens.push(raw_token_from_unidic(surface, &fields));
        }

        Ok(tokens)
    }
}

impl MorphTokenizer for MecabTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<RawToken>> {
        // mecab treats every input line as a sentence
        let input = text.replace(['\r', '\n'], " ");

        let mut child = self
            .command()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                SubglossError::tokenization(format!(
                    "Failed to start {}: {e}",
                    self.program.display()
                ))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input.as_bytes())
                .and_then(|()| stdin.write_all(b"\n"))
                .map_err(|e| {
                    SubglossError::tokenization(format!(
                        "Failed to write to {}: {e}",
                        self.program.display()
                    ))
                })?;
        }

        let output = child.wait_with_output().map_err(|e| {
            SubglossError::tokenization(format!(
                "Failed to read from {}: {e}",
                self.program.display()
            ))
        })?;
        if !output.status.success() {
            return Err(SubglossError::tokenization(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| SubglossError::tokenization(format!("Non UTF-8 analyzer output: {e}")))?;
        let tokens = Self::parse_output(&stdout)?;
        debug!("mecab produced {} tokens for {:?}", tokens.len(), text);

        Ok(tokens)
    }

    fn name(&self) -> &'static str {
        "mecab"
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use super::*;
    use crate::analysis::normalizer::TextNormalizer;
    use crate::analysis::token::{FeaturePair, PosTag};

    fn args(tokenizer: &MecabTokenizer) -> Vec<String> {
        tokenizer
            .command()
            .get_args()
            .map(OsStr::to_string_lossy)
            .map(|a| a.into_owned())
            .collect()
    }

    #[test]
    fn test_parse_output() {
        let output = "\
猫\t名詞,普通名詞,一般,*,*,*,ネコ,猫,猫,ネコ,猫,ネコ,和
が\t助詞,格助詞,*,*,*,*,ガ,が,が,ガ,が,ガ,和
鳴い\t動詞,一般,*,*,五段-カ行,連用形-イ音便,ナク,鳴く,鳴い,ナイ,鳴く,ナク,和
た\t助動詞,*,*,*,助動詞-タ,終止形-一般,タ,た,た,タ,た,タ,和
EOS
";
        let tokens = MecabTokenizer::parse_output(output).unwrap();

        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].surface, "猫");
        assert_eq!(tokens[0].features, FeaturePair::new("名詞", "普通名詞"));
        assert_eq!(tokens[2].surface, "鳴い");
        assert_eq!(tokens[2].lemma.as_deref(), Some("鳴く"));
        assert_eq!(tokens[3].features.coarse, "助動詞");
    }

    #[test]
    fn test_command_forces_output_format() {
        let tokenizer = MecabTokenizer::new().program("/opt/mecab/bin/mecab");
        let command = tokenizer.command();

        assert_eq!(command.get_program(), "/opt/mecab/bin/mecab");
        assert_eq!(
            args(&tokenizer),
            vec![
                "--node-format=%m\\t%H\\n",
                "--unk-format=%m\\t%H\\n",
                "--eos-format=EOS\\n",
            ]
        );
    }

    #[test]
    fn test_command_dictionary_options() {
        let tokenizer = MecabTokenizer::new()
            .dictionary_dir("/usr/lib/mecab/dic/unidic")
            .user_dictionary("/home/me/names.dic");

        let args = args(&tokenizer);
        assert_eq!(args.len(), 7);
        assert!(args[0].starts_with("--node-format="));
        assert_eq!(
            &args[3..],
            &["-d", "/usr/lib/mecab/dic/unidic", "-u", "/home/me/names.dic"]
        );
        assert_eq!(
            tokenizer.get_user_dictionary(),
            Some(Path::new("/home/me/names.dic"))
        );
    }

    #[test]
    fn test_forced_format_output_normalizes_verb() {
        // what mecab prints for 食べて with the forced node format and UniDic
        let output = "\
食べ\t動詞,一般,*,*,下一段-バ行,連用形-一般,タベル,食べる,食べ,タベ,食べる,タベル,和
て\t助詞,接続助詞,*,*,*,*,テ,て,て,テ,て,テ,和
EOS
";
        let raw = MecabTokenizer::parse_output(output).unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0].lemma.as_deref(), Some("食べる"));

        let tokens = TextNormalizer::new().normalize(&raw);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text_form, "食べて");
        assert_eq!(tokens[0].lemma.as_deref(), Some("食べる"));
        assert_eq!(tokens[0].pos, PosTag::Verb);
    }

    #[test]
    fn test_parse_unknown_word_short_features() {
        // unknown words only carry the unk.def columns
        let tokens = MecabTokenizer::parse_output("ニャンコ\t名詞,普通名詞,一般,*,*,*\nEOS\n").unwrap();

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].surface, "ニャンコ");
        assert_eq!(tokens[0].lemma, None);
        assert_eq!(tokens[0].features, FeaturePair::new("名詞", "普通名詞"));
    }

    #[test]
    fn test_parse_malformed_output() {
        let result = MecabTokenizer::parse_output("猫 名詞\nEOS\n");
        assert!(matches!(result, Err(SubglossError::Tokenization(_))));
    }

    #[test]
    fn test_missing_program_is_tokenization_error() {
        let tokenizer = MecabTokenizer::new().program("/nonexistent/subgloss-mecab");
        let result = tokenizer.tokenize("猫");
        assert!(matches!(result, Err(SubglossError::Tokenization(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program_is_tokenization_error() {
        // exits without reading its input, so the write may also fail
        let tokenizer = MecabTokenizer::new().program("false");
        let result = tokenizer.tokenize(&"猫が好き。".repeat(20_000));
        assert!(matches!(result, Err(SubglossError::Tokenization(_))));
    }

    #[test]
    fn test_tokenizer_name() {
        assert_eq!(MecabTokenizer::new().name(), "mecab");
    }
}
