//! Japanese script classification helpers.

/// Unicode Hiragana block.
const HIRAGANA: std::ops::RangeInclusive<char> = '\u{3040}'..='\u{309F}';

/// Unicode Katakana block (includes the prolonged sound mark `ー`).
const KATAKANA: std::ops::RangeInclusive<char> = '\u{30A0}'..='\u{30FF}';

pub fn is_hiragana(c: char) -> bool {
    HIRAGANA.contains(&c)
}

pub fn is_katakana(c: char) -> bool {
    KATAKANA.contains(&c)
}

/// True when `text` is non-empty and made only of hiragana.
pub fn is_all_hiragana(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_hiragana)
}

/// True when `text` is non-empty and made only of katakana.
pub fn is_all_katakana(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_katakana)
}

/// Length in characters, not bytes.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hiragana() {
        assert!(is_all_hiragana("ですね"));
        assert!(!is_all_hiragana("食べる"));
        assert!(!is_all_hiragana("カタ"));
        assert!(!is_all_hiragana(""));
    }

    #[test]
    fn test_katakana() {
        assert!(is_all_katakana("コーヒー"));
        assert!(!is_all_katakana("コーヒーを"));
        assert!(!is_all_katakana(""));
    }

    #[test]
    fn test_char_len() {
        assert_eq!(char_len("まして"), 3);
        assert_eq!(char_len("abc"), 3);
    }
}
