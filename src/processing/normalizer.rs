//! Unicode normalization applied to extracted text before any analysis

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Collapse accented characters to their base form: NFD decomposition
/// followed by removal of nonspacing combining marks.
///
/// Every downstream span index is measured against the output of this
/// function, so it must run exactly once, right after raw extraction.
pub fn strip_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_diacritics() {
        assert_eq!(strip_accents("Sami Tuğal"), "Sami Tugal");
        assert_eq!(strip_accents("résumé"), "resume");
        assert_eq!(strip_accents("Ege Üniversitesi"), "Ege Universitesi");
    }

    #[test]
    fn test_plain_ascii_unchanged() {
        let text = "John Doe works at Acme Corp.";
        assert_eq!(strip_accents(text), text);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(strip_accents(""), "");
    }
}
