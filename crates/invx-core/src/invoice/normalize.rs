//! OCR noise removal.
//!
//! Two separate operations exist and must not be mixed:
//! - [`normalize_flat`] collapses the whole document onto one line for the
//!   scalar field regexes.
//! - [`normalize_lines`] keeps line boundaries for the table parser and the
//!   line-oriented heuristics.
//!
//! Neither changes letter case.

/// Punctuation that survives cleaning in both modes.
const KEPT_PUNCTUATION: [char; 4] = ['-', '/', '.', ':'];

fn is_kept(c: char, keep_percent: bool) -> bool {
    c.is_alphanumeric()
        || c.is_whitespace()
        || KEPT_PUNCTUATION.contains(&c)
        || (keep_percent && c == '%')
}

/// Replace every disallowed character with a space so neighbouring tokens
/// never merge.
fn strip_noise(raw: &str, keep_percent: bool) -> String {
    raw.chars()
        .map(|c| if is_kept(c, keep_percent) { c } else { ' ' })
        .collect()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Flatten OCR text to a single cleaned line.
pub fn normalize_flat(raw: &str) -> String {
    collapse_whitespace(&strip_noise(raw, false))
}

/// Clean OCR text line by line.
///
/// `\r\n`, `\r` and `\n` all end a line. Lines that are empty after
/// cleaning are dropped. `%` is retained so VAT rates stay readable.
pub fn normalize_lines(raw: &str) -> Vec<String> {
    raw.split(['\r', '\n'])
        .map(|line| collapse_whitespace(&strip_noise(line, true)))
        .filter(|line| !line.is_empty())
        .collect()
}

/// Both normalized forms of one OCR document, computed once per extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    flat: String,
    lines: Vec<String>,
    joined: String,
}

impl NormalizedText {
    pub fn new(raw: &str) -> Self {
        let lines = normalize_lines(raw);
        Self {
            flat: normalize_flat(raw),
            joined: lines.join("\n"),
            lines,
        }
    }

    /// Single-line form.
    pub fn flat(&self) -> &str {
        &self.flat
    }

    /// Line-preserving form.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Line-preserving form joined with `\n`, for multi-line regexes.
    pub fn joined_lines(&self) -> &str {
        &self.joined
    }

    /// Nothing usable survived cleaning.
    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flat_replaces_noise_with_space() {
        assert_eq!(normalize_flat("INVOICE#12345|DATE"), "INVOICE 12345 DATE");
        assert_eq!(normalize_flat("TRN: 100-200/300."), "TRN: 100-200/300.");
    }

    #[test]
    fn test_flat_collapses_newlines() {
        assert_eq!(
            normalize_flat("Tax  Invoice\r\n\r\nGF   Piping\rSystems\n"),
            "Tax Invoice GF Piping Systems"
        );
    }

    #[test]
    fn test_flat_is_idempotent() {
        let samples = [
            "",
            "   ",
            "A1234567890 | PVC ELBOW 90° D20 ~ EA 10.000",
            "Date: 11-JAN-2026\r\n\tTRN (100123456700003)",
            "***@@@###",
            "Ünïcödé — naïve “quotes”",
        ];

        for sample in samples {
            let once = normalize_flat(sample);
            assert_eq!(normalize_flat(&once), once, "input: {:?}", sample);
        }
    }

    #[test]
    fn test_all_noise_is_empty() {
        assert_eq!(normalize_flat("@@ ## $$ ()"), "");
        assert!(normalize_lines("|||\r\n***").is_empty());
        assert!(NormalizedText::new("~~~").is_empty());
    }

    #[test]
    fn test_lines_keep_boundaries_and_case() {
        let lines = normalize_lines("Sales Person   Payment Terms\r\nA1234567890\rItem  1.000\n\n");
        assert_eq!(
            lines,
            vec!["Sales Person Payment Terms", "A1234567890", "Item 1.000"]
        );
    }

    #[test]
    fn test_lines_keep_percent_but_flat_does_not() {
        assert_eq!(normalize_lines("VAT 5%"), vec!["VAT 5%"]);
        assert_eq!(normalize_flat("VAT 5%"), "VAT 5");
    }

    #[test]
    fn test_normalized_text_forms() {
        let text = NormalizedText::new("a|b\nc");
        assert_eq!(text.flat(), "a b c");
        assert_eq!(text.lines(), ["a b", "c"]);
        assert_eq!(text.joined_lines(), "a b\nc");
    }
}
