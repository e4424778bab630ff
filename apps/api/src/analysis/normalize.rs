//! Text normalizer applied to extracted resume text and job descriptions.

use crate::analysis::AnalysisError;

/// Minimum normalized length (in characters) accepted for analysis.
pub const MIN_CONTENT_CHARS: usize = 50;

const ALLOWED_PUNCTUATION: &[char] = &[
    '-', '.', ',', ';', ':', '(', ')', '[', ']', '{', '}', '@', '#', '$', '%', '&', '*', '+', '=',
    '<', '>', '?', '/', '\\', '|', '\'', '"',
];

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || ALLOWED_PUNCTUATION.contains(&c)
}

/// Drops characters outside the allow-list, collapses whitespace runs to a
/// single space and trims both ends. Never fails; empty input yields "".
///
/// Filtering happens before collapsing so a removed glyph between two spaces
/// cannot leave a double space behind.
pub fn normalize_text(raw: &str) -> String {
    let filtered: String = raw
        .chars()
        .filter(|c| c.is_whitespace() || is_allowed(*c))
        .collect();
    filtered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Rejects normalized text shorter than [`MIN_CONTENT_CHARS`].
pub fn ensure_sufficient_content(normalized: &str) -> Result<(), AnalysisError> {
    let length = normalized.chars().count();
    if length < MIN_CONTENT_CHARS {
        return Err(AnalysisError::InsufficientContent {
            length,
            minimum: MIN_CONTENT_CHARS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace_runs() {
        assert_eq!(normalize_text("  a \t\n b\r\n\r\nc  "), "a b c");
    }

    #[test]
    fn test_strips_disallowed_characters() {
        assert_eq!(
            normalize_text("• Rust ★ developer — 5 years ✓"),
            "Rust developer 5 years"
        );
    }

    #[test]
    fn test_keeps_allowed_punctuation() {
        let input = r#"jane@x.com (C++/C#) [50%] {k=v} <a|b> 'q' "d" $5 & * ? \ ;:,"#;
        assert_eq!(normalize_text(input), input);
    }

    #[test]
    fn test_strips_control_characters() {
        assert_eq!(normalize_text("node\u{0}\u{7}js"), "nodejs");
    }

    #[test]
    fn test_empty_input_yields_empty_string() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text(" \n\t "), "");
    }

    #[test]
    fn test_content_minimum_boundary() {
        let short = "x".repeat(MIN_CONTENT_CHARS - 1);
        let exact = "x".repeat(MIN_CONTENT_CHARS);
        assert!(matches!(
            ensure_sufficient_content(&short),
            Err(AnalysisError::InsufficientContent {
                length: 49,
                minimum: 50
            })
        ));
        assert!(ensure_sufficient_content(&exact).is_ok());
    }
}
