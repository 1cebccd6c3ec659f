//! Whitespace normalization shared by every extracted text field.

use std::sync::LazyLock;

use regex::Regex;

/// Matches any run of whitespace.
static MULTISPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("multispace regex"));

/// Matches whitespace left in front of punctuation after tags are flattened.
static SPACE_BEFORE_PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([,.;:!?%])").expect("punctuation regex"));

/// Collapse whitespace runs, trim, and drop spaces before `, . ; : ! ? %`.
///
/// Returns `None` when nothing is left.
pub fn normalize_text(s: &str) -> Option<String> {
    let collapsed = MULTISPACE_RE.replace_all(s, " ");
    let cleaned = SPACE_BEFORE_PUNCT_RE.replace_all(collapsed.trim(), "$1");
    (!cleaned.is_empty()).then(|| cleaned.into_owned())
}

/// Collapse whitespace runs to single spaces and trim, nothing else.
pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_spacing_and_punctuation() {
        assert_eq!(
            normalize_text("  Heals   faster ,  grants Exposure !  ").as_deref(),
            Some("Heals faster, grants Exposure!")
        );
    }

    #[test]
    fn percent_and_colon_attach_to_previous_word() {
        assert_eq!(
            normalize_text("Increases speed by 50 % \n for 4 seconds :").as_deref(),
            Some("Increases speed by 50% for 4 seconds:")
        );
    }

    #[test]
    fn blank_input_is_absent() {
        assert_eq!(normalize_text(""), None);
        assert_eq!(normalize_text(" \n\t "), None);
    }

    #[test]
    fn non_breaking_space_is_whitespace() {
        assert_eq!(normalize_text("6,000\u{a0}Bloodpoints").as_deref(), Some("6,000 Bloodpoints"));
    }

    #[test]
    fn collapse_keeps_punctuation_spacing() {
        assert_eq!(collapse_whitespace("  Cost :\n 6,000 "), "Cost : 6,000");
    }
}
