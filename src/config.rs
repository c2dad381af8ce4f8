/// Language whose query text is preferred as the canonical display string.
pub const REFERENCE_LANGUAGE: &str = "english";

/// Languages the display layer iterates, in fixed panel order, with their
/// human-readable names. Ingestion accepts languages outside this set; only
/// rendering is restricted to it.
pub const TARGET_LANGUAGES: [(&str, &str); 6] = [
    ("english", "English"),
    ("hindi", "Hindi"),
    ("chinese", "Chinese"),
    ("swahili", "Swahili"),
    ("hebrew", "Hebrew"),
    ("braz-port", "Brazilian Portuguese"),
];

/// Query labels longer than this are cut with a `...` suffix in list views.
pub const QUERY_LABEL_MAX_CHARS: usize = 120;

/// Filename convention for source datasets: `<model-label>_eval_scoring.csv`.
pub const SOURCE_FILENAME_PATTERN: &str = r"^(.+)_eval_scoring\.csv$";

/// Placeholder rendered for a score criterion the source left blank.
pub const MISSING_SCORE_PLACEHOLDER: &str = "-";

/// Truncates a query label for list views. Cuts on a character boundary so
/// multilingual text never splits inside a code point.
pub fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_label_keeps_short_text_untouched() {
        assert_eq!(truncate_label("What is X?", 120), "What is X?");
    }

    #[test]
    fn truncate_label_cuts_on_character_boundaries() {
        let text = "क".repeat(130);
        let label = truncate_label(&text, 120);
        assert!(label.ends_with("..."));
        assert_eq!(label.chars().count(), 123);
    }
}
