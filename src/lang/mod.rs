//! Script-range language detection.
//!
//! [`detect_language`] classifies text as Chinese when it contains at least
//! one CJK Unified Ideograph (U+4E00–U+9FFF) and as English otherwise.  Only
//! these two codes are ever produced; it is a heuristic, not a general
//! language-ID model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Source-language value that asks for detection instead of naming a code.
pub const AUTO: &str = "auto";

const CJK_UNIFIED_START: char = '\u{4E00}';
const CJK_UNIFIED_END: char = '\u{9FFF}';

/// The two languages the detector can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// ISO-639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Language::Chinese => "zh",
            Language::English => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Classify `text` by script.  Pure and infallible; empty input is English.
///
/// ```rust
/// use term_translate::lang::{detect_language, Language};
///
/// assert_eq!(detect_language("人工智能"), Language::Chinese);
/// assert_eq!(detect_language("Artificial Intelligence"), Language::English);
/// ```
pub fn detect_language(text: &str) -> Language {
    if text
        .chars()
        .any(|c| (CJK_UNIFIED_START..=CJK_UNIFIED_END).contains(&c))
    {
        Language::Chinese
    } else {
        Language::English
    }
}

/// Resolve a requested source language: `"auto"` is replaced by the detected
/// code, anything else passes through unchanged.
///
/// Returns the resolved code and, when detection ran, the detected language.
pub fn resolve_source(source: &str, text: &str) -> (String, Option<Language>) {
    if source == AUTO {
        let detected = detect_language(text);
        (detected.code().to_string(), Some(detected))
    } else {
        (source.to_string(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chinese_text_is_detected() {
        assert_eq!(detect_language("人工智能"), Language::Chinese);
        assert_eq!(detect_language("人工智能").code(), "zh");
    }

    #[test]
    fn english_text_is_detected() {
        assert_eq!(detect_language("Artificial Intelligence"), Language::English);
    }

    #[test]
    fn empty_text_defaults_to_english() {
        assert_eq!(detect_language(""), Language::English);
    }

    #[test]
    fn single_ideograph_in_mixed_text_wins() {
        assert_eq!(detect_language("Deploy the 模型 today"), Language::Chinese);
    }

    #[test]
    fn range_boundaries_are_inclusive() {
        assert_eq!(detect_language("\u{4E00}"), Language::Chinese);
        assert_eq!(detect_language("\u{9FFF}"), Language::Chinese);
        assert_eq!(detect_language("\u{4DFF}"), Language::English);
        assert_eq!(detect_language("\u{A000}"), Language::English);
    }

    #[test]
    fn japanese_kana_and_cjk_punctuation_are_not_chinese() {
        assert_eq!(detect_language("こんにちは。"), Language::English);
    }

    #[test]
    fn resolve_auto_runs_detection() {
        let (code, detected) = resolve_source("auto", "通义千问");
        assert_eq!(code, "zh");
        assert_eq!(detected, Some(Language::Chinese));
    }

    #[test]
    fn resolve_explicit_code_passes_through() {
        let (code, detected) = resolve_source("fr", "通义千问");
        assert_eq!(code, "fr");
        assert_eq!(detected, None);
    }

    #[test]
    fn serializes_as_code() {
        assert_eq!(serde_json::to_string(&Language::Chinese).unwrap(), "\"zh\"");
        assert_eq!(serde_json::to_string(&Language::English).unwrap(), "\"en\"");
    }
}
