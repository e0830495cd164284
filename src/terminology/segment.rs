//! Sentence segmentation for batch terminology search.
//!
//! [`Segmentation::Literal`] splits on the exact `". "` separator.  It is
//! imprecise for text without that separator, which includes nearly all
//! Chinese prose (`。` is not followed by a space), so such text is searched
//! as one segment.  [`Segmentation::LanguageAware`] additionally splits on
//! CJK sentence punctuation, ASCII `!?;` and line breaks.

use crate::config::Segmentation;

const LITERAL_SEPARATOR: &str = ". ";

const SENTENCE_BREAKS: &[char] = &['。', '！', '？', '；', '!', '?', ';', '\n', '\r'];

/// Split `text` into search segments.
///
/// Literal mode keeps empty pieces, matching a plain string split.  Language
/// aware mode drops pieces that are empty after trimming.
pub fn split_segments(text: &str, mode: Segmentation) -> Vec<&str> {
    match mode {
        Segmentation::Literal => text.split(LITERAL_SEPARATOR).collect(),
        Segmentation::LanguageAware => text
            .split(LITERAL_SEPARATOR)
            .flat_map(|piece| piece.split(SENTENCE_BREAKS))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_splits_on_dot_space_only() {
        let segments = split_segments("One. Two.Three. Four", Segmentation::Literal);
        assert_eq!(segments, vec!["One", "Two.Three", "Four"]);
    }

    #[test]
    fn literal_leaves_chinese_prose_whole() {
        let text = "通义千问是大模型。它支持翻译。";
        assert_eq!(split_segments(text, Segmentation::Literal), vec![text]);
    }

    #[test]
    fn literal_keeps_empty_pieces() {
        assert_eq!(split_segments("", Segmentation::Literal), vec![""]);
        assert_eq!(split_segments("a. . b", Segmentation::Literal), vec!["a", "", "b"]);
    }

    #[test]
    fn language_aware_splits_cjk_punctuation() {
        let segments = split_segments(
            "通义千问是大模型。它支持翻译！真的吗？",
            Segmentation::LanguageAware,
        );
        assert_eq!(segments, vec!["通义千问是大模型", "它支持翻译", "真的吗"]);
    }

    #[test]
    fn language_aware_handles_mixed_separators() {
        let segments = split_segments(
            "First sentence. Second one!\nThird; fourth",
            Segmentation::LanguageAware,
        );
        assert_eq!(segments, vec!["First sentence", "Second one", "Third", "fourth"]);
    }

    #[test]
    fn language_aware_drops_blank_segments() {
        assert!(split_segments("  。\n", Segmentation::LanguageAware).is_empty());
    }
}
