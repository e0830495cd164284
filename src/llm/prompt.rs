//! Prompt builder for terminology- and context-aware translation.
//!
//! [`PromptBuilder::build`] produces a [`TranslationPrompt`]: a system
//! instruction and a user message.  The instruction is assembled in a fixed
//! order so identical inputs always yield identical prompts:
//!
//! 1. Translator role for the (source → target) pair
//! 2. Terminology block (only when matches were found)
//! 3. Previous-translation block (only when context pairs were supplied)

use serde::{Deserialize, Serialize};

use crate::lang::resolve_source;
use crate::terminology::TermEntry;

/// A previously established source → target mapping supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextPair {
    pub source: String,
    pub target: String,
}

impl ContextPair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// System instruction plus user content for one completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationPrompt {
    pub instruction: String,
    pub content: String,
}

/// Builds translation prompts.  Stateless.
///
/// # Example
/// ```rust
/// use term_translate::llm::PromptBuilder;
/// use term_translate::terminology::TermEntry;
///
/// let terms = vec![TermEntry::new("通义千问", "Tongyi Qianwen")];
/// let prompt = PromptBuilder::new().build("通义千问是大模型", "auto", "en", &[], &terms);
/// assert!(prompt.instruction.contains("Tongyi Qianwen"));
/// assert!(prompt.content.contains("from zh to en"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Assemble the prompt.  A `source_lang` of `"auto"` is resolved by
    /// script detection first; the literal `"auto"` never reaches the prompt.
    pub fn build(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
        context: &[ContextPair],
        terminology: &[TermEntry],
    ) -> TranslationPrompt {
        let (source, _) = resolve_source(source_lang, text);

        let mut instruction = String::with_capacity(512);
        instruction.push_str(&format!(
            "You are a professional translator specialising in {source} to {target_lang} translation.\n\
             Translate the provided text accurately while preserving its original meaning, tone and formatting.\n"
        ));

        if !terminology.is_empty() {
            instruction.push_str("\nUse the following terminology consistently in the translation:\n");
            for entry in terminology {
                instruction.push_str(&format!("- {}: {}\n", entry.term, entry.translation));
            }
        }

        if !context.is_empty() {
            instruction.push_str("\nStay consistent with these previous translations:\n");
            for pair in context {
                instruction.push_str(&format!(
                    "'{}' was translated as '{}'\n",
                    pair.source, pair.target
                ));
            }
        }

        let content = format!("Translate this text from {source} to {target_lang}:\n\n{text}");

        TranslationPrompt {
            instruction,
            content,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_instruction_names_language_pair() {
        let prompt = PromptBuilder::new().build("Hello", "en", "zh", &[], &[]);

        assert!(prompt.instruction.contains("professional translator"));
        assert!(prompt.instruction.contains("en to zh"));
        assert!(prompt.instruction.contains("meaning, tone and formatting"));
        assert!(!prompt.instruction.contains("terminology"));
        assert!(!prompt.instruction.contains("previous translations"));
    }

    #[test]
    fn auto_source_is_resolved_everywhere() {
        let prompt = PromptBuilder::new().build("人工智能", "auto", "en", &[], &[]);

        assert!(prompt.instruction.contains("zh to en"));
        assert!(prompt.content.contains("from zh to en"));
        assert!(!prompt.instruction.contains("auto"));
        assert!(!prompt.content.contains("auto"));
    }

    #[test]
    fn content_carries_text_verbatim() {
        let text = "Line one.\n\n  Line two with *markdown*.";
        let prompt = PromptBuilder::new().build(text, "en", "zh", &[], &[]);
        assert_eq!(
            prompt.content,
            format!("Translate this text from en to zh:\n\n{text}")
        );
    }

    #[test]
    fn terminology_block_lists_each_pair() {
        let terms = vec![
            TermEntry::new("通义千问", "Tongyi Qianwen"),
            TermEntry::new("大模型", "large model"),
        ];
        let prompt = PromptBuilder::new().build("通义千问是大模型", "zh", "en", &[], &terms);

        assert!(prompt.instruction.contains("- 通义千问: Tongyi Qianwen\n"));
        assert!(prompt.instruction.contains("- 大模型: large model\n"));
    }

    #[test]
    fn context_block_lists_each_pair() {
        let context = vec![ContextPair::new("模型", "model")];
        let prompt = PromptBuilder::new().build("新模型", "zh", "en", &context, &[]);

        assert!(prompt.instruction.contains("previous translations"));
        assert!(prompt.instruction.contains("'模型' was translated as 'model'"));
    }

    #[test]
    fn terminology_precedes_context() {
        let terms = vec![TermEntry::new("通义千问", "Tongyi Qianwen")];
        let context = vec![ContextPair::new("模型", "model")];
        let prompt = PromptBuilder::new().build("通义千问", "zh", "en", &context, &terms);

        let term_pos = prompt.instruction.find("Tongyi Qianwen").unwrap();
        let ctx_pos = prompt.instruction.find("'模型'").unwrap();
        assert!(term_pos < ctx_pos);
    }

    #[test]
    fn identical_inputs_give_identical_prompts() {
        let terms = vec![TermEntry::new("a b", "x")];
        let context = vec![ContextPair::new("c", "d")];
        let builder = PromptBuilder::new();
        assert_eq!(
            builder.build("text", "auto", "zh", &context, &terms),
            builder.build("text", "auto", "zh", &context, &terms)
        );
    }
}
