//! Per-request translation state machine.

/// Stages of one translation request.
///
/// ```text
/// Start ──source=auto──▶ Detect ──▶ MatchTerminology ──▶ AssemblePrompt
///       ──────────────────────────▶ (skipped when disabled)
/// AssemblePrompt ──▶ Invoke ──▶ Extract ──▶ Done
/// Invoke / Extract ──failure──▶ Failed
/// ```
///
/// Nothing is carried between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationStage {
    Start,
    Detect,
    MatchTerminology,
    AssemblePrompt,
    Invoke,
    Extract,
    Done,
    Failed,
}

impl TranslationStage {
    pub fn label(&self) -> &'static str {
        match self {
            TranslationStage::Start => "start",
            TranslationStage::Detect => "detect-language",
            TranslationStage::MatchTerminology => "match-terminology",
            TranslationStage::AssemblePrompt => "assemble-prompt",
            TranslationStage::Invoke => "invoke",
            TranslationStage::Extract => "extract",
            TranslationStage::Done => "done",
            TranslationStage::Failed => "failed",
        }
    }

    /// `Done` and `Failed` end the request.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TranslationStage::Done | TranslationStage::Failed)
    }
}
