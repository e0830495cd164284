//! Translation orchestration.
//!
//! [`Translator`] runs one request through detection, terminology matching,
//! prompt assembly and completion.  It exposes an async path
//! ([`Translator::translate`]) and a blocking one
//! ([`Translator::translate_blocking`]) with the same semantics.

pub mod error;
pub mod orchestrator;
pub mod request;
pub mod stage;

pub use error::TranslateError;
pub use orchestrator::{extract_translation, Translator};
pub use request::{TranslationRequest, TranslationResult};
pub use stage::TranslationStage;
