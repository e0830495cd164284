//! Terminology-aware translation service.
//!
//! Requests flow through [`translate::Translator`]: source-language
//! detection ([`lang`]), fuzzy glossary lookup ([`terminology`]), prompt
//! assembly and a retried completion call ([`llm`]).  [`server`] exposes the
//! whole thing over HTTP.

pub mod config;
pub mod lang;
pub mod llm;
pub mod server;
pub mod terminology;
pub mod translate;
