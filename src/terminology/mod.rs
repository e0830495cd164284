//! Terminology store and fuzzy matcher.
//!
//! This module provides:
//! * [`TermEntry`]: a source term and its fixed translation.
//! * [`TerminologyIndex`]: file-backed glossary with character n-gram
//!   similarity search.
//! * [`SharedTerminology`]: single-writer / multi-reader handle for sharing
//!   the index between requests.
//! * [`split_segments`]: sentence segmentation used by batch search.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use term_translate::terminology::{SharedTerminology, SearchOptions, TerminologyIndex};
//!
//! let terms = SharedTerminology::new(TerminologyIndex::open("data/terminology.json"));
//! terms.add_or_update("通义千问", "Tongyi Qianwen").unwrap();
//!
//! let hits = terms.batch_search("通义千问是大模型", &SearchOptions::default());
//! assert_eq!(hits[0].translation, "Tongyi Qianwen");
//! ```

pub mod index;
pub mod neighbors;
pub mod segment;
pub mod shared;
pub mod vectorizer;

pub use index::{
    SearchOptions, TermEntry, TermMatch, TerminologyError, TerminologyIndex, DEFAULT_MAX_RESULTS,
    DEFAULT_THRESHOLD,
};
pub use segment::split_segments;
pub use shared::SharedTerminology;
