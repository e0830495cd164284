//! File-backed terminology index with fuzzy lookup.
//!
//! [`TerminologyIndex`] owns the glossary entries (insertion ordered, unique
//! by term) and a derived search model: a [`TfidfVectorizer`] fitted over all
//! terms plus a [`NearestNeighbors`] structure over the fitted rows.  The
//! model is rebuilt whenever a new term is inserted and is never observed in
//! a state inconsistent with the entry list.
//!
//! The store is a JSON array of `{ "term", "translation" }` records,
//! pretty-printed with two-space indentation and non-ASCII kept literal.
//! Entries are persisted after every mutation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Segmentation;

use super::neighbors::NearestNeighbors;
use super::segment::split_segments;
use super::vectorizer::TfidfVectorizer;

pub const DEFAULT_THRESHOLD: f32 = 0.3;
pub const DEFAULT_MAX_RESULTS: usize = 5;

// ---------------------------------------------------------------------------
// TerminologyError
// ---------------------------------------------------------------------------

/// Errors surfaced by terminology persistence and mutation.
///
/// Load failures are not represented here: a corrupt store is logged and
/// replaced by an empty index.
#[derive(Debug, Error)]
pub enum TerminologyError {
    #[error("terminology store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialise terminology: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("term must not be empty")]
    EmptyTerm,
}

// ---------------------------------------------------------------------------
// TermEntry
// ---------------------------------------------------------------------------

/// A source term and its fixed translation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TermEntry {
    pub term: String,
    pub translation: String,
}

impl TermEntry {
    pub fn new(term: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            translation: translation.into(),
        }
    }
}

/// A search hit with its similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct TermMatch {
    pub entry: TermEntry,
    pub similarity: f32,
}

/// Tuning for [`TerminologyIndex::batch_search_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    /// Matches must score strictly above this similarity.
    pub threshold: f32,
    pub max_results: usize,
    pub segmentation: Segmentation,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            max_results: DEFAULT_MAX_RESULTS,
            segmentation: Segmentation::Literal,
        }
    }
}

// ---------------------------------------------------------------------------
// TerminologyIndex
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct SearchModel {
    vectorizer: TfidfVectorizer,
    knn: NearestNeighbors,
}

/// Glossary entries plus the fuzzy search model derived from them.
///
/// Not synchronised: wrap it in [`SharedTerminology`](super::SharedTerminology)
/// to share between request handlers.
#[derive(Debug)]
pub struct TerminologyIndex {
    entries: Vec<TermEntry>,
    positions: HashMap<String, usize>,
    model: Option<SearchModel>,
    /// Bumped on every refit.
    generation: u64,
    path: PathBuf,
}

impl TerminologyIndex {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Open the store at `path`, creating an empty one when it is absent.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut index = Self {
            entries: Vec::new(),
            positions: HashMap::new(),
            model: None,
            generation: 0,
            path: path.clone(),
        };
        index.load(&path);
        index
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Replace the in-memory entries with the contents of `path` and make it
    /// the store that subsequent mutations persist to.
    ///
    /// A missing file yields an empty index and an empty store is written.
    /// An unreadable or malformed file is logged and yields an empty index.
    pub fn load(&mut self, path: &Path) {
        self.path = path.to_path_buf();
        self.clear();

        if !path.exists() {
            log::info!(
                "terminology store {} not found, creating an empty one",
                path.display()
            );
            if let Err(e) = self.save(path) {
                log::warn!("could not create terminology store {}: {e}", path.display());
            }
            return;
        }

        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|data| {
                serde_json::from_str::<Vec<TermEntry>>(&data).map_err(|e| e.to_string())
            });

        match parsed {
            Ok(records) => {
                for record in records {
                    self.upsert(record.term, record.translation);
                }
                self.rebuild();
                log::info!(
                    "loaded {} terminology entries from {}",
                    self.entries.len(),
                    path.display()
                );
            }
            Err(e) => {
                log::warn!(
                    "failed to load terminology from {} ({e}); starting with an empty index",
                    path.display()
                );
                self.clear();
            }
        }
    }

    /// Write all entries to `path` in insertion order.
    pub fn save(&self, path: &Path) -> Result<(), TerminologyError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Number of times the search model has been refitted.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The store this index persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Insert `term` or overwrite its translation, then persist.
    ///
    /// Inserting a new term refits the search model over every term.
    /// Updating only the translation leaves the model untouched, since term
    /// vectors do not depend on translations.
    pub fn add_or_update(
        &mut self,
        term: impl Into<String>,
        translation: impl Into<String>,
    ) -> Result<(), TerminologyError> {
        let term = term.into();
        if term.trim().is_empty() {
            return Err(TerminologyError::EmptyTerm);
        }

        if self.upsert(term, translation.into()) {
            self.rebuild();
        }

        self.save(&self.path)
    }

    /// Returns `true` when a new entry was appended.
    fn upsert(&mut self, term: String, translation: String) -> bool {
        if let Some(&idx) = self.positions.get(&term) {
            self.entries[idx].translation = translation;
            false
        } else {
            self.positions.insert(term.clone(), self.entries.len());
            self.entries.push(TermEntry { term, translation });
            true
        }
    }

    fn rebuild(&mut self) {
        if self.entries.is_empty() {
            self.model = None;
            return;
        }
        let terms: Vec<&str> = self.entries.iter().map(|e| e.term.as_str()).collect();
        let (vectorizer, rows) = TfidfVectorizer::fit_transform(&terms);
        self.generation += 1;
        log::debug!(
            "rebuilt terminology model #{}: {} terms, {} features",
            self.generation,
            terms.len(),
            vectorizer.vocabulary_len()
        );
        self.model = Some(SearchModel {
            vectorizer,
            knn: NearestNeighbors::fit(rows),
        });
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
        self.model = None;
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Fuzzy-match `text` against the glossary, keeping hits whose similarity
    /// is strictly greater than `threshold`.  Nearest first.
    pub fn search(&self, text: &str, threshold: f32, max_results: usize) -> Vec<TermEntry> {
        self.search_scored(text, threshold, max_results)
            .into_iter()
            .map(|m| m.entry)
            .collect()
    }

    /// Like [`search`](Self::search) but keeps the similarity of each hit.
    pub fn search_scored(&self, text: &str, threshold: f32, max_results: usize) -> Vec<TermMatch> {
        let Some(model) = &self.model else {
            return Vec::new();
        };

        let query = model.vectorizer.transform(text);
        let k = max_results.min(self.entries.len());

        model
            .knn
            .kneighbors(&query, k)
            .into_iter()
            .filter(|hit| hit.similarity() > threshold)
            .map(|hit| TermMatch {
                entry: self.entries[hit.index].clone(),
                similarity: hit.similarity(),
            })
            .collect()
    }

    /// Search every `". "`-separated segment of `text` and merge the hits,
    /// keeping the first occurrence of each term.
    pub fn batch_search(&self, text: &str, threshold: f32) -> Vec<TermEntry> {
        self.batch_search_with(
            text,
            &SearchOptions {
                threshold,
                ..SearchOptions::default()
            },
        )
    }

    /// [`batch_search`](Self::batch_search) with explicit result limit and
    /// segmentation strategy.
    pub fn batch_search_with(&self, text: &str, options: &SearchOptions) -> Vec<TermEntry> {
        let mut seen = std::collections::HashSet::new();
        split_segments(text, options.segmentation)
            .into_iter()
            .flat_map(|segment| self.search(segment, options.threshold, options.max_results))
            .filter(|entry| seen.insert(entry.term.clone()))
            .collect()
    }

    /// Look up the translation of an exact term.
    pub fn get(&self, term: &str) -> Option<&str> {
        self.positions
            .get(term)
            .map(|&idx| self.entries[idx].translation.as_str())
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[TermEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn index_in_temp() -> (TerminologyIndex, TempDir) {
        let dir = tempdir().expect("temp dir");
        let index = TerminologyIndex::open(dir.path().join("data").join("terminology.json"));
        (index, dir)
    }

    fn seeded() -> (TerminologyIndex, TempDir) {
        let (mut index, dir) = index_in_temp();
        index.add_or_update("通义千问", "Tongyi Qianwen").unwrap();
        index.add_or_update("大模型", "large model").unwrap();
        index.add_or_update("machine learning", "机器学习").unwrap();
        index.add_or_update("neural network", "神经网络").unwrap();
        (index, dir)
    }

    #[test]
    fn missing_store_is_created_empty() {
        let (index, _dir) = index_in_temp();
        assert!(index.is_empty());
        assert!(index.path().exists());
        let data = std::fs::read_to_string(index.path()).unwrap();
        assert_eq!(serde_json::from_str::<Vec<TermEntry>>(&data).unwrap(), vec![]);
    }

    #[test]
    fn empty_index_search_returns_nothing() {
        let (index, _dir) = index_in_temp();
        assert!(index.search("anything", 0.0, 5).is_empty());
        assert!(index.batch_search("anything. at all", 0.0).is_empty());
    }

    #[test]
    fn verbatim_term_is_found() {
        let (index, _dir) = seeded();
        for entry in index.entries().to_vec() {
            let text = format!("we talked about {} yesterday", entry.term);
            let hits = index.search(&text, DEFAULT_THRESHOLD, DEFAULT_MAX_RESULTS);
            assert!(hits.contains(&entry), "{} not found in {:?}", entry.term, hits);
        }
    }

    #[test]
    fn chinese_term_inside_sentence_is_found() {
        let (index, _dir) = seeded();
        let hits = index.search_scored("通义千问是大模型", 0.3, 5);
        assert_eq!(hits[0].entry.term, "通义千问");
        assert!(hits[0].similarity > 0.3);
        assert!(hits.windows(2).all(|w| w[0].similarity >= w[1].similarity));
    }

    #[test]
    fn threshold_is_strict() {
        let (index, _dir) = seeded();
        let scored = index.search_scored("neural network", 0.0, 5);
        let top = scored[0].similarity;
        assert!(index.search("neural network", top, 5).is_empty());
        assert!(!index.search("neural network", top - 0.01, 5).is_empty());
    }

    #[test]
    fn max_results_limits_hits() {
        let (index, _dir) = seeded();
        assert!(index.search("通义千问是大模型", 0.0, 1).len() <= 1);
    }

    #[test]
    fn unrelated_text_has_no_hits() {
        let (index, _dir) = seeded();
        assert!(index.search("zzz qqq", DEFAULT_THRESHOLD, 5).is_empty());
    }

    #[test]
    fn add_same_pair_twice_keeps_one_entry() {
        let (mut index, _dir) = index_in_temp();
        index.add_or_update("大模型", "large model").unwrap();
        index.add_or_update("大模型", "large model").unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn update_overwrites_translation_in_place() {
        let (mut index, _dir) = seeded();
        let generation = index.generation();
        index.add_or_update("大模型", "foundation model").unwrap();
        assert_eq!(index.generation(), generation);
        assert_eq!(index.len(), 4);
        assert_eq!(index.entries()[1].term, "大模型");
        assert_eq!(index.get("大模型"), Some("foundation model"));

        let hits = index.search("大模型", DEFAULT_THRESHOLD, 5);
        assert_eq!(hits[0].translation, "foundation model");
    }

    #[test]
    fn only_new_terms_refit_the_model() {
        let (mut index, _dir) = index_in_temp();
        assert_eq!(index.generation(), 0);

        index.add_or_update("通义千问", "Tongyi Qianwen").unwrap();
        index.add_or_update("大模型", "large model").unwrap();
        assert_eq!(index.generation(), 2);

        index.add_or_update("大模型", "foundation model").unwrap();
        index.add_or_update("大模型", "foundation model").unwrap();
        assert_eq!(index.generation(), 2);

        index.add_or_update("人工智能", "AI").unwrap();
        assert_eq!(index.generation(), 3);
    }

    #[test]
    fn empty_term_is_rejected() {
        let (mut index, _dir) = index_in_temp();
        assert!(matches!(
            index.add_or_update("  ", "x"),
            Err(TerminologyError::EmptyTerm)
        ));
        assert!(index.is_empty());
    }

    #[test]
    fn save_then_load_preserves_entries_and_order() {
        let (index, dir) = seeded();
        let copy = dir.path().join("copy.json");
        index.save(&copy).unwrap();

        let reloaded = TerminologyIndex::open(&copy);
        assert_eq!(reloaded.entries(), index.entries());
        assert!(!reloaded.search("通义千问", DEFAULT_THRESHOLD, 5).is_empty());
    }

    #[test]
    fn mutations_are_persisted() {
        let (index, _dir) = seeded();
        let reloaded = TerminologyIndex::open(index.path());
        assert_eq!(reloaded.len(), 4);
    }

    #[test]
    fn store_is_pretty_and_keeps_non_ascii_literal() {
        let (index, _dir) = seeded();
        let data = std::fs::read_to_string(index.path()).unwrap();
        assert!(data.contains("通义千问"));
        assert!(!data.contains("\\u"));
        assert!(data.contains("\n  {\n    \"term\""));
    }

    #[test]
    fn corrupt_store_resets_to_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("terminology.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut index = TerminologyIndex::open(&path);
        assert!(index.is_empty());
        assert!(index.search("anything", 0.0, 5).is_empty());

        // Still usable afterwards.
        index.add_or_update("大模型", "large model").unwrap();
        assert_eq!(TerminologyIndex::open(&path).len(), 1);
    }

    #[test]
    fn duplicate_records_in_store_collapse() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("terminology.json");
        std::fs::write(
            &path,
            r#"[{"term":"a b","translation":"1"},{"term":"c d","translation":"2"},{"term":"a b","translation":"3"}]"#,
        )
        .unwrap();

        let index = TerminologyIndex::open(&path);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("a b"), Some("3"));
        assert_eq!(index.entries()[0].term, "a b");
    }

    #[test]
    fn batch_search_deduplicates_by_first_occurrence() {
        let (index, _dir) = seeded();
        let hits = index.batch_search(
            "Neural network basics. Machine learning uses a neural network",
            DEFAULT_THRESHOLD,
        );
        let terms: Vec<&str> = hits.iter().map(|e| e.term.as_str()).collect();
        assert_eq!(
            terms.iter().filter(|t| **t == "neural network").count(),
            1,
            "{terms:?}"
        );
        assert_eq!(terms[0], "neural network");
        assert!(terms.contains(&"machine learning"));
    }

    #[test]
    fn language_aware_batch_search_splits_chinese() {
        let (index, _dir) = seeded();
        let options = SearchOptions {
            segmentation: Segmentation::LanguageAware,
            ..SearchOptions::default()
        };
        let hits = index.batch_search_with("通义千问很强。大模型很多。", &options);
        let terms: Vec<&str> = hits.iter().map(|e| e.term.as_str()).collect();
        assert!(terms.contains(&"通义千问"), "{terms:?}");
        assert!(terms.contains(&"大模型"), "{terms:?}");
    }
}
