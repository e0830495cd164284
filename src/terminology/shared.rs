//! Thread-safe handle around a [`TerminologyIndex`].
//!
//! Searches take the read lock and may run in parallel.  `add_or_update`
//! takes the write lock for the whole mutate → refit → persist sequence, so
//! no search ever observes a half-rebuilt model.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::index::{SearchOptions, TermEntry, TerminologyError, TerminologyIndex};

/// Cheap-to-clone shared terminology index.
#[derive(Debug, Clone)]
pub struct SharedTerminology {
    inner: Arc<RwLock<TerminologyIndex>>,
}

impl SharedTerminology {
    pub fn new(index: TerminologyIndex) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    /// Batch search under the read lock.
    pub fn batch_search(&self, text: &str, options: &SearchOptions) -> Vec<TermEntry> {
        self.read().batch_search_with(text, options)
    }

    /// Single-segment search under the read lock.
    pub fn search(&self, text: &str, threshold: f32, max_results: usize) -> Vec<TermEntry> {
        self.read().search(text, threshold, max_results)
    }

    /// Insert or update under the write lock.
    pub fn add_or_update(&self, term: &str, translation: &str) -> Result<(), TerminologyError> {
        let mut index = self.write();
        index.add_or_update(term, translation)?;
        log::info!("terminology updated: {term:?} → {translation:?} ({} entries)", index.len());
        Ok(())
    }

    /// Snapshot of every entry in insertion order.
    pub fn entries(&self) -> Vec<TermEntry> {
        self.read().entries().to_vec()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Poisoning is ignored: the model is only swapped in after a full refit.
    fn read(&self) -> RwLockReadGuard<'_, TerminologyIndex> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, TerminologyIndex> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use tempfile::tempdir;

    #[test]
    fn clones_share_one_index() {
        let dir = tempdir().unwrap();
        let shared = SharedTerminology::new(TerminologyIndex::open(dir.path().join("t.json")));
        let other = shared.clone();

        other.add_or_update("大模型", "large model").unwrap();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared.entries()[0].translation, "large model");
    }

    #[test]
    fn concurrent_readers_and_writer() {
        let dir = tempdir().unwrap();
        let shared = SharedTerminology::new(TerminologyIndex::open(dir.path().join("t.json")));
        shared.add_or_update("通义千问", "Tongyi Qianwen").unwrap();

        let writer = {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..20 {
                    shared
                        .add_or_update(&format!("term number {i}"), &format!("t{i}"))
                        .unwrap();
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        let hits = shared.batch_search("通义千问是大模型", &SearchOptions::default());
                        assert!(hits.iter().any(|e| e.term == "通义千问"));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for r in readers {
            r.join().unwrap();
        }
        assert_eq!(shared.len(), 21);
    }
}
