//! Brute-force cosine nearest-neighbour search over fitted term rows.
//!
//! Glossaries are small (tens to a few thousand terms), so a linear scan over
//! L2-normalised sparse rows is both exact and fast enough.

use super::vectorizer::SparseVector;

/// Default neighbour count used when the index is fitted.
pub const DEFAULT_NEIGHBORS: usize = 5;

/// One search hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the row in fit order.
    pub index: usize,
    /// Cosine distance in `[0, 2]`; `1 - distance` is the similarity.
    pub distance: f32,
}

impl Neighbor {
    pub fn similarity(&self) -> f32 {
        1.0 - self.distance
    }
}

#[derive(Debug, Clone, Default)]
pub struct NearestNeighbors {
    rows: Vec<SparseVector>,
    n_neighbors: usize,
}

impl NearestNeighbors {
    /// Fit over `rows`, with the default neighbour count clamped to the row
    /// count.
    pub fn fit(rows: Vec<SparseVector>) -> Self {
        let n_neighbors = DEFAULT_NEIGHBORS.min(rows.len());
        Self { rows, n_neighbors }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    /// The `k` rows closest to `query`, nearest first.  Equal distances keep
    /// fit order.  `k` is clamped to the number of rows.
    pub fn kneighbors(&self, query: &SparseVector, k: usize) -> Vec<Neighbor> {
        let mut hits: Vec<Neighbor> = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| Neighbor {
                index,
                distance: cosine_distance(query, row),
            })
            .collect();

        // Stable sort: ties stay in insertion order.
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(k.min(self.rows.len()));
        hits
    }
}

/// Cosine distance between two L2-normalised rows.  A zero row is treated as
/// orthogonal to everything.
fn cosine_distance(a: &SparseVector, b: &SparseVector) -> f32 {
    if a.is_zero() || b.is_zero() {
        return 1.0;
    }
    (1.0 - a.dot(b)).clamp(0.0, 2.0)
}
