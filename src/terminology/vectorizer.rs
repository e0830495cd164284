//! Character n-gram TF-IDF vectorizer.
//!
//! Terms are broken into character n-grams (lengths 2..=4) taken inside word
//! boundaries: each whitespace-separated word is padded with a single space
//! on both sides before slicing, so n-grams never straddle two words.  This
//! works for Chinese, where a "word" is usually the whole run of ideographs
//! and a glossary term is a substring of it.
//!
//! Weights are raw term counts multiplied by a smoothed inverse document
//! frequency, `ln((1 + N) / (1 + df)) + 1`, and each row is L2-normalised so
//! that a dot product is a cosine similarity.

use std::collections::HashMap;

pub const MIN_NGRAM: usize = 2;
pub const MAX_NGRAM: usize = 4;

// ---------------------------------------------------------------------------
// SparseVector
// ---------------------------------------------------------------------------

/// A sparse row: `(feature index, weight)` pairs sorted by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f32)>,
}

impl SparseVector {
    fn from_counts(counts: HashMap<usize, f32>) -> Self {
        let mut entries: Vec<(usize, f32)> = counts.into_iter().collect();
        entries.sort_unstable_by_key(|(idx, _)| *idx);
        Self { entries }
    }

    /// Returns `true` when no feature is set (e.g. text with no known n-gram).
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f32 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt()
    }

    fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
    }

    /// Dot product of two sorted sparse rows.
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

// ---------------------------------------------------------------------------
// N-gram extraction
// ---------------------------------------------------------------------------

/// Word-bounded character n-grams of `text`, lowercased.
///
/// A word shorter than `n` (after padding) contributes itself once and no
/// longer n-grams are taken from it.
pub fn char_wb_ngrams(text: &str, min_n: usize, max_n: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut ngrams = Vec::new();

    for word in lowered.split_whitespace() {
        let padded: Vec<char> = std::iter::once(' ')
            .chain(word.chars())
            .chain(std::iter::once(' '))
            .collect();
        let len = padded.len();

        for n in min_n..=max_n {
            let mut offset = 0;
            ngrams.push(padded[offset..(offset + n).min(len)].iter().collect());
            while offset + n < len {
                offset += 1;
                ngrams.push(padded[offset..offset + n].iter().collect());
            }
            if offset == 0 {
                break;
            }
        }
    }

    ngrams
}

// ---------------------------------------------------------------------------
// TfidfVectorizer
// ---------------------------------------------------------------------------

/// A vectorizer fitted over a fixed set of documents (the glossary terms).
#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Fit the vocabulary and idf weights over `documents` and return the
    /// vectorized documents in input order.
    pub fn fit_transform<S: AsRef<str>>(documents: &[S]) -> (Self, Vec<SparseVector>) {
        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|d| char_wb_ngrams(d.as_ref(), MIN_NGRAM, MAX_NGRAM))
            .collect();

        // Document frequency per n-gram.
        let mut df: HashMap<&str, usize> = HashMap::new();
        for grams in &tokenized {
            let mut seen: Vec<&str> = grams.iter().map(String::as_str).collect();
            seen.sort_unstable();
            seen.dedup();
            for g in seen {
                *df.entry(g).or_insert(0) += 1;
            }
        }

        // Sorted feature order keeps fits reproducible.
        let mut features: Vec<&str> = df.keys().copied().collect();
        features.sort_unstable();

        let n_docs = documents.len() as f32;
        let vocabulary: HashMap<String, usize> = features
            .iter()
            .enumerate()
            .map(|(i, g)| (g.to_string(), i))
            .collect();
        let idf: Vec<f32> = features
            .iter()
            .map(|g| ((1.0 + n_docs) / (1.0 + df[g] as f32)).ln() + 1.0)
            .collect();

        let vectorizer = Self { vocabulary, idf };
        let rows = tokenized
            .iter()
            .map(|grams| vectorizer.weigh(grams))
            .collect();

        (vectorizer, rows)
    }

    /// Vectorize `text` with the fitted vocabulary.  Unknown n-grams are
    /// ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        self.weigh(&char_wb_ngrams(text, MIN_NGRAM, MAX_NGRAM))
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    fn weigh(&self, grams: &[String]) -> SparseVector {
        let mut counts: HashMap<usize, f32> = HashMap::new();
        for g in grams {
            if let Some(&idx) = self.vocabulary.get(g) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }
        for (idx, count) in counts.iter_mut() {
            *count *= self.idf[*idx];
        }
        let mut row = SparseVector::from_counts(counts);
        row.normalize();
        row
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ngrams_are_word_bounded_and_padded() {
        let grams = char_wb_ngrams("ab", 2, 4);
        // " ab " → 2-grams: " a", "ab", "b "; 3-grams: " ab", "ab "; 4-gram: " ab "
        assert_eq!(grams, vec![" a", "ab", "b ", " ab", "ab ", " ab "]);
    }

    #[test]
    fn short_word_contributes_once() {
        // " a " has length 3: the 2-grams are " a", "a "; the 3-gram is the
        // whole padded word and the 4-gram is skipped.
        let grams = char_wb_ngrams("a", 2, 4);
        assert_eq!(grams, vec![" a", "a ", " a "]);
    }

    #[test]
    fn ngrams_never_cross_words() {
        let grams = char_wb_ngrams("ab cd", 2, 2);
        assert!(!grams.iter().any(|g| g == "b c"));
        assert!(grams.contains(&"cd".to_string()));
    }

    #[test]
    fn ngrams_handle_multibyte_characters() {
        let grams = char_wb_ngrams("通义", 2, 2);
        assert_eq!(grams, vec![" 通", "通义", "义 "]);
    }

    #[test]
    fn ngrams_are_lowercased() {
        let grams = char_wb_ngrams("AI", 2, 2);
        assert!(grams.contains(&"ai".to_string()));
    }

    #[test]
    fn rows_are_unit_length() {
        let (_, rows) = TfidfVectorizer::fit_transform(&["machine learning", "通义千问"]);
        for row in &rows {
            assert!((row.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn identical_text_has_similarity_one() {
        let (vec, rows) = TfidfVectorizer::fit_transform(&["neural network", "通义千问"]);
        let q = vec.transform("neural network");
        assert!((q.dot(&rows[0]) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn unknown_text_is_zero_vector() {
        let (vec, _) = TfidfVectorizer::fit_transform(&["通义千问"]);
        let q = vec.transform("zzz");
        assert!(q.is_zero());
        assert_eq!(q.norm(), 0.0);
    }

    #[test]
    fn contained_chinese_term_scores_high() {
        let (vec, rows) = TfidfVectorizer::fit_transform(&["通义千问"]);
        let q = vec.transform("通义千问是大模型");
        // 9 of the term's 12 n-grams appear in the sentence.
        let sim = q.dot(&rows[0]);
        assert!(sim > 0.8, "similarity was {sim}");
    }

    #[test]
    fn rarer_ngrams_weigh_more() {
        let (vec, _) = TfidfVectorizer::fit_transform(&["ab", "ab", "cd"]);
        let ab = vec.vocabulary["ab"];
        let cd = vec.vocabulary["cd"];
        assert!(vec.idf[cd] > vec.idf[ab]);
    }
}
