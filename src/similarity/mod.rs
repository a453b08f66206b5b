
use itertools::Itertools;
use tracing::debug;

/// Cosine similarity between two vectors.
///
/// A zero-norm operand yields 0.0 instead of dividing by zero; an all-zero
/// embedding is treated as similar to nothing rather than failing the run.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Symmetric N×N matrix of whole-song cosine similarities.
///
/// Built once per run from the full embedding list and read-only afterwards.
/// The diagonal is fixed at 1.0 by definition. Memory is O(N²), which is the
/// accepted trade-off for an offline batch over a modest corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    scores: Vec<f32>,
}

impl SimilarityMatrix {
    /// Build the full pairwise matrix. Only the upper triangle is computed;
    /// the lower triangle is mirrored from it.
    #[inline]
    pub fn build(embeddings: &[Vec<f32>]) -> Self {
        let n = embeddings.len();
        let mut scores = vec![0.0f32; n * n];

        for i in 0..n {
            scores[i * n + i] = 1.0;
            for j in (i + 1)..n {
                let score = cosine_similarity(&embeddings[i], &embeddings[j]);
                scores[i * n + j] = score;
                scores[j * n + i] = score;
            }
        }

        debug!("Built {n}x{n} similarity matrix");
        Self { n, scores }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Similarity between songs `i` and `j`.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        assert!(i < self.n && j < self.n, "matrix index out of bounds");
        self.scores[i * self.n + j]
    }
}

/// A song pair whose whole-text similarity cleared the global threshold,
/// eligible for verse-level analysis. Always `a < b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidatePair {
    pub a: usize,
    pub b: usize,
    pub score: f32,
}

/// Enumerate all unordered pairs in nested-index order and keep those at or
/// above `global_threshold`. The comparison is inclusive: a pair scoring
/// exactly at the threshold is a candidate.
#[inline]
pub fn candidate_pairs(matrix: &SimilarityMatrix, global_threshold: f32) -> Vec<CandidatePair> {
    let pairs: Vec<CandidatePair> = (0..matrix.len())
        .tuple_combinations()
        .map(|(a, b)| CandidatePair {
            a,
            b,
            score: matrix.get(a, b),
        })
        .filter(|pair| pair.score >= global_threshold)
        .collect();

    debug!(
        "{} of {} song pairs passed the global threshold {}",
        pairs.len(),
        matrix.len() * matrix.len().saturating_sub(1) / 2,
        global_threshold
    );
    pairs
}
