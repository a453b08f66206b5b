
use anyhow::{Context, Result};
use tracing::debug;

use crate::embeddings::Embedder;
use crate::similarity::cosine_similarity;

/// One piece of evidence for a candidate song pair: a verse from each side
/// and how similar the two are. Indices refer to the verse's position in its
/// song's segmented line sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct VersePair {
    pub index_a: usize,
    pub index_b: usize,
    pub verse_a: String,
    pub verse_b: String,
    pub score: f32,
}

/// Split lyrics into trimmed, non-empty lines, preserving document order.
/// A text with no usable lines yields an empty sequence; that is a valid
/// outcome, not an error.
#[inline]
pub fn segment_verses(lyrics: &str) -> Vec<&str> {
    lyrics
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Finds the verses that drive a candidate pair's global similarity.
///
/// For each qualifying song pair this embeds both songs' verse sequences
/// (one batch call per side), builds the cross similarity matrix, keeps
/// entries strictly above the local threshold, and returns the top-k by
/// score. The strict comparison here is deliberately tighter than the
/// inclusive global filter.
#[derive(Debug, Clone, Copy)]
pub struct VerseMatcher<'a, E> {
    embedder: &'a E,
    local_threshold: f32,
    top_k: usize,
}

impl<'a, E: Embedder> VerseMatcher<'a, E> {
    #[inline]
    pub fn new(embedder: &'a E, local_threshold: f32, top_k: usize) -> Self {
        Self {
            embedder,
            local_threshold,
            top_k,
        }
    }

    /// Rank the best-matching verse pairs between two lyrics.
    ///
    /// The result holds at most `top_k` entries, every score is strictly
    /// greater than the local threshold, and ordering is score-descending
    /// with ties kept in (A-index, B-index) ascending enumeration order.
    /// Either side segmenting to nothing produces an empty list.
    #[inline]
    pub fn best_matching_verses(&self, lyrics_a: &str, lyrics_b: &str) -> Result<Vec<VersePair>> {
        let verses_a = segment_verses(lyrics_a);
        let verses_b = segment_verses(lyrics_b);

        if verses_a.is_empty() || verses_b.is_empty() {
            debug!("One side has no verses; no evidence to report");
            return Ok(Vec::new());
        }

        let texts_a: Vec<String> = verses_a.iter().map(|v| (*v).to_string()).collect();
        let texts_b: Vec<String> = verses_b.iter().map(|v| (*v).to_string()).collect();

        let embeddings_a = self
            .embedder
            .embed_batch(&texts_a)
            .with_context(|| format!("Failed to embed {} verses of side A", texts_a.len()))?;
        let embeddings_b = self
            .embedder
            .embed_batch(&texts_b)
            .with_context(|| format!("Failed to embed {} verses of side B", texts_b.len()))?;

        let mut pairs = Vec::new();
        for (i, emb_a) in embeddings_a.iter().enumerate() {
            for (j, emb_b) in embeddings_b.iter().enumerate() {
                let score = cosine_similarity(emb_a, emb_b);
                if score > self.local_threshold {
                    pairs.push(VersePair {
                        index_a: i,
                        index_b: j,
                        verse_a: texts_a[i].clone(),
                        verse_b: texts_b[j].clone(),
                        score,
                    });
                }
            }
        }

        // Stable sort keeps equal scores in (A-index, B-index) enumeration
        // order.
        pairs.sort_by(|x, y| y.score.total_cmp(&x.score));
        pairs.truncate(self.top_k);

        debug!(
            "Kept {} verse pairs above local threshold {}",
            pairs.len(),
            self.local_threshold
        );
        Ok(pairs)
    }
}
