#[cfg(test)]
mod tests;

use tracing::info;

use crate::config::AnalysisConfig;
use crate::corpus::Song;
use crate::embeddings::Embedder;
use crate::matching::VerseMatcher;
use crate::report::{self, MatchRecord};
use crate::similarity::{SimilarityMatrix, candidate_pairs};
use crate::{LyricsError, Result};

/// The straight-line analysis run: embed every song once, build the full
/// similarity matrix, filter candidate pairs, verse-match only those, then
/// rank. No stage loops back; the output order depends only on the input,
/// never on timing.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisPipeline<'a, E> {
    embedder: &'a E,
    settings: &'a AnalysisConfig,
}

impl<'a, E: Embedder> AnalysisPipeline<'a, E> {
    #[inline]
    pub fn new(embedder: &'a E, settings: &'a AnalysisConfig) -> Self {
        Self { embedder, settings }
    }

    /// Run the full pipeline over a loaded corpus and return the ranked
    /// match records, ready for serialization.
    #[inline]
    pub fn run(&self, songs: &[Song]) -> Result<Vec<MatchRecord>> {
        info!("Embedding {} songs", songs.len());

        let lyrics: Vec<String> = songs.iter().map(|s| s.lyrics.clone()).collect();
        let embeddings = self.embedder.embed_batch(&lyrics).map_err(|e| {
            LyricsError::Embedding(format!("song corpus batch of {}: {e:#}", lyrics.len()))
        })?;

        let matrix = SimilarityMatrix::build(&embeddings);
        let candidates = candidate_pairs(&matrix, self.settings.global_threshold);

        info!(
            "{} candidate pairs at global threshold {}",
            candidates.len(),
            self.settings.global_threshold
        );

        let matcher = VerseMatcher::new(
            self.embedder,
            self.settings.local_threshold,
            self.settings.top_k,
        );

        let mut records = report::build_records(songs, &candidates, &matcher)?;
        report::rank_records(&mut records);
        Ok(records)
    }
}
