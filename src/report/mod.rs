#[cfg(test)]
mod tests;

use std::fs;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info};

use crate::corpus::Song;
use crate::embeddings::Embedder;
use crate::matching::{VerseMatcher, VersePair};
use crate::similarity::CandidatePair;
use crate::{LyricsError, Result};

/// One verse-level piece of evidence in the serialized report.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VerseEvidence {
    pub verse_a: String,
    pub verse_b: String,
    pub score: f64,
}

/// One qualifying song pair in the serialized report: both titles, the
/// rounded global score, and at most top-k verse pairs ranked by score.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchRecord {
    pub song_a: String,
    pub song_b: String,
    pub global_score: f64,
    pub matching_verses: Vec<VerseEvidence>,
}

/// Round to 4 decimal places, the precision the report is published at.
#[inline]
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Build one record per candidate pair, in filter-discovery order.
///
/// The verse matcher runs exactly once per candidate; pairs that never
/// cleared the global threshold are never segment-matched, which is what
/// keeps the expensive fine-grained stage affordable. An embedding failure
/// aborts the whole build and names the song pair it happened on.
#[inline]
pub fn build_records<E: Embedder>(
    songs: &[Song],
    candidates: &[CandidatePair],
    matcher: &VerseMatcher<'_, E>,
) -> Result<Vec<MatchRecord>> {
    let bar = if console::user_attended_stderr() {
        ProgressBar::new(candidates.len() as u64).with_style(
            ProgressStyle::with_template("{bar:30} [{pos}/{len}] Comparing verses")
                .expect("style template is valid"),
        )
    } else {
        ProgressBar::hidden()
    };

    let mut records = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let song_a = &songs[candidate.a];
        let song_b = &songs[candidate.b];

        debug!(
            "Matching verses: {} x {} (global {:.4})",
            song_a.title, song_b.title, candidate.score
        );

        let verses = matcher
            .best_matching_verses(&song_a.lyrics, &song_b.lyrics)
            .map_err(|e| {
                LyricsError::Embedding(format!(
                    "verse batch for '{}' x '{}': {e:#}",
                    song_a.title, song_b.title
                ))
            })?;

        records.push(MatchRecord {
            song_a: song_a.title.clone(),
            song_b: song_b.title.clone(),
            global_score: round4(f64::from(candidate.score)),
            matching_verses: verses.into_iter().map(to_evidence).collect(),
        });
        bar.inc(1);
    }
    bar.finish_and_clear();

    Ok(records)
}

fn to_evidence(pair: VersePair) -> VerseEvidence {
    VerseEvidence {
        verse_a: pair.verse_a,
        verse_b: pair.verse_b,
        score: round4(f64::from(pair.score)),
    }
}

/// Sort records by global score descending. The sort is stable, so pairs
/// with equal scores keep their filter-discovery order.
#[inline]
pub fn rank_records(records: &mut [MatchRecord]) {
    records.sort_by(|x, y| y.global_score.total_cmp(&x.global_score));
}

/// Serialize the ranked records as indented JSON and write them atomically:
/// the report lands at `path` complete or not at all.
#[inline]
pub fn write_report(records: &[MatchRecord], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records).map_err(|e| LyricsError::Serialization {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json.as_bytes()).map_err(|e| LyricsError::Serialization {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        // Leave nothing half-written behind.
        let _ = fs::remove_file(&tmp_path);
        LyricsError::Serialization {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    info!("Wrote {} match records to {}", records.len(), path.display());
    Ok(())
}
