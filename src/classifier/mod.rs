
use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::corpus::Song;
use crate::{LyricsError, Result};

/// Word roots signalling each mood. Roots, not whole words, so that
/// "esperança", "esperar" and "esperando" all land on "espera".
const MELANCHOLIC_ROOTS: &[&str] = &[
    "trist", "dor", "sozin", "solid", "fim", "chuv", "noite", "frio", "lagrima", "adeus", "medo",
    "vazio", "escuro", "perdi", "saudade", "magoa", "choro", "sofr", "ausencia", "cinza", "morr",
    "morte",
];

const OPTIMISTIC_ROOTS: &[&str] = &[
    "sol", "espera", "sonh", "luz", "amanha", "sorri", "novo", "vida", "alegri", "venc", "amor",
    "brilh", "flor", "paz", "futuro", "acredit", "voar", "livre", "festa", "felic", "bencao",
    "melhor",
];

const PHILOSOPHICAL_ROOTS: &[&str] = &[
    "tempo", "razao", "ser", "mundo", "limit", "porque", "destin", "verdad", "exist", "pensar",
    "mente", "universo", "sentido", "duvida", "questao", "saber", "human", "historia", "eterno",
    "realidade", "ilusao",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    Melancholic,
    Optimistic,
    Philosophical,
    /// No keyword from any dictionary matched.
    Neutral,
}

impl Mood {
    /// The moods that carry keyword dictionaries, in tie-breaking order.
    pub const SCORED: [Mood; 3] = [Mood::Melancholic, Mood::Optimistic, Mood::Philosophical];

    fn roots(self) -> &'static [&'static str] {
        match self {
            Mood::Melancholic => MELANCHOLIC_ROOTS,
            Mood::Optimistic => OPTIMISTIC_ROOTS,
            Mood::Philosophical => PHILOSOPHICAL_ROOTS,
            Mood::Neutral => &[],
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mood::Melancholic => "melancholic",
            Mood::Optimistic => "optimistic",
            Mood::Philosophical => "philosophical",
            Mood::Neutral => "neutral",
        };
        f.write_str(name)
    }
}

/// One dictionary root found in a song, kept for the debug trail so a
/// classification can always be explained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootHit {
    pub mood: Mood,
    pub root: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub mood: Mood,
    /// Total hit count per scored mood, in [`Mood::SCORED`] order.
    pub scores: [usize; 3],
    pub hits: Vec<RootHit>,
}

/// Classify one song's mood by counting dictionary-root occurrences in the
/// lowercased lyrics. The highest total wins; on a tie the first mood in
/// declaration order (melancholic, optimistic, philosophical) is kept, and
/// an all-zero score is [`Mood::Neutral`].
#[inline]
pub fn classify(lyrics: &str) -> Classification {
    let lowered = lyrics.to_lowercase();

    let mut scores = [0usize; 3];
    let mut hits = Vec::new();

    for (slot, mood) in Mood::SCORED.into_iter().enumerate() {
        for root in mood.roots() {
            let count = lowered.matches(root).count();
            if count > 0 {
                scores[slot] += count;
                hits.push(RootHit { mood, root, count });
            }
        }
    }

    let mood = if scores.iter().all(|&s| s == 0) {
        Mood::Neutral
    } else {
        let mut best = 0;
        for slot in 1..scores.len() {
            if scores[slot] > scores[best] {
                best = slot;
            }
        }
        Mood::SCORED[best]
    };

    debug!("Classified as {mood} with scores {scores:?}");
    Classification { mood, scores, hits }
}

/// Export one row per song (`title, mood, matched_roots`) as CSV, mirroring
/// the report format the corpus analysis originally shipped with.
#[inline]
pub fn write_classifications(
    songs: &[Song],
    classifications: &[Classification],
    path: &Path,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| LyricsError::Serialization {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    writer
        .write_record(["title", "mood", "matched_roots"])
        .map_err(|e| LyricsError::Serialization {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    for (song, classification) in songs.iter().zip(classifications) {
        let roots = classification
            .hits
            .iter()
            .map(|hit| format!("{}:{}({})", hit.mood, hit.root, hit.count))
            .collect::<Vec<_>>()
            .join("; ");

        writer
            .write_record([
                song.title.as_str(),
                &classification.mood.to_string(),
                &roots,
            ])
            .map_err(|e| LyricsError::Serialization {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
    }

    writer.flush().map_err(|e| LyricsError::Serialization {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(())
}
