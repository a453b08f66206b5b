
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::{LyricsError, Result};

/// Title used when a CSV row carries lyrics but no usable title.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// One song from the corpus. Immutable once loaded; `index` is the song's
/// position in load order and identifies it for the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub index: usize,
    pub title: String,
    pub lyrics: String,
}

#[derive(Debug, Deserialize)]
struct SongRow {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    lyrics: Option<String>,
}

/// Load every `*.csv` file under `dataset_dir` into one ordered corpus.
///
/// Files are visited in lexicographic name order so that repeated runs see
/// the same song indices. Rows with missing or blank lyrics are dropped
/// before they reach the matching pipeline; a missing title defaults to
/// [`UNKNOWN_TITLE`]. An empty resulting corpus is a fatal
/// [`LyricsError::Load`].
#[inline]
pub fn load_corpus(dataset_dir: &Path) -> Result<Vec<Song>> {
    let mut csv_paths = csv_files(dataset_dir)?;
    csv_paths.sort();

    if csv_paths.is_empty() {
        return Err(LyricsError::Load(format!(
            "no CSV files found in {}",
            dataset_dir.display()
        )));
    }

    let mut songs = Vec::new();
    for path in &csv_paths {
        match read_songs(path, songs.len()) {
            Ok(mut file_songs) => {
                debug!(
                    "Loaded {} songs from {}",
                    file_songs.len(),
                    path.display()
                );
                songs.append(&mut file_songs);
            }
            Err(e) => {
                // Matches the original behavior: a malformed file is skipped,
                // not fatal, as long as the corpus ends up non-empty.
                warn!("Skipping unreadable corpus file {}: {}", path.display(), e);
            }
        }
    }

    if songs.is_empty() {
        return Err(LyricsError::Load(format!(
            "no songs with lyrics found in {}",
            dataset_dir.display()
        )));
    }

    debug!("Corpus loaded: {} songs total", songs.len());
    Ok(songs)
}

fn csv_files(dataset_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dataset_dir).map_err(|e| {
        LyricsError::Load(format!(
            "cannot read dataset directory {}: {}",
            dataset_dir.display(),
            e
        ))
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| {
                LyricsError::Load(format!(
                    "cannot read dataset directory {}: {}",
                    dataset_dir.display(),
                    e
                ))
            })?
            .path();
        if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")) {
            paths.push(path);
        }
    }
    Ok(paths)
}

fn read_songs(path: &Path, start_index: usize) -> Result<Vec<Song>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| LyricsError::Load(format!("cannot open {}: {}", path.display(), e)))?;

    let mut songs = Vec::new();
    for row in reader.deserialize::<SongRow>() {
        let row =
            row.map_err(|e| LyricsError::Load(format!("bad row in {}: {}", path.display(), e)))?;

        let Some(lyrics) = row.lyrics.filter(|text| !text.trim().is_empty()) else {
            continue;
        };

        let title = row
            .title
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

        songs.push(Song {
            index: start_index + songs.len(),
            title,
            lyrics,
        });
    }

    Ok(songs)
}
