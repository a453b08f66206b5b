use super::*;
use crate::embeddings::Embedder;
use crate::matching::VerseMatcher;
use crate::similarity::CandidatePair;
use tempfile::TempDir;

/// Embedder that maps every verse to the same vector, so every cross pair
/// scores exactly 1.0.
struct ConstantEmbedder;

impl Embedder for ConstantEmbedder {
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
    }
}

fn song(index: usize, title: &str, lyrics: &str) -> Song {
    Song {
        index,
        title: title.to_string(),
        lyrics: lyrics.to_string(),
    }
}

fn sample_record(song_a: &str, song_b: &str, global_score: f64) -> MatchRecord {
    MatchRecord {
        song_a: song_a.to_string(),
        song_b: song_b.to_string(),
        global_score,
        matching_verses: Vec::new(),
    }
}

#[test]
fn rounds_to_four_decimals() {
    assert_eq!(round4(0.123_456), 0.1235);
    assert_eq!(round4(0.123_44), 0.1234);
    assert_eq!(round4(1.0), 1.0);
    assert_eq!(round4(0.0), 0.0);
    assert_eq!(round4(-0.987_654), -0.9877);
}

#[test]
fn builds_records_in_discovery_order() {
    let songs = vec![
        song(0, "First", "line one"),
        song(1, "Second", "line two"),
        song(2, "Third", "line three"),
    ];
    let candidates = vec![
        CandidatePair { a: 0, b: 1, score: 0.7 },
        CandidatePair { a: 0, b: 2, score: 0.9 },
    ];
    let matcher = VerseMatcher::new(&ConstantEmbedder, 0.6, 3);

    let records = build_records(&songs, &candidates, &matcher).expect("Failed to build records");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].song_a, "First");
    assert_eq!(records[0].song_b, "Second");
    assert_eq!(records[1].song_b, "Third");
    // Evidence exists because every verse pair scores 1.0 > 0.6.
    assert_eq!(records[0].matching_verses.len(), 1);
    assert_eq!(records[0].matching_verses[0].score, 1.0);
}

#[test]
fn record_scores_are_rounded() {
    let songs = vec![song(0, "A", "x"), song(1, "B", "y")];
    let candidates = vec![CandidatePair {
        a: 0,
        b: 1,
        score: 0.712_345,
    }];
    let matcher = VerseMatcher::new(&ConstantEmbedder, 0.6, 3);

    let records = build_records(&songs, &candidates, &matcher).expect("Failed to build records");
    assert_eq!(records[0].global_score, 0.7123);
}

#[test]
fn empty_lyrics_yield_record_with_no_evidence() {
    let songs = vec![song(0, "Silent", "\n\n"), song(1, "Loud", "a verse")];
    let candidates = vec![CandidatePair { a: 0, b: 1, score: 0.8 }];
    let matcher = VerseMatcher::new(&ConstantEmbedder, 0.6, 3);

    let records = build_records(&songs, &candidates, &matcher).expect("Failed to build records");
    assert_eq!(records.len(), 1);
    assert!(records[0].matching_verses.is_empty());
}

#[test]
fn ranking_sorts_by_global_score_descending() {
    let mut records = vec![
        sample_record("A", "B", 0.5),
        sample_record("A", "C", 0.9),
        sample_record("B", "C", 0.7),
    ];
    rank_records(&mut records);

    let scores: Vec<f64> = records.iter().map(|r| r.global_score).collect();
    assert_eq!(scores, vec![0.9, 0.7, 0.5]);
}

#[test]
fn ranking_is_stable_on_ties() {
    let mut records = vec![
        sample_record("A", "B", 0.7),
        sample_record("A", "C", 0.7),
        sample_record("B", "C", 0.7),
    ];
    rank_records(&mut records);

    let pairs: Vec<(&str, &str)> = records
        .iter()
        .map(|r| (r.song_a.as_str(), r.song_b.as_str()))
        .collect();
    assert_eq!(pairs, vec![("A", "B"), ("A", "C"), ("B", "C")]);
}

#[test]
fn writes_indented_json() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("report.json");

    let records = vec![MatchRecord {
        song_a: "A".to_string(),
        song_b: "B".to_string(),
        global_score: 0.9123,
        matching_verses: vec![VerseEvidence {
            verse_a: "hold me now".to_string(),
            verse_b: "hold me tight".to_string(),
            score: 0.8001,
        }],
    }];

    write_report(&records, &path).expect("Failed to write report");

    let written = std::fs::read_to_string(&path).expect("Failed to read report back");
    assert!(written.contains("\"song_a\": \"A\""));
    assert!(written.contains("\"global_score\": 0.9123"));
    assert!(written.contains("\"score\": 0.8001"));

    let parsed: serde_json::Value =
        serde_json::from_str(&written).expect("Report is not valid JSON");
    assert_eq!(parsed.as_array().map(Vec::len), Some(1));
}

#[test]
fn write_failure_reports_attempted_path() {
    let records = vec![sample_record("A", "B", 0.9)];
    let missing_dir = Path::new("/nonexistent-dir/report.json");

    let result = write_report(&records, missing_dir);
    match result {
        Err(crate::LyricsError::Serialization { path, .. }) => {
            assert_eq!(path, missing_dir);
        }
        other => panic!("Expected serialization error, got {other:?}"),
    }
}

#[test]
fn no_temp_file_left_behind() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("report.json");

    write_report(&[], &path).expect("Failed to write report");

    let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
        .expect("Failed to list temp dir")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path() != path)
        .collect();
    assert!(leftovers.is_empty());
}
