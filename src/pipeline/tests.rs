use super::*;
use crate::config::AnalysisConfig;
use std::collections::HashMap;
use std::path::PathBuf;

struct MapEmbedder {
    vectors: HashMap<String, Vec<f32>>,
}

impl MapEmbedder {
    fn new(entries: &[(&str, Vec<f32>)]) -> Self {
        Self {
            vectors: entries
                .iter()
                .map(|(text, vector)| ((*text).to_string(), vector.clone()))
                .collect(),
        }
    }
}

impl Embedder for MapEmbedder {
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        texts
            .iter()
            .map(|text| {
                self.vectors
                    .get(text)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("no vector registered for {text:?}"))
            })
            .collect()
    }
}

struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    fn embed_batch(&self, _texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Err(anyhow::anyhow!("model unavailable"))
    }
}

fn song(index: usize, title: &str, lyrics: &str) -> Song {
    Song {
        index,
        title: title.to_string(),
        lyrics: lyrics.to_string(),
    }
}

fn settings(global: f32, local: f32, top_k: usize) -> AnalysisConfig {
    AnalysisConfig {
        global_threshold: global,
        local_threshold: local,
        top_k,
        output: PathBuf::from("report.json"),
    }
}

/// Unit vectors at 0, 25 and 60 degrees. Pairwise cosines: (0,1) ~0.906,
/// (1,2) ~0.819, (0,2) 0.5 — three distinct, known scores.
fn three_song_embedder() -> MapEmbedder {
    MapEmbedder::new(&[
        ("dawn breaks golden", vec![1.0, 0.0]),
        ("morning light rises", vec![0.906_307_8, 0.422_618_27]),
        ("night falls silent", vec![0.5, 0.866_025_4]),
    ])
}

fn three_songs() -> Vec<Song> {
    vec![
        song(0, "Dawn", "dawn breaks golden"),
        song(1, "Morning", "morning light rises"),
        song(2, "Night", "night falls silent"),
    ]
}

#[test]
fn report_is_ranked_by_global_score() {
    let embedder = three_song_embedder();
    let settings = settings(0.4, 0.6, 3);
    let pipeline = AnalysisPipeline::new(&embedder, &settings);

    let records = pipeline.run(&three_songs()).expect("Pipeline failed");

    let pairs: Vec<(&str, &str)> = records
        .iter()
        .map(|r| (r.song_a.as_str(), r.song_b.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![("Dawn", "Morning"), ("Morning", "Night"), ("Dawn", "Night")]
    );

    for window in records.windows(2) {
        assert!(window[0].global_score >= window[1].global_score);
    }
}

#[test]
fn verse_matching_runs_only_above_global_threshold() {
    let embedder = three_song_embedder();
    // Only (Dawn, Morning) at ~0.906 clears 0.85.
    let settings = settings(0.85, 0.6, 3);
    let pipeline = AnalysisPipeline::new(&embedder, &settings);

    let records = pipeline.run(&three_songs()).expect("Pipeline failed");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].song_a, "Dawn");
    assert_eq!(records[0].song_b, "Morning");
    // The single-line songs match each other strictly above 0.6.
    assert_eq!(records[0].matching_verses.len(), 1);
}

#[test]
fn weak_verse_evidence_is_dropped_but_pair_is_kept() {
    let embedder = three_song_embedder();
    let settings = settings(0.4, 0.6, 3);
    let pipeline = AnalysisPipeline::new(&embedder, &settings);

    let records = pipeline.run(&three_songs()).expect("Pipeline failed");

    // (Dawn, Night) verses score 0.5, below the 0.6 local threshold: the
    // record survives with an empty evidence list.
    let dawn_night = records
        .iter()
        .find(|r| r.song_a == "Dawn" && r.song_b == "Night")
        .expect("Pair missing from report");
    assert!(dawn_night.matching_verses.is_empty());
}

#[test]
fn no_candidates_yields_empty_report() {
    let embedder = three_song_embedder();
    let settings = settings(0.99, 0.6, 3);
    let pipeline = AnalysisPipeline::new(&embedder, &settings);

    let records = pipeline.run(&three_songs()).expect("Pipeline failed");
    assert!(records.is_empty());
}

#[test]
fn identical_songs_score_one() {
    let embedder = MapEmbedder::new(&[("same old song", vec![0.6, 0.8])]);
    let songs = vec![
        song(0, "Original", "same old song"),
        song(1, "Copy", "same old song"),
    ];
    let settings = settings(0.5, 0.6, 3);
    let pipeline = AnalysisPipeline::new(&embedder, &settings);

    let records = pipeline.run(&songs).expect("Pipeline failed");

    assert_eq!(records.len(), 1);
    assert!((records[0].global_score - 1.0).abs() < 1e-9);
    assert_eq!(records[0].matching_verses.len(), 1);
    assert!((records[0].matching_verses[0].score - 1.0).abs() < 1e-9);
}

#[test]
fn embedding_failure_aborts_run() {
    let settings = settings(0.5, 0.6, 3);
    let pipeline = AnalysisPipeline::new(&FailingEmbedder, &settings);

    let result = pipeline.run(&three_songs());
    assert!(matches!(result, Err(LyricsError::Embedding(_))));
}

#[test]
fn repeated_runs_serialize_identically() {
    let embedder = three_song_embedder();
    let settings = settings(0.4, 0.6, 3);
    let pipeline = AnalysisPipeline::new(&embedder, &settings);
    let songs = three_songs();

    let first = pipeline.run(&songs).expect("Pipeline failed");
    let second = pipeline.run(&songs).expect("Pipeline failed");

    let first_json = serde_json::to_string_pretty(&first).expect("Serialization failed");
    let second_json = serde_json::to_string_pretty(&second).expect("Serialization failed");
    assert_eq!(first_json, second_json);
}
