use std::path::{Path, PathBuf};

use console::style;
use tracing::info;

use crate::classifier;
use crate::config::Config;
use crate::corpus;
use crate::embeddings::OllamaClient;
use crate::frequency::FrequencyAnalysis;
use crate::pipeline::AnalysisPipeline;
use crate::report;
use crate::Result;

/// Per-run overrides taken from the command line; anything left `None`
/// falls back to the saved configuration.
#[derive(Debug, Default, Clone)]
pub struct AnalyzeOverrides {
    pub output: Option<PathBuf>,
    pub global_threshold: Option<f32>,
    pub local_threshold: Option<f32>,
    pub top_k: Option<usize>,
    pub model: Option<String>,
}

/// Run the full similarity analysis and write the ranked JSON report.
#[inline]
pub fn analyze(config_dir: &Path, dataset: &Path, overrides: AnalyzeOverrides) -> Result<()> {
    let mut config = Config::load(config_dir)?;

    if let Some(output) = overrides.output {
        config.analysis.output = output;
    }
    if let Some(global) = overrides.global_threshold {
        config.analysis.global_threshold = global;
    }
    if let Some(local) = overrides.local_threshold {
        config.analysis.local_threshold = local;
    }
    if let Some(top_k) = overrides.top_k {
        config.analysis.top_k = top_k;
    }
    if let Some(model) = overrides.model {
        config.ollama.model = model;
    }
    config
        .validate()
        .map_err(|e| crate::LyricsError::Config(e.to_string()))?;

    let songs = corpus::load_corpus(dataset)?;
    eprintln!(
        "{}",
        style(format!("Loaded {} songs from {}", songs.len(), dataset.display())).cyan()
    );

    let client = OllamaClient::new(&config)?;
    client
        .health_check()
        .map_err(|e| crate::LyricsError::Embedding(format!("Ollama health check: {e:#}")))?;

    info!("Analyzing corpus with model {}", config.ollama.model);

    let pipeline = AnalysisPipeline::new(&client, &config.analysis);
    let records = pipeline.run(&songs)?;

    report::write_report(&records, &config.analysis.output)?;

    eprintln!(
        "{}",
        style(format!(
            "✓ {} similar song pairs written to {}",
            records.len(),
            config.analysis.output.display()
        ))
        .green()
    );
    if let Some(top) = records.first() {
        eprintln!(
            "Most similar pair: {} x {} ({:.4})",
            style(&top.song_a).bold(),
            style(&top.song_b).bold(),
            top.global_score
        );
    }

    Ok(())
}

/// Print the corpus-wide vocabulary and per-song TF-IDF key terms.
#[inline]
pub fn frequencies(dataset: &Path, top: usize, sample: usize) -> Result<()> {
    let songs = corpus::load_corpus(dataset)?;
    let analysis = FrequencyAnalysis::new(&songs);

    println!(
        "{}",
        style(format!("Top {top} words across the corpus")).bold().cyan()
    );
    for (word, count) in analysis.top_words(top) {
        println!("  {word}: {count}");
    }

    println!();
    println!(
        "{}",
        style(format!("Key terms per song (first {sample})")).bold().cyan()
    );
    for song in songs.iter().take(sample) {
        let terms = analysis.key_terms(song.index, 5);
        println!("  {} -> {}", style(&song.title).bold(), terms.join(", "));
    }

    Ok(())
}

/// Classify every song's mood and optionally export the result as CSV.
#[inline]
pub fn classify_corpus(dataset: &Path, output: Option<&Path>, sample: usize) -> Result<()> {
    let songs = corpus::load_corpus(dataset)?;
    let classifications: Vec<_> = songs.iter().map(|s| classifier::classify(&s.lyrics)).collect();

    let mut histogram: Vec<(classifier::Mood, usize)> = Vec::new();
    for classification in &classifications {
        match histogram.iter_mut().find(|(mood, _)| *mood == classification.mood) {
            Some((_, count)) => *count += 1,
            None => histogram.push((classification.mood, 1)),
        }
    }
    histogram.sort_by(|x, y| y.1.cmp(&x.1));

    println!("{}", style("Mood summary").bold().cyan());
    for (mood, count) in &histogram {
        println!("  {mood}: {count}");
    }

    println!();
    println!("{}", style(format!("Sample (first {sample})")).bold().cyan());
    for (song, classification) in songs.iter().zip(&classifications).take(sample) {
        let roots = classification
            .hits
            .iter()
            .map(|hit| format!("{}({})", hit.root, hit.count))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  {} -> {} [{}]",
            style(&song.title).bold(),
            classification.mood,
            roots
        );
    }

    if let Some(path) = output {
        classifier::write_classifications(&songs, &classifications, path)?;
        println!();
        println!(
            "{}",
            style(format!("✓ Classification exported to {}", path.display())).green()
        );
    }

    Ok(())
}
