use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lyricmatch::commands::{AnalyzeOverrides, analyze, classify_corpus, frequencies};
use lyricmatch::config::{default_config_dir, run_interactive_config, show_config};
use lyricmatch::Result;

#[derive(Parser)]
#[command(name = "lyricmatch")]
#[command(about = "Finds near-duplicate songs in a lyrics corpus and reports the verses behind the overlap")]
#[command(version)]
struct Cli {
    /// Override the configuration directory
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the two-stage similarity analysis and write the JSON report
    Analyze {
        /// Directory containing the corpus CSV files
        #[arg(default_value = "dataset")]
        dataset: PathBuf,
        /// Report output path (defaults to the configured path)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Whole-song similarity threshold, inclusive
        #[arg(long)]
        global_threshold: Option<f32>,
        /// Verse similarity threshold, exclusive
        #[arg(long)]
        local_threshold: Option<f32>,
        /// Verse pairs reported per song pair
        #[arg(long)]
        top_k: Option<usize>,
        /// Embedding model to use for this run
        #[arg(long)]
        model: Option<String>,
    },
    /// Show word frequencies and TF-IDF key terms for the corpus
    Frequencies {
        /// Directory containing the corpus CSV files
        #[arg(default_value = "dataset")]
        dataset: PathBuf,
        /// Number of corpus-wide words to list
        #[arg(long, default_value_t = 20)]
        top: usize,
        /// Number of songs to show key terms for
        #[arg(long, default_value_t = 15)]
        sample: usize,
    },
    /// Classify each song's mood from keyword dictionaries
    Classify {
        /// Directory containing the corpus CSV files
        #[arg(default_value = "dataset")]
        dataset: PathBuf,
        /// Optional CSV export path
        #[arg(long)]
        output: Option<PathBuf>,
        /// Number of songs to show in the sample listing
        #[arg(long, default_value_t = 10)]
        sample: usize,
    },
    /// Configure the Ollama connection and analysis thresholds
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => default_config_dir().map_err(|e| lyricmatch::LyricsError::Config(e.to_string()))?,
    };

    match cli.command {
        Commands::Analyze {
            dataset,
            output,
            global_threshold,
            local_threshold,
            top_k,
            model,
        } => {
            analyze(
                &config_dir,
                &dataset,
                AnalyzeOverrides {
                    output,
                    global_threshold,
                    local_threshold,
                    top_k,
                    model,
                },
            )?;
        }
        Commands::Frequencies { dataset, top, sample } => {
            frequencies(&dataset, top, sample)?;
        }
        Commands::Classify { dataset, output, sample } => {
            classify_corpus(&dataset, output.as_deref(), sample)?;
        }
        Commands::Config { show } => {
            if show {
                show_config(&config_dir)?;
            } else {
                run_interactive_config(&config_dir)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn cli_parsing() {
        let cli = Cli::try_parse_from(["lyricmatch", "analyze"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            matches!(parsed.command, Commands::Analyze { .. });
        }
    }

    #[test]
    fn analyze_with_overrides() {
        let cli = Cli::try_parse_from([
            "lyricmatch",
            "analyze",
            "songs",
            "--global-threshold",
            "0.7",
            "--top-k",
            "5",
        ]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Analyze {
                dataset,
                global_threshold,
                top_k,
                ..
            } = parsed.command
            {
                assert_eq!(dataset, PathBuf::from("songs"));
                assert_eq!(global_threshold, Some(0.7));
                assert_eq!(top_k, Some(5));
            }
        }
    }

    #[test]
    fn frequencies_defaults() {
        let cli = Cli::try_parse_from(["lyricmatch", "frequencies"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Frequencies { dataset, top, sample } = parsed.command {
                assert_eq!(dataset, PathBuf::from("dataset"));
                assert_eq!(top, 20);
                assert_eq!(sample, 15);
            }
        }
    }

    #[test]
    fn classify_with_output() {
        let cli = Cli::try_parse_from(["lyricmatch", "classify", "--output", "moods.csv"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Classify { output, .. } = parsed.command {
                assert_eq!(output, Some(PathBuf::from("moods.csv")));
            }
        }
    }

    #[test]
    fn config_show_flag() {
        let cli = Cli::try_parse_from(["lyricmatch", "config", "--show"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Config { show } = parsed.command {
                assert!(show);
            }
        }
    }

    #[test]
    fn invalid_command() {
        let cli = Cli::try_parse_from(["lyricmatch", "invalid"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
        }
    }

    #[test]
    fn help_message() {
        let cli = Cli::try_parse_from(["lyricmatch", "--help"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        }
    }
}
