use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Select};
use std::path::Path;

use super::{AnalysisConfig, Config, OllamaConfig};
use crate::embeddings::ollama::OllamaClient;

#[inline]
pub fn run_interactive_config(config_dir: &Path) -> Result<()> {
    eprintln!("{}", style("Lyricmatch Configuration Setup").bold().cyan());
    eprintln!();

    let mut config = load_existing_config(config_dir)?;

    eprintln!("{}", style("Ollama Configuration").bold().yellow());
    eprintln!("Configure your local Ollama instance for embedding generation.");
    eprintln!();

    configure_ollama(&mut config.ollama)?;

    eprintln!();
    eprintln!("{}", style("Analysis Thresholds").bold().yellow());
    eprintln!();

    configure_analysis(&mut config.analysis)?;

    eprintln!();
    eprintln!("{}", style("Testing configuration...").yellow());

    if test_ollama_connection(&config) {
        eprintln!("{}", style("✓ Ollama connection successful!").green());
    } else {
        eprintln!(
            "{}",
            style("⚠ Warning: Could not connect to Ollama").yellow()
        );
        eprintln!("You can continue, but make sure Ollama is running before analyzing.");
    }

    eprintln!();
    if Confirm::new()
        .with_prompt("Save configuration?")
        .default(true)
        .interact()?
    {
        config.save().context("Failed to save configuration")?;
        eprintln!("{}", style("✓ Configuration saved successfully!").green());
        eprintln!(
            "Configuration saved to: {}",
            style(config.config_file_path().display()).cyan()
        );
    } else {
        eprintln!("Configuration not saved.");
    }

    Ok(())
}

#[inline]
pub fn show_config(config_dir: &Path) -> Result<()> {
    let config = Config::load(config_dir).context("Failed to load configuration")?;

    eprintln!("{}", style("Current Configuration").bold().cyan());
    eprintln!();

    eprintln!("{}", style("Ollama Settings:").bold().yellow());
    eprintln!("  Host: {}", style(&config.ollama.host).cyan());
    eprintln!("  Port: {}", style(config.ollama.port).cyan());
    eprintln!("  Model: {}", style(&config.ollama.model).cyan());
    eprintln!("  Batch Size: {}", style(config.ollama.batch_size).cyan());

    eprintln!();
    eprintln!("{}", style("Analysis Settings:").bold().yellow());
    eprintln!(
        "  Global threshold (inclusive): {}",
        style(config.analysis.global_threshold).cyan()
    );
    eprintln!(
        "  Verse threshold (exclusive): {}",
        style(config.analysis.local_threshold).cyan()
    );
    eprintln!("  Top verses per pair: {}", style(config.analysis.top_k).cyan());
    eprintln!(
        "  Report path: {}",
        style(config.analysis.output.display()).cyan()
    );

    eprintln!();
    match config.ollama_url() {
        Ok(url) => eprintln!("  Ollama URL: {}", style(url).cyan()),
        Err(e) => eprintln!("  Ollama URL: {} ({})", style("Invalid").red(), e),
    }

    eprintln!();
    eprintln!(
        "Config file: {}",
        style(config.config_file_path().display()).dim()
    );

    Ok(())
}

fn load_existing_config(config_dir: &Path) -> Result<Config> {
    let config = Config::load(config_dir)?;
    if config.config_file_path().exists() {
        eprintln!("{}", style("Found existing configuration.").green());
    } else {
        eprintln!(
            "{}",
            style("No existing configuration found. Using defaults.").yellow()
        );
    }
    Ok(config)
}

fn configure_ollama(ollama: &mut OllamaConfig) -> Result<()> {
    let protocols = &["http", "https"];
    let default_index = protocols
        .iter()
        .position(|&p| p == ollama.protocol)
        .unwrap_or(0);

    let protocol_index = Select::new()
        .with_prompt("Ollama protocol")
        .default(default_index)
        .items(protocols)
        .interact()?;

    ollama.protocol = protocols[protocol_index].to_string();

    ollama.host = Input::new()
        .with_prompt("Ollama host")
        .default(ollama.host.clone())
        .interact_text()?;

    ollama.port = Input::new()
        .with_prompt("Ollama port")
        .default(ollama.port)
        .validate_with(|input: &u16| -> Result<(), &str> {
            if *input == 0 {
                Err("Port must be greater than 0")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    ollama.model = Input::new()
        .with_prompt("Embedding model")
        .default(ollama.model.clone())
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("Model name cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    ollama.batch_size = Input::new()
        .with_prompt("Embedding batch size")
        .default(ollama.batch_size)
        .validate_with(|input: &u32| -> Result<(), &str> {
            if *input == 0 || *input > 1000 {
                Err("Batch size must be between 1 and 1000")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    Ok(())
}

fn configure_analysis(analysis: &mut AnalysisConfig) -> Result<()> {
    analysis.global_threshold = Input::new()
        .with_prompt("Global similarity threshold (inclusive)")
        .default(analysis.global_threshold)
        .validate_with(validate_threshold)
        .interact_text()?;

    analysis.local_threshold = Input::new()
        .with_prompt("Verse similarity threshold (exclusive)")
        .default(analysis.local_threshold)
        .validate_with(validate_threshold)
        .interact_text()?;

    analysis.top_k = Input::new()
        .with_prompt("Verse pairs reported per song pair")
        .default(analysis.top_k)
        .validate_with(|input: &usize| -> Result<(), &str> {
            if *input == 0 {
                Err("Top-k must be at least 1")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    Ok(())
}

#[expect(clippy::trivially_copy_pass_by_ref, reason = "dialoguer validator signature")]
fn validate_threshold(input: &f32) -> Result<(), &'static str> {
    if (-1.0..=1.0).contains(input) {
        Ok(())
    } else {
        Err("Threshold must be between -1.0 and 1.0")
    }
}

fn test_ollama_connection(config: &Config) -> bool {
    OllamaClient::new(config)
        .and_then(|client| client.ping())
        .is_ok()
}
