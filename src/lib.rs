use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LyricsError>;

#[derive(Error, Debug)]
pub enum LyricsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Corpus error: {0}")]
    Load(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Failed to write report to {}: {reason}", path.display())]
    Serialization { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod classifier;
pub mod commands;
pub mod config;
pub mod corpus;
pub mod embeddings;
pub mod frequency;
pub mod matching;
pub mod pipeline;
pub mod report;
pub mod similarity;
