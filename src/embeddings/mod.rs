// Embedding backends. The pipeline only sees the `Embedder` trait; the
// concrete backend is the Ollama HTTP client.

pub mod ollama;

pub use ollama::OllamaClient;

use anyhow::Result;

/// Turns an ordered batch of texts into an ordered batch of equal-length
/// vectors, one per input. Implementations must be deterministic for a fixed
/// model and input so that repeated runs produce identical reports.
pub trait Embedder {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}
