#![expect(
    clippy::tests_outside_test_module,
    reason = "integration tests are only compiled in test mode"
)]

// Integration tests that require a local Ollama instance
// Run with: cargo test --test integration_ollama

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use lyricmatch::config::{AnalysisConfig, Config, OllamaConfig};
use lyricmatch::embeddings::{Embedder, OllamaClient};
use tracing::info;

const TEST_MODEL: &str = "nomic-embed-text:latest";
const DEFAULT_OLLAMA_HOST: &str = "localhost";
const DEFAULT_OLLAMA_PORT: u16 = 11434;

fn create_integration_test_client() -> OllamaClient {
    let host = env::var("OLLAMA_HOST").unwrap_or_else(|_| DEFAULT_OLLAMA_HOST.to_string());
    let port = env::var("OLLAMA_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_OLLAMA_PORT);
    let model = env::var("OLLAMA_MODEL").unwrap_or_else(|_| TEST_MODEL.to_string());

    let config = Config {
        ollama: OllamaConfig {
            protocol: "http".to_string(),
            host,
            port,
            model,
            batch_size: 5, // Smaller batch size for testing
        },
        analysis: AnalysisConfig::default(),
        base_dir: PathBuf::new(),
    };

    OllamaClient::new(&config)
        .expect("Failed to create Ollama client")
        .with_timeout(Duration::from_secs(60)) // Longer timeout for embedding generation
        .with_retry_attempts(3)
}

fn init_test_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init()
        .ok(); // Ignore error if already initialized
}

#[test]
fn real_ollama_health_check() {
    init_test_tracing();

    let client = create_integration_test_client();

    info!("Testing health check against real Ollama instance");
    let result = client.health_check();

    assert!(
        result.is_ok(),
        "Health check should succeed with local Ollama: {:?}",
        result
    );
}

#[test]
fn real_ollama_embeds_batch_in_order() {
    init_test_tracing();

    let client = create_integration_test_client();
    let texts = vec![
        "the rain falls on the empty street".to_string(),
        "chove na rua vazia".to_string(),
        "completely unrelated quartz xylophone".to_string(),
    ];

    let embeddings = client
        .embed_batch(&texts)
        .expect("Batch embedding should succeed with local Ollama");

    assert_eq!(embeddings.len(), texts.len());
    let dimension = embeddings[0].len();
    assert!(dimension > 0);
    for embedding in &embeddings {
        assert_eq!(embedding.len(), dimension);
    }
}

#[test]
fn real_ollama_embeddings_are_deterministic() {
    init_test_tracing();

    let client = create_integration_test_client();
    let texts = vec!["same text twice".to_string()];

    let first = client.embed_batch(&texts).expect("Embedding failed");
    let second = client.embed_batch(&texts).expect("Embedding failed");

    assert_eq!(first, second);
}
