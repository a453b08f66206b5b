// Configuration management: TOML settings plus interactive setup

pub mod interactive;
pub mod settings;

pub use interactive::{run_interactive_config, show_config};
pub use settings::{AnalysisConfig, Config, ConfigError, OllamaConfig};

/// Resolve the default configuration directory for the application
#[inline]
pub fn default_config_dir() -> Result<std::path::PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("lyricmatch"))
        .ok_or(ConfigError::DirectoryError)
}
