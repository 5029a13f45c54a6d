//! TOML configuration for the command-line front end.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "questchat.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub generator: GeneratorConfig,
    pub state: StateConfig,
}

/// OpenAI-compatible chat-completions collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub endpoint: String,
    pub model: String,
    pub system_prompt: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// Name of the environment variable holding the bearer key.
    pub api_key_env: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            system_prompt: "You are a RPG guide.".to_string(),
            max_tokens: 1000,
            timeout_secs: 30,
            api_key_env: "API_KEY".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// The API key from the configured environment variable, if set and non-blank.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    pub path: PathBuf,
    pub pretty: bool,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("gamestate.json"),
            pretty: true,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Load the explicit file, else `questchat.toml` when present, else defaults.
    pub async fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path).await;
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fs::try_exists(fallback).await.unwrap_or(false) {
            log::debug!("using {DEFAULT_CONFIG_FILE} from the working directory");
            return Self::load(fallback).await;
        }
        Ok(Self::default())
    }

    /// Create a default configuration file
    pub async fn create_default(path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(&Self::default())
            .context("Failed to serialize default config")?;
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }
}
