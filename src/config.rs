use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the Reel Animator client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Video generation settings
    pub generation: GenerationConfig,

    /// Job polling settings
    pub polling: PollingConfig,

    /// Credential lookup settings
    pub credentials: CredentialConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Video model identifier
    pub model: String,

    /// Output resolution
    pub resolution: String,

    /// Output aspect ratio (portrait for Reels)
    pub aspect_ratio: String,

    /// Number of videos to generate per request
    pub sample_count: u32,

    /// Base URL of the video API
    pub api_base_url: String,

    /// Per-request HTTP timeout (seconds)
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Delay between status checks (seconds)
    pub interval_seconds: u64,

    /// Maximum number of status checks before giving up.
    /// `None` polls until the service reports the job done.
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialConfig {
    /// Environment variable holding the API key
    pub env_var: String,
}

impl Config {
    /// Load configuration from a file, or from well-known locations
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            let config_str = std::fs::read_to_string(path)
                .map_err(|e| anyhow!("Cannot read config file {}: {}", path.display(), e))?;
            let config = toml::from_str(&config_str)
                .map_err(|e| anyhow!("Failed to parse config file {}: {}", path.display(), e))?;
            tracing::info!("📄 Loaded configuration from: {}", path.display());
            return Ok(config);
        }

        let config_paths = ["reel-animator.toml", "config/reel-animator.toml"];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str(&config_str) {
                    Ok(config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Err(anyhow!("No configuration file found"))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(model) = std::env::var("REEL_ANIMATOR_MODEL") {
            self.generation.model = model;
        }

        if let Ok(interval) = std::env::var("REEL_ANIMATOR_POLL_INTERVAL") {
            if let Ok(secs) = interval.parse() {
                self.polling.interval_seconds = secs;
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.generation.sample_count == 0 {
            return Err(anyhow!("sample_count must be greater than 0"));
        }

        if self.polling.interval_seconds == 0 {
            return Err(anyhow!("interval_seconds must be greater than 0"));
        }

        if self.polling.max_attempts == Some(0) {
            return Err(anyhow!("max_attempts must be greater than 0 when set"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generation: GenerationConfig {
                model: "veo-3.1-fast-generate-preview".to_string(),
                resolution: "720p".to_string(),
                aspect_ratio: "9:16".to_string(), // Portrait for Reels
                sample_count: 1,
                api_base_url: "https://generativelanguage.googleapis.com".to_string(),
                request_timeout_seconds: 60,
            },
            polling: PollingConfig {
                interval_seconds: 5,
                max_attempts: Some(120), // 10 minutes at the default interval
            },
            credentials: CredentialConfig {
                env_var: "GEMINI_API_KEY".to_string(),
            },
        }
    }
}
