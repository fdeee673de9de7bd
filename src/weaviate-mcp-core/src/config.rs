use serde::{Deserialize, Serialize};

use crate::credentials::{Credentials, ProviderKeys};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub weaviate_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub provider_keys: ProviderKeys,

    // Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is not set, e.g. "info" or
    /// "weaviate_mcp_rs=debug"
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> anyhow::Result<Self> {
        let config: Config = serde_json::from_str(contents)?;
        Ok(config)
    }

    /// Fresh credentials for one call; the config itself is never handed to
    /// the client
    pub fn credentials(&self) -> Credentials {
        Credentials {
            base_url: self.weaviate_url.clone(),
            api_key: self.api_key.clone(),
            provider_keys: self.provider_keys.clone(),
        }
    }
}
