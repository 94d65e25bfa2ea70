//! API server configuration.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use mb_pest_engine::EngineConfig;

/// Top-level API server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl ApiConfig {
    /// Load config from a TOML file. Missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self =
            toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Override fields from `MB_HOST`, `MB_PORT`, `MB_MODEL_DIR` and `MB_KNOWLEDGE_BASE`.
    pub fn apply_env(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(host) = lookup("MB_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("MB_PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!(value = %port, "ignoring invalid MB_PORT"),
            }
        }
        if let Some(dir) = lookup("MB_MODEL_DIR") {
            self.engine.model_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup("MB_KNOWLEDGE_BASE") {
            self.engine.knowledge_base_path = PathBuf::from(path);
        }
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            engine: EngineConfig::default(),
        }
    }
}
