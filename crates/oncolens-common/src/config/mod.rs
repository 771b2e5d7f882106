//! Configuration loading for OncoLens.
//! Reads oncolens.toml from the current directory or the path in ONCOLENS_CONFIG.
//! A missing file is not an error; every field has a default.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{OncoLensError, Result};

pub const CONFIG_ENV: &str = "ONCOLENS_CONFIG";
pub const BACKEND_URL_ENV: &str = "ONCOLENS_BACKEND_URL";
pub const BIND_ENV: &str = "ONCOLENS_BIND";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the prediction API, used for server-side calls.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// URL the browser uses for backend static images. Defaults to `base_url`.
    #[serde(default)]
    pub public_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Check chart images with HEAD before rendering them.
    #[serde(default = "bool_true")]
    pub probe_images: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            public_url: None,
            timeout_secs: default_timeout_secs(),
            probe_images: true,
        }
    }
}

impl BackendConfig {
    pub fn public_url(&self) -> &str {
        self.public_url.as_deref().unwrap_or(&self.base_url)
    }
}

fn default_base_url()     -> String { "http://localhost:8000".to_string() }
fn default_timeout_secs() -> u64    { 30 }
fn bool_true()            -> bool   { true }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

fn default_bind() -> String { "127.0.0.1:3001".to_string() }

mod tests;

impl Config {
    /// Load configuration, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV)
            .unwrap_or_else(|_| "oncolens.toml".to_string());

        let mut config = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            tracing::debug!(path = %path, "No config file found, using defaults");
            Self::default()
        };

        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            config.backend.base_url = url;
        }
        if let Ok(bind) = std::env::var(BIND_ENV) {
            config.server.bind = bind;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| OncoLensError::Config(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        let url = &self.backend.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(OncoLensError::Config(format!(
                "backend.base_url must be an http(s) URL, got {url:?}"
            )));
        }
        if self.backend.timeout_secs == 0 {
            return Err(OncoLensError::Config("backend.timeout_secs must be > 0".into()));
        }
        Ok(())
    }
}
