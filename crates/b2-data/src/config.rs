//! Gateway endpoint configuration

use serde::{Deserialize, Serialize};

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5001";

/// Environment variable that overrides everything else.
const BASE_URL_ENV: &str = "B2EDIT_BASE_URL";

/// Optional config file looked up in the working directory.
const CONFIG_FILE: &str = "b2edit.json";

/// Where the backend serving `/upload`, `/options` and `/save` lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub base_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl GatewayConfig {
    /// Resolve the configuration: environment override first, then
    /// `b2edit.json` beside the working directory, then the default.
    pub fn load() -> Self {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.is_empty() {
                return Self { base_url: url };
            }
        }

        match std::fs::read_to_string(CONFIG_FILE) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(config) => config,
                Err(error) => {
                    tracing::warn!("Ignoring malformed {}: {}", CONFIG_FILE, error);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}
