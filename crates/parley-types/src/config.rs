//! Client configuration types for Parley.
//!
//! `ClientConfig` represents the `config.toml` that points the client at a
//! session API and bounds how long a single request may take.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Parley client.
///
/// Loaded from `~/.parley/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the chat backend (without the `/api` prefix).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Transport timeout for a single HTTP request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default_values() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_client_config_deserialize_with_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_client_config_deserialize_with_values() {
        let toml_str = r#"
base_url = "https://chat.example.com"
request_timeout_secs = 5
"#;
        let config: ClientConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.base_url, "https://chat.example.com");
        assert_eq!(config.request_timeout_secs, 5);
    }
}
