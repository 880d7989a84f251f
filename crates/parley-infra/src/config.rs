//! Client configuration loader for Parley.
//!
//! Reads `config.toml` from the data directory (`~/.parley/` in production)
//! and deserializes it into [`ClientConfig`]. Falls back to sensible defaults
//! when the file is missing or malformed.

use std::path::Path;
use std::time::Duration;

use parley_types::config::ClientConfig;

/// Minimum per-request transport timeout (safety floor).
const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;

/// Load client configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ClientConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_client_config(data_dir: &Path) -> ClientConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ClientConfig::default()
        }
    }
}

/// Apply a command-line/env override on top of the loaded config.
pub fn apply_base_url_override(mut config: ClientConfig, base_url: Option<String>) -> ClientConfig {
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }
    config
}

/// Resolve the per-request transport timeout.
///
/// A floor of one second is enforced so a zero in the config file cannot
/// make every request fail immediately.
pub fn resolve_request_timeout(config: &ClientConfig) -> Duration {
    Duration::from_secs(config.request_timeout_secs.max(MIN_REQUEST_TIMEOUT_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_client_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_client_config(tmp.path()).await;
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[tokio::test]
    async fn load_client_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
base_url = "https://chat.example.com"
request_timeout_secs = 10
"#,
        )
        .await
        .unwrap();

        let config = load_client_config(tmp.path()).await;
        assert_eq!(config.base_url, "https://chat.example.com");
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[tokio::test]
    async fn load_client_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_client_config(tmp.path()).await;
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn base_url_override_wins() {
        let config = apply_base_url_override(
            ClientConfig::default(),
            Some("http://10.0.0.2:9000".to_string()),
        );
        assert_eq!(config.base_url, "http://10.0.0.2:9000");

        let config = apply_base_url_override(ClientConfig::default(), None);
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn resolve_request_timeout_enforces_minimum() {
        let config = ClientConfig {
            request_timeout_secs: 0,
            ..ClientConfig::default()
        };
        assert_eq!(resolve_request_timeout(&config), Duration::from_secs(1));

        let config = ClientConfig::default();
        assert_eq!(resolve_request_timeout(&config), Duration::from_secs(30));
    }
}
