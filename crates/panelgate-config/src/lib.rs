#![deny(unsafe_code)]

//! Configuration loading and validation for panelgate.
//!
//! Loads TOML configuration files and validates them against expected
//! schemas. Provides the [`AppConfig`] type as the central configuration
//! structure. Every field in the `[panel]` section is optional at parse
//! time — a process running on the panel host needs no credentials at all —
//! but the fields that are present must be coherent.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level application configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Panel endpoint and credentials.
    #[serde(default)]
    pub panel: PanelConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Panel endpoint configuration.
///
/// All fields may stay empty when the process runs directly on the panel
/// host and uses the local binaries.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Origin URL of the panel's HTTP API (e.g. "https://panel.example.com:2083").
    #[serde(default)]
    pub url: String,

    /// Account username for HTTP Basic authentication.
    #[serde(default)]
    pub username: String,

    /// Account password for HTTP Basic authentication.
    #[serde(default)]
    pub password: String,

    /// Skip TLS certificate verification when talking to the panel.
    #[serde(default)]
    pub insecure_tls: bool,

    /// Log request targets and raw response bodies at debug level.
    #[serde(default)]
    pub trace_wire: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Whether the credentials are sufficient for a remote client is decided
    /// at client construction, not here — a host-local run never needs them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.panel.url.is_empty() {
            let parsed = url::Url::parse(&self.panel.url)
                .map_err(|e| ConfigError::Validation(format!("panel.url is not a URL: {e}")))?;
            if parsed.host_str().is_none_or(str::is_empty) {
                return Err(ConfigError::Validation(format!(
                    "panel.url {:?} has no host",
                    self.panel.url
                )));
            }
        }

        if self.panel.insecure_tls && self.panel.url.is_empty() {
            return Err(ConfigError::Validation(
                "panel.insecure_tls requires panel.url".to_string(),
            ));
        }

        if self.logging.level.is_empty() {
            return Err(ConfigError::Validation(
                "logging.level must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.panel.url.is_empty());
        assert!(!config.panel.insecure_tls);
        assert!(!config.panel.trace_wire);
        assert_eq!(config.logging.level, "info");
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config = AppConfig::parse("").unwrap();
        assert!(config.panel.username.is_empty());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
            [panel]
            url = "https://panel.example.com:2083"
            username = "alice"
            password = "hunter2"
            insecure_tls = true
            trace_wire = true

            [logging]
            level = "debug"
        "#;
        let config = AppConfig::parse(toml).unwrap();
        assert_eq!(config.panel.url, "https://panel.example.com:2083");
        assert_eq!(config.panel.username, "alice");
        assert!(config.panel.insecure_tls);
        assert!(config.panel.trace_wire);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_validation_rejects_non_url() {
        let toml = r#"
            [panel]
            url = "not a url"
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_hostless_url() {
        let toml = r#"
            [panel]
            url = "file:///etc/passwd"
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_insecure_without_url() {
        let toml = r#"
            [panel]
            insecure_tls = true
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_empty_log_level() {
        let toml = r#"
            [logging]
            level = ""
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    // ── Async file-based loading ──────────────────────────────────────

    #[tokio::test]
    async fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("panelgate.toml");
        tokio::fs::write(
            &path,
            b"[panel]\nurl = \"https://panel.example.com:2083\"\nusername = \"alice\"\n",
        )
        .await
        .unwrap();

        let config = AppConfig::load(&path).await.unwrap();
        assert_eq!(config.panel.username, "alice");
    }

    #[tokio::test]
    async fn test_load_nonexistent_file() {
        let result = AppConfig::load(Path::new("/nonexistent/file.toml")).await;
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[tokio::test]
    async fn test_load_invalid_toml_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        tokio::fs::write(&path, b"not valid toml [[[").await.unwrap();

        let result = AppConfig::load(&path).await;
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    // ── Error display ─────────────────────────────────────────────────

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("bad value".to_string());
        assert_eq!(err.to_string(), "validation error: bad value");
    }
}
