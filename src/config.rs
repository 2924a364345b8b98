//! Configuration management for docbox
//!
//! Separates startup configuration (requires restart) from runtime configuration
//! (shared with the running server).

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Complete server configuration with startup/runtime separation
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(flatten)]
    pub startup: StartupConfig,

    #[serde(flatten)]
    pub runtime: RuntimeConfig,
}

/// Configuration that requires a restart to take effect
#[derive(Debug, Deserialize, Clone)]
pub struct StartupConfig {
    // ═══ NETWORK (Environment Override Supported) ═══
    /// IP address to bind the request listener
    pub bind_address: String,

    /// Port for the request listener (0 picks a free port)
    pub port: u16,

    // ═══ SANDBOX ═══
    /// Directory every file operation is confined to
    pub sandbox_root: String,

    // ═══ INTERNAL BEHAVIOR ═══
    /// Longest accepted request line in bytes
    pub max_request_length: usize,

    /// Idle time after which a connection is closed
    pub connection_timeout_secs: u64,
}

/// Configuration shared with the running server
#[derive(Debug, Deserialize, Clone)]
pub struct RuntimeConfig {
    /// Maximum concurrent connections
    /// Environment: DOCBOX_MAX_CLIENTS
    pub max_clients: usize,

    /// Requests allowed per connection per minute
    /// Environment: DOCBOX_MAX_REQUESTS_PER_MINUTE
    pub max_requests_per_minute: usize,
}

/// Thread-safe runtime configuration wrapper
pub type SharedRuntimeConfig = Arc<RwLock<RuntimeConfig>>;

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 7878,
            sandbox_root: "./documents".to_string(),
            max_request_length: 1024 * 1024,
            connection_timeout_secs: 300,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_clients: 10,
            max_requests_per_minute: 120,
        }
    }
}

impl ServerConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        // Installed layout first, then the working directory
        let config_paths = ["docbox/config", "config"];

        let mut last_error = None;

        for config_path in &config_paths {
            match Self::build(File::with_name(config_path)) {
                Ok(config) => return Ok(config),
                Err(e) => last_error = Some(e),
            }
        }

        Err(config::ConfigError::Message(format!(
            "Failed to load config.toml from any location. Tried: {config_paths:?}. Last error: {last_error:?}"
        )))
    }

    /// Parse configuration from TOML text, still honouring environment overrides
    pub fn from_toml(source: &str) -> Result<Self, config::ConfigError> {
        Self::build(File::from_str(source, FileFormat::Toml))
    }

    fn build<S>(source: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = Config::builder()
            .add_source(source)
            .add_source(
                Environment::with_prefix("DOCBOX")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Split into startup (immutable) and runtime (shared) parts
    pub fn split(self) -> (StartupConfig, SharedRuntimeConfig) {
        let runtime = Arc::new(RwLock::new(self.runtime));
        (self.startup, runtime)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.startup.sandbox_root.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "sandbox_root cannot be empty".into(),
            ));
        }

        if self.startup.max_request_length < 64 {
            return Err(config::ConfigError::Message(
                "max_request_length must be at least 64 bytes".into(),
            ));
        }

        if self.startup.connection_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "connection_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.runtime.max_clients == 0 {
            return Err(config::ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        if self.runtime.max_requests_per_minute == 0 {
            return Err(config::ConfigError::Message(
                "max_requests_per_minute must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

impl StartupConfig {
    /// Get bind address and port as socket address
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Get sandbox root as PathBuf
    pub fn sandbox_root_path(&self) -> PathBuf {
        PathBuf::from(&self.sandbox_root)
    }

    /// Get connection timeout as Duration
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        bind_address = "0.0.0.0"
        port = 9100
        sandbox_root = "/srv/documents"
        max_request_length = 4096
        connection_timeout_secs = 30
        max_clients = 4
        max_requests_per_minute = 60
    "#;

    #[test]
    fn parses_flattened_sections() {
        let config = ServerConfig::from_toml(SAMPLE).unwrap();

        assert_eq!(config.startup.listen_address(), "0.0.0.0:9100");
        assert_eq!(config.startup.sandbox_root_path(), PathBuf::from("/srv/documents"));
        assert_eq!(config.startup.connection_timeout(), Duration::from_secs(30));
        assert_eq!(config.runtime.max_clients, 4);
    }

    #[test]
    fn rejects_zero_clients() {
        let source = SAMPLE.replace("max_clients = 4", "max_clients = 0");
        let err = ServerConfig::from_toml(&source).unwrap_err();
        assert!(err.to_string().contains("max_clients"));
    }

    #[test]
    fn rejects_empty_sandbox_root() {
        let source = SAMPLE.replace("\"/srv/documents\"", "\"\"");
        assert!(ServerConfig::from_toml(&source).is_err());
    }
}
