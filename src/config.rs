//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Measurement store configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageConfig {
    /// SQLite database file; parent directories are created on startup
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_db_path() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("airlog").join("app.db").to_string_lossy().to_string())
        .unwrap_or_else(|| "./db/app.db".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served for non-API paths, with `index.html` as fallback
    #[serde(default)]
    pub static_dir: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from an explicit path, or from default locations or environment.
    ///
    /// An explicit path that cannot be read or parsed is an error.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => {
                let config = Self::load_with_env(path)?;
                tracing::info!("Loaded config from {:?}", path);
                Ok(config)
            }
            None => Ok(Self::load_default()),
        }
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("airlog").join("config.toml")),
            Some(PathBuf::from("/etc/airlog/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply `AIRLOG_*` environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(db_path) = lookup("AIRLOG_DB_PATH") {
            self.storage.db_path = db_path;
        }

        if let Some(host) = lookup("AIRLOG_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("AIRLOG_PORT") {
            match port.parse() {
                Ok(p) => self.api.port = p,
                Err(_) => tracing::warn!("Ignoring invalid AIRLOG_PORT value: {}", port),
            }
        }
        if let Some(dir) = lookup("AIRLOG_STATIC_DIR") {
            self.api.static_dir = Some(dir);
        }

        if let Some(level) = lookup("AIRLOG_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("AIRLOG_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Airlog Configuration
#
# Environment variables override these settings:
# - AIRLOG_DB_PATH
# - AIRLOG_HOST
# - AIRLOG_PORT
# - AIRLOG_STATIC_DIR
# - AIRLOG_LOG_LEVEL
# - AIRLOG_LOG_FORMAT

[storage]
# SQLite database file
db_path = "./db/app.db"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 3001

# Directory with the dashboard build, served for non-API paths
# static_dir = "./static"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.storage.db_path, "./db/app.db");
        assert_eq!(config.api.port, 3001);
        assert_eq!(config.api.static_dir, None);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::parse("[api]\nport = 8080\n").unwrap();
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::parse("[api\nport = "),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("AIRLOG_DB_PATH", "/tmp/x.db"),
            ("AIRLOG_PORT", "4000"),
            ("AIRLOG_STATIC_DIR", "/srv/static"),
            ("AIRLOG_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.storage.db_path, "/tmp/x.db");
        assert_eq!(config.api.port, 4000);
        assert_eq!(config.api.static_dir.as_deref(), Some("/srv/static"));
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.api.host, "0.0.0.0");
    }

    #[test]
    fn test_invalid_port_override_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|k| (k == "AIRLOG_PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.api.port, 3001);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/airlog.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[storage]\ndb_path = \"data.db\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.storage.db_path, "data.db");
    }

    #[test]
    fn test_addr() {
        assert_eq!(ApiConfig::new("127.0.0.1", 9000).addr(), "127.0.0.1:9000");
    }
}
