//! Application configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Uploaded content storage.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Upload limits.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Admin gate configuration.
    pub admin: AdminConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL (`sqlite://...` or `postgres://...`).
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Local content storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory that uploaded files are written under.
    #[serde(default = "default_base_path")]
    pub base_path: PathBuf,
    /// URL prefix the content directory is served from.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Upload limits.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Maximum size of a single uploaded file in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,
}

/// Admin gate configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Argon2 PHC string of the admin passphrase.
    pub passphrase_hash: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            base_url: default_base_url(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

fn default_database_url() -> String {
    "sqlite://schoolboard.db?mode=rwc".to_string()
}

const fn default_max_connections() -> u32 {
    10
}

const fn default_min_connections() -> u32 {
    1
}

fn default_base_path() -> PathBuf {
    PathBuf::from("./static")
}

fn default_base_url() -> String {
    "/static".to_string()
}

const fn default_max_file_size() -> usize {
    50 * 1024 * 1024
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` (if present, values are exported into the environment)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `SCHOOLBOARD_ENV`)
    /// 4. Environment variables with `SCHOOLBOARD_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("SCHOOLBOARD_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("SCHOOLBOARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("SCHOOLBOARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8000);

        let storage = StorageConfig::default();
        assert_eq!(storage.base_url, "/static");
        assert_eq!(storage.base_path, PathBuf::from("./static"));

        assert_eq!(UploadConfig::default().max_file_size, 50 * 1024 * 1024);
        assert!(DatabaseConfig::default().url.starts_with("sqlite://"));
    }

    #[test]
    fn test_from_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schoolboard.toml");
        std::fs::write(
            &path,
            "[admin]\npassphrase_hash = \"$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA\"\n\n[server]\nport = 9001\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.max_connections, 10);
        assert!(config.admin.passphrase_hash.starts_with("$argon2id"));
    }

    #[test]
    fn test_from_file_requires_admin_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schoolboard.toml");
        std::fs::write(&path, "[server]\nport = 9001\n").unwrap();

        assert!(Config::from_file(&path).is_err());
    }
}
