use crate::core::db::connection::ConnectionProfile;
use crate::core::db::sqlite::SQLITE_PROVIDER_NAME;
use crate::core::{Result, SimqlError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub logging: Option<LoggingConfig>,
}

/// Connection profile configuration.
#[derive(Debug, Deserialize)]
pub struct ConnectionConfig {
    /// Provider display name; defaults to the bundled SQLite provider.
    pub provider: Option<String>,
    pub connection_string: String,
}

impl ConnectionConfig {
    pub fn to_profile(&self) -> ConnectionProfile {
        ConnectionProfile::new(
            self.provider
                .clone()
                .unwrap_or_else(|| SQLITE_PROVIDER_NAME.to_string()),
            self.connection_string.clone(),
        )
    }
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

/// Loads configuration from a TOML file at the given path.
///
/// # Errors
///
/// Returns `SimqlError::Config` when the file cannot be read or parsed,
/// naming the path in the message.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| SimqlError::Config(format!("failed to read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| SimqlError::Config(format!("failed to parse {}: {}", path.display(), e)))
}

/// Default location of the user configuration file,
/// `<config_dir>/simql/simql.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("simql").join("simql.toml"))
}

/// Loads the user configuration if the default file exists. A missing file
/// is not an error; it simply yields `None`.
pub fn load_default_config() -> Result<Option<Config>> {
    match default_config_path() {
        Some(path) if path.exists() => load_config(path).map(Some),
        _ => Ok(None),
    }
}
