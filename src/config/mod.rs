// Configuration management module
// Server identity and logging settings, stored as TOML

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "AGENTLINK_CONFIG_DIR";

pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const DEFAULT_SERVER_NAME: &str = "agentlink-korea";

pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            instructions: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found or could not be created")]
    DirectoryError,
    #[error("Invalid server name: {0:?} (cannot be empty)")]
    InvalidServerName(String),
    #[error("Invalid server version: {0:?} (cannot be empty)")]
    InvalidVersion(String),
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Config {
    /// Default settings rooted at `config_dir`
    #[inline]
    pub fn with_base_dir<P: AsRef<Path>>(config_dir: P) -> Self {
        Self {
            base_dir: config_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Load `config.toml` from `config_dir`, falling back to defaults when
    /// the file does not exist
    #[inline]
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::with_base_dir(config_dir));
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
        config.base_dir = config_dir.as_ref().to_path_buf();

        config
            .validate()
            .with_context(|| "Configuration validation failed")?;

        Ok(config)
    }

    #[inline]
    pub fn save(&self) -> Result<()> {
        self.validate()
            .context("Configuration validation failed before saving")?;

        let config_dir = self.get_base_dir();

        fs::create_dir_all(config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                config_dir.display()
            )
        })?;

        let config_path = self.config_file_path();
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    #[inline]
    pub fn get_base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[inline]
    pub fn config_file_path(&self) -> PathBuf {
        self.get_base_dir().join(CONFIG_FILE_NAME)
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Render the settings the way they would be saved
    #[inline]
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::InvalidServerName(self.name.clone()));
        }

        if self.version.trim().is_empty() {
            return Err(ConfigError::InvalidVersion(self.version.clone()));
        }

        Ok(())
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        EnvFilter::try_new(&self.level)
            .map(|_| ())
            .map_err(|e| ConfigError::InvalidLogLevel(format!("{:?}: {}", self.level, e)))
    }
}

/// `~/.agentlink`
#[inline]
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".agentlink"))
        .ok_or(ConfigError::DirectoryError)
}

/// Pick the configuration directory: the CLI flag wins over the environment
/// value, which wins over the home-directory default. Empty values count as
/// unset.
#[inline]
pub fn resolve_config_dir(
    cli: Option<PathBuf>,
    env: Option<OsString>,
) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = cli.filter(|dir| !dir.as_os_str().is_empty()) {
        return Ok(dir);
    }

    if let Some(dir) = env.filter(|dir| !dir.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    default_config_dir()
}
