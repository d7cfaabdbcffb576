//! The `config.toml` file: locating it, reading it, and writing the
//! documented default on first run.

mod template;


use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::info;
use vessel_common::ConfigError;

use crate::schema::VesselConfig;

pub(crate) use template::DEFAULT_CONFIG_TOML;

const APP_DIR: &str = "vessel";
const FILE_NAME: &str = "config.toml";

/// A config file location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<platform config dir>/vessel/config.toml`.
    pub fn platform_default() -> Result<Self, ConfigError> {
        let base = dirs::config_dir()
            .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))?;
        Ok(Self::at(base.join(APP_DIR).join(FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the file. Missing keys take their defaults; values are not
    /// validated here.
    pub fn read(&self) -> Result<VesselConfig, ConfigError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::FileNotFound(self.path.clone()),
            _ => ConfigError::ParseError(format!("failed to read {}: {e}", self.path.display())),
        })?;

        let config = toml::from_str(&content).map_err(|e| {
            ConfigError::ParseError(format!("{}: {e}", self.path.display()))
        })?;
        info!(path = %self.path.display(), "config loaded");
        Ok(config)
    }

    /// Parse the file, writing the documented default first if it does not
    /// exist yet.
    pub fn read_or_create(&self) -> Result<VesselConfig, ConfigError> {
        match self.read() {
            Err(ConfigError::FileNotFound(_)) => {
                self.write_default()?;
                Ok(VesselConfig::default())
            }
            other => other,
        }
    }

    /// Write the documented default, creating parent directories.
    pub fn write_default(&self) -> Result<(), ConfigError> {
        let write_err = |e: std::io::Error| {
            ConfigError::ParseError(format!("failed to write {}: {e}", self.path.display()))
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(&self.path, DEFAULT_CONFIG_TOML).map_err(write_err)?;
        info!(path = %self.path.display(), "default config written");
        Ok(())
    }
}
