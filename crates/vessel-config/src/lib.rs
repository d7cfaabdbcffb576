//! Vessel configuration.
//!
//! Two sources feed the shell: a TOML file for settings that persist
//! (window geometry, update repository, log level) and environment flags
//! for per-launch switches (debug mode, start minimized, extension refresh).
//! All file sections use serde defaults so partial configs work.

pub mod env;
pub mod file;
pub mod schema;
pub mod validation;

pub use env::{EnvFlags, RunMode};
pub use file::ConfigFile;
pub use schema::VesselConfig;

use std::path::Path;

use vessel_common::ConfigError;

/// Load `config.toml` from the platform default path, creating it on first
/// run, and validate the result.
pub fn load_config() -> Result<VesselConfig, ConfigError> {
    let config = ConfigFile::platform_default()?.read_or_create()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load and validate the config file at `path`. A missing file is an error.
pub fn load_config_from(path: &Path) -> Result<VesselConfig, ConfigError> {
    let config = ConfigFile::at(path).read()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &VesselConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&VesselConfig::default());
        assert!(json.contains("\"window\""));
        assert!(json.contains("\"updates\""));
        assert!(json.contains("\"logging\""));
        assert!(json.contains("\"devtools\""));
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let json = config_to_json(&VesselConfig::default());
        let parsed: VesselConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.window.width, 1024);
        assert_eq!(parsed.window.height, 728);
        assert_eq!(parsed.window.entry, "index.html");
    }

    #[test]
    fn load_config_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[window]\nwidth = 5\n").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn load_config_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
