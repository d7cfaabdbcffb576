//! Configuration validation.
//!
//! Every check pushes a message; all of them are reported together in one
//! `ConfigError::ValidationError`.

use vessel_common::ConfigError;

use crate::schema::VesselConfig;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &VesselConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_window(&mut errors, config);
    validate_updates(&mut errors, config);
    validate_devtools(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

fn validate_window(errors: &mut Vec<String>, config: &VesselConfig) {
    let w = &config.window;
    validate_range(errors, "window.width", w.width, 200, 8192);
    validate_range(errors, "window.height", w.height, 200, 8192);
    if w.title.trim().is_empty() {
        errors.push("window.title must not be empty".into());
    }
    if w.entry.trim().is_empty() {
        errors.push("window.entry must not be empty".into());
    }
    if w.dev_server_port == 0 {
        errors.push("window.dev_server_port must not be 0".into());
    }
}

fn validate_updates(errors: &mut Vec<String>, config: &VesselConfig) {
    let u = &config.updates;
    validate_range(errors, "updates.timeout_secs", u.timeout_secs, 1, 120);
    if u.check_automatically {
        let valid = u
            .repository
            .split_once('/')
            .is_some_and(|(owner, repo)| !owner.is_empty() && !repo.is_empty() && !repo.contains('/'));
        if !valid {
            errors.push(format!(
                "updates.repository = {:?} must be in owner/repo form",
                u.repository
            ));
        }
    }
}

fn validate_devtools(errors: &mut Vec<String>, config: &VesselConfig) {
    if config.devtools.extensions.iter().any(|e| e.trim().is_empty()) {
        errors.push("devtools.extensions must not contain empty names".into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&VesselConfig::default()).is_ok());
    }

    #[test]
    fn window_size_out_of_range() {
        let mut config = VesselConfig::default();
        config.window.width = 10;
        config.window.height = 10_000;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("window.width = 10"));
        assert!(err.contains("window.height = 10000"));
    }

    #[test]
    fn empty_entry_rejected() {
        let mut config = VesselConfig::default();
        config.window.entry = "  ".into();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("window.entry"));
    }

    #[test]
    fn repository_must_be_owner_repo() {
        let mut config = VesselConfig::default();
        for bad in ["", "vessel", "/vessel", "owner/", "a/b/c"] {
            config.updates.repository = bad.into();
            assert!(validate(&config).is_err(), "{bad:?} should be rejected");
        }
        config.updates.repository = "owner/repo".into();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn repository_ignored_when_checks_disabled() {
        let mut config = VesselConfig::default();
        config.updates.check_automatically = false;
        config.updates.repository = String::new();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn errors_are_collected() {
        let mut config = VesselConfig::default();
        config.window.title = String::new();
        config.updates.timeout_secs = 0;
        config.devtools.extensions.push(String::new());
        let err = validate(&config).unwrap_err().to_string();
        assert_eq!(err.matches("; ").count(), 2);
    }
}
