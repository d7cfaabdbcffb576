//! Per-launch switches read from the environment.
//!
//! | variable | effect |
//! |---|---|
//! | `VESSEL_ENV` | `development` or `production` |
//! | `DEBUG_PROD` | `true` enables debug tooling in a production build |
//! | `UPGRADE_EXTENSIONS` | any non-empty value forces extension re-download |
//! | `START_MINIMIZED` | any non-empty value minimizes instead of showing |

pub const ENV_MODE: &str = "VESSEL_ENV";
pub const ENV_DEBUG_PROD: &str = "DEBUG_PROD";
pub const ENV_UPGRADE_EXTENSIONS: &str = "UPGRADE_EXTENSIONS";
pub const ENV_START_MINIMIZED: &str = "START_MINIMIZED";

/// Build flavour selected by `VESSEL_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    Development,
    Production,
    #[default]
    Unspecified,
}

impl RunMode {
    fn parse(value: &str) -> Self {
        match value {
            "development" => RunMode::Development,
            "production" => RunMode::Production,
            _ => RunMode::Unspecified,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFlags {
    pub mode: RunMode,
    pub debug_prod: bool,
    pub upgrade_extensions: bool,
    pub start_minimized: bool,
}

impl EnvFlags {
    /// Read flags from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read flags through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).is_some_and(|v| !v.is_empty());
        Self {
            mode: lookup(ENV_MODE)
                .map(|v| RunMode::parse(&v))
                .unwrap_or_default(),
            debug_prod: lookup(ENV_DEBUG_PROD).as_deref() == Some("true"),
            upgrade_extensions: present(ENV_UPGRADE_EXTENSIONS),
            start_minimized: present(ENV_START_MINIMIZED),
        }
    }

    /// Developer tooling is enabled in development, or in production when
    /// `DEBUG_PROD=true`.
    pub fn is_debug(&self) -> bool {
        self.mode == RunMode::Development || self.debug_prod
    }

    /// Production-only setup (crash symbolication) applies.
    pub fn is_production(&self) -> bool {
        self.mode == RunMode::Production
    }
}
