//! Per-user application directories.

use std::path::PathBuf;

use vessel_common::PlatformError;

const APP_NAME: &str = "vessel";

/// A directory the shell keeps state in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppDir {
    /// `~/.config/vessel`, `~/Library/Application Support/vessel`, `%APPDATA%\vessel`.
    Config,
    Data,
    Cache,
    /// `Data/logs`
    Logs,
    /// `Logs/crash-reports`
    CrashReports,
    /// `Cache/extensions`, developer-tooling extensions.
    Extensions,
}

impl AppDir {
    /// Every directory, parents before children.
    pub const ALL: [AppDir; 6] = [
        AppDir::Config,
        AppDir::Data,
        AppDir::Cache,
        AppDir::Logs,
        AppDir::CrashReports,
        AppDir::Extensions,
    ];

    pub fn path(self) -> Result<PathBuf, PlatformError> {
        match self {
            AppDir::Config => platform_base(dirs::config_dir(), "config"),
            AppDir::Data => platform_base(dirs::data_dir(), "data"),
            AppDir::Cache => platform_base(dirs::cache_dir(), "cache"),
            AppDir::Logs => Ok(AppDir::Data.path()?.join("logs")),
            AppDir::CrashReports => Ok(AppDir::Logs.path()?.join("crash-reports")),
            AppDir::Extensions => Ok(AppDir::Cache.path()?.join("extensions")),
        }
    }
}

fn platform_base(base: Option<PathBuf>, kind: &str) -> Result<PathBuf, PlatformError> {
    base.map(|b| b.join(APP_NAME))
        .ok_or_else(|| PlatformError::PathError(format!("no {kind} directory on this platform")))
}

pub fn crash_report_dir() -> Result<PathBuf, PlatformError> {
    AppDir::CrashReports.path()
}

pub fn extensions_dir() -> Result<PathBuf, PlatformError> {
    AppDir::Extensions.path()
}

/// Create every [`AppDir`] that does not exist yet.
pub fn ensure_dirs() -> Result<(), PlatformError> {
    for dir in AppDir::ALL {
        let path = dir.path()?;
        std::fs::create_dir_all(&path)
            .map_err(|e| PlatformError::PathError(format!("{}: {e}", path.display())))?;
    }
    Ok(())
}
