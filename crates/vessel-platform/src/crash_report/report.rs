use std::backtrace::Backtrace;
use std::panic::PanicHookInfo;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::paths::crash_report_dir;

use super::sanitize::sanitize_secrets;

#[derive(Debug, Clone, Serialize)]
pub struct PanicLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

/// What gets written to `crash_<timestamp>.json`. Message and backtrace are
/// redacted on construction.
#[derive(Debug, Clone, Serialize)]
pub struct CrashReport {
    pub timestamp: String,
    pub version: &'static str,
    pub os: &'static str,
    pub arch: &'static str,
    pub panic_message: String,
    pub location: Option<PanicLocation>,
    pub backtrace: String,
}

impl CrashReport {
    pub fn new(message: &str, location: Option<PanicLocation>, backtrace: &str) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            panic_message: sanitize_secrets(message),
            location,
            backtrace: sanitize_secrets(backtrace),
        }
    }

    pub fn from_panic(info: &PanicHookInfo) -> Self {
        let payload = info.payload();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_owned());
        let location = info.location().map(|loc| PanicLocation {
            file: loc.file().to_owned(),
            line: loc.line(),
            column: loc.column(),
        });
        Self::new(&message, location, &Backtrace::force_capture().to_string())
    }

    /// Write the report into `dir`, owner-readable only on Unix.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("crash_{stamp}.json"));
        let json = serde_json::to_string_pretty(self)?;

        std::fs::create_dir_all(dir)?;
        std::fs::write(&path, json)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(path)
    }
}

/// Chain a crash-report writer in front of the current panic hook. The
/// writer swallows its own failures.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let written = crash_report_dir()
            .ok()
            .and_then(|dir| CrashReport::from_panic(info).write_to(&dir).ok());
        match written {
            Some(path) => eprintln!("vessel crashed; report written to {}", path.display()),
            None => eprintln!("vessel crashed; no report could be written"),
        }
        previous(info);
    }));
}
