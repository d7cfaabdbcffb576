//! Main window settings.

use serde::{Deserialize, Serialize};

/// Geometry and content of the main application window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Initial inner width in logical pixels.
    pub width: u32,
    /// Initial inner height in logical pixels.
    pub height: u32,
    /// Icon file, relative to the assets directory.
    pub icon: String,
    /// Logical name of the UI entry point.
    pub entry: String,
    /// Dev server port used when the UI is not served from bundled assets.
    pub dev_server_port: u16,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Vessel".into(),
            width: 1024,
            height: 728,
            icon: "icon.png".into(),
            entry: "index.html".into(),
            dev_server_port: 1212,
        }
    }
}
