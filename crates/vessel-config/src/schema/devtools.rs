//! Developer tooling settings, only consulted in debug mode.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DevtoolsConfig {
    /// Extensions to prepare before the window opens.
    pub extensions: Vec<String>,
    /// Open the inspector alongside the window.
    pub open_inspector: bool,
}

impl Default for DevtoolsConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["react-developer-tools".into()],
            open_inspector: false,
        }
    }
}
