//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod devtools;
mod system;
mod window;

pub use devtools::*;
pub use system::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Root configuration for the shell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselConfig {
    pub window: WindowConfig,
    pub updates: UpdatesConfig,
    pub logging: LoggingConfig,
    pub devtools: DevtoolsConfig,
}
