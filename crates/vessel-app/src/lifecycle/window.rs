//! The window seam between the lifecycle controller and the windowing
//! backend.

use std::path::PathBuf;

use vessel_common::WindowError;
use vessel_config::schema::WindowConfig;
use vessel_platform::AssetResolver;

/// A top-level window owned by the lifecycle controller.
pub trait AppWindow {
    /// Stable identifier, used to match platform signals to the window.
    fn id(&self) -> u64;

    /// Make the window visible and focus it.
    fn show(&self);

    /// Minimize the window, making it visible in the minimized state.
    fn minimize(&self);
}

/// Creates windows for the controller.
///
/// Passed in at each call that may create a window, since a backend can
/// usually only create windows while it is handling an event.
pub trait WindowFactory {
    type Window: AppWindow;

    /// Create a hidden window that starts loading `spec.url`.
    fn create(&mut self, spec: &WindowSpec) -> Result<Self::Window, WindowError>;
}

/// Everything needed to create the main window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub icon: Option<PathBuf>,
    /// Initial UI content.
    pub url: String,
    pub devtools: bool,
    /// Unpacked browser extensions to load. Set once developer extensions
    /// are prepared in debug mode.
    pub extensions_dir: Option<PathBuf>,
}

impl WindowSpec {
    /// Build the main window spec. `dev_server_port` selects the dev server
    /// over bundled content.
    pub fn resolve(
        config: &WindowConfig,
        assets: &AssetResolver,
        dev_server_port: Option<u16>,
        devtools: bool,
    ) -> Self {
        let icon = assets.asset_path(&[config.icon.as_str()]);
        Self {
            title: config.title.clone(),
            width: config.width,
            height: config.height,
            icon: icon.is_file().then_some(icon),
            url: assets.entry_url(&config.entry, dev_server_port),
            devtools,
            extensions_dir: None,
        }
    }
}
