//! VesselApp struct definition and constructor.

use std::sync::Arc;

use winit::event_loop::EventLoopProxy;

use vessel_bridge::BridgeGateway;
use vessel_config::{EnvFlags, VesselConfig};
use vessel_platform::{AssetResolver, SystemOpener};
use vessel_webview::{ContentProvider, NavigationPolicy};

use crate::extensions::ExtensionInstaller;
use crate::lifecycle::{LifecycleController, LifecycleOptions, ShutdownPolicy, WindowSpec};
use crate::updater::{GithubUpdater, UpdateService};

use super::types::UserEvent;
use super::window::MainWindow;

/// Top-level application state.
pub struct VesselApp {
    pub(super) controller: LifecycleController<MainWindow>,
    pub(super) gateway: BridgeGateway,
    pub(super) installer: Box<dyn ExtensionInstaller>,
    pub(super) proxy: EventLoopProxy<UserEvent>,

    // Renderer content
    pub(super) content: Option<ContentProvider>,
    pub(super) navigation: NavigationPolicy,
    // Open the web inspector whenever the main window is created
    pub(super) open_inspector: bool,

    pub(super) tokio_runtime: tokio::runtime::Runtime,

    // Set once the ready signal has been handled
    pub(super) started: bool,
    // Set when the event loop stopped because of an error
    pub(super) failed: bool,
}

/// Everything the app needs from `main`.
pub struct LaunchOptions {
    pub config: VesselConfig,
    pub flags: EnvFlags,
    pub assets: AssetResolver,
    /// Overrides `START_MINIMIZED`.
    pub start_minimized: bool,
    /// Dev server port when running in development.
    pub dev_server_port: Option<u16>,
}

impl VesselApp {
    pub fn new(
        launch: LaunchOptions,
        proxy: EventLoopProxy<UserEvent>,
        installer: Box<dyn ExtensionInstaller>,
        tokio_runtime: tokio::runtime::Runtime,
    ) -> Self {
        let LaunchOptions {
            config,
            flags,
            assets,
            start_minimized,
            dev_server_port,
        } = launch;
        let debug = flags.is_debug();

        let spec = WindowSpec::resolve(&config.window, &assets, dev_server_port, debug);
        let options = LifecycleOptions {
            policy: ShutdownPolicy::for_current_platform(),
            start_minimized: start_minimized || flags.start_minimized,
            debug,
            upgrade_extensions: flags.upgrade_extensions,
            extensions: config.devtools.extensions.clone(),
        };

        let opener = Arc::new(SystemOpener);
        let mut controller =
            LifecycleController::new(spec, options, tokio_runtime.handle().clone(), opener.clone());
        if config.updates.check_automatically {
            let updater = GithubUpdater::new(
                &config.updates.repository,
                std::time::Duration::from_secs(u64::from(config.updates.timeout_secs)),
                opener,
            );
            tracing::info!(
                repository = %config.updates.repository,
                current = %updater.current_version(),
                "Automatic update checks enabled"
            );
            let updater: Arc<dyn UpdateService> = Arc::new(updater);
            controller = controller.with_update_service(updater);
        }

        let mut gateway = BridgeGateway::new();
        crate::handlers::register_handlers(&mut gateway);

        let (content, navigation) = match dev_server_port {
            Some(port) => (None, NavigationPolicy::with_dev_server(port)),
            None => (
                Some(ContentProvider::new(assets.renderer_dir())),
                NavigationPolicy::bundled(),
            ),
        };

        Self {
            controller,
            gateway,
            installer,
            proxy,
            content,
            navigation,
            open_inspector: debug && config.devtools.open_inspector,
            tokio_runtime,
            started: false,
            failed: false,
        }
    }

    /// Whether the event loop stopped because of an error.
    pub fn failed(&self) -> bool {
        self.failed
    }
}
