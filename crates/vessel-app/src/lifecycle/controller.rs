//! The lifecycle state machine. Owns the single window slot and decides
//! presentation, the one update session per launch, extension preparation
//! and whether closing the last window quits.

use std::path::Path;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use vessel_common::{new_correlation_id, LifecycleError, UpdateError};
use vessel_platform::external::open_external_logged;
use vessel_platform::ExternalOpener;

use crate::extensions::ExtensionInstaller;
use crate::updater::UpdateService;

use super::state::{AllClosedOutcome, LifecycleState, ShutdownPolicy};
use super::window::{AppWindow, WindowFactory, WindowSpec};

/// Launch-time switches for the controller.
#[derive(Debug, Clone)]
pub struct LifecycleOptions {
    pub policy: ShutdownPolicy,
    /// Minimize instead of showing when the window is ready.
    pub start_minimized: bool,
    /// Prepare developer-tooling extensions on ready.
    pub debug: bool,
    pub upgrade_extensions: bool,
    pub extensions: Vec<String>,
}

impl Default for LifecycleOptions {
    fn default() -> Self {
        Self {
            policy: ShutdownPolicy::for_current_platform(),
            start_minimized: false,
            debug: false,
            upgrade_extensions: false,
            extensions: Vec::new(),
        }
    }
}

/// Turns platform lifecycle signals into window and update actions.
///
/// Owns the single window slot. All methods run on the event loop thread;
/// only the update session runs elsewhere, on `runtime`.
pub struct LifecycleController<W: AppWindow> {
    state: LifecycleState,
    window: Option<W>,
    /// Whether the window in the slot has been shown or minimized.
    presented: bool,
    spec: WindowSpec,
    options: LifecycleOptions,
    runtime: Handle,
    opener: Arc<dyn ExternalOpener>,
    updates: Option<Arc<dyn UpdateService>>,
    update_started: bool,
    update_task: Option<JoinHandle<()>>,
}

impl<W: AppWindow> LifecycleController<W> {
    pub fn new(
        spec: WindowSpec,
        options: LifecycleOptions,
        runtime: Handle,
        opener: Arc<dyn ExternalOpener>,
    ) -> Self {
        Self {
            state: LifecycleState::Starting,
            window: None,
            presented: false,
            spec,
            options,
            runtime,
            opener,
            updates: None,
            update_started: false,
            update_task: None,
        }
    }

    /// Check for updates once, when the first window is created.
    pub fn with_update_service(mut self, service: Arc<dyn UpdateService>) -> Self {
        self.updates = Some(service);
        self
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn window(&self) -> Option<&W> {
        self.window.as_ref()
    }

    /// Application ready: `Starting → Ready`.
    ///
    /// In debug mode the developer-extension cache is prepared first and
    /// handed to every window created afterwards. Failures are logged and
    /// never returned.
    pub async fn on_ready(&mut self, installer: &dyn ExtensionInstaller) -> Result<(), LifecycleError> {
        self.expect_state(&[LifecycleState::Starting], "ready")?;

        if self.options.debug {
            self.prepare_extensions(installer).await;
        }

        self.state = LifecycleState::Ready;
        info!("application ready");
        Ok(())
    }

    async fn prepare_extensions(&mut self, installer: &dyn ExtensionInstaller) {
        let force = self.options.upgrade_extensions;
        match installer.prepare(&self.options.extensions, force).await {
            Ok(prepared) => {
                self.spec.extensions_dir = installer.load_path().map(Path::to_path_buf);
                info!(prepared = prepared.len(), force, "developer extension cache ready");
            }
            Err(e) => warn!(error = %e, "developer extension cache unavailable"),
        }
    }

    /// `Ready | WindowClosed → WindowOpen`: create the main window.
    ///
    /// The first call also starts the launch's update session.
    pub fn create_window<F>(&mut self, factory: &mut F) -> Result<(), LifecycleError>
    where
        F: WindowFactory<Window = W>,
    {
        self.expect_state(
            &[LifecycleState::Ready, LifecycleState::WindowClosed],
            "create-window",
        )?;

        self.start_update_session();

        let window = factory.create(&self.spec).inspect_err(|e| {
            error!(error = %e, "main window creation failed");
        })?;
        info!(window = window.id(), url = %self.spec.url, "main window created");

        self.window = Some(window);
        self.presented = false;
        self.state = LifecycleState::WindowOpen;
        Ok(())
    }

    fn start_update_session(&mut self) {
        if self.update_started {
            return;
        }
        self.update_started = true;

        let Some(service) = self.updates.clone() else {
            info!("automatic update checks disabled");
            return;
        };

        let session = new_correlation_id();
        info!(%session, "update session started");
        self.update_task = Some(self.runtime.spawn(async move {
            match service.check_and_notify().await {
                Ok(Some(release)) => {
                    info!(%session, version = %release.tag_name, "update available");
                }
                Ok(None) => info!(%session, "no update available"),
                Err(e) => warn!(%session, error = %e, "update check failed"),
            }
        }));
    }

    /// The window finished loading and can be presented.
    ///
    /// Shows the window, or minimizes it when starting minimized. Later
    /// signals for the same window are ignored. An empty slot or a signal
    /// for a window that is no longer in the slot is an error.
    pub fn on_ready_to_show(&mut self, window_id: u64) -> Result<(), LifecycleError> {
        let Some(window) = self.window.as_ref().filter(|w| w.id() == window_id) else {
            return Err(LifecycleError::WindowMissing {
                during: "ready-to-show",
            });
        };

        if self.presented {
            debug!(window = window_id, "window already presented");
            return Ok(());
        }

        if self.options.start_minimized {
            window.minimize();
            info!(window = window_id, "main window minimized");
        } else {
            window.show();
            info!(window = window_id, "main window shown");
        }
        self.presented = true;
        Ok(())
    }

    /// `WindowOpen → WindowClosed`: the OS closed the window. Clears and
    /// drops the slot. Returns `false` for windows not in the slot.
    pub fn on_window_closed(&mut self, window_id: u64) -> bool {
        if !self.window.as_ref().is_some_and(|w| w.id() == window_id) {
            debug!(window = window_id, "close for unknown window ignored");
            return false;
        }

        self.window = None;
        self.presented = false;
        self.state = LifecycleState::WindowClosed;
        info!(window = window_id, "main window closed");
        true
    }

    /// The last window is gone. Quits unless the platform stays resident.
    pub fn on_all_windows_closed(&mut self) -> AllClosedOutcome {
        match self.options.policy {
            ShutdownPolicy::QuitOnLastWindowClosed => {
                self.state = LifecycleState::Quitting;
                info!("all windows closed, quitting");
                AllClosedOutcome::Quit
            }
            ShutdownPolicy::StayResident => {
                info!("all windows closed, staying resident");
                AllClosedOutcome::StayResident
            }
        }
    }

    /// The user re-invoked the application. Creates a window only when the
    /// slot is empty. Returns whether a window was created.
    pub fn on_activate<F>(&mut self, factory: &mut F) -> Result<bool, LifecycleError>
    where
        F: WindowFactory<Window = W>,
    {
        match self.state {
            LifecycleState::Ready | LifecycleState::WindowClosed if self.window.is_none() => {
                self.create_window(factory)?;
                Ok(true)
            }
            state => {
                debug!(%state, "activate ignored");
                Ok(false)
            }
        }
    }

    /// The UI asked for a new window. It never opens in-app; the URL goes
    /// to the system browser instead.
    pub fn on_new_window_request(&self, url: &str) {
        info!(%url, "new-window request denied in-app, opening externally");
        open_external_logged(self.opener.as_ref(), url);
    }

    /// Enter the terminal state.
    pub fn request_quit(&mut self) {
        self.state = LifecycleState::Quitting;
    }

    /// Hand a release found by this launch's check to the update service.
    pub async fn install_pending_update(&self) {
        let Some(service) = &self.updates else {
            return;
        };
        match service.install().await {
            Ok(()) => info!("pending update handed off for install"),
            Err(UpdateError::NothingToInstall) => debug!("no pending update"),
            Err(e) => warn!(error = %e, "update install failed"),
        }
    }

    /// Detach the running update session, if any.
    pub fn take_update_task(&mut self) -> Option<JoinHandle<()>> {
        self.update_task.take()
    }

    fn expect_state(
        &self,
        allowed: &[LifecycleState],
        signal: &'static str,
    ) -> Result<(), LifecycleError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(LifecycleError::InvalidTransition {
                state: self.state.as_str(),
                signal,
            })
        }
    }
}
