//! `ApplicationHandler` implementation for the winit event loop.

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

use vessel_webview::{PageLoadState, WebViewEvent};

use crate::lifecycle::{AllClosedOutcome, AppWindow};

use super::core::VesselApp;
use super::types::UserEvent;
use super::window::WinitWindowFactory;

impl ApplicationHandler<UserEvent> for VesselApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            // Re-invocation of a running app. winit 0.30 delivers `resumed`
            // only once on desktop, so on macOS a dock click never reaches
            // `on_activate` through here. Only platforms that suspend and
            // resume (Android, iOS) take this branch.
            self.activate(event_loop);
            return;
        }
        self.started = true;

        let ready = self
            .tokio_runtime
            .block_on(self.controller.on_ready(self.installer.as_ref()));
        if let Err(e) = ready {
            tracing::error!(error = %e, "Startup failed");
            self.fail(event_loop);
            return;
        }

        let mut factory = self.window_factory(event_loop);
        if let Err(e) = self.controller.create_window(&mut factory) {
            tracing::error!(error = %e, "Failed to create main window");
            self.fail(event_loop);
            return;
        }
        self.open_inspector_if_requested();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                // Single-window app: the last close means all windows are closed.
                if !self.controller.on_window_closed(u64::from(window_id)) {
                    return;
                }
                if self.controller.on_all_windows_closed() == AllClosedOutcome::Quit {
                    self.quit(event_loop);
                } else {
                    tracing::debug!(state = %self.controller.state(), "Running without a window");
                }
            }
            _ => {}
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: UserEvent) {
        let UserEvent::WebView { window, event } = event;
        match event {
            WebViewEvent::PageLoad {
                state: PageLoadState::Finished,
                url,
            } => {
                tracing::debug!(window, url = %url, "Page loaded");
                if let Err(e) = self.controller.on_ready_to_show(window) {
                    tracing::error!(window, error = %e, "Ready-to-show without a window");
                    self.fail(event_loop);
                }
            }
            WebViewEvent::PageLoad {
                state: PageLoadState::Started,
                url,
            } => {
                tracing::debug!(window, url = %url, "Page load started");
            }
            WebViewEvent::IpcFrame { body } => self.handle_ipc_frame(window, &body),
            WebViewEvent::NewWindowRequested { url } => {
                self.controller.on_new_window_request(&url);
            }
            WebViewEvent::NavigationBlocked { url } => {
                tracing::debug!(window, url = %url, "In-app navigation denied");
            }
        }
    }
}

impl VesselApp {
    fn window_factory<'a>(&self, event_loop: &'a ActiveEventLoop) -> WinitWindowFactory<'a> {
        WinitWindowFactory::new(
            event_loop,
            self.proxy.clone(),
            self.content.clone(),
            self.navigation.clone(),
        )
    }

    fn activate(&mut self, event_loop: &ActiveEventLoop) {
        let mut factory = self.window_factory(event_loop);
        match self.controller.on_activate(&mut factory) {
            Ok(true) => self.open_inspector_if_requested(),
            Ok(false) => {}
            Err(e) => {
                tracing::error!(error = %e, "Failed to recreate main window");
                self.fail(event_loop);
            }
        }
    }

    fn open_inspector_if_requested(&self) {
        if !self.open_inspector {
            return;
        }
        if let Some(window) = self.controller.window() {
            tracing::debug!(url = %window.webview().initial_url(), "Opening web inspector");
            window.webview().open_devtools();
        }
    }

    /// Route a renderer frame through the gateway. Replies go back to the
    /// webview that sent it.
    fn handle_ipc_frame(&self, window: u64, body: &str) {
        let Some(main) = self.controller.window().filter(|w| w.id() == window) else {
            tracing::warn!(window, "Bridge frame from a closed window dropped");
            return;
        };
        match self.gateway.handle_frame(body, main.webview()) {
            Ok(handled) => tracing::debug!(window, handled, "Bridge frame dispatched"),
            Err(e) => tracing::debug!(window, error = %e, "Bridge frame rejected"),
        }
    }
}
