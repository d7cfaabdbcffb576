//! Leaving the event loop.

use std::time::Duration;

use winit::event_loop::ActiveEventLoop;

use super::core::VesselApp;

impl VesselApp {
    /// Quit normally.
    ///
    /// A release found by this launch's update check is handed to the
    /// update service before the loop exits.
    pub(super) fn quit(&mut self, event_loop: &ActiveEventLoop) {
        tracing::info!("Initiating shutdown");
        self.controller.request_quit();
        self.tokio_runtime
            .block_on(self.controller.install_pending_update());
        self.finish_update_session();
        event_loop.exit();
    }

    /// Stop because of an error. `main` exits with a failure status.
    pub(super) fn fail(&mut self, event_loop: &ActiveEventLoop) {
        self.failed = true;
        self.controller.request_quit();
        self.finish_update_session();
        event_loop.exit();
    }

    /// Give a still-running update check a moment to log its outcome.
    fn finish_update_session(&mut self) {
        let Some(task) = self.controller.take_update_task() else {
            return;
        };
        let outcome = self
            .tokio_runtime
            .block_on(async { tokio::time::timeout(Duration::from_secs(1), task).await });
        if outcome.is_err() {
            tracing::debug!("Update session still running at shutdown, abandoned");
        }
    }
}
