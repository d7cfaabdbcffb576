use vessel_bridge::{js_dispatch_frame, FrameSink};
use vessel_common::BridgeError;
use wry::WebView;

/// The renderer webview of one window.
///
/// Replies from the gateway go back through [`FrameSink`], which evaluates
/// the dispatch call in the page.
pub struct WebViewHandle {
    webview: WebView,
    initial_url: String,
}

impl WebViewHandle {
    pub(crate) fn new(webview: WebView, initial_url: String) -> Self {
        Self {
            webview,
            initial_url,
        }
    }

    /// The URL the webview was built with.
    pub fn initial_url(&self) -> &str {
        &self.initial_url
    }

    /// No-op unless devtools were enabled at build time.
    pub fn open_devtools(&self) {
        self.webview.open_devtools();
    }
}

impl FrameSink for WebViewHandle {
    fn post(&self, frame: String) -> Result<(), BridgeError> {
        let script = js_dispatch_frame(&frame);
        self.webview
            .evaluate_script(&script)
            .map_err(|e| BridgeError::Transport(format!("evaluate_script: {e}")))
    }
}
