//! Events delivered to the app through the event loop proxy.

use vessel_webview::WebViewEvent;

/// Custom event loop events.
#[derive(Debug, Clone)]
pub enum UserEvent {
    /// Something happened in the webview of window `window`.
    WebView { window: u64, event: WebViewEvent },
}
