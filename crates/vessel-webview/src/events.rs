//! What the webview reports back to the event loop.

use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoadState {
    Started,
    Finished,
}

impl From<wry::PageLoadEvent> for PageLoadState {
    fn from(event: wry::PageLoadEvent) -> Self {
        if matches!(event, wry::PageLoadEvent::Started) {
            PageLoadState::Started
        } else {
            PageLoadState::Finished
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebViewEvent {
    PageLoad { state: PageLoadState, url: String },
    /// Raw bridge frame posted by the page.
    IpcFrame { body: String },
    /// Denied in-app; the receiver decides whether to open it externally.
    NewWindowRequested { url: String },
    /// Denied by the [`NavigationPolicy`](crate::NavigationPolicy).
    NavigationBlocked { url: String },
}

/// Callback for [`WebViewEvent`]s. Runs on the event loop thread, inside
/// wry's handlers, so it must not block.
pub type EventSink = Rc<dyn Fn(WebViewEvent)>;
