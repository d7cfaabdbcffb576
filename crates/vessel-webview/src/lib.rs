//! WebView hosting for the renderer context.
//!
//! Wraps the `wry` crate to provide:
//! - A webview with the bridge init script injected
//! - Inbound bridge frames and page loads surfaced as [`WebViewEvent`]s
//! - Outbound bridge frames through [`WebViewHandle`] as a `FrameSink`
//! - A `vessel://` custom protocol for bundled content
//! - Navigation control: in-app navigation limited to app origins,
//!   new-window requests denied and reported

pub mod builder;
pub mod content;
pub mod events;
pub mod handle;
pub mod navigation;

pub use builder::{build_webview, content_response, WebViewConfig};
pub use content::ContentProvider;
pub use events::{EventSink, PageLoadState, WebViewEvent};
pub use handle::WebViewHandle;
pub use navigation::NavigationPolicy;
