use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{debug, warn};
use vessel_bridge::renderer_init_script;
use wry::http::{Response, StatusCode};
use wry::raw_window_handle;
use wry::WebViewBuilder;

use crate::content::{request_path, ContentProvider};
use crate::events::{EventSink, WebViewEvent};
use crate::handle::WebViewHandle;
use crate::navigation::NavigationPolicy;

/// Configuration for the renderer webview.
#[derive(Debug, Clone)]
pub struct WebViewConfig {
    /// Initial URL to load.
    pub url: String,
    /// Enable the web inspector.
    pub devtools: bool,
    /// Unpacked browser extensions to load. Only WebView2 supports this;
    /// elsewhere it is ignored.
    pub extensions_dir: Option<PathBuf>,
    pub navigation: NavigationPolicy,
    /// Bundled content served under `vessel://`. `None` when loading from
    /// the dev server.
    pub content: Option<ContentProvider>,
}

/// Build the renderer webview filling `window`.
///
/// The bridge init script runs before any page script. Inbound frames, page
/// loads and denied navigations are reported through `events`. Frames are
/// only accepted from pages the navigation policy allows.
pub fn build_webview<W: raw_window_handle::HasWindowHandle>(
    window: &W,
    config: WebViewConfig,
    events: EventSink,
) -> Result<WebViewHandle, wry::Error> {
    let init_script = renderer_init_script();

    let mut builder = WebViewBuilder::new()
        .with_url(&config.url)
        .with_devtools(config.devtools)
        .with_initialization_script(&init_script);

    if let Some(dir) = &config.extensions_dir {
        builder = attach_extensions(builder, dir);
    }

    builder = attach_ipc_handler(builder, Rc::clone(&events), config.navigation.clone());
    builder = attach_page_load_handler(builder, Rc::clone(&events));
    builder = attach_navigation_handler(builder, Rc::clone(&events), config.navigation.clone());
    builder = attach_new_window_handler(builder, Rc::clone(&events));

    if let Some(provider) = config.content.clone() {
        builder = builder.with_custom_protocol(
            vessel_platform::assets::CONTENT_SCHEME.to_string(),
            move |_wv_id, request| content_response(&provider, &request.uri().to_string()),
        );
    }

    let webview = builder.build(window)?;
    debug!(url = %config.url, devtools = config.devtools, "WebView created");

    Ok(WebViewHandle::new(webview, config.url))
}

#[cfg(target_os = "windows")]
fn attach_extensions<'a>(builder: WebViewBuilder<'a>, dir: &Path) -> WebViewBuilder<'a> {
    use wry::WebViewBuilderExtWindows;
    debug!(dir = %dir.display(), "loading browser extensions");
    builder
        .with_browser_extensions_enabled(true)
        .with_extension_path(dir)
}

#[cfg(not(target_os = "windows"))]
fn attach_extensions<'a>(builder: WebViewBuilder<'a>, dir: &Path) -> WebViewBuilder<'a> {
    debug!(dir = %dir.display(), "browser extensions are not supported by this webview");
    builder
}

fn attach_ipc_handler(
    builder: WebViewBuilder<'_>,
    events: EventSink,
    policy: NavigationPolicy,
) -> WebViewBuilder<'_> {
    builder.with_ipc_handler(move |request| {
        let origin = request.uri().to_string();
        if let Some(event) = inbound_frame(&policy, &origin, request.into_body()) {
            events(event);
        }
    })
}

/// Turn a posted frame into an event, or drop it when the posting page is
/// outside `policy`.
fn inbound_frame(policy: &NavigationPolicy, origin: &str, body: String) -> Option<WebViewEvent> {
    if !policy.is_allowed(origin) {
        warn!(%origin, "bridge frame from foreign page dropped");
        return None;
    }
    debug!(len = body.len(), "bridge frame from renderer");
    Some(WebViewEvent::IpcFrame { body })
}

fn attach_page_load_handler(builder: WebViewBuilder<'_>, events: EventSink) -> WebViewBuilder<'_> {
    builder.with_on_page_load_handler(move |event, url| {
        events(WebViewEvent::PageLoad {
            state: event.into(),
            url,
        });
    })
}

fn attach_navigation_handler(
    builder: WebViewBuilder<'_>,
    events: EventSink,
    policy: NavigationPolicy,
) -> WebViewBuilder<'_> {
    builder.with_navigation_handler(move |url| {
        if policy.is_allowed(&url) {
            return true;
        }
        warn!(url = %url, "navigation blocked");
        events(WebViewEvent::NavigationBlocked { url });
        false
    })
}

fn attach_new_window_handler(builder: WebViewBuilder<'_>, events: EventSink) -> WebViewBuilder<'_> {
    builder.with_new_window_req_handler(move |url| {
        events(WebViewEvent::NewWindowRequested { url });
        false
    })
}

/// Answer a `vessel://` request from bundled content.
pub fn content_response(provider: &ContentProvider, uri: &str) -> Response<Cow<'static, [u8]>> {
    let path = request_path(uri);
    let built = match provider.resolve(path) {
        Some((mime, data)) => Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", mime)
            .header("Access-Control-Allow-Origin", "vessel://localhost")
            .body(data),
        None => {
            warn!(path = %path, "custom protocol: asset not found");
            Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body(Cow::Borrowed(&b"Not Found"[..]))
        }
    };

    built.unwrap_or_else(|e| {
        warn!(error = %e, "custom protocol: failed to build response");
        let mut fallback = Response::new(Cow::Borrowed(&[][..]));
        *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> (tempfile::TempDir, ContentProvider) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<p>hi</p>").unwrap();
        let cp = ContentProvider::new(dir.path());
        (dir, cp)
    }

    #[test]
    fn serves_bundled_entry() {
        let (_dir, cp) = provider();
        let resp = content_response(&cp, "vessel://localhost/index.html");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Content-Type"], "text/html");
        assert_eq!(&**resp.body(), b"<p>hi</p>");
    }

    #[test]
    fn webview2_rewritten_uri_is_served() {
        let (_dir, cp) = provider();
        let resp = content_response(&cp, "http://vessel.localhost/index.html");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[test]
    fn frames_from_app_pages_are_forwarded() {
        let policy = NavigationPolicy::bundled();
        let event = inbound_frame(&policy, "vessel://localhost/index.html", "{}".into());
        assert_eq!(event, Some(WebViewEvent::IpcFrame { body: "{}".into() }));
    }

    #[test]
    fn frames_from_foreign_pages_are_dropped() {
        let policy = NavigationPolicy::with_dev_server(1212);
        for origin in [
            "http://vessel.localhost.evil.com/",
            "http://vessel.localhost@evil.com/steal",
            "https://example.com/",
        ] {
            assert_eq!(inbound_frame(&policy, origin, "{}".into()), None, "{origin}");
        }
    }

    #[test]
    fn missing_asset_is_404() {
        let (_dir, cp) = provider();
        let resp = content_response(&cp, "vessel://localhost/nope.js");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
