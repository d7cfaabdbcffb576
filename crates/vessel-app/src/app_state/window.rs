//! The winit + wry main window and its factory.

use std::rc::Rc;

use winit::dpi::LogicalSize;
use winit::event_loop::{ActiveEventLoop, EventLoopProxy};
use winit::window::Window;

use vessel_common::WindowError;
use vessel_webview::{
    build_webview, ContentProvider, EventSink, NavigationPolicy, WebViewConfig, WebViewHandle,
};

use crate::icon::load_icon;
use crate::lifecycle::{AppWindow, WindowFactory, WindowSpec};

use super::types::UserEvent;

/// The main window with its renderer webview.
pub struct MainWindow {
    // Dropped before the window it is attached to.
    webview: WebViewHandle,
    window: Window,
}

impl MainWindow {
    pub fn webview(&self) -> &WebViewHandle {
        &self.webview
    }
}

impl AppWindow for MainWindow {
    fn id(&self) -> u64 {
        u64::from(self.window.id())
    }

    fn show(&self) {
        self.window.set_visible(true);
        self.window.focus_window();
    }

    fn minimize(&self) {
        self.window.set_visible(true);
        self.window.set_minimized(true);
    }
}

/// Creates main windows while the event loop is active.
pub struct WinitWindowFactory<'a> {
    event_loop: &'a ActiveEventLoop,
    proxy: EventLoopProxy<UserEvent>,
    content: Option<ContentProvider>,
    navigation: NavigationPolicy,
}

impl<'a> WinitWindowFactory<'a> {
    pub fn new(
        event_loop: &'a ActiveEventLoop,
        proxy: EventLoopProxy<UserEvent>,
        content: Option<ContentProvider>,
        navigation: NavigationPolicy,
    ) -> Self {
        Self {
            event_loop,
            proxy,
            content,
            navigation,
        }
    }
}

impl WindowFactory for WinitWindowFactory<'_> {
    type Window = MainWindow;

    fn create(&mut self, spec: &WindowSpec) -> Result<MainWindow, WindowError> {
        let mut attrs = Window::default_attributes()
            .with_title(spec.title.as_str())
            .with_inner_size(LogicalSize::new(f64::from(spec.width), f64::from(spec.height)))
            .with_visible(false);

        if let Some(path) = &spec.icon {
            match load_icon(path) {
                Ok(icon) => attrs = attrs.with_window_icon(Some(icon)),
                Err(e) => tracing::warn!(error = %e, "Failed to load window icon"),
            }
        }

        let window = self
            .event_loop
            .create_window(attrs)
            .map_err(|e| WindowError::Create(e.to_string()))?;
        let window_id = u64::from(window.id());

        let proxy = self.proxy.clone();
        let events: EventSink = Rc::new(move |event| {
            if proxy
                .send_event(UserEvent::WebView {
                    window: window_id,
                    event,
                })
                .is_err()
            {
                tracing::debug!(window = window_id, "event loop closed, webview event dropped");
            }
        });

        let config = WebViewConfig {
            url: spec.url.clone(),
            devtools: spec.devtools,
            extensions_dir: spec.extensions_dir.clone(),
            navigation: self.navigation.clone(),
            content: self.content.clone(),
        };
        let webview = build_webview(&window, config, events)
            .map_err(|e| WindowError::Create(format!("webview: {e}")))?;

        Ok(MainWindow { webview, window })
    }
}
