//! Navigation allowlist for the renderer webview.
//!
//! The renderer may only navigate within the application's own content.
//! URLs are compared by origin (scheme, host and port), so look-alike hosts
//! and `user@host` forms never match. Links meant to open a new window never
//! navigate in-app; they are reported so the privileged side can hand them to
//! the system browser.

use url::Url;

/// An origin the renderer may load.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Origin {
    scheme: &'static str,
    host: &'static str,
    port: Option<u16>,
}

/// Bundled content. WebView2 rewrites custom protocols, so on Windows
/// `vessel://localhost/x` arrives as `http://vessel.localhost/x`.
const BUNDLED_ORIGINS: &[Origin] = &[
    Origin {
        scheme: "vessel",
        host: "localhost",
        port: None,
    },
    Origin {
        scheme: "http",
        host: "vessel.localhost",
        port: Some(80),
    },
];

#[derive(Debug, Clone)]
pub struct NavigationPolicy {
    origins: Vec<Origin>,
}

impl NavigationPolicy {
    /// Allow only bundled content.
    pub fn bundled() -> Self {
        Self {
            origins: BUNDLED_ORIGINS.to_vec(),
        }
    }

    /// Allow bundled content and the local dev server on `port`.
    pub fn with_dev_server(port: u16) -> Self {
        let mut policy = Self::bundled();
        policy.origins.push(Origin {
            scheme: "http",
            host: "localhost",
            port: Some(port),
        });
        policy
    }

    pub fn is_allowed(&self, url: &str) -> bool {
        if url == "about:blank" {
            return true;
        }
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        if !parsed.username().is_empty() || parsed.password().is_some() {
            return false;
        }
        let Some(host) = parsed.host_str() else {
            return false;
        };
        let port = parsed.port_or_known_default();
        self.origins.iter().any(|origin| {
            origin.scheme == parsed.scheme() && origin.host == host && origin.port == port
        })
    }
}

impl Default for NavigationPolicy {
    fn default() -> Self {
        Self::bundled()
    }
}
