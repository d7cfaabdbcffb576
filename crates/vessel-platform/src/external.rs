//! Handing URLs to the operating system's default handler.

use tracing::{info, warn};
use vessel_common::PlatformError;

/// Opens a URL outside the application.
pub trait ExternalOpener: Send + Sync {
    fn open_url(&self, url: &str) -> Result<(), PlatformError>;
}

/// Opens URLs with the system browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

/// Schemes that may leave the application. Anything else (`file:`,
/// `javascript:`, custom handlers) is refused.
const EXTERNAL_SCHEMES: &[&str] = &["https://", "http://", "mailto:"];

pub fn is_external_url_allowed(url: &str) -> bool {
    EXTERNAL_SCHEMES.iter().any(|s| url.starts_with(s))
}

impl ExternalOpener for SystemOpener {
    fn open_url(&self, url: &str) -> Result<(), PlatformError> {
        if !is_external_url_allowed(url) {
            return Err(PlatformError::OpenError(format!("scheme not allowed: {url}")));
        }
        open::that_detached(url).map_err(|e| PlatformError::OpenError(e.to_string()))?;
        info!(%url, "opened in external handler");
        Ok(())
    }
}

/// Hand `url` to `opener`, logging instead of propagating any failure.
pub fn open_external_logged(opener: &dyn ExternalOpener, url: &str) {
    if let Err(e) = opener.open_url(url) {
        warn!(%url, error = %e, "external open failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn allows_web_and_mail_links() {
        assert!(is_external_url_allowed("https://github.com/vessel-app/vessel"));
        assert!(is_external_url_allowed("http://example.com"));
        assert!(is_external_url_allowed("mailto:team@example.com"));
    }

    #[test]
    fn blocks_local_and_script_schemes() {
        assert!(!is_external_url_allowed("file:///etc/passwd"));
        assert!(!is_external_url_allowed("javascript:alert(1)"));
        assert!(!is_external_url_allowed("vessel://localhost/index.html"));
        assert!(!is_external_url_allowed(""));
    }

    #[test]
    fn system_opener_refuses_disallowed_scheme() {
        let err = SystemOpener.open_url("file:///etc/hosts").unwrap_err();
        assert!(matches!(err, PlatformError::OpenError(_)));
    }

    struct Failing(Mutex<u32>);

    impl ExternalOpener for Failing {
        fn open_url(&self, _url: &str) -> Result<(), PlatformError> {
            *self.0.lock().unwrap() += 1;
            Err(PlatformError::OpenError("no browser".into()))
        }
    }

    #[test]
    fn logged_open_swallows_failure() {
        let opener = Failing(Mutex::new(0));
        open_external_logged(&opener, "https://example.com");
        assert_eq!(*opener.0.lock().unwrap(), 1);
    }
}
