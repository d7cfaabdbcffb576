//! Update service: checks GitHub Releases for new versions.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use semver::Version;
use serde::Deserialize;
use vessel_common::UpdateError;
use vessel_platform::ExternalOpener;

/// A GitHub release entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GithubRelease {
    /// The tag name, e.g. "v0.2.0".
    pub tag_name: String,
    /// URL to the release page.
    pub html_url: String,
    /// Release notes body (markdown).
    pub body: Option<String>,
}

/// External update collaborator. One check per launch.
#[async_trait]
pub trait UpdateService: Send + Sync {
    /// Look for a newer release and notify the user when there is one.
    async fn check_and_notify(&self) -> Result<Option<GithubRelease>, UpdateError>;

    /// Install the release found by the last check.
    async fn install(&self) -> Result<(), UpdateError>;
}

/// Checks for newer versions on GitHub Releases.
pub struct GithubUpdater {
    api_url: String,
    current_version: Version,
    timeout: Duration,
    opener: Arc<dyn ExternalOpener>,
    pending: Mutex<Option<GithubRelease>>,
}

impl GithubUpdater {
    /// Create a checker for the given GitHub `owner/repo`.
    pub fn new(repo: &str, timeout: Duration, opener: Arc<dyn ExternalOpener>) -> Self {
        Self {
            api_url: format!("https://api.github.com/repos/{repo}/releases/latest"),
            current_version: current_version(),
            timeout,
            opener,
            pending: Mutex::new(None),
        }
    }

    pub fn current_version(&self) -> &Version {
        &self.current_version
    }

    async fn fetch_latest(&self) -> Result<GithubRelease, UpdateError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| UpdateError::Network(e.to_string()))?;

        let response = client
            .get(&self.api_url)
            .header("User-Agent", "vessel-updater")
            .send()
            .await
            .map_err(|e| UpdateError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(UpdateError::BadResponse(format!(
                "status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| UpdateError::BadResponse(e.to_string()))
    }

    fn set_pending(&self, release: Option<GithubRelease>) {
        *self.pending.lock().unwrap_or_else(|e| e.into_inner()) = release;
    }
}

#[async_trait]
impl UpdateService for GithubUpdater {
    async fn check_and_notify(&self) -> Result<Option<GithubRelease>, UpdateError> {
        let release = self.fetch_latest().await?;
        if !is_newer(&release.tag_name, &self.current_version) {
            tracing::debug!(latest = %release.tag_name, "already up to date");
            return Ok(None);
        }

        let body = format!(
            "Vessel {} is available (you have {}).",
            release.tag_name.trim_start_matches('v'),
            self.current_version
        );
        if let Err(e) = vessel_platform::notify("Update available", &body) {
            tracing::warn!(error = %e, "update notification failed");
        }

        self.set_pending(Some(release.clone()));
        Ok(Some(release))
    }

    async fn install(&self) -> Result<(), UpdateError> {
        let release = self
            .pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
            .ok_or(UpdateError::NothingToInstall)?;

        self.opener
            .open_url(&release.html_url)
            .map_err(|e| UpdateError::Install(e.to_string()))
    }
}

fn current_version() -> Version {
    Version::parse(env!("CARGO_PKG_VERSION")).unwrap_or_else(|_| Version::new(0, 0, 0))
}

/// Whether the release `tag` (optionally `v`-prefixed) is newer than
/// `current`. Unparseable tags are never newer.
pub fn is_newer(tag: &str, current: &Version) -> bool {
    Version::parse(tag.trim_start_matches('v')).is_ok_and(|latest| latest > *current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vessel_common::PlatformError;

    #[derive(Default)]
    struct RecordingOpener {
        opened: Mutex<Vec<String>>,
    }

    impl ExternalOpener for RecordingOpener {
        fn open_url(&self, url: &str) -> Result<(), PlatformError> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    fn release(tag: &str) -> GithubRelease {
        GithubRelease {
            tag_name: tag.into(),
            html_url: format!("https://github.com/vessel-app/vessel/releases/tag/{tag}"),
            body: None,
        }
    }

    #[test]
    fn version_comparison() {
        let current = Version::new(0, 1, 0);
        assert!(is_newer("0.2.0", &current));
        assert!(is_newer("v1.0.0", &current));
        assert!(is_newer("0.1.1", &current));
        assert!(!is_newer("0.1.0", &current));
        assert!(!is_newer("v0.0.9", &current));
    }

    #[test]
    fn prerelease_and_garbage_tags() {
        let current = Version::new(1, 0, 0);
        assert!(!is_newer("1.0.0-beta.1", &current));
        assert!(is_newer("1.0.1-rc.1", &current));
        assert!(!is_newer("nightly", &current));
        assert!(!is_newer("", &current));
    }

    #[test]
    fn updater_creation() {
        let updater = GithubUpdater::new(
            "vessel-app/vessel",
            Duration::from_secs(10),
            Arc::new(RecordingOpener::default()),
        );
        assert_eq!(
            updater.api_url,
            "https://api.github.com/repos/vessel-app/vessel/releases/latest"
        );
        assert_eq!(updater.current_version().to_string(), env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn install_without_pending_release() {
        let updater = GithubUpdater::new(
            "vessel-app/vessel",
            Duration::from_secs(10),
            Arc::new(RecordingOpener::default()),
        );
        assert!(matches!(
            updater.install().await,
            Err(UpdateError::NothingToInstall)
        ));
    }

    #[tokio::test]
    async fn install_opens_release_page_once() {
        let opener = Arc::new(RecordingOpener::default());
        let updater =
            GithubUpdater::new("vessel-app/vessel", Duration::from_secs(10), opener.clone());
        updater.set_pending(Some(release("v9.0.0")));

        updater.install().await.unwrap();
        assert!(updater.install().await.is_err());
        assert_eq!(
            *opener.opened.lock().unwrap(),
            vec!["https://github.com/vessel-app/vessel/releases/tag/v9.0.0".to_string()]
        );
    }

    #[test]
    fn release_deserializes_from_api_json() {
        let json = r#"{"tag_name":"v0.3.0","html_url":"https://x/y","body":null,"draft":false}"#;
        let parsed: GithubRelease = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.tag_name, "v0.3.0");
        assert!(parsed.body.is_none());
    }
}
