//! Developer-tooling extensions for debug builds.
//!
//! The cache holds one directory per configured extension. An unpacked
//! browser extension (a directory with its own `manifest.json`) placed there
//! is loaded by the webview where the platform supports it (WebView2 on
//! Windows). Vessel only prepares the directories and records when it did;
//! it never fetches extension builds. A forced upgrade wipes the cache.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vessel_common::PlatformError;

/// Prepares the developer-extension cache. Failures are reported to the
/// caller, which logs them and carries on.
#[async_trait]
pub trait ExtensionInstaller: Send + Sync {
    /// Make sure a directory exists for each of `names`, wiping the cache
    /// first when `force` is set. Returns the names prepared by this call.
    async fn prepare(&self, names: &[String], force: bool) -> Result<Vec<String>, PlatformError>;

    /// Directory the webview should load unpacked extensions from.
    fn load_path(&self) -> Option<&Path>;
}

/// Written by vessel next to the extension build, never read by the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheRecord {
    name: String,
    prepared_at: String,
}

const RECORD_FILE: &str = ".vessel-cache.json";
/// Present in every unpacked browser extension.
const BROWSER_MANIFEST: &str = "manifest.json";

/// Extension cache rooted at a directory.
#[derive(Debug, Clone)]
pub struct ExtensionCache {
    root: PathBuf,
}

impl ExtensionCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache under the platform extensions directory.
    pub fn platform_default() -> Result<Self, PlatformError> {
        Ok(Self::new(vessel_platform::extensions_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the directory for `name` has been prepared.
    pub fn is_prepared(&self, name: &str) -> bool {
        self.root.join(name).join(RECORD_FILE).is_file()
    }

    /// Whether an unpacked extension build has been placed for `name`.
    pub fn is_loadable(&self, name: &str) -> bool {
        self.root.join(name).join(BROWSER_MANIFEST).is_file()
    }
}

/// Extension names become directory names, so they must be a single plain
/// path segment.
fn validate_name(name: &str) -> Result<(), PlatformError> {
    let plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0');
    if plain {
        Ok(())
    } else {
        Err(PlatformError::PathError(format!(
            "invalid extension name: {name:?}"
        )))
    }
}

fn io_err(path: &Path, e: std::io::Error) -> PlatformError {
    PlatformError::PathError(format!("{}: {e}", path.display()))
}

#[async_trait]
impl ExtensionInstaller for ExtensionCache {
    async fn prepare(&self, names: &[String], force: bool) -> Result<Vec<String>, PlatformError> {
        for name in names {
            validate_name(name)?;
        }

        if force && tokio::fs::try_exists(&self.root).await.unwrap_or(false) {
            tracing::info!(path = %self.root.display(), "clearing extension cache");
            tokio::fs::remove_dir_all(&self.root)
                .await
                .map_err(|e| io_err(&self.root, e))?;
        }

        let mut prepared = Vec::new();
        for name in names {
            let dir = self.root.join(name);
            if !self.is_prepared(name) {
                tokio::fs::create_dir_all(&dir)
                    .await
                    .map_err(|e| io_err(&dir, e))?;

                let record = CacheRecord {
                    name: name.clone(),
                    prepared_at: chrono::Utc::now().to_rfc3339(),
                };
                let json = serde_json::to_string_pretty(&record)
                    .map_err(|e| PlatformError::PathError(e.to_string()))?;
                let path = dir.join(RECORD_FILE);
                tokio::fs::write(&path, json)
                    .await
                    .map_err(|e| io_err(&path, e))?;
                prepared.push(name.clone());
            }

            if self.is_loadable(name) {
                tracing::debug!(extension = %name, "extension build present");
            } else {
                tracing::info!(
                    extension = %name,
                    dir = %dir.display(),
                    "no unpacked build for extension, place one in its directory"
                );
            }
        }
        Ok(prepared)
    }

    fn load_path(&self) -> Option<&Path> {
        Some(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn prepares_each_extension_once() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ExtensionCache::new(dir.path().join("extensions"));

        let first = cache
            .prepare(&names(&["react-developer-tools"]), false)
            .await
            .unwrap();
        assert_eq!(first, names(&["react-developer-tools"]));
        assert!(cache.is_prepared("react-developer-tools"));

        let second = cache
            .prepare(&names(&["react-developer-tools"]), false)
            .await
            .unwrap();
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn preparing_never_fakes_a_browser_build() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ExtensionCache::new(dir.path().join("extensions"));
        cache.prepare(&names(&["react-developer-tools"]), false).await.unwrap();
        assert!(!cache.is_loadable("react-developer-tools"));

        let build = cache.root().join("react-developer-tools").join("manifest.json");
        std::fs::write(&build, r#"{"manifest_version":3}"#).unwrap();
        assert!(cache.is_loadable("react-developer-tools"));

        // A later prepare keeps the placed build.
        cache.prepare(&names(&["react-developer-tools"]), false).await.unwrap();
        assert!(build.is_file());
    }

    #[tokio::test]
    async fn force_wipes_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ExtensionCache::new(dir.path().join("extensions"));
        cache.prepare(&names(&["a", "b"]), false).await.unwrap();
        std::fs::write(cache.root().join("stale.bin"), b"old").unwrap();

        let again = cache.prepare(&names(&["a"]), true).await.unwrap();
        assert_eq!(again, names(&["a"]));
        assert!(!cache.root().join("stale.bin").exists());
        assert!(!cache.is_prepared("b"));
    }

    #[tokio::test]
    async fn rejects_path_like_names() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ExtensionCache::new(dir.path().join("extensions"));
        for bad in ["", "..", "../escape", "a/b", "a\\b"] {
            let err = cache.prepare(&names(&[bad]), false).await.unwrap_err();
            assert!(err.to_string().contains("invalid extension name"), "{bad:?}");
        }
        assert!(!cache.root().exists());
    }

    #[test]
    fn webview_loads_from_the_cache_root() {
        let cache = ExtensionCache::new("/tmp/vessel-ext");
        assert_eq!(cache.load_path(), Some(Path::new("/tmp/vessel-ext")));
    }
}
