//! Resolution of logical asset names to filesystem paths and of the UI
//! entry point to a loadable URL.

use std::path::{Path, PathBuf};

/// Scheme under which bundled renderer content is served.
pub const CONTENT_SCHEME: &str = "vessel";

#[derive(Debug, Clone)]
pub struct AssetResolver {
    resources: PathBuf,
    packaged: bool,
}

impl AssetResolver {
    pub fn new(resources: impl Into<PathBuf>, packaged: bool) -> Self {
        Self {
            resources: resources.into(),
            packaged,
        }
    }

    /// Packaged builds ship `assets/` next to the executable; otherwise the
    /// workspace `assets/` directory is used.
    pub fn detect() -> Self {
        let bundled = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("assets")))
            .filter(|dir| dir.is_dir());

        match bundled {
            Some(dir) => Self::new(dir, true),
            None => {
                let workspace = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");
                Self::new(workspace.join("assets"), false)
            }
        }
    }

    pub fn is_packaged(&self) -> bool {
        self.packaged
    }

    pub fn resources_path(&self) -> &Path {
        &self.resources
    }

    /// Join logical path segments onto the resources directory.
    pub fn asset_path(&self, parts: &[&str]) -> PathBuf {
        parts
            .iter()
            .fold(self.resources.clone(), |path, part| path.join(part))
    }

    /// Directory served under the content scheme.
    pub fn renderer_dir(&self) -> PathBuf {
        self.asset_path(&["renderer"])
    }

    /// URL for the UI entry point: the dev server when a port is given,
    /// bundled content otherwise.
    pub fn entry_url(&self, entry: &str, dev_server_port: Option<u16>) -> String {
        let entry = entry.trim_start_matches('/');
        match dev_server_port {
            Some(port) => format!("http://localhost:{port}/{entry}"),
            None => format!("{CONTENT_SCHEME}://localhost/{entry}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_path_joins_segments() {
        let resolver = AssetResolver::new("/opt/vessel/assets", true);
        assert_eq!(
            resolver.asset_path(&["icons", "icon.png"]),
            PathBuf::from("/opt/vessel/assets/icons/icon.png")
        );
        assert_eq!(resolver.asset_path(&[]), PathBuf::from("/opt/vessel/assets"));
    }

    #[test]
    fn entry_url_for_dev_server() {
        let resolver = AssetResolver::new("/tmp/assets", false);
        assert_eq!(
            resolver.entry_url("index.html", Some(1212)),
            "http://localhost:1212/index.html"
        );
    }

    #[test]
    fn entry_url_for_bundled_content() {
        let resolver = AssetResolver::new("/tmp/assets", true);
        assert_eq!(
            resolver.entry_url("/index.html", None),
            "vessel://localhost/index.html"
        );
    }

    #[test]
    fn renderer_dir_is_under_resources() {
        let resolver = AssetResolver::new("/tmp/assets", true);
        assert_eq!(resolver.renderer_dir(), PathBuf::from("/tmp/assets/renderer"));
    }

    #[test]
    fn detect_falls_back_to_workspace_assets() {
        let resolver = AssetResolver::detect();
        if !resolver.is_packaged() {
            assert!(resolver.resources_path().ends_with("assets"));
        }
    }
}
