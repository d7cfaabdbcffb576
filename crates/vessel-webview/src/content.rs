//! Local content serving via custom protocol.
//!
//! Registers a `vessel://` custom protocol so the renderer can load bundled
//! HTML/JS/CSS without a local HTTP server.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Serves files from a base directory.
///
/// A request for `vessel://localhost/app/index.html` resolves to
/// `{base_dir}/app/index.html`. Paths that escape `base_dir` (through `..`
/// or symlinks) resolve to nothing.
#[derive(Debug, Clone)]
pub struct ContentProvider {
    base_dir: PathBuf,
}

impl ContentProvider {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Resolve a request path to MIME type and content bytes.
    pub fn resolve(&self, path: &str) -> Option<(&'static str, Cow<'static, [u8]>)> {
        let clean = path.split(['?', '#']).next().unwrap_or("").trim_start_matches('/');
        let clean = if clean.is_empty() { "index.html" } else { clean };
        let file_path = self.base_dir.join(clean);

        let canonical_base = std::fs::canonicalize(&self.base_dir).ok()?;
        let canonical_file = std::fs::canonicalize(&file_path).ok()?;
        if !canonical_file.starts_with(&canonical_base) || !canonical_file.is_file() {
            return None;
        }

        let data = std::fs::read(&canonical_file).ok()?;
        Some((mime_from_extension(&canonical_file), Cow::Owned(data)))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// Strip the scheme and host from a content URL, leaving the request path.
pub fn request_path(uri: &str) -> &str {
    uri.strip_prefix("vessel://localhost/")
        .or_else(|| uri.strip_prefix("vessel://localhost"))
        .or_else(|| uri.strip_prefix("vessel:///"))
        .or_else(|| uri.strip_prefix("vessel://"))
        // WebView2 rewrites custom protocols: vessel://localhost/x becomes http://vessel.localhost/x
        .or_else(|| uri.strip_prefix("http://vessel.localhost/"))
        .unwrap_or("")
}

/// Guess MIME type from file extension.
fn mime_from_extension(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") | Some("mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("map") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("wasm") => "application/wasm",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("webp") => "image/webp",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (tempfile::TempDir, ContentProvider) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>vessel</html>").unwrap();
        std::fs::create_dir(dir.path().join("js")).unwrap();
        std::fs::write(dir.path().join("js").join("renderer.js"), "console.log(1)").unwrap();
        let cp = ContentProvider::new(dir.path().join(""));
        (dir, cp)
    }

    #[test]
    fn resolves_entry_point() {
        let (_dir, cp) = fixture();
        let (mime, data) = cp.resolve("index.html").unwrap();
        assert_eq!(mime, "text/html");
        assert_eq!(&*data, b"<html>vessel</html>");
    }

    #[test]
    fn empty_path_is_index() {
        let (_dir, cp) = fixture();
        assert_eq!(cp.resolve("").unwrap().0, "text/html");
        assert_eq!(cp.resolve("/").unwrap().0, "text/html");
    }

    #[test]
    fn query_and_fragment_are_ignored() {
        let (_dir, cp) = fixture();
        assert!(cp.resolve("index.html?v=2#top").is_some());
    }

    #[test]
    fn nested_script_has_js_mime() {
        let (_dir, cp) = fixture();
        assert_eq!(cp.resolve("js/renderer.js").unwrap().0, "application/javascript");
    }

    #[test]
    fn traversal_is_blocked() {
        let (dir, cp) = fixture();
        let outside = dir.path().parent().unwrap().join("vessel_outside_secret.txt");
        let _ = std::fs::write(&outside, "secret");
        assert!(cp.resolve("../vessel_outside_secret.txt").is_none());
        assert!(cp.resolve("js/../../vessel_outside_secret.txt").is_none());
        assert!(cp.resolve("/etc/passwd").is_none());
        let _ = std::fs::remove_file(outside);
    }

    #[test]
    fn directories_and_missing_files_resolve_to_none() {
        let (_dir, cp) = fixture();
        assert!(cp.resolve("js").is_none());
        assert!(cp.resolve("missing.html").is_none());
    }

    #[test]
    fn request_path_strips_scheme() {
        assert_eq!(request_path("vessel://localhost/index.html"), "index.html");
        assert_eq!(request_path("vessel://localhost"), "");
        assert_eq!(request_path("http://vessel.localhost/js/a.js"), "js/a.js");
        assert_eq!(request_path("https://example.com/x"), "");
    }
}
