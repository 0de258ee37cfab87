//! Extension-based MIME lookup for served files.
use std::path::Path;

/// Fallback for files whose extension is missing or not in the table.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// SUMMARY:
/// Map a file path's extension to a MIME type using the built-in extension table.
///
/// DETAILS:
/// Only the extension is consulted; the file is never opened. Unknown or
/// missing extensions map to [`FALLBACK_CONTENT_TYPE`].
///
/// EXAMPLE:
/// ```rust
/// use std::path::Path;
/// assert_eq!(webview_vhost::content_type::resolve(Path::new("index.html")), "text/html");
/// assert_eq!(
///     webview_vhost::content_type::resolve(Path::new("blob.unknownext")),
///     "application/octet-stream"
/// );
/// ```
pub fn resolve(path: &Path) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_CONTENT_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_web_assets_have_specific_types() {
        assert_eq!(resolve(Path::new("/app/wwwroot/index.html")), "text/html");
        assert_eq!(resolve(Path::new("css/site.css")), "text/css");
        assert_eq!(resolve(Path::new("img/logo.png")), "image/png");
        assert_eq!(resolve(Path::new("data/config.json")), "application/json");
        assert_eq!(resolve(Path::new("app.wasm")), "application/wasm");
    }

    #[test]
    fn script_extension_maps_to_a_javascript_type() {
        let js = resolve(Path::new("_framework/blazor.webview.js"));
        assert!(js.ends_with("/javascript"), "unexpected type {js}");
    }

    #[test]
    fn unknown_or_missing_extension_falls_back() {
        assert_eq!(resolve(Path::new("archive.zzzunknown")), FALLBACK_CONTENT_TYPE);
        assert_eq!(resolve(Path::new("LICENSE")), FALLBACK_CONTENT_TYPE);
        assert_eq!(resolve(Path::new("")), FALLBACK_CONTENT_TYPE);
    }

    #[test]
    fn extension_lookup_ignores_case() {
        assert_eq!(resolve(Path::new("INDEX.HTML")), "text/html");
    }
}
