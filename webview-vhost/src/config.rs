//! Session configuration.
//!
//! With the `serde` feature `SessionConfig` can be read from a host
//! application's own config file; `content_host` may be omitted there.
use crate::error::VirtualHostError;
use std::path::{Path, PathBuf};

/// Synthetic host used when none is configured. The unspecified address is
/// never routable, so it cannot collide with a real public site.
pub const DEFAULT_CONTENT_HOST: &str = "0.0.0.0";

/// SUMMARY:
/// Everything needed to construct a `VirtualHostSession`.
///
/// EXAMPLE:
/// ```rust
/// # use webview_vhost::SessionConfig;
/// let config = SessionConfig::new("wwwroot/index.html").with_content_host("app.localhost");
/// assert_eq!(config.content_host(), "app.localhost");
///
/// let parsed: SessionConfig = "wwwroot/index.html".parse().unwrap();
/// assert_eq!(parsed.content_host(), "0.0.0.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionConfig {
    start_page: PathBuf,
    #[cfg_attr(feature = "serde", serde(default = "default_content_host"))]
    content_host: String,
}

#[cfg(feature = "serde")]
fn default_content_host() -> String {
    DEFAULT_CONTENT_HOST.to_string()
}

impl SessionConfig {
    pub fn new<P: Into<PathBuf>>(start_page: P) -> Self {
        Self {
            start_page: start_page.into(),
            content_host: DEFAULT_CONTENT_HOST.to_string(),
        }
    }

    /// Replace the synthetic host. Validated when the session is built.
    pub fn with_content_host(mut self, host: impl Into<String>) -> Self {
        self.content_host = host.into();
        self
    }

    #[inline]
    pub fn start_page(&self) -> &Path {
        &self.start_page
    }

    #[inline]
    pub fn content_host(&self) -> &str {
        &self.content_host
    }

    /// SUMMARY:
    /// Validate the content host and return `https://<content_host>/`.
    ///
    /// DETAILS:
    /// The host must stand alone in the authority and survive URI parsing
    /// byte-for-byte (no case folding or IDNA rewriting), so host comparison
    /// against parsed request URIs stays exact.
    ///
    /// ERRORS:
    /// - `VirtualHostError::InvalidContentHost`: Empty host, host with port/userinfo/path
    ///   characters, or one the parser would normalize.
    pub(crate) fn base_uri(&self) -> Result<url::Url, VirtualHostError> {
        let host = self.content_host.as_str();
        let invalid = || VirtualHostError::InvalidContentHost {
            host: host.to_string(),
        };

        if host.is_empty() || host.contains(['/', '?', '#', '@', ':', '\\']) {
            return Err(invalid());
        }
        let parsed = url::Url::parse(&format!("https://{host}/")).map_err(|_| invalid())?;
        if parsed.host_str() != Some(host) {
            return Err(invalid());
        }
        Ok(parsed)
    }
}

impl std::str::FromStr for SessionConfig {
    type Err = std::convert::Infallible;

    /// Parse a start-page path, keeping the default content host.
    #[inline]
    fn from_str(start_page: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(start_page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_host_is_the_unspecified_address() {
        let config = SessionConfig::new("index.html");
        assert_eq!(config.content_host(), DEFAULT_CONTENT_HOST);
        assert!(config.base_uri().is_ok());
    }

    #[test]
    fn lowercase_names_and_ipv4_are_accepted() {
        for host in ["app.localhost", "appassets.example", "127.0.0.2"] {
            let config = SessionConfig::new("index.html").with_content_host(host);
            assert!(config.base_uri().is_ok(), "{host}");
        }
    }

    #[test]
    fn hosts_the_parser_would_rewrite_or_reject_are_refused() {
        for host in ["", "App.Local", "a b", "host:8080", "user@host", "a/b", "0x7f.1"] {
            let config = SessionConfig::new("index.html").with_content_host(host);
            assert!(
                matches!(
                    config.base_uri(),
                    Err(VirtualHostError::InvalidContentHost { .. })
                ),
                "{host:?} should be rejected"
            );
        }
    }

    #[test]
    fn from_str_keeps_the_path_verbatim() {
        let config: SessionConfig = "dist/app/index.html".parse().unwrap();
        assert_eq!(config.start_page(), Path::new("dist/app/index.html"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_defaults_the_content_host() {
        let config: SessionConfig =
            serde_json::from_str(r#"{ "start_page": "wwwroot/index.html" }"#).unwrap();
        assert_eq!(config.content_host(), DEFAULT_CONTENT_HOST);

        let config: SessionConfig = serde_json::from_str(
            r#"{ "start_page": "wwwroot/index.html", "content_host": "app.localhost" }"#,
        )
        .unwrap();
        assert_eq!(config.content_host(), "app.localhost");
    }
}
