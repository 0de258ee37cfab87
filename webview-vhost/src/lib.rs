//! # webview-vhost
//!
//! Serve an application's local files to an embedded webview as if they came
//! from an `https` site, without a network stack.
//!
//! A [`VirtualHostSession`] is built from the path of a start page. The
//! directory holding that page becomes the content root, the security
//! boundary every served file must stay within. The platform adapter (the
//! code that owns the real webview control) then:
//!
//! 1. registers a navigation handler with [`VirtualHostSession::on_navigate`],
//! 2. calls [`VirtualHostSession::start`] once, which emits
//!    `https://<content host>/<start page>`,
//! 3. forwards every intercepted request URI to
//!    [`VirtualHostSession::try_resolve`] and renders the response, or falls
//!    back to the real network when it returns `None`.
//!
//! ```rust
//! use webview_vhost::VirtualHostSession;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let dir = tempfile::tempdir()?;
//! # std::fs::write(dir.path().join("index.html"), "<h1>app</h1>")?;
//! let session = VirtualHostSession::new(dir.path().join("index.html"))?;
//! session.start()?;
//!
//! // In scope: always answered, 200 or a 404 diagnostic.
//! let response = session
//!     .try_resolve_str("https://0.0.0.0/index.html")?
//!     .expect("own host");
//! assert_eq!(response.status_code(), 200);
//! assert_eq!(response.header("Content-Type"), Some("text/html"));
//!
//! // Traversal out of the content root is answered with 404, never served.
//! let escaped = session
//!     .try_resolve_str("https://0.0.0.0/..%2F..%2Fetc%2Fpasswd")?
//!     .expect("own host");
//! assert_eq!(escaped.status_code(), 404);
//!
//! // Other hosts are left to the real network stack.
//! assert!(session.try_resolve_str("https://example.com/")?.is_none());
//! # Ok(()) }
//! ```
//!
//! ## Containment
//!
//! Each request path is percent-decoded, joined under the content root and
//! canonicalized with `soft-canonicalize` (which resolves `..` and symlinks
//! even for paths that do not exist). The result must start with the
//! canonical root component by component, so `<root>-evil/x` is never
//! mistaken for a child of `<root>`, and it must be a regular file.
//!
//! ## Logging
//!
//! The crate emits `tracing` events (session lifecycle at `debug`, served
//! files at `trace`, escapes at `warn`, open failures at `error`) and never
//! installs a subscriber itself.
#![forbid(unsafe_code)]

pub mod config;
pub mod content_type;
pub mod error;
pub mod response;
pub mod session;
pub mod validator;

// Public exports
pub use config::{SessionConfig, DEFAULT_CONTENT_HOST};
pub use error::VirtualHostError;
pub use response::{ResolvedResponse, ResponseBody};
pub use session::VirtualHostSession;
pub use url::Url;
pub use validator::content_root::{ContentRoot, MissReason, Resolution};

/// Result type alias for this crate's operations.
pub type Result<T> = std::result::Result<T, VirtualHostError>;

#[cfg(test)]
mod tests;
