use crate::error::VirtualHostError;
use crate::validator::path_history::*;
use crate::Result;

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// SUMMARY:
/// Why a request did not resolve to a servable file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    /// The candidate is inside the root but nothing exists there.
    NotFound,
    /// The candidate exists inside the root but is not a regular file.
    NotAFile,
    /// The candidate canonicalized to a location outside the content root.
    OutsideRoot,
    /// Canonicalization failed; the candidate is the joined, unresolved path.
    Unresolvable,
}

/// SUMMARY:
/// Outcome of mapping a request path onto the content root.
///
/// DETAILS:
/// Both variants carry the candidate path. For `Missing` that path is what the
/// 404 diagnostic names, which may lie outside the root (it is reported, never opened).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Canonical path of a regular file inside the content root.
    Found(PathBuf),
    Missing { candidate: PathBuf, reason: MissReason },
}

impl Resolution {
    /// The resolved (or attempted) path.
    #[inline]
    pub fn candidate(&self) -> &Path {
        match self {
            Resolution::Found(path) => path,
            Resolution::Missing { candidate, .. } => candidate,
        }
    }

    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }
}

/// SUMMARY:
/// The canonical directory every served file must reside within.
///
/// DETAILS:
/// Construction canonicalizes and verifies the directory once; every
/// `resolve` afterwards canonicalizes the candidate and compares it against
/// this cached root component by component. Cloning is cheap (shared `Arc`).
///
/// EXAMPLE:
/// ```rust
/// # use webview_vhost::ContentRoot;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = tempfile::tempdir()?;
/// std::fs::write(dir.path().join("index.html"), "<h1>hi</h1>")?;
/// let root = ContentRoot::try_new(dir.path())?;
/// assert!(root.resolve("/index.html").is_found());
/// assert!(!root.resolve("/../index.html").is_found());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ContentRoot {
    path: Arc<RootHistory>,
}

impl ContentRoot {
    /// SUMMARY:
    /// Create a content root anchored at an existing directory.
    ///
    /// ERRORS:
    /// - `VirtualHostError::InvalidContentRoot`: Directory is missing, not a directory, or cannot be canonicalized.
    pub fn try_new<P: AsRef<Path>>(root_dir: P) -> Result<Self> {
        let root_dir = root_dir.as_ref();
        let verified = PathHistory::<Raw>::new(root_dir)
            .canonicalize()
            .and_then(|canon| canon.verify_directory())
            .map_err(|e| VirtualHostError::invalid_content_root(root_dir.to_path_buf(), e))?;

        Ok(Self {
            path: Arc::new(verified),
        })
    }

    /// Canonical root directory.
    #[inline]
    pub fn path(&self) -> &Path {
        self.path.as_ref()
    }

    /// True when `candidate` is the root or a descendant of it. The candidate
    /// is expected to be canonical already.
    #[inline]
    pub fn contains(&self, candidate: &Path) -> bool {
        candidate.starts_with(self.path())
    }

    /// SUMMARY:
    /// Map a percent-decoded request path onto the content root.
    ///
    /// DETAILS:
    /// Leading separators are dropped so the request is always joined under the
    /// root. The joined path is canonicalized, checked for containment, then
    /// checked to be a regular file. Never fails: every miss is a `Missing`.
    pub fn resolve(&self, request_path: &str) -> Resolution {
        let relative = request_path.trim_start_matches(std::path::is_separator);
        let joined = self.path().join(relative);

        let canonical = match PathHistory::<Raw>::new(joined.clone()).canonicalize() {
            Ok(canonical) => canonical,
            Err(err) => {
                tracing::debug!(candidate = %joined.display(), error = %err, "request path could not be canonicalized");
                return Resolution::Missing {
                    candidate: joined,
                    reason: MissReason::Unresolvable,
                };
            }
        };

        let contained = match canonical.containment_check(&self.path) {
            Ok(contained) => contained,
            Err(outside) => {
                tracing::warn!(
                    request = request_path,
                    candidate = %outside.display(),
                    root = %self.path().display(),
                    "request resolved outside the content root"
                );
                return Resolution::Missing {
                    candidate: outside.into_inner(),
                    reason: MissReason::OutsideRoot,
                };
            }
        };

        match contained.verify_file() {
            Ok(file) => Resolution::Found(file.into_inner()),
            Err(other) => {
                let reason = if other.exists() {
                    MissReason::NotAFile
                } else {
                    MissReason::NotFound
                };
                Resolution::Missing {
                    candidate: other.into_inner(),
                    reason,
                }
            }
        }
    }

    /// SUMMARY:
    /// Express a canonical path inside the root as a forward-slash relative URL.
    ///
    /// RETURNS:
    /// - `Some(String)` for the root's descendants (empty string for the root itself).
    /// - `None` if the path is outside the root or contains a traversal segment.
    pub fn relative_url(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(self.path()).ok()?;
        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(name) => segments.push(name.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(segments.join("/"))
    }
}

impl AsRef<Path> for ContentRoot {
    #[inline]
    fn as_ref(&self) -> &Path {
        self.path()
    }
}

impl std::fmt::Debug for ContentRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentRoot")
            .field("path", &self.path())
            .finish()
    }
}

impl PartialEq for ContentRoot {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.path() == other.path()
    }
}

impl Eq for ContentRoot {}
