//! SUMMARY:
//! Define the crate-wide error type for session setup, request handling and file I/O.
//!
//! OVERVIEW:
//! `VirtualHostError` covers invalid configuration (start page, content root,
//! content host), integration mistakes by the platform adapter (double start,
//! unparseable request URI) and the one I/O failure the resolver cannot turn
//! into a response value (an existing file that cannot be opened).
//!
//! A request for a file that does not exist, or that resolves outside the
//! content root, is NOT an error: it is answered with a 404 response.
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

const MAX_ERROR_PATH_LEN: usize = 256;

// Internal helper: render error-friendly path display (truncate long values).
pub(crate) fn truncate_path_display(path: &Path, max_len: usize) -> String {
    let path_str = path.to_string_lossy();
    let char_count = path_str.chars().count();
    if char_count <= max_len {
        return path_str.into_owned();
    }
    let keep = max_len.saturating_sub(5) / 2;
    let start: String = path_str.chars().take(keep).collect();
    let mut tail_chars: Vec<char> = path_str.chars().rev().take(keep).collect();
    tail_chars.reverse();
    let end: String = tail_chars.into_iter().collect();
    format!("{start}...{end}")
}

/// SUMMARY:
/// Represent errors produced by session construction, the start handshake and request resolution.
///
/// VARIANTS:
/// - `InvalidStartPage`: The start page path cannot be canonicalized or has no file name.
/// - `InvalidContentRoot`: The start page's directory is missing, not a directory, or failed I/O checks.
/// - `InvalidContentHost`: The configured virtual host cannot be used as a URI host.
/// - `AlreadyStarted`: `start()` was called on a session that already started.
/// - `InvalidRequestUri`: The adapter handed over an empty or unparseable request URI.
/// - `FileIo`: A contained, existing file could not be opened.
#[derive(Debug)]
pub enum VirtualHostError {
    /// SUMMARY:
    /// The start page path is unusable.
    ///
    /// FIELDS:
    /// - `path` (`PathBuf`): The start page path as given by the caller.
    /// - `source` (`std::io::Error`): Why it was rejected.
    InvalidStartPage {
        path: PathBuf,
        source: std::io::Error,
    },
    /// SUMMARY:
    /// The content root (the start page's directory) is invalid.
    ///
    /// FIELDS:
    /// - `root` (`PathBuf`): The attempted content root.
    /// - `source` (`std::io::Error`): Underlying OS error.
    InvalidContentRoot {
        root: PathBuf,
        source: std::io::Error,
    },
    /// The configured content host is empty or contains characters not allowed in a URI host.
    InvalidContentHost { host: String },
    /// `start()` may only succeed once per session.
    AlreadyStarted,
    /// SUMMARY:
    /// The request URI handed to `try_resolve_str` is empty or not a valid absolute URI.
    ///
    /// FIELDS:
    /// - `uri` (`String`): The raw input.
    /// - `source` (`url::ParseError`): Parser diagnostic.
    InvalidRequestUri {
        uri: String,
        source: url::ParseError,
    },
    /// SUMMARY:
    /// The file existed at resolution time but could not be opened.
    ///
    /// FIELDS:
    /// - `path` (`PathBuf`): Canonical path of the file.
    /// - `source` (`std::io::Error`): Underlying I/O cause.
    FileIo {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl VirtualHostError {
    #[inline]
    pub(crate) fn invalid_start_page(path: PathBuf, source: std::io::Error) -> Self {
        Self::InvalidStartPage { path, source }
    }

    #[inline]
    pub(crate) fn invalid_content_root(root: PathBuf, source: std::io::Error) -> Self {
        Self::InvalidContentRoot { root, source }
    }

    #[inline]
    pub(crate) fn invalid_request_uri(uri: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidRequestUri {
            uri: uri.into(),
            source,
        }
    }

    #[inline]
    pub(crate) fn file_io(path: PathBuf, source: std::io::Error) -> Self {
        Self::FileIo { path, source }
    }

    /// Returns true for the errors that indicate a bug in the calling adapter
    /// rather than a problem with configuration or the file system.
    pub fn is_invalid_usage(&self) -> bool {
        matches!(
            self,
            Self::AlreadyStarted | Self::InvalidRequestUri { .. }
        )
    }
}

impl fmt::Display for VirtualHostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VirtualHostError::InvalidStartPage { path, .. } => {
                let truncated = truncate_path_display(path, MAX_ERROR_PATH_LEN);
                write!(f, "Invalid start page: {truncated}")
            }
            VirtualHostError::InvalidContentRoot { root, .. } => {
                let truncated = truncate_path_display(root, MAX_ERROR_PATH_LEN);
                write!(f, "Invalid content root directory: {truncated}")
            }
            VirtualHostError::InvalidContentHost { host } => {
                write!(f, "Invalid content host '{host}'")
            }
            VirtualHostError::AlreadyStarted => write!(f, "Can only start once"),
            VirtualHostError::InvalidRequestUri { uri, .. } => {
                write!(f, "Invalid request URI '{uri}'")
            }
            VirtualHostError::FileIo { path, .. } => {
                let truncated = truncate_path_display(path, MAX_ERROR_PATH_LEN);
                write!(f, "Cannot open file: {truncated}")
            }
        }
    }
}

impl Error for VirtualHostError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            VirtualHostError::InvalidStartPage { source, .. }
            | VirtualHostError::InvalidContentRoot { source, .. }
            | VirtualHostError::FileIo { source, .. } => Some(source),
            VirtualHostError::InvalidRequestUri { source, .. } => Some(source),
            VirtualHostError::InvalidContentHost { .. } | VirtualHostError::AlreadyStarted => None,
        }
    }
}

#[cfg(test)]
mod tests;
