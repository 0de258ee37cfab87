//! HTTP-shaped responses for intercepted requests.
//!
//! A response is a plain value: status code, status text, ordered headers and
//! a body the caller takes ownership of. File bodies are opened fresh for
//! every response so concurrent requests never share a handle.
use crate::content_type;
use crate::error::VirtualHostError;
use crate::validator::content_root::Resolution;
use crate::Result;

use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::Path;

/// Cache policy attached to every served file.
pub const NO_CACHE: &str = "no-cache, max-age=0, must-revalidate, no-store";

/// Separator used by [`ResolvedResponse::headers_block`].
pub const HEADER_LINE_SEPARATOR: &str = "\n";

/// SUMMARY:
/// Readable response body owned by the caller.
///
/// DETAILS:
/// Dropping the body releases the underlying file handle, so a caller that
/// bails out early (or panics) never leaks it.
#[derive(Debug)]
pub enum ResponseBody {
    /// Freshly opened handle to a file under the content root.
    File(File),
    /// In-memory bytes, used for the 404 diagnostic.
    Memory(Cursor<Vec<u8>>),
}

impl ResponseBody {
    /// Drain the whole body into a `Vec`.
    pub fn read_to_vec(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

impl Read for ResponseBody {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            ResponseBody::File(file) => file.read(buf),
            ResponseBody::Memory(cursor) => cursor.read(buf),
        }
    }
}

/// SUMMARY:
/// Status, headers and body for one intercepted request.
#[derive(Debug)]
pub struct ResolvedResponse {
    status_code: u16,
    status_text: &'static str,
    headers: Vec<(String, String)>,
    body: ResponseBody,
}

impl ResolvedResponse {
    /// SUMMARY:
    /// Build a 200 response streaming `path`.
    ///
    /// DETAILS:
    /// Headers are computed before the file is opened; the handle is opened
    /// last and moved straight into the response.
    ///
    /// ERRORS:
    /// - `VirtualHostError::FileIo`: The file could not be opened (removed or permissions
    ///   changed after the existence check). Not retried.
    pub fn ok_file(path: &Path) -> Result<Self> {
        let headers = vec![
            (
                "Content-Type".to_string(),
                content_type::resolve(path).to_string(),
            ),
            ("Cache-Control".to_string(), NO_CACHE.to_string()),
        ];

        let file = File::open(path).map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "failed to open resolved file");
            VirtualHostError::file_io(path.to_path_buf(), e)
        })?;

        Ok(Self {
            status_code: 200,
            status_text: "OK",
            headers,
            body: ResponseBody::File(file),
        })
    }

    /// SUMMARY:
    /// Build the 404 diagnostic naming the candidate path.
    pub fn not_found(candidate: &Path) -> Self {
        let message = format!("There is no file at {}", candidate.display());
        Self {
            status_code: 404,
            status_text: "Not found",
            headers: vec![("Content-Type".to_string(), "text/plain".to_string())],
            body: ResponseBody::Memory(Cursor::new(message.into_bytes())),
        }
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    #[inline]
    pub fn status_text(&self) -> &'static str {
        self.status_text
    }

    /// Headers in emission order.
    #[inline]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First header value with the given name (ASCII case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Headers rendered as `Name: value` lines joined by [`HEADER_LINE_SEPARATOR`].
    pub fn headers_block(&self) -> String {
        self.headers
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join(HEADER_LINE_SEPARATOR)
    }

    #[inline]
    pub fn body(&mut self) -> &mut ResponseBody {
        &mut self.body
    }

    /// Hand the body over to the caller.
    #[inline]
    pub fn into_body(self) -> ResponseBody {
        self.body
    }

    /// Split into `(status_code, status_text, headers_block, body)`, the shape
    /// most webview interception callbacks expect.
    pub fn into_parts(self) -> (u16, &'static str, String, ResponseBody) {
        let block = self.headers_block();
        (self.status_code, self.status_text, block, self.body)
    }
}

/// SUMMARY:
/// Turn a resolution into a response: 200 for `Found`, 404 diagnostic otherwise.
///
/// ERRORS:
/// - `VirtualHostError::FileIo`: Only for a `Found` file that cannot be opened.
pub fn synthesize(resolution: Resolution) -> Result<ResolvedResponse> {
    match resolution {
        Resolution::Found(path) => ResolvedResponse::ok_file(&path),
        Resolution::Missing { candidate, .. } => Ok(ResolvedResponse::not_found(&candidate)),
    }
}

/// Build a response from a candidate path and an existence flag computed by the caller.
pub fn build(candidate: &Path, exists: bool) -> Result<ResolvedResponse> {
    if exists {
        ResolvedResponse::ok_file(candidate)
    } else {
        Ok(ResolvedResponse::not_found(candidate))
    }
}
