//! SUMMARY:
//! The façade a platform adapter drives: construct once, `start()` once, then
//! `try_resolve` every intercepted request.
//!
//! DETAILS:
//! A session is `Send + Sync`. Resolution touches no shared mutable state and
//! may run concurrently from any number of request threads. The only mutable
//! state is the one-way start flag and the observer list.
use crate::config::SessionConfig;
use crate::error::VirtualHostError;
use crate::response::{self, ResolvedResponse};
use crate::validator::content_root::{ContentRoot, Resolution};
use crate::validator::path_history::{PathHistory, Raw};
use crate::Result;

use percent_encoding::percent_decode_str;
use std::io::{Error as IoError, ErrorKind};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use url::Url;

type NavigationHandler = Box<dyn Fn(&Url) + Send + Sync + 'static>;

/// SUMMARY:
/// Serve the files next to a start page through a synthetic `https` host.
///
/// EXAMPLE:
/// ```rust
/// # use webview_vhost::VirtualHostSession;
/// # use std::sync::{Arc, Mutex};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = tempfile::tempdir()?;
/// std::fs::write(dir.path().join("index.html"), "<h1>hello</h1>")?;
///
/// let session = VirtualHostSession::new(dir.path().join("index.html"))?;
/// let seen = Arc::new(Mutex::new(None));
/// let sink = Arc::clone(&seen);
/// session.on_navigate(move |uri| *sink.lock().unwrap() = Some(uri.clone()));
/// session.start()?;
///
/// let start_uri = seen.lock().unwrap().clone().unwrap();
/// assert_eq!(start_uri.as_str(), "https://0.0.0.0/index.html");
///
/// let mut response = session.try_resolve(&start_uri)?.expect("own host is always answered");
/// assert_eq!(response.status_code(), 200);
/// assert_eq!(response.body().read_to_vec()?, b"<h1>hello</h1>");
///
/// let foreign = url::Url::parse("https://example.com/index.html")?;
/// assert!(session.try_resolve(&foreign)?.is_none());
/// # Ok(())
/// # }
/// ```
pub struct VirtualHostSession {
    content_host: String,
    content_root: ContentRoot,
    host_page_relative_url: String,
    start_uri: Url,
    has_started: AtomicBool,
    observers: Mutex<Vec<NavigationHandler>>,
}

impl VirtualHostSession {
    /// SUMMARY:
    /// Create a session for `start_page` using the default content host.
    ///
    /// PARAMETERS:
    /// - `start_page` (`AsRef<Path>`): Absolute path, or relative to the process working directory.
    ///
    /// ERRORS:
    /// - `VirtualHostError::InvalidStartPage`: The path cannot be canonicalized or names no file.
    /// - `VirtualHostError::InvalidContentRoot`: The containing directory is missing or not a directory.
    pub fn new<P: AsRef<Path>>(start_page: P) -> Result<Self> {
        Self::with_config(SessionConfig::new(start_page.as_ref()))
    }

    /// SUMMARY:
    /// Create a session from a full configuration.
    ///
    /// DETAILS:
    /// The start page itself does not have to exist yet (requests for it then
    /// get the 404 diagnostic), but its directory does.
    ///
    /// ERRORS:
    /// - `VirtualHostError::InvalidContentHost`, `InvalidStartPage`, `InvalidContentRoot`.
    pub fn with_config(config: SessionConfig) -> Result<Self> {
        let base_uri = config.base_uri()?;

        let start_page = config.start_page();
        let (Some(parent), Some(file_name)) = (start_page.parent(), start_page.file_name()) else {
            let io = IoError::new(
                ErrorKind::InvalidInput,
                "The start page path does not name a file inside a directory.",
            );
            return Err(VirtualHostError::invalid_start_page(
                start_page.to_path_buf(),
                io,
            ));
        };
        // Only the directory is canonicalized: a start page that is itself a
        // symlink must not move the content root to the link target's directory.
        let parent = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };
        let directory = PathHistory::<Raw>::new(parent)
            .canonicalize()
            .map_err(|e| VirtualHostError::invalid_start_page(start_page.to_path_buf(), e))?;

        let content_root = ContentRoot::try_new(&*directory)?;

        let host_page_relative_url = file_name.to_string_lossy().into_owned();

        let start_uri = build_start_uri(base_uri, &host_page_relative_url);

        tracing::debug!(
            content_host = config.content_host(),
            content_root = %content_root.path().display(),
            start_page = %host_page_relative_url,
            "virtual host session created"
        );

        Ok(Self {
            content_host: config.content_host().to_string(),
            content_root,
            host_page_relative_url,
            start_uri,
            has_started: AtomicBool::new(false),
            observers: Mutex::new(Vec::new()),
        })
    }

    #[inline]
    pub fn content_host(&self) -> &str {
        &self.content_host
    }

    /// Canonical directory all served files must reside within.
    #[inline]
    pub fn content_root(&self) -> &ContentRoot {
        &self.content_root
    }

    /// Start page relative to the content root, `/`-separated.
    #[inline]
    pub fn host_page_relative_url(&self) -> &str {
        &self.host_page_relative_url
    }

    #[inline]
    pub fn has_started(&self) -> bool {
        self.has_started.load(Ordering::Acquire)
    }

    /// SUMMARY:
    /// `https://<content_host>/` followed by the start page's relative URL.
    #[inline]
    pub fn start_uri(&self) -> &Url {
        &self.start_uri
    }

    /// SUMMARY:
    /// Register a handler for the navigation event fired by `start()`.
    ///
    /// DETAILS:
    /// Handlers registered after `start()` never see the event; it is not
    /// buffered or replayed.
    pub fn on_navigate<F>(&self, handler: F)
    where
        F: Fn(&Url) + Send + Sync + 'static,
    {
        self.lock_observers().push(Box::new(handler));
    }

    /// SUMMARY:
    /// Transition `Created → Started` and tell observers which page to load first.
    ///
    /// DETAILS:
    /// The flag flips with a single compare-and-set, so of several concurrent
    /// callers exactly one succeeds and the event is emitted exactly once.
    /// Handlers run on the calling thread, outside the observer lock.
    ///
    /// ERRORS:
    /// - `VirtualHostError::AlreadyStarted`: The session was already started.
    pub fn start(&self) -> Result<()> {
        if self
            .has_started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(VirtualHostError::AlreadyStarted);
        }

        tracing::debug!(uri = %self.start_uri, "virtual host session started");

        let notifying = RestoreObservers {
            session: self,
            taken: std::mem::take(&mut *self.lock_observers()),
        };
        for handler in &notifying.taken {
            handler(&self.start_uri);
        }
        Ok(())
    }

    /// SUMMARY:
    /// Answer a request if it targets this session's virtual host.
    ///
    /// RETURNS:
    /// - `Ok(None)`: Different host; the adapter should fall back to real network
    ///   handling. No file-system access happens. The comparison is exact on the
    ///   parser-normalized host, so `https://APP.LOCAL/` matches a session on
    ///   `app.local` because `url` lowercases special-scheme hosts.
    /// - `Ok(Some(response))`: Own host. 200 for a contained regular file, the 404
    ///   diagnostic for anything else.
    ///
    /// ERRORS:
    /// - `VirtualHostError::FileIo`: The file was found but could not be opened.
    pub fn try_resolve(&self, request_uri: &Url) -> Result<Option<ResolvedResponse>> {
        if request_uri.host_str() != Some(self.content_host.as_str()) {
            return Ok(None);
        }

        let request_path = decode_request_path(request_uri);
        let resolution = self.content_root.resolve(&request_path);
        match &resolution {
            Resolution::Found(path) => {
                tracing::trace!(request = %request_uri, file = %path.display(), "serving file");
            }
            Resolution::Missing { candidate, reason } => {
                tracing::debug!(
                    request = %request_uri,
                    candidate = %candidate.display(),
                    ?reason,
                    "no file for request"
                );
            }
        }

        response::synthesize(resolution).map(Some)
    }

    /// SUMMARY:
    /// Parse `request_uri` and delegate to [`Self::try_resolve`].
    ///
    /// ERRORS:
    /// - `VirtualHostError::InvalidRequestUri`: Empty or unparseable input. Adapters passing
    ///   such values have a bug; this is never turned into a "not matched" answer.
    pub fn try_resolve_str(&self, request_uri: &str) -> Result<Option<ResolvedResponse>> {
        let parsed = Url::parse(request_uri)
            .map_err(|e| VirtualHostError::invalid_request_uri(request_uri, e))?;
        self.try_resolve(&parsed)
    }

    /// SUMMARY:
    /// Release session-held resources (the registered observers).
    ///
    /// DETAILS:
    /// Idempotent, valid before or after `start()`. Also runs on drop.
    /// Resolution keeps working after disposal; only notifications stop.
    pub fn dispose(&self) {
        let released = std::mem::take(&mut *self.lock_observers());
        if !released.is_empty() {
            tracing::debug!(observers = released.len(), "virtual host session disposed");
        }
    }

    fn lock_observers(&self) -> MutexGuard<'_, Vec<NavigationHandler>> {
        // A panicking observer must not wedge the session.
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Puts the handlers taken out by `start()` back, ahead of any registered while
/// they ran, even when one of them panics.
struct RestoreObservers<'a> {
    session: &'a VirtualHostSession,
    taken: Vec<NavigationHandler>,
}

impl Drop for RestoreObservers<'_> {
    fn drop(&mut self) {
        let mut guard = self.session.lock_observers();
        let late = std::mem::replace(&mut *guard, std::mem::take(&mut self.taken));
        guard.extend(late);
    }
}

impl Drop for VirtualHostSession {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for VirtualHostSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualHostSession")
            .field("content_host", &self.content_host)
            .field("content_root", &self.content_root.path())
            .field("host_page_relative_url", &self.host_page_relative_url)
            .field("has_started", &self.has_started())
            .finish()
    }
}

/// Append each `/`-separated segment of `relative_url` to `base`, percent-encoding
/// characters that would otherwise end the path or start an escape.
fn build_start_uri(mut base: Url, relative_url: &str) -> Url {
    if let Ok(mut segments) = base.path_segments_mut() {
        segments.clear().extend(relative_url.split('/'));
    }
    base
}

/// Percent-decoded path of `uri` (query and fragment excluded). Invalid UTF-8
/// sequences are replaced rather than rejected; such names then simply miss.
pub(crate) fn decode_request_path(uri: &Url) -> String {
    percent_decode_str(uri.path()).decode_utf8_lossy().into_owned()
}
