use soft_canonicalize::soft_canonicalize;
use std::io::{Error as IoError, ErrorKind};
use std::ops::Deref;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Raw;
#[derive(Debug, Clone)]
pub struct Canonicalized;
#[derive(Debug, Clone)]
pub struct Directory;
#[derive(Debug, Clone)]
pub struct Contained;
#[derive(Debug, Clone)]
pub struct RegularFile;

/// A path tagged with the sequence of checks it went through.
///
/// The `History` parameter is a nested tuple of the markers above, so a
/// `PathHistory<((Raw, Canonicalized), Contained)>` can only be produced by
/// canonicalizing a raw path and then passing the containment check.
#[derive(Debug, Clone)]
pub struct PathHistory<History> {
    inner: PathBuf,
    _marker: std::marker::PhantomData<History>,
}

/// Canonical content root directory as stored by `ContentRoot`.
pub type RootHistory = PathHistory<((Raw, Canonicalized), Directory)>;

impl<H> AsRef<Path> for PathHistory<H> {
    #[inline]
    fn as_ref(&self) -> &Path {
        &self.inner
    }
}

impl<H> Deref for PathHistory<H> {
    type Target = Path;
    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl PathHistory<Raw> {
    #[inline]
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        PathHistory {
            inner: path.into(),
            _marker: std::marker::PhantomData,
        }
    }
}

impl<H> PathHistory<H> {
    #[inline]
    pub fn into_inner(self) -> PathBuf {
        self.inner
    }

    #[inline]
    fn advance<N>(self) -> PathHistory<N> {
        PathHistory {
            inner: self.inner,
            _marker: std::marker::PhantomData,
        }
    }

    /// Resolve `.`/`..`, redundant separators and symlinks of the existing
    /// prefix into an absolute path. The path does not need to exist.
    pub fn canonicalize(self) -> std::io::Result<PathHistory<(H, Canonicalized)>> {
        let canon = soft_canonicalize(&self.inner)?;
        Ok(PathHistory {
            inner: canon,
            _marker: std::marker::PhantomData,
        })
    }
}

impl<H> PathHistory<(H, Canonicalized)> {
    /// Succeeds only for an existing directory.
    pub fn verify_directory(self) -> std::io::Result<PathHistory<((H, Canonicalized), Directory)>> {
        let metadata = std::fs::metadata(&self.inner)?;
        if !metadata.is_dir() {
            return Err(IoError::new(
                ErrorKind::InvalidInput,
                "The content root exists but is not a directory.",
            ));
        }
        Ok(self.advance())
    }

    /// Component-wise prefix check against the canonical root. `/a/b-evil`
    /// does not start with `/a/b`. On failure the path is handed back so the
    /// caller can still report it.
    #[inline]
    pub fn containment_check(
        self,
        root: &RootHistory,
    ) -> Result<PathHistory<((H, Canonicalized), Contained)>, Self> {
        if !self.starts_with(root) {
            return Err(self);
        }
        Ok(self.advance())
    }
}

impl<H> PathHistory<(H, Contained)> {
    /// Succeeds only for an existing regular file (symlinks followed).
    #[inline]
    pub fn verify_file(self) -> Result<PathHistory<((H, Contained), RegularFile)>, Self> {
        match std::fs::metadata(&self.inner) {
            Ok(metadata) if metadata.is_file() => Ok(self.advance()),
            _ => Err(self),
        }
    }
}
