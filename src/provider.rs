//! Resource byte acquisition.
//!
//! A [`ResourceProvider`] answers "give me the bytes at this path" for the
//! acquirer's computed candidate paths. Absence is the normal case during
//! a resolution search, so it is reported as `Ok(None)` rather than an
//! error; only a located-but-unreadable resource is a hard failure.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use crate::error::{ResourceError, ResourceResult};

/// Source of raw resource bytes, keyed by slash-separated relative paths.
pub trait ResourceProvider: Send + Sync {
    /// Reads the resource at `path`, or `Ok(None)` if there is none.
    ///
    /// `reload` is a cache-bypass hint for providers that cache; the
    /// built-in providers have no cache and ignore it.
    fn read(&self, path: &str, reload: bool) -> ResourceResult<Option<Vec<u8>>>;
}

/// Provider reading resources from a directory tree on disk.
#[derive(Debug, Clone)]
pub struct FsProvider {
    root: PathBuf,
}

impl FsProvider {
    /// Creates a provider rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory resources are resolved against.
    #[must_use]
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl ResourceProvider for FsProvider {
    fn read(&self, path: &str, _reload: bool) -> ResourceResult<Option<Vec<u8>>> {
        let full = self.root.join(path);
        match std::fs::read(&full) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            // a directory at a resource path is absence, not failure
            Err(_) if full.is_dir() => Ok(None),
            Err(err) => Err(ResourceError::Io {
                path: path.to_string(),
                source: err,
            }),
        }
    }
}

/// Provider serving resources from memory, for embedded bundles and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource, replacing any previous bytes at the path.
    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), bytes.into());
    }

    /// Adds a resource, builder style.
    #[must_use]
    pub fn with(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    /// Number of resources held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if no resources are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl ResourceProvider for MemoryProvider {
    fn read(&self, path: &str, _reload: bool) -> ResourceResult<Option<Vec<u8>>> {
        Ok(self.files.get(path).cloned())
    }
}
