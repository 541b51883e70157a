//! Where map descriptions come from.
//!
//! The cache resolves identifiers through the [`MapSource`] trait, so an
//! application can serve descriptions from anywhere.  Identifiers are opaque
//! strings; the source alone decides what they name.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::{LoadError, LoadResult};

// ── MapSource trait ───────────────────────────────────────────────────────────

/// Pluggable provider of map descriptions.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`; a cache shared between threads
/// opens sources from whichever thread performs the build.
pub trait MapSource: Send + Sync {
    /// Open the description named `identifier` for reading.
    ///
    /// Fails with [`LoadError::SourceUnavailable`].
    fn open(&self, identifier: &str) -> LoadResult<Box<dyn BufRead + '_>>;

    /// Identifiers currently available, sorted.
    fn list(&self) -> LoadResult<Vec<String>>;
}

fn no_map_provided() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, "no map provided")
}

// ── DirectorySource ───────────────────────────────────────────────────────────

/// Map files in one directory, addressed by path relative to it.
#[derive(Clone, Debug)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl MapSource for DirectorySource {
    fn open(&self, identifier: &str) -> LoadResult<Box<dyn BufRead + '_>> {
        if identifier.is_empty() {
            return Err(LoadError::unavailable(identifier, no_map_provided()));
        }
        let path = self.root.join(identifier);
        trace!(path = %path.display(), "opening map description");
        let file = File::open(&path).map_err(|e| LoadError::unavailable(identifier, e))?;
        Ok(Box::new(BufReader::new(file)))
    }

    /// Names of the regular files directly inside the root.  Entries whose
    /// names are not valid UTF-8 are skipped.
    fn list(&self) -> LoadResult<Vec<String>> {
        let root = self.root.display().to_string();
        let entries = fs::read_dir(&self.root).map_err(|e| LoadError::unavailable(&root, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| LoadError::unavailable(&root, e))?;
            let is_file = entry
                .file_type()
                .map_err(|e| LoadError::unavailable(&root, e))?
                .is_file();
            if !is_file {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

// ── MemorySource ──────────────────────────────────────────────────────────────

/// Descriptions held in memory, keyed by identifier.
///
/// Useful for embedding bundled maps and for tests.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    maps: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, identifier: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(identifier, text);
        self
    }

    /// Add or replace a description.  Returns the previous text, if any.
    pub fn insert(&mut self, identifier: impl Into<String>, text: impl Into<String>) -> Option<String> {
        self.maps.insert(identifier.into(), text.into())
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

impl MapSource for MemorySource {
    fn open(&self, identifier: &str) -> LoadResult<Box<dyn BufRead + '_>> {
        if identifier.is_empty() {
            return Err(LoadError::unavailable(identifier, no_map_provided()));
        }
        match self.maps.get(identifier) {
            Some(text) => Ok(Box::new(text.as_bytes())),
            None => Err(LoadError::unavailable(
                identifier,
                io::Error::new(io::ErrorKind::NotFound, "no such map"),
            )),
        }
    }

    fn list(&self) -> LoadResult<Vec<String>> {
        Ok(self.maps.keys().cloned().collect())
    }
}
