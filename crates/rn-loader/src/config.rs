//! Loader configuration.
//!
//! The only setting is the directory that map identifiers resolve against.
//! [`LoaderConfig::resolve`] picks it in this order:
//!
//! 1. Explicit path passed by the caller (e.g. a `--maps-dir` flag).
//! 2. `RN_MAPS_DIR` environment variable, if set and non-empty.
//! 3. `maps/` under the current working directory.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable overriding the maps directory.
pub const MAPS_DIR_ENV: &str = "RN_MAPS_DIR";

/// Directory name used when nothing else is configured.
pub const DEFAULT_MAPS_DIR: &str = "maps";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Root for [`DirectorySource`](crate::DirectorySource) lookups.
    pub maps_dir: PathBuf,
}

impl LoaderConfig {
    pub fn new(maps_dir: impl Into<PathBuf>) -> Self {
        Self { maps_dir: maps_dir.into() }
    }

    /// Resolve the maps directory from `explicit`, the environment, or the
    /// default, in that order.
    pub fn resolve(explicit: Option<&Path>) -> Self {
        Self::resolve_from(explicit, env::var_os(MAPS_DIR_ENV))
    }

    pub(crate) fn resolve_from(explicit: Option<&Path>, env_value: Option<OsString>) -> Self {
        if let Some(path) = explicit {
            return Self::new(path);
        }
        match env_value {
            Some(value) if !value.is_empty() => Self::new(value),
            _ => Self::default(),
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        let cwd = env::current_dir().unwrap_or_default();
        Self::new(cwd.join(DEFAULT_MAPS_DIR))
    }
}
