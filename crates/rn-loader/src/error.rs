//! Loader error type.
//!
//! `LoadError` is `Clone` so that a single failed build can be reported to
//! every caller that was waiting on it.  I/O errors are held behind `Arc`
//! for that reason.

use std::io;
use std::sync::Arc;

use thiserror::Error;

use rn_network::NetworkError;

/// Errors produced while loading a map description.  All are build-time
/// failures; nothing is cached when one occurs.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    #[error("map {identifier:?} is unavailable: {source}")]
    SourceUnavailable {
        identifier: String,
        #[source]
        source: Arc<io::Error>,
    },

    #[error("line {line}: read failed: {source}")]
    Read {
        line: usize,
        #[source]
        source: Arc<io::Error>,
    },

    #[error("line {line}: unexpected end of input, expected {expected}")]
    UnexpectedEof { line: usize, expected: &'static str },

    #[error("line {line}: invalid {field} {found:?}, expected a non-negative integer")]
    MalformedHeader {
        line:  usize,
        field: &'static str,
        found: String,
    },

    #[error("line {line}: malformed node line {content:?}: {reason}")]
    MalformedNodeLine {
        line:    usize,
        content: String,
        reason:  &'static str,
    },

    #[error("line {line}: malformed road line {content:?}: {reason}")]
    MalformedEdgeLine {
        line:    usize,
        content: String,
        reason:  &'static str,
    },

    #[error("line {line}: node {id:?} is already declared")]
    DuplicateNode { line: usize, id: String },

    #[error("line {line}: road references undeclared node {id:?}")]
    DanglingEdgeReference { line: usize, id: String },

    #[error("line {line}: {source}")]
    BuildModeConflict {
        line: usize,
        #[source]
        source: NetworkError,
    },

    #[error("line {line}: {source}")]
    TooManyNodes {
        line: usize,
        #[source]
        source: NetworkError,
    },
}

impl LoadError {
    pub(crate) fn unavailable(identifier: &str, source: io::Error) -> Self {
        LoadError::SourceUnavailable {
            identifier: identifier.to_owned(),
            source: Arc::new(source),
        }
    }

    /// Attach line context to a builder failure.
    pub(crate) fn from_network(err: NetworkError, line: usize, content: &str) -> Self {
        match err {
            NetworkError::DuplicateNode { id } => LoadError::DuplicateNode { line, id },
            NetworkError::UnknownNode { id } => LoadError::DanglingEdgeReference { line, id },
            NetworkError::InvalidWeight { .. } => LoadError::MalformedEdgeLine {
                line,
                content: content.to_owned(),
                reason: "weight must be a finite non-negative number",
            },
            err @ NetworkError::BuildModeConflict { .. } => {
                LoadError::BuildModeConflict { line, source: err }
            }
            err @ NetworkError::TooManyNodes { .. } => LoadError::TooManyNodes { line, source: err },
        }
    }
}

pub type LoadResult<T> = Result<T, LoadError>;
