//! Network-construction error type.

use thiserror::Error;

use crate::network::BuildMode;

/// Errors produced while populating a [`RoadNetworkBuilder`](crate::RoadNetworkBuilder).
///
/// A frozen [`RoadNetwork`](crate::RoadNetwork) has no failing operations;
/// every variant here is a build-phase failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    #[error("node {id:?} is already declared")]
    DuplicateNode { id: String },

    #[error("node {id:?} is not declared")]
    UnknownNode { id: String },

    #[error("road {from:?} - {to:?} has invalid weight {weight}")]
    InvalidWeight { from: String, to: String, weight: f64 },

    #[error("network uses {existing:?} node declarations, cannot add {requested:?}")]
    BuildModeConflict { existing: BuildMode, requested: BuildMode },

    #[error("network is full ({limit} nodes)")]
    TooManyNodes { limit: usize },
}

pub type NetworkResult<T> = Result<T, NetworkError>;
