//! `rn-network` — road network graph and heuristic distance estimators.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`network`]   | `RoadNetwork` (CSR, frozen), `RoadNetworkBuilder`, `BuildMode` |
//! | [`heuristic`] | `Heuristic` trait, `ZeroHeuristic`, `StraightLineDistance`, `HeuristicFunction` |
//! | [`error`]     | `NetworkError`, `NetworkResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod heuristic;
pub mod network;

#[cfg(test)]
mod tests;

pub use error::{NetworkError, NetworkResult};
pub use heuristic::{
    Heuristic, HeuristicFunction, HeuristicKind, StraightLineDistance, ZeroHeuristic,
};
pub use network::{BuildMode, Neighbor, RoadNetwork, RoadNetworkBuilder};
