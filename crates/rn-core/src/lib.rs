//! `rn-core` — foundational types for the road-network crates.
//!
//! This crate has no `rn-*` dependencies and no mandatory external ones
//! (only optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                               |
//! |-----------|--------------------------------------------------------|
//! | [`geo`]   | `Point2D`, Euclidean distance, polar derivation        |
//! | [`ids`]   | `NodeId`                                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use geo::Point2D;
pub use ids::NodeId;
