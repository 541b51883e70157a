//! `rn-loader` — turn map descriptions into cached road networks.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`parser`]  | `load_map_reader`, `parse_into`, map-description grammar    |
//! | [`source`]  | `MapSource` trait, `DirectorySource`, `MemorySource`        |
//! | [`cache`]   | `RoadNetworkCache` — one build per identifier               |
//! | [`config`]  | `LoaderConfig` — maps directory resolution                 |
//! | [`error`]   | `LoadError`, `LoadResult<T>`                               |
//!
//! # Typical use
//!
//! ```no_run
//! use rn_loader::{LoaderConfig, RoadNetworkCache};
//!
//! let cache = RoadNetworkCache::from_config(&LoaderConfig::resolve(None));
//! let network = cache.load("romania.txt")?;
//! for n in network.neighbors("Arad") {
//!     println!("{} {}", n.id, n.weight);
//! }
//! # Ok::<(), rn_loader::LoadError>(())
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod parser;
pub mod source;


pub use cache::RoadNetworkCache;
pub use config::LoaderConfig;
pub use error::{LoadError, LoadResult};
pub use parser::{MapSummary, load_map_file, load_map_reader, load_map_str, parse_into};
pub use source::{DirectorySource, MapSource, MemorySource};
