//! Road network representation and builder.
//!
//! # Lifecycle
//!
//! A network is populated through [`RoadNetworkBuilder`], which is the only
//! mutable form.  [`RoadNetworkBuilder::build`] freezes it into a
//! [`RoadNetwork`], which exposes read-only queries and can be shared across
//! threads behind an `Arc` without locking.
//!
//! # Data layout
//!
//! Nodes are stored in declaration order and addressed by [`NodeId`].  A
//! name index maps the textual id from the map description to its `NodeId`.
//!
//! Roads are undirected, so every declaration installs one adjacency entry
//! on each endpoint.  The frozen graph keeps those entries in **Compressed
//! Sparse Row (CSR)** form:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Entries of one node keep the order in which their roads were declared.

use std::ops::Range;

use rustc_hash::FxHashMap;
use tracing::debug;

use rn_core::{NodeId, Point2D};

use crate::{NetworkError, NetworkResult};

// ── BuildMode ─────────────────────────────────────────────────────────────────

/// How node positions are declared.  Fixed once per network.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuildMode {
    /// Absolute `(x, y)` coordinates.
    Coordinates,
    /// `(distance, bearing°)` relative to the network's reference origin.
    ReferenceVector,
}

// ── Neighbor ──────────────────────────────────────────────────────────────────

/// One adjacency entry: the node on the far side of a road and its cost.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Neighbor<'a> {
    pub id:     &'a str,
    pub node:   NodeId,
    pub weight: f64,
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Weighted undirected graph over named locations.
///
/// Do not construct directly; use [`RoadNetworkBuilder`].  No operation
/// mutates a `RoadNetwork`, so a published instance is safe to read from any
/// number of threads.
#[derive(Debug)]
pub struct RoadNetwork {
    name:             String,
    mode:             Option<BuildMode>,
    reference_origin: Point2D,

    // ── Node data (indexed by NodeId) ─────────────────────────────────────
    node_names: Vec<String>,
    node_pos:   Vec<Point2D>,
    by_name:    FxHashMap<String, NodeId>,

    // ── CSR adjacency ─────────────────────────────────────────────────────
    /// Length = `node_count + 1`.
    node_out_start: Vec<u32>,
    edge_to:        Vec<NodeId>,
    edge_weight:    Vec<f64>,

    road_count: usize,
}

impl RoadNetwork {
    /// Construct an empty network with no nodes or roads.
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    /// Map name from the description header.  Empty if none was given.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declaration mode, or `None` if no node was ever declared.
    pub fn mode(&self) -> Option<BuildMode> {
        self.mode
    }

    pub fn reference_origin(&self) -> Point2D {
        self.reference_origin
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_names.len()
    }

    /// Number of road declarations.  Each contributes two adjacency entries.
    pub fn road_count(&self) -> usize {
        self.road_count
    }

    pub fn is_empty(&self) -> bool {
        self.node_names.is_empty()
    }

    // ── Name lookup ───────────────────────────────────────────────────────

    pub fn node_id(&self, id: &str) -> Option<NodeId> {
        self.by_name.get(id).copied()
    }

    pub fn node_name(&self, node: NodeId) -> Option<&str> {
        self.node_names.get(node.index()).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_name.contains_key(id)
    }

    /// Node ids in declaration order.
    pub fn all_node_ids(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.node_names.iter().map(String::as_str)
    }

    /// Candidate travel origins.  Every node qualifies, in declaration order.
    pub fn origins(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.all_node_ids()
    }

    /// Candidate travel destinations.  Every node qualifies, in declaration
    /// order.
    pub fn destinations(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.all_node_ids()
    }

    // ── Positions ─────────────────────────────────────────────────────────

    /// Cartesian position of `id`, or `None` if the node is not declared.
    ///
    /// Reference-vector declarations are converted at build time, so every
    /// declared node has a position.
    pub fn position(&self, id: &str) -> Option<Point2D> {
        self.node_id(id).and_then(|n| self.position_of(n))
    }

    #[inline]
    pub fn position_of(&self, node: NodeId) -> Option<Point2D> {
        self.node_pos.get(node.index()).copied()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Adjacency entries of `id` in road declaration order.
    ///
    /// Empty for isolated nodes and for ids that are not declared.
    pub fn neighbors(&self, id: &str) -> impl Iterator<Item = Neighbor<'_>> + '_ {
        let range = self.node_id(id).map_or(0..0, |n| self.edge_range(n));
        range.map(move |i| self.neighbor_at(i))
    }

    /// Like [`neighbors`](Self::neighbors) but addressed by `NodeId`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = Neighbor<'_>> + '_ {
        self.edge_range(node).map(move |i| self.neighbor_at(i))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.edge_range(node).len()
    }

    #[inline]
    fn edge_range(&self, node: NodeId) -> Range<usize> {
        match (
            self.node_out_start.get(node.index()),
            self.node_out_start.get(node.index() + 1),
        ) {
            (Some(&start), Some(&end)) => start as usize..end as usize,
            _ => 0..0,
        }
    }

    #[inline]
    fn neighbor_at(&self, edge: usize) -> Neighbor<'_> {
        let node = self.edge_to[edge];
        Neighbor {
            id: &self.node_names[node.index()],
            node,
            weight: self.edge_weight[edge],
        }
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Populate a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// Roads may only reference nodes that were declared earlier.
///
/// # Example
///
/// ```
/// use rn_network::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// b.add_node_by_coordinate("A", 0.0, 0.0).unwrap();
/// b.add_node_by_coordinate("B", 3.0, 4.0).unwrap();
/// b.add_bidirectional_edge("A", "B", 5.0).unwrap();
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.neighbors("B").next().unwrap().id, "A");
/// ```
#[derive(Debug, Clone)]
pub struct RoadNetworkBuilder {
    name:             String,
    mode:             Option<BuildMode>,
    reference_origin: Point2D,
    node_names:       Vec<String>,
    node_pos:         Vec<Point2D>,
    by_name:          FxHashMap<String, NodeId>,
    raw_edges:        Vec<RawEdge>,
    road_count:       usize,
}

#[derive(Debug, Clone)]
struct RawEdge {
    from:   NodeId,
    to:     NodeId,
    weight: f64,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Pre-allocate for the expected number of nodes and roads.
    pub fn with_capacity(nodes: usize, roads: usize) -> Self {
        Self {
            name:             String::new(),
            mode:             None,
            reference_origin: Point2D::ORIGIN,
            node_names:       Vec::with_capacity(nodes),
            node_pos:         Vec::with_capacity(nodes),
            by_name:          FxHashMap::default(),
            raw_edges:        Vec::with_capacity(roads * 2),
            road_count:       0,
        }
    }

    /// Use `origin` as the pole for reference-vector declarations.
    ///
    /// Only affects nodes declared after the call.
    pub fn with_reference_origin(mut self, origin: Point2D) -> Self {
        self.reference_origin = origin;
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> Option<BuildMode> {
        self.mode
    }

    /// Fix the declaration mode, or confirm it matches the one already fixed.
    pub fn declare_mode(&mut self, mode: BuildMode) -> NetworkResult<()> {
        match self.mode {
            None => {
                self.mode = Some(mode);
                Ok(())
            }
            Some(existing) if existing == mode => Ok(()),
            Some(existing) => Err(NetworkError::BuildModeConflict { existing, requested: mode }),
        }
    }

    /// Declare a node with the given mode.  `(a, b)` is `(x, y)` for
    /// [`BuildMode::Coordinates`] and `(distance, bearing°)` for
    /// [`BuildMode::ReferenceVector`].
    pub fn add_node(&mut self, mode: BuildMode, id: &str, a: f64, b: f64) -> NetworkResult<NodeId> {
        let pos = match mode {
            BuildMode::Coordinates => Point2D::new(a, b),
            BuildMode::ReferenceVector => {
                Point2D::from_reference_vector(self.reference_origin, a, b)
            }
        };
        self.insert_node(mode, id, pos)
    }

    /// Declare a node at an absolute position.
    pub fn add_node_by_coordinate(&mut self, id: &str, x: f64, y: f64) -> NetworkResult<NodeId> {
        self.add_node(BuildMode::Coordinates, id, x, y)
    }

    /// Declare a node at `distance` along `bearing_deg` from the reference
    /// origin.
    pub fn add_node_by_reference_vector(
        &mut self,
        id: &str,
        distance: f64,
        bearing_deg: f64,
    ) -> NetworkResult<NodeId> {
        self.add_node(BuildMode::ReferenceVector, id, distance, bearing_deg)
    }

    fn insert_node(&mut self, mode: BuildMode, id: &str, pos: Point2D) -> NetworkResult<NodeId> {
        if self.by_name.contains_key(id) {
            return Err(NetworkError::DuplicateNode { id: id.to_owned() });
        }
        self.declare_mode(mode)?;

        let node = next_node_id(self.node_names.len())?;
        self.node_names.push(id.to_owned());
        self.node_pos.push(pos);
        self.by_name.insert(id.to_owned(), node);
        Ok(node)
    }

    /// Declare an undirected road.  Both endpoints must already exist and
    /// `weight` must be finite and non-negative.
    ///
    /// Repeated declarations between the same pair are kept as separate
    /// adjacency entries.
    pub fn add_bidirectional_edge(&mut self, a: &str, b: &str, weight: f64) -> NetworkResult<()> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(NetworkError::InvalidWeight {
                from: a.to_owned(),
                to: b.to_owned(),
                weight,
            });
        }
        let from = self.require(a)?;
        let to = self.require(b)?;

        self.raw_edges.push(RawEdge { from, to, weight });
        self.raw_edges.push(RawEdge { from: to, to: from, weight });
        self.road_count += 1;
        Ok(())
    }

    fn require(&self, id: &str) -> NetworkResult<NodeId> {
        self.node_id(id)
            .ok_or_else(|| NetworkError::UnknownNode { id: id.to_owned() })
    }

    pub fn node_id(&self, id: &str) -> Option<NodeId> {
        self.by_name.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_name.contains_key(id)
    }

    /// Position of a node declared earlier.
    pub fn position(&self, id: &str) -> Option<Point2D> {
        self.node_id(id).map(|n| self.node_pos[n.index()])
    }

    pub fn node_count(&self) -> usize { self.node_names.len() }
    pub fn road_count(&self) -> usize { self.road_count }

    /// Consume the builder and produce a frozen [`RoadNetwork`].
    ///
    /// Time complexity: O(E log E) for the adjacency sort, E = 2 × roads.
    pub fn build(self) -> RoadNetwork {
        let node_count = self.node_names.len();

        // Stable sort: entries of one node keep declaration order.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_to:     Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_weight: Vec<f64>    = raw.iter().map(|e| e.weight).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        debug!(
            name = %self.name,
            nodes = node_count,
            roads = self.road_count,
            "road network frozen"
        );

        RoadNetwork {
            name: self.name,
            mode: self.mode,
            reference_origin: self.reference_origin,
            node_names: self.node_names,
            node_pos: self.node_pos,
            by_name: self.by_name,
            node_out_start,
            edge_to,
            edge_weight,
            road_count: self.road_count,
        }
    }
}

/// Id for the node stored at index `len`.  `NodeId::INVALID` is never
/// handed out.
pub(crate) fn next_node_id(len: usize) -> NetworkResult<NodeId> {
    NodeId::try_from(len)
        .ok()
        .filter(|&id| id != NodeId::INVALID)
        .ok_or(NetworkError::TooManyNodes { limit: NodeId::INVALID.index() })
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
