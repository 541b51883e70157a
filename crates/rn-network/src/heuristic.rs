//! Goal-directed distance estimators.
//!
//! # Pluggability
//!
//! Search code calls estimators through the [`Heuristic`] trait, so an
//! application can add its own.  The two built-in variants are also offered
//! as the closed enum [`HeuristicFunction`], selected by name through
//! [`HeuristicKind`].
//!
//! # Admissibility
//!
//! [`StraightLineDistance`] never overestimates only if every road weight is
//! at least the Euclidean distance between its endpoints.  That property is
//! not checked here; optimal search relies on the map author providing it.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rn_core::{NodeId, Point2D};

use crate::network::RoadNetwork;

// ── Heuristic trait ───────────────────────────────────────────────────────────

/// Estimated remaining cost from a state to a goal bound at construction.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one bound estimator can be shared
/// by parallel searches over the same published network.
pub trait Heuristic: Send + Sync {
    /// Estimate for the node named `state`.
    fn evaluate(&self, state: &str) -> f64;
}

// ── ZeroHeuristic ─────────────────────────────────────────────────────────────

/// Always `0`.  Turns informed search into uniform-cost search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    #[inline]
    fn evaluate(&self, _state: &str) -> f64 {
        0.0
    }
}

// ── StraightLineDistance ──────────────────────────────────────────────────────

/// Euclidean distance from a state's position to the goal's position.
///
/// Evaluates to `0` when either position is unavailable, including when the
/// goal or the state is not a node of the bound network.
#[derive(Clone, Debug)]
pub struct StraightLineDistance {
    network:  Arc<RoadNetwork>,
    goal:     String,
    goal_pos: Option<Point2D>,
}

impl StraightLineDistance {
    /// Bind to `goal` on `network`.  The goal position is resolved once here.
    pub fn bind_to_goal(goal: impl Into<String>, network: Arc<RoadNetwork>) -> Self {
        let goal = goal.into();
        let goal_pos = network.position(&goal);
        Self { network, goal, goal_pos }
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn network(&self) -> &Arc<RoadNetwork> {
        &self.network
    }

    /// Like [`Heuristic::evaluate`] but addressed by `NodeId`.
    #[inline]
    pub fn evaluate_node(&self, node: NodeId) -> f64 {
        self.distance_from(self.network.position_of(node))
    }

    #[inline]
    fn distance_from(&self, pos: Option<Point2D>) -> f64 {
        match (pos, self.goal_pos) {
            (Some(from), Some(goal)) => from.distance(goal),
            _ => 0.0,
        }
    }
}

impl Heuristic for StraightLineDistance {
    fn evaluate(&self, state: &str) -> f64 {
        self.distance_from(self.network.position(state))
    }
}

// ── HeuristicFunction ─────────────────────────────────────────────────────────

/// The built-in estimators, each carrying its own binding.
#[derive(Clone, Debug)]
pub enum HeuristicFunction {
    Zero(ZeroHeuristic),
    StraightLine(StraightLineDistance),
}

impl HeuristicFunction {
    pub fn kind(&self) -> HeuristicKind {
        match self {
            HeuristicFunction::Zero(_) => HeuristicKind::Zero,
            HeuristicFunction::StraightLine(_) => HeuristicKind::StraightLine,
        }
    }
}

impl Heuristic for HeuristicFunction {
    fn evaluate(&self, state: &str) -> f64 {
        match self {
            HeuristicFunction::Zero(h) => h.evaluate(state),
            HeuristicFunction::StraightLine(h) => h.evaluate(state),
        }
    }
}

// ── HeuristicKind ─────────────────────────────────────────────────────────────

/// Unbound selector for a built-in estimator.
///
/// Parses from the labels `"=0"` / `"zero"` and `"SLD"` / `"sld"`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum HeuristicKind {
    Zero,
    #[default]
    StraightLine,
}

impl HeuristicKind {
    pub const ALL: [HeuristicKind; 2] = [HeuristicKind::Zero, HeuristicKind::StraightLine];

    /// Short label, the inverse of `FromStr`.
    pub fn label(self) -> &'static str {
        match self {
            HeuristicKind::Zero => "=0",
            HeuristicKind::StraightLine => "SLD",
        }
    }

    /// Bind this estimator to `goal` on `network`.
    pub fn bind(self, goal: impl Into<String>, network: Arc<RoadNetwork>) -> HeuristicFunction {
        match self {
            HeuristicKind::Zero => HeuristicFunction::Zero(ZeroHeuristic),
            HeuristicKind::StraightLine => {
                HeuristicFunction::StraightLine(StraightLineDistance::bind_to_goal(goal, network))
            }
        }
    }
}

impl FromStr for HeuristicKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "=0" | "zero" | "Zero" => Ok(HeuristicKind::Zero),
            "SLD" | "sld" => Ok(HeuristicKind::StraightLine),
            other => Err(format!(
                "unknown heuristic {other:?}: expected \"=0\" or \"SLD\""
            )),
        }
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
