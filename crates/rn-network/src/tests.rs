//! Unit tests for rn-network.
//!
//! All tests use hand-crafted networks so they run without any map file.

#[cfg(test)]
mod helpers {
    use crate::{RoadNetwork, RoadNetworkBuilder};

    /// Small coordinate-mode network.
    ///
    /// ```text
    ///   A(0,0) ── 5 ── B(3,4)
    ///     │             │
    ///     4             4
    ///     │             │
    ///   D(0,-4)        C(3,0)
    /// ```
    ///
    /// Undirected roads, in declaration order: A-B, A-D, B-C.
    /// E(10,10) is isolated.
    pub fn square_network() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new();
        b.set_name("square");
        b.add_node_by_coordinate("A", 0.0, 0.0).unwrap();
        b.add_node_by_coordinate("B", 3.0, 4.0).unwrap();
        b.add_node_by_coordinate("C", 3.0, 0.0).unwrap();
        b.add_node_by_coordinate("D", 0.0, -4.0).unwrap();
        b.add_node_by_coordinate("E", 10.0, 10.0).unwrap();
        b.add_bidirectional_edge("A", "B", 5.0).unwrap();
        b.add_bidirectional_edge("A", "D", 4.0).unwrap();
        b.add_bidirectional_edge("B", "C", 4.0).unwrap();
        b.build()
    }

    pub fn neighbor_pairs<'a>(net: &'a RoadNetwork, id: &str) -> Vec<(&'a str, f64)> {
        net.neighbors(id).map(|n| (n.id, n.weight)).collect()
    }
}

// ── Builder & network structure ───────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use rn_core::NodeId;

    use super::helpers::{neighbor_pairs, square_network};
    use crate::network::next_node_id;
    use crate::{BuildMode, NetworkError, RoadNetwork, RoadNetworkBuilder};

    #[test]
    fn empty_build() {
        let net = RoadNetwork::empty();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.road_count(), 0);
        assert!(net.is_empty());
        assert_eq!(net.mode(), None);
        assert_eq!(net.all_node_ids().count(), 0);
    }

    #[test]
    fn node_ids_follow_declaration_order() {
        let net = square_network();
        let ids: Vec<_> = net.all_node_ids().collect();
        assert_eq!(ids, ["A", "B", "C", "D", "E"]);
        assert_eq!(net.origins().collect::<Vec<_>>(), ids);
        assert_eq!(net.destinations().collect::<Vec<_>>(), ids);
        assert_eq!(net.node_id("C"), Some(NodeId(2)));
        assert_eq!(net.node_name(NodeId(4)), Some("E"));
        assert_eq!(net.name(), "square");
    }

    #[test]
    fn roads_are_symmetric() {
        let net = square_network();
        assert_eq!(neighbor_pairs(&net, "A"), [("B", 5.0), ("D", 4.0)]);
        assert_eq!(neighbor_pairs(&net, "B"), [("A", 5.0), ("C", 4.0)]);
        assert_eq!(neighbor_pairs(&net, "C"), [("B", 4.0)]);
        assert_eq!(neighbor_pairs(&net, "D"), [("A", 4.0)]);
    }

    #[test]
    fn adjacency_total_is_twice_road_count() {
        let net = square_network();
        let total: usize = net.all_node_ids().map(|id| net.neighbors(id).count()).sum();
        assert_eq!(total, 2 * net.road_count());
        assert_eq!(net.road_count(), 3);
    }

    #[test]
    fn isolated_and_unknown_nodes_have_no_neighbors() {
        let net = square_network();
        assert_eq!(net.neighbors("E").count(), 0);
        assert_eq!(net.neighbors("nowhere").count(), 0);
        assert_eq!(net.out_degree(NodeId::INVALID), 0);
    }

    #[test]
    fn out_edges_match_named_neighbors() {
        let net = square_network();
        let a = net.node_id("A").unwrap();
        let by_id: Vec<_> = net.out_edges(a).collect();
        let by_name: Vec<_> = net.neighbors("A").collect();
        assert_eq!(by_id, by_name);
        assert_eq!(net.out_degree(a), 2);
    }

    #[test]
    fn parallel_roads_are_kept() {
        let mut b = RoadNetworkBuilder::new();
        b.add_node_by_coordinate("A", 0.0, 0.0).unwrap();
        b.add_node_by_coordinate("B", 1.0, 0.0).unwrap();
        b.add_bidirectional_edge("A", "B", 2.0).unwrap();
        b.add_bidirectional_edge("B", "A", 7.0).unwrap();
        let net = b.build();
        assert_eq!(neighbor_pairs(&net, "A"), [("B", 2.0), ("B", 7.0)]);
        assert_eq!(neighbor_pairs(&net, "B"), [("A", 2.0), ("A", 7.0)]);
        assert_eq!(net.road_count(), 2);
    }

    #[test]
    fn interleaved_declarations_keep_per_node_order() {
        let mut b = RoadNetworkBuilder::new();
        for id in ["A", "B", "C", "D"] {
            b.add_node_by_coordinate(id, 0.0, 0.0).unwrap();
        }
        b.add_bidirectional_edge("C", "D", 1.0).unwrap();
        b.add_bidirectional_edge("A", "C", 2.0).unwrap();
        b.add_bidirectional_edge("B", "C", 3.0).unwrap();
        let net = b.build();
        assert_eq!(
            neighbor_pairs(&net, "C"),
            [("D", 1.0), ("A", 2.0), ("B", 3.0)]
        );
    }

    #[test]
    fn duplicate_node_rejected() {
        let mut b = RoadNetworkBuilder::new();
        b.add_node_by_coordinate("A", 0.0, 0.0).unwrap();
        let err = b.add_node_by_coordinate("A", 1.0, 1.0).unwrap_err();
        assert_eq!(err, NetworkError::DuplicateNode { id: "A".into() });
        assert_eq!(b.node_count(), 1);
        assert_eq!(b.position("A").unwrap().x, 0.0);
    }

    #[test]
    fn unknown_endpoint_rejected() {
        let mut b = RoadNetworkBuilder::new();
        b.add_node_by_coordinate("A", 0.0, 0.0).unwrap();
        let err = b.add_bidirectional_edge("A", "Z", 1.0).unwrap_err();
        assert_eq!(err, NetworkError::UnknownNode { id: "Z".into() });
        assert_eq!(b.road_count(), 0);
        assert_eq!(b.build().neighbors("A").count(), 0);
    }

    #[test]
    fn negative_and_nan_weights_rejected() {
        let mut b = RoadNetworkBuilder::new();
        b.add_node_by_coordinate("A", 0.0, 0.0).unwrap();
        b.add_node_by_coordinate("B", 1.0, 0.0).unwrap();
        assert!(matches!(
            b.add_bidirectional_edge("A", "B", -1.0),
            Err(NetworkError::InvalidWeight { .. })
        ));
        assert!(matches!(
            b.add_bidirectional_edge("A", "B", f64::NAN),
            Err(NetworkError::InvalidWeight { .. })
        ));
        assert!(b.add_bidirectional_edge("A", "B", 0.0).is_ok());
    }

    #[test]
    fn mixed_modes_rejected() {
        let mut b = RoadNetworkBuilder::new();
        b.add_node_by_coordinate("A", 0.0, 0.0).unwrap();
        let err = b.add_node_by_reference_vector("B", 1.0, 0.0).unwrap_err();
        assert_eq!(
            err,
            NetworkError::BuildModeConflict {
                existing: BuildMode::Coordinates,
                requested: BuildMode::ReferenceVector,
            }
        );
        assert!(!b.contains("B"));
    }

    #[test]
    fn node_ids_stop_short_of_sentinel() {
        assert_eq!(next_node_id(0), Ok(NodeId(0)));
        assert_eq!(next_node_id(u32::MAX as usize - 1), Ok(NodeId(u32::MAX - 1)));
        assert_eq!(
            next_node_id(u32::MAX as usize),
            Err(NetworkError::TooManyNodes { limit: u32::MAX as usize })
        );
        #[cfg(target_pointer_width = "64")]
        assert!(next_node_id(u32::MAX as usize + 1).is_err());
    }
}

// ── Positions ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod positions {
    use rn_core::Point2D;

    use crate::{BuildMode, RoadNetworkBuilder};

    #[test]
    fn coordinate_positions_are_verbatim() {
        let net = super::helpers::square_network();
        assert_eq!(net.position("B"), Some(Point2D::new(3.0, 4.0)));
        assert_eq!(net.mode(), Some(BuildMode::Coordinates));
        assert_eq!(net.position("missing"), None);
    }

    #[test]
    fn reference_vector_derived_from_origin() {
        let mut b = RoadNetworkBuilder::new();
        b.add_node_by_reference_vector("C", 10.0, 0.0).unwrap();
        let net = b.build();
        let p = net.position("C").unwrap();
        assert!((p.x - 10.0).abs() < 1e-9, "got {p}");
        assert!(p.y.abs() < 1e-9, "got {p}");
        assert_eq!(net.mode(), Some(BuildMode::ReferenceVector));
    }

    #[test]
    fn reference_vector_uses_configured_origin() {
        let mut b = RoadNetworkBuilder::new().with_reference_origin(Point2D::new(100.0, 50.0));
        b.add_node_by_reference_vector("N", 20.0, 180.0).unwrap();
        let net = b.build();
        let p = net.position("N").unwrap();
        assert!((p.x - 80.0).abs() < 1e-9, "got {p}");
        assert!((p.y - 50.0).abs() < 1e-9, "got {p}");
        assert_eq!(net.reference_origin(), Point2D::new(100.0, 50.0));
    }
}

// ── Heuristics ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod heuristics {
    use std::sync::Arc;

    use crate::{
        Heuristic, HeuristicFunction, HeuristicKind, RoadNetworkBuilder, StraightLineDistance,
        ZeroHeuristic,
    };

    #[test]
    fn zero_is_always_zero() {
        let net = super::helpers::square_network();
        for id in net.all_node_ids().chain(["unknown"]) {
            assert_eq!(ZeroHeuristic.evaluate(id), 0.0);
        }
    }

    #[test]
    fn straight_line_three_four_five() {
        let mut b = RoadNetworkBuilder::new();
        b.add_node_by_coordinate("A", 0.0, 0.0).unwrap();
        b.add_node_by_coordinate("B", 3.0, 4.0).unwrap();
        let net = Arc::new(b.build());

        let h = StraightLineDistance::bind_to_goal("B", Arc::clone(&net));
        assert_eq!(h.evaluate("A"), 5.0);
        assert_eq!(h.evaluate("B"), 0.0);
        assert_eq!(h.goal(), "B");
    }

    #[test]
    fn straight_line_degrades_to_zero() {
        let net = Arc::new(super::helpers::square_network());
        let h = StraightLineDistance::bind_to_goal("B", Arc::clone(&net));
        assert_eq!(h.evaluate("not-a-node"), 0.0);

        let unbound = StraightLineDistance::bind_to_goal("not-a-goal", net);
        assert_eq!(unbound.evaluate("A"), 0.0);
    }

    #[test]
    fn evaluate_node_matches_evaluate() {
        let net = Arc::new(super::helpers::square_network());
        let h = StraightLineDistance::bind_to_goal("E", Arc::clone(&net));
        for id in net.all_node_ids() {
            let node = net.node_id(id).unwrap();
            assert_eq!(h.evaluate_node(node), h.evaluate(id));
        }
    }

    #[test]
    fn kind_parses_selector_labels() {
        assert_eq!("=0".parse::<HeuristicKind>().unwrap(), HeuristicKind::Zero);
        assert_eq!("SLD".parse::<HeuristicKind>().unwrap(), HeuristicKind::StraightLine);
        assert_eq!("sld".parse::<HeuristicKind>().unwrap(), HeuristicKind::StraightLine);
        assert!("manhattan".parse::<HeuristicKind>().is_err());
        for kind in HeuristicKind::ALL {
            assert_eq!(kind.label().parse::<HeuristicKind>().unwrap(), kind);
        }
    }

    #[test]
    fn bound_function_dispatches() {
        let net = Arc::new(super::helpers::square_network());
        let zero = HeuristicKind::Zero.bind("B", Arc::clone(&net));
        let sld = HeuristicKind::StraightLine.bind("B", Arc::clone(&net));
        assert!(matches!(zero, HeuristicFunction::Zero(_)));
        assert_eq!(zero.evaluate("A"), 0.0);
        assert_eq!(sld.evaluate("A"), 5.0);
        assert_eq!(sld.kind(), HeuristicKind::StraightLine);

        let boxed: Vec<Box<dyn Heuristic>> = vec![Box::new(zero), Box::new(sld)];
        let estimates: Vec<f64> = boxed.iter().map(|h| h.evaluate("C")).collect();
        assert_eq!(estimates, [0.0, 4.0]);
    }
}
