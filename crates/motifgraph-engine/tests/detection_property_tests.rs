//! Property-based tests for motif detection.
//!
//! Random small multigraphs (parallel edges and self-loops included) are run
//! through the full pipeline; every accepted motif must satisfy its family's
//! structural predicate and the accepted set must be overlap-free.

use motifgraph_engine::detect::detect_d_connectors;
use motifgraph_engine::*;
use proptest::prelude::*;
use roaring::RoaringBitmap;

fn build(n: u32, edges: &[(u32, u32)]) -> MultiGraph {
    let mut g = MultiGraph::new();
    for i in 0..n {
        g.intern_vertex(&format!("v{i}"));
    }
    for &(a, b) in edges {
        g.add_edge(VertexId::new(a % n), VertexId::new(b % n)).unwrap();
    }
    g
}

fn arb_graph() -> impl Strategy<Value = (u32, Vec<(u32, u32)>)> {
    (1u32..16).prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..40)))
}

fn detect(g: &MultiGraph) -> MotifReport {
    detect_motifs(g, &MotifConfig::default(), None)
        .unwrap()
        .into_report()
        .unwrap()
}

fn loopless(g: &MultiGraph, v: VertexId) -> RoaringBitmap {
    let mut n = g.neighbors(v);
    n.remove(v.raw());
    n
}

fn bitmap(ids: &[VertexId]) -> RoaringBitmap {
    ids.iter().map(|v| v.raw()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_accepted_motifs_do_not_share_consumed_vertices((n, edges) in arb_graph()) {
        let g = build(n, &edges);
        let report = detect(&g);
        let mut claimed = RoaringBitmap::new();
        for motif in &report.motifs {
            let consumed = bitmap(motif.vertices_in_motif());
            prop_assert!(consumed.is_disjoint(&claimed));
            claimed |= consumed;
        }
    }

    #[test]
    fn prop_accepted_motifs_satisfy_their_shape((n, edges) in arb_graph()) {
        let g = build(n, &edges);
        let report = detect(&g);

        for fan in report.fans() {
            prop_assert!(fan.leaves().len() >= 2);
            for &leaf in fan.leaves() {
                prop_assert_ne!(leaf, fan.head());
                prop_assert_eq!(g.neighbors(leaf), bitmap(&[fan.head()]));
            }
        }

        for d in report.d_connectors() {
            let anchors = bitmap(d.anchors());
            prop_assert!(d.anchors().len() >= 2);
            prop_assert!(d.spans().len() >= 2);
            for &span in d.spans() {
                prop_assert_eq!(loopless(&g, span), anchors.clone());
            }
        }

        for clique in report.cliques() {
            prop_assert!(clique.members().len() >= 4);
            for (i, &a) in clique.members().iter().enumerate() {
                for &b in &clique.members()[i + 1..] {
                    prop_assert!(g.is_adjacent(a, b));
                }
            }
        }
    }

    #[test]
    fn prop_scales_lie_in_unit_interval((n, edges) in arb_graph()) {
        let g = build(n, &edges);
        for motif in &detect(&g).motifs {
            prop_assert!((0.0..=1.0).contains(&motif.scale()));
        }
    }

    #[test]
    fn prop_parallel_edges_do_not_change_outcome((n, edges) in arb_graph()) {
        let single = build(n, &edges);
        let doubled: Vec<(u32, u32)> = edges
            .iter()
            .flat_map(|&(a, b)| [(a, b), (b, a)])
            .collect();
        let doubled = build(n, &doubled);
        prop_assert_eq!(detect(&single), detect(&doubled));
    }

    #[test]
    fn prop_collapsed_attributes_decode_to_themselves((n, edges) in arb_graph()) {
        let g = build(n, &edges);
        let report = detect(&g);
        for (motif, attrs) in report.motifs.iter().zip(report.collapsed_attributes(&g)) {
            let decoded = CollapsedAttributes::decode(&attrs.encode());
            prop_assert_eq!(&decoded, &attrs);
            prop_assert_eq!(decoded.group_type(), Some(motif.kind()));
            prop_assert_eq!(decoded.scale(), Some(motif.scale()));
        }
    }

    #[test]
    fn prop_four_clique_minus_any_edge_is_not_reported(missing in 0usize..6) {
        let pairs = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];
        let edges: Vec<(u32, u32)> = pairs
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != missing)
            .map(|(_, &p)| p)
            .collect();
        let g = build(4, &edges);
        prop_assert_eq!(detect(&g).cliques().count(), 0);

        let full = build(4, &pairs);
        prop_assert_eq!(detect(&full).cliques().count(), 1);
    }

    #[test]
    fn prop_extra_span_edge_removes_span(anchors in 2u32..5, spans in 2u32..6, pick in 0u32..6) {
        // Complete bipartite anchors × spans; then one span gains an outside edge.
        let mut edges = Vec::new();
        for a in 0..anchors {
            for s in 0..spans {
                edges.push((a, anchors + s));
            }
        }
        let n = anchors + spans + 2;
        let outsider = anchors + spans;
        let helper = outsider + 1;
        let victim = VertexId::new(anchors + pick % spans);
        let config = MotifConfig::default().with_span_bounds(1, 9999);

        let before = NeighborIndex::build(&build(n, &edges));
        let found = detect_d_connectors(&before, &config, &Checkpoint::silent(DetectionStage::DConnectors)).unwrap();
        prop_assert!(found.iter().any(|d| d.spans().contains(&victim)));

        edges.push((victim.raw(), outsider));
        edges.push((outsider, helper));
        let after = NeighborIndex::build(&build(n, &edges));
        let found = detect_d_connectors(&after, &config, &Checkpoint::silent(DetectionStage::DConnectors)).unwrap();
        let anchor_set: Vec<VertexId> = (0..anchors).map(VertexId::new).collect();
        for d in &found {
            if d.anchors() == anchor_set.as_slice() {
                prop_assert!(!d.spans().contains(&victim));
                prop_assert_eq!(d.spans().len() as u32, spans - 1);
            }
        }
    }
}
