//! Property tests: random operation sequences driven against three
//! independent answers at once (the splay-backed forest, the linked-list
//! forest, and a breadth-first-search oracle).

use proptest::prelude::*;
use tourtree::{DynamicForest, ForestError, ListForest};

use test_helpers::*;

/// Raw scripted operation; vertex values are reduced modulo the vertex
/// count when the script is applied.
#[derive(Debug, Clone, Copy)]
enum RawOp {
    Check(u16, u16),
    Link(u16, u16),
    Cut(u16, u16),
}

fn raw_ops() -> impl Strategy<Value = Vec<RawOp>> {
    let op = prop_oneof![
        (any::<u16>(), any::<u16>()).prop_map(|(a, b)| RawOp::Check(a, b)),
        (any::<u16>(), any::<u16>()).prop_map(|(a, b)| RawOp::Link(a, b)),
        (any::<u16>(), any::<u16>()).prop_map(|(a, b)| RawOp::Cut(a, b)),
    ];
    proptest::collection::vec(op, 0..80)
}

/// Random forest on `count` vertices: each vertex beyond the first may
/// attach to one earlier vertex, so the result is always acyclic.
fn sparse_forest(count: usize) -> impl Strategy<Value = Vec<(usize, usize)>> {
    proptest::collection::vec(proptest::option::of(any::<u16>()), count.saturating_sub(1))
        .prop_map(move |parents| {
            parents
                .into_iter()
                .enumerate()
                .filter_map(|(i, parent)| {
                    let child = i + 1;
                    parent.map(|p| (p as usize % child, child))
                })
                .collect()
        })
}

proptest! {
    #[test]
    fn scripted_operations_agree_with_both_baselines(
        count in 2usize..16,
        ops in raw_ops(),
    ) {
        let mut splay = DynamicForest::new(count);
        let mut list = ListForest::new(count);
        let mut oracle = EdgeSetOracle::new();

        for op in ops {
            match op {
                RawOp::Check(a, b) => {
                    let (u, v) = (a as usize % count, b as usize % count);
                    let expected = oracle.connected(u, v);
                    prop_assert_eq!(splay.connected(u, v).unwrap(), expected);
                    prop_assert_eq!(list.connected(u, v).unwrap(), expected);
                }
                RawOp::Link(a, b) => {
                    let (u, v) = (a as usize % count, b as usize % count);
                    let joined = oracle.connected(u, v);
                    let splay_result = splay.link(u, v);
                    let list_result = list.link(u, v);
                    if joined {
                        let splay_rejected =
                            matches!(splay_result, Err(ForestError::AlreadyConnected { .. }));
                        let list_rejected =
                            matches!(list_result, Err(ForestError::AlreadyConnected { .. }));
                        prop_assert!(
                            splay_rejected,
                            "splay link on a joined pair: {:?}",
                            splay_result
                        );
                        prop_assert!(
                            list_rejected,
                            "list link on a joined pair: {:?}",
                            list_result
                        );
                    } else {
                        prop_assert!(splay_result.is_ok());
                        prop_assert!(list_result.is_ok());
                        oracle.link(u, v);
                    }
                }
                RawOp::Cut(a, b) => {
                    let (u, v) = (a as usize % count, b as usize % count);
                    let exists = oracle.has_edge(u, v);
                    let splay_result = splay.cut(u, v);
                    let list_result = list.cut(u, v);
                    if exists {
                        prop_assert!(splay_result.is_ok());
                        prop_assert!(list_result.is_ok());
                        oracle.cut(u, v);
                    } else {
                        let splay_rejected =
                            matches!(splay_result, Err(ForestError::NoSuchEdge { .. }));
                        let list_rejected =
                            matches!(list_result, Err(ForestError::NoSuchEdge { .. }));
                        prop_assert!(
                            splay_rejected,
                            "splay cut of a missing edge: {:?}",
                            splay_result
                        );
                        prop_assert!(
                            list_rejected,
                            "list cut of a missing edge: {:?}",
                            list_result
                        );
                    }
                }
            }
        }

        // End-of-script audit: tours well formed, token arithmetic intact,
        // both implementations in lockstep, sizes matching the oracle.
        prop_assert_eq!(splay.component_count(), list.component_count());
        for v in 0..count {
            let splay_tokens = splay.component_tokens(v).unwrap();
            let list_tokens = list.component_tokens(v).unwrap();
            prop_assert_eq!(&splay_tokens, &list_tokens, "tours diverged at {}", v);

            let vertices = assert_valid_tour(&splay_tokens);
            let k = vertices.len();
            let (visits, arcs) = token_census(&splay_tokens);
            prop_assert_eq!(visits, k);
            prop_assert_eq!(arcs, 2 * (k - 1));
            prop_assert_eq!(k, oracle.component_size(v));
            prop_assert_eq!(splay.component_size(v).unwrap(), k);
        }
    }

    #[test]
    fn random_forests_encode_to_matching_partitions(
        (count, edges) in (2usize..24).prop_flat_map(|count| {
            (Just(count), sparse_forest(count))
        }),
    ) {
        let mut splay = DynamicForest::from_edges(count, &edges).unwrap();
        let list = ListForest::from_edges(count, &edges).unwrap();
        let oracle = EdgeSetOracle::from_edges(&edges);

        prop_assert_eq!(splay.edge_count(), edges.len());
        for u in 0..count {
            let tokens = splay.component_tokens(u).unwrap();
            prop_assert_eq!(&tokens, &list.component_tokens(u).unwrap());
            assert_valid_tour(&tokens);
            for v in 0..count {
                prop_assert_eq!(
                    splay.connected(u, v).unwrap(),
                    oracle.connected(u, v),
                    "pair ({}, {})", u, v
                );
            }
        }
    }
}
