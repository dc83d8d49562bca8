//! Euler-tour encoding of a forest
//!
//! The tour of a rooted tree is a token sequence: one *visit* token per
//! vertex, emitted the first time the traversal reaches it, and one *arc*
//! token per direction of every tree edge, emitted when the traversal walks
//! that direction. A component with k vertices therefore owns k visit
//! tokens and 2(k-1) arc tokens. A tour is cyclic; later re-rootings move
//! the stored sequence's starting point without disturbing the cyclic
//! order, so only a freshly built sequence places every visit at its first
//! arrival. The sequence lives in a
//! [`SplayForest`](crate::splay::SplayForest) and the [`TokenIndex`] maps
//! logical identity (vertex or directed arc) back to its current tree
//! position, independent of tree shape.

use std::collections::HashMap;
use std::fmt;

use bitvec::prelude::*;
use thiserror::Error;

use crate::splay::{NodeId, SplayForest};

/// Identifier of a forest vertex.
pub type Vertex = usize;

/// The unit stored at each position of a tour sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// The single visit marker of a vertex; the canonical handle for
    /// locating its component.
    Visit(Vertex),
    /// Traversal of the directed arc `from → to`. The two arcs of a live
    /// undirected edge always co-exist.
    Arc {
        /// Tail of the arc.
        from: Vertex,
        /// Head of the arc.
        to: Vertex,
    },
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Visit(v) => write!(f, "[{v}]"),
            Token::Arc { from, to } => write!(f, "[{from}->{to}]"),
        }
    }
}

/// Errors raised while encoding an initial forest.
#[derive(Debug, Error)]
pub enum TourError {
    /// The adjacency listed an edge that would close a cycle (or listed
    /// the same edge more than once per direction).
    #[error("edge {u}-{v} connects already-connected vertices in the initial forest")]
    CycleEdge {
        /// Vertex whose adjacency listed the offending edge.
        u: Vertex,
        /// The already-reached neighbor.
        v: Vertex,
    },
    /// A neighbor index exceeded the vertex count.
    #[error("neighbor {neighbor} of vertex {vertex} is out of range for {count} vertices")]
    NeighborOutOfRange {
        /// Vertex whose adjacency held the bad entry.
        vertex: Vertex,
        /// The out-of-range neighbor value.
        neighbor: Vertex,
        /// Number of vertices in the forest.
        count: usize,
    },
}

/// Mapping from logical identity to current tree position.
///
/// Visit tokens are dense (one per vertex, keyed by vertex number); arc
/// tokens come and go with `link`/`cut` and live in a hash map keyed by the
/// directed pair. Every token present in some tree is reachable here and
/// vice versa.
#[derive(Debug, Default)]
pub struct TokenIndex {
    visits: Vec<NodeId>,
    arcs: HashMap<(Vertex, Vertex), NodeId>,
}

impl TokenIndex {
    /// Empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices registered.
    pub fn vertex_count(&self) -> usize {
        self.visits.len()
    }

    /// Number of live arc tokens (twice the live edge count).
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Register the visit token of the next vertex, returning its number.
    pub fn push_visit(&mut self, id: NodeId) -> Vertex {
        self.visits.push(id);
        self.visits.len() - 1
    }

    /// Tree position of `v`'s visit token, if `v` is in range.
    pub fn visit(&self, v: Vertex) -> Option<NodeId> {
        self.visits.get(v).copied()
    }

    /// Tree position of the arc token `from → to`, if that arc is live.
    pub fn arc(&self, from: Vertex, to: Vertex) -> Option<NodeId> {
        self.arcs.get(&(from, to)).copied()
    }

    /// Index a freshly created arc token.
    pub fn insert_arc(&mut self, from: Vertex, to: Vertex, id: NodeId) {
        let previous = self.arcs.insert((from, to), id);
        debug_assert!(previous.is_none(), "arc {from}->{to} indexed twice");
    }

    /// Drop the index entry of a dying arc token.
    pub fn remove_arc(&mut self, from: Vertex, to: Vertex) -> Option<NodeId> {
        self.arcs.remove(&(from, to))
    }
}

/// Depth-first tour construction over an adjacency description.
///
/// Visits components in vertex order and neighbors in adjacency order, so
/// the produced sequences are deterministic for a given input. Works with
/// an explicit stack; input depth never touches the call stack.
#[derive(Debug)]
pub struct TourBuilder<'a> {
    splay: &'a mut SplayForest<Token>,
    index: &'a mut TokenIndex,
    visited: BitVec,
}

/// One in-flight vertex of the traversal.
#[derive(Debug)]
struct Frame {
    vertex: Vertex,
    parent: Option<Vertex>,
    next_neighbor: usize,
    /// The symmetric adjacency lists the tree edge back to the parent once;
    /// that single occurrence is expected and skipped.
    parent_edge_skipped: bool,
}

impl<'a> TourBuilder<'a> {
    /// Builder over an arena and index whose visit tokens are already
    /// allocated (as detached singletons).
    pub fn new(splay: &'a mut SplayForest<Token>, index: &'a mut TokenIndex) -> Self {
        let visited = bitvec![0; index.vertex_count()];
        Self {
            splay,
            index,
            visited,
        }
    }

    /// Encode every component of `adjacency` into its own tour, returning
    /// how many components there were.
    ///
    /// Each vertex's pre-allocated visit token is appended the first time
    /// the traversal reaches it; arc tokens are allocated on the fly. An
    /// already-visited neighbor other than the one-shot parent edge means
    /// the input was not a forest.
    ///
    /// # Panics
    ///
    /// Panics if `adjacency` does not hold exactly one neighbor list per
    /// registered vertex.
    pub fn build(mut self, adjacency: &[Vec<Vertex>]) -> Result<usize, TourError> {
        let count = self.index.vertex_count();
        assert_eq!(
            adjacency.len(),
            count,
            "adjacency holds {} neighbor lists for {count} vertices",
            adjacency.len()
        );
        let mut components = 0;
        for root in 0..count {
            if !self.visited[root] {
                self.tour_component(root, adjacency)?;
                components += 1;
            }
        }
        Ok(components)
    }

    fn tour_component(
        &mut self,
        root: Vertex,
        adjacency: &[Vec<Vertex>],
    ) -> Result<(), TourError> {
        let count = self.index.vertex_count();
        let mut tour = None;
        let mut stack = vec![self.enter(root, None, &mut tour)];

        while let Some(frame) = stack.last_mut() {
            let vertex = frame.vertex;
            match adjacency[vertex].get(frame.next_neighbor).copied() {
                Some(neighbor) => {
                    frame.next_neighbor += 1;
                    if neighbor >= count {
                        return Err(TourError::NeighborOutOfRange {
                            vertex,
                            neighbor,
                            count,
                        });
                    }
                    if !self.visited[neighbor] {
                        self.append(
                            Token::Arc {
                                from: vertex,
                                to: neighbor,
                            },
                            &mut tour,
                        );
                        let entered = self.enter(neighbor, Some(vertex), &mut tour);
                        stack.push(entered);
                    } else if frame.parent == Some(neighbor) && !frame.parent_edge_skipped {
                        frame.parent_edge_skipped = true;
                    } else {
                        return Err(TourError::CycleEdge {
                            u: vertex,
                            v: neighbor,
                        });
                    }
                }
                None => {
                    let parent = frame.parent;
                    stack.pop();
                    if let Some(parent) = parent {
                        self.append(
                            Token::Arc {
                                from: vertex,
                                to: parent,
                            },
                            &mut tour,
                        );
                    }
                }
            }
        }
        Ok(())
    }

    /// Mark `vertex` reached, splice its visit token into the tour and open
    /// its traversal frame.
    fn enter(&mut self, vertex: Vertex, parent: Option<Vertex>, tour: &mut Option<NodeId>) -> Frame {
        self.visited.set(vertex, true);
        let visit = self.index.visits[vertex];
        *tour = Some(self.splay.append(*tour, visit));
        Frame {
            vertex,
            parent,
            next_neighbor: 0,
            parent_edge_skipped: false,
        }
    }

    /// Allocate, index and append an arc token.
    fn append(&mut self, token: Token, tour: &mut Option<NodeId>) {
        let id = self.splay.alloc(token);
        if let Token::Arc { from, to } = token {
            self.index.insert_arc(from, to, id);
        }
        *tour = Some(self.splay.append(*tour, id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Allocate visit singletons for `n` vertices, then encode `adjacency`.
    fn encode(
        n: usize,
        adjacency: &[Vec<Vertex>],
    ) -> Result<(SplayForest<Token>, TokenIndex, usize), TourError> {
        let mut splay = SplayForest::new();
        let mut index = TokenIndex::new();
        for v in 0..n {
            let id = splay.alloc(Token::Visit(v));
            assert_eq!(index.push_visit(id), v);
        }
        let components = TourBuilder::new(&mut splay, &mut index).build(adjacency)?;
        Ok((splay, index, components))
    }

    fn tour_of(splay: &mut SplayForest<Token>, index: &TokenIndex, v: Vertex) -> Vec<Token> {
        let root = splay.root_of(index.visit(v).unwrap());
        let mut tokens = Vec::new();
        splay.for_each_in_order(root, |_, &t| tokens.push(t));
        tokens
    }

    #[test]
    fn path_tour_matches_traversal_order() {
        let adjacency = vec![vec![1], vec![0, 2], vec![1]];
        let (mut splay, index, _) = encode(3, &adjacency).unwrap();
        assert_eq!(
            tour_of(&mut splay, &index, 0),
            vec![
                Token::Visit(0),
                Token::Arc { from: 0, to: 1 },
                Token::Visit(1),
                Token::Arc { from: 1, to: 2 },
                Token::Visit(2),
                Token::Arc { from: 2, to: 1 },
                Token::Arc { from: 1, to: 0 },
            ]
        );
    }

    #[test]
    fn star_tour_follows_adjacency_order() {
        let adjacency = vec![vec![1, 2], vec![0], vec![0]];
        let (mut splay, index, _) = encode(3, &adjacency).unwrap();
        assert_eq!(
            tour_of(&mut splay, &index, 0),
            vec![
                Token::Visit(0),
                Token::Arc { from: 0, to: 1 },
                Token::Visit(1),
                Token::Arc { from: 1, to: 0 },
                Token::Arc { from: 0, to: 2 },
                Token::Visit(2),
                Token::Arc { from: 2, to: 0 },
            ]
        );
    }

    #[test]
    fn every_component_gets_its_own_tour() {
        let adjacency = vec![vec![1], vec![0], vec![], vec![4], vec![3]];
        let (mut splay, index, components) = encode(5, &adjacency).unwrap();
        assert_eq!(components, 3);
        assert_eq!(tour_of(&mut splay, &index, 2), vec![Token::Visit(2)]);
        assert_eq!(tour_of(&mut splay, &index, 3).len(), 4);
        let root_a = splay.root_of(index.visit(0).unwrap());
        let root_b = splay.root_of(index.visit(3).unwrap());
        assert_ne!(root_a, root_b);
    }

    #[test]
    fn token_counts_match_component_sizes() {
        // 4-vertex tree: k visits + 2(k-1) arcs.
        let adjacency = vec![vec![1, 2], vec![0, 3], vec![0], vec![1]];
        let (mut splay, index, _) = encode(4, &adjacency).unwrap();
        let tokens = tour_of(&mut splay, &index, 0);
        let visits = tokens
            .iter()
            .filter(|t| matches!(t, Token::Visit(_)))
            .count();
        assert_eq!(visits, 4);
        assert_eq!(tokens.len(), 3 * 4 - 2);
        assert_eq!(index.arc_count(), 2 * 3);
    }

    #[test]
    fn cycle_in_input_is_reported() {
        let adjacency = vec![vec![1, 2], vec![0, 2], vec![0, 1]];
        let err = encode(3, &adjacency).unwrap_err();
        assert!(matches!(err, TourError::CycleEdge { .. }));
    }

    #[test]
    fn duplicate_edge_is_reported() {
        let adjacency = vec![vec![1, 1], vec![0, 0]];
        let err = encode(2, &adjacency).unwrap_err();
        assert!(matches!(err, TourError::CycleEdge { .. }));
    }

    #[test]
    fn out_of_range_neighbor_is_reported() {
        let adjacency = vec![vec![7]];
        let err = encode(1, &adjacency).unwrap_err();
        assert!(matches!(err, TourError::NeighborOutOfRange { .. }));
    }

    #[test]
    #[should_panic(expected = "neighbor lists")]
    fn build_requires_a_neighbor_list_per_vertex() {
        let mut splay = SplayForest::new();
        let mut index = TokenIndex::new();
        for v in 0..3 {
            let id = splay.alloc(Token::Visit(v));
            index.push_visit(id);
        }
        let _ = TourBuilder::new(&mut splay, &mut index).build(&[vec![1], vec![0]]);
    }
}
