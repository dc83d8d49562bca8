//! Dynamic forest connectivity
//!
//! [`DynamicForest`] maintains an acyclic undirected graph under three
//! operations: [`link`](DynamicForest::link) adds an edge between two
//! components, [`cut`](DynamicForest::cut) removes an existing edge, and
//! [`connected`](DynamicForest::connected) asks whether two vertices share a
//! component. Each component is represented by the Euler tour of its tree,
//! stored as a sequence in a [`SplayForest`]; re-rooting is a cyclic
//! rotation of that sequence, and link/cut reduce to a constant number of
//! splits and joins. Every operation is amortized O(log n).
//!
//! The structure self-adjusts on reads as well as writes, so all operations
//! take `&mut self`.

use thiserror::Error;
use tracing::{debug, trace};

use crate::splay::{NodeId, SplayForest};
use crate::tour::{Token, TokenIndex, TourBuilder, TourError, Vertex};

/// Reportable failures of forest operations.
///
/// Inconsistencies of the structure itself (a directed arc token without
/// its reverse, an index entry pointing at a foreign tree) are not in this
/// enum: they cannot be handled by callers and panic instead.
#[derive(Debug, Error)]
pub enum ForestError {
    /// `link` would close a cycle; the endpoints already share a component.
    /// Also raised when the initial graph is not a forest, and for
    /// self-links.
    #[error("vertices {u} and {v} are already connected")]
    AlreadyConnected {
        /// First endpoint of the rejected link.
        u: Vertex,
        /// Second endpoint of the rejected link.
        v: Vertex,
    },
    /// `cut` named an edge that is not in the forest.
    #[error("no edge joins vertices {u} and {v}")]
    NoSuchEdge {
        /// First endpoint of the missing edge.
        u: Vertex,
        /// Second endpoint of the missing edge.
        v: Vertex,
    },
    /// A vertex argument exceeded the forest's vertex count.
    #[error("vertex {vertex} is out of range for a forest of {count} vertices")]
    VertexOutOfRange {
        /// The offending argument.
        vertex: Vertex,
        /// Number of vertices in the forest.
        count: usize,
    },
}

/// Build-time tour failures surface as the forest-level error the same
/// situation would raise at run time: a cycle edge is a link between
/// already-connected vertices, a bad neighbor is a bad vertex argument.
impl From<TourError> for ForestError {
    fn from(err: TourError) -> Self {
        match err {
            TourError::CycleEdge { u, v } => ForestError::AlreadyConnected { u, v },
            TourError::NeighborOutOfRange {
                neighbor, count, ..
            } => ForestError::VertexOutOfRange {
                vertex: neighbor,
                count,
            },
        }
    }
}

/// Connectivity over an evolving forest of `vertex_count` vertices.
///
/// Vertices are the integers `0..vertex_count`, fixed at construction.
/// Edges come and go through [`link`](DynamicForest::link) and
/// [`cut`](DynamicForest::cut); the forest guarantee (no cycles) is enforced
/// by `link` itself, so the structure is always consistent at call
/// boundaries.
#[derive(Debug)]
pub struct DynamicForest {
    splay: SplayForest<Token>,
    index: TokenIndex,
    components: usize,
}

impl DynamicForest {
    /// Forest of `count` isolated vertices.
    pub fn new(count: usize) -> Self {
        let mut splay = SplayForest::with_capacity(count);
        let mut index = TokenIndex::new();
        for v in 0..count {
            let id = splay.alloc(Token::Visit(v));
            index.push_visit(id);
        }
        debug!(vertices = count, "created forest of isolated vertices");
        Self {
            splay,
            index,
            components: count,
        }
    }

    /// Forest encoding the given undirected graph.
    ///
    /// `adjacency[v]` lists the neighbors of `v`; every edge must appear in
    /// both endpoint lists. Tours follow adjacency order, components are
    /// discovered in vertex order.
    ///
    /// # Errors
    ///
    /// [`ForestError::AlreadyConnected`] if the graph has a cycle or repeats
    /// an edge, [`ForestError::VertexOutOfRange`] if a neighbor entry
    /// exceeds the vertex count.
    pub fn from_adjacency(adjacency: &[Vec<Vertex>]) -> Result<Self, ForestError> {
        let mut forest = Self::new(adjacency.len());
        let components =
            TourBuilder::new(&mut forest.splay, &mut forest.index).build(adjacency)?;
        forest.components = components;
        debug!(
            edges = forest.edge_count(),
            components, "encoded initial tours"
        );
        Ok(forest)
    }

    /// Forest over `count` vertices with the given undirected edges.
    ///
    /// Convenience over [`from_adjacency`](DynamicForest::from_adjacency):
    /// assembles the symmetric adjacency in input order first.
    ///
    /// # Errors
    ///
    /// Same conditions as `from_adjacency`.
    pub fn from_edges(count: usize, edges: &[(Vertex, Vertex)]) -> Result<Self, ForestError> {
        let mut adjacency = vec![Vec::new(); count];
        for &(u, v) in edges {
            for vertex in [u, v] {
                if vertex >= count {
                    return Err(ForestError::VertexOutOfRange { vertex, count });
                }
            }
            adjacency[u].push(v);
            adjacency[v].push(u);
        }
        Self::from_adjacency(&adjacency)
    }

    /// Number of vertices, fixed at construction.
    pub fn vertex_count(&self) -> usize {
        self.index.vertex_count()
    }

    /// Number of edges currently in the forest.
    pub fn edge_count(&self) -> usize {
        self.index.arc_count() / 2
    }

    /// Number of connected components.
    pub fn component_count(&self) -> usize {
        self.components
    }

    /// Whether `u` and `v` currently share a component.
    ///
    /// Compares the canonical representatives of both tours. A vertex is
    /// connected to itself.
    ///
    /// # Errors
    ///
    /// [`ForestError::VertexOutOfRange`] for an out-of-range argument.
    pub fn connected(&mut self, u: Vertex, v: Vertex) -> Result<bool, ForestError> {
        let ut = self.visit_token(u)?;
        let vt = self.visit_token(v)?;
        let connected = self.splay.root_of(ut) == self.splay.root_of(vt);
        trace!(u, v, connected, "connectivity query");
        Ok(connected)
    }

    /// Add the edge `{u, v}`, merging two components into one.
    ///
    /// Re-roots both tours at their endpoint, appends the descending arc to
    /// `u`'s tour and the returning arc to `v`'s, then joins the two
    /// sequences into the merged component's tour.
    ///
    /// # Errors
    ///
    /// [`ForestError::AlreadyConnected`] if the endpoints already share a
    /// component (including `u == v`); the forest is unchanged.
    /// [`ForestError::VertexOutOfRange`] for an out-of-range argument.
    pub fn link(&mut self, u: Vertex, v: Vertex) -> Result<(), ForestError> {
        let ut = self.visit_token(u)?;
        let vt = self.visit_token(v)?;
        if self.splay.root_of(ut) == self.splay.root_of(vt) {
            return Err(ForestError::AlreadyConnected { u, v });
        }

        self.reroot(ut);
        self.reroot(vt);

        let arc_uv = self.splay.alloc(Token::Arc { from: u, to: v });
        self.index.insert_arc(u, v, arc_uv);
        let tour_u = self.splay.root_of(ut);
        let tour_u = self.splay.append(Some(tour_u), arc_uv);

        let arc_vu = self.splay.alloc(Token::Arc { from: v, to: u });
        self.index.insert_arc(v, u, arc_vu);
        let tour_v = self.splay.root_of(vt);
        let tour_v = self.splay.append(Some(tour_v), arc_vu);

        self.splay.join(Some(tour_u), Some(tour_v));
        self.components -= 1;
        debug!(u, v, components = self.components, "linked");
        Ok(())
    }

    /// Remove the edge `{u, v}`, splitting one component into two.
    ///
    /// Re-roots the tour at `u`, splits out the two arc tokens of the edge
    /// (everything between them is `v`'s side, which becomes its own tour),
    /// rejoins the outer parts, and releases the arc nodes back to the
    /// arena.
    ///
    /// # Errors
    ///
    /// [`ForestError::NoSuchEdge`] if the edge is not in the forest; the
    /// forest is unchanged. [`ForestError::VertexOutOfRange`] for an
    /// out-of-range argument.
    ///
    /// # Panics
    ///
    /// Panics if exactly one of the edge's two directed arc tokens is
    /// indexed. The arc pair is created and destroyed together, so a lone
    /// arc means the structure is corrupt and no answer can be trusted.
    pub fn cut(&mut self, u: Vertex, v: Vertex) -> Result<(), ForestError> {
        let ut = self.visit_token(u)?;
        self.visit_token(v)?;
        let (uv, vu) = match (self.index.arc(u, v), self.index.arc(v, u)) {
            (Some(uv), Some(vu)) => (uv, vu),
            (None, None) => return Err(ForestError::NoSuchEdge { u, v }),
            _ => panic!("edge {u}-{v} has one directed arc token but not its reverse"),
        };

        self.reroot(ut);
        // The tour now reads: u's prefix, u->v, v's side, v->u, u's suffix.
        let (before, _) = self.splay.split_before(uv);
        self.splay.split_after(uv);
        let (side_v, _) = self.splay.split_before(vu);
        let (_, rest) = self.splay.split_after(vu);
        debug_assert!(before.is_some(), "the re-rooted tour starts at u's visit");
        debug_assert!(side_v.is_some(), "an edge always encloses a visit");
        self.splay.join(before, rest);

        self.index.remove_arc(u, v);
        self.index.remove_arc(v, u);
        self.splay.release(uv);
        self.splay.release(vu);
        self.components += 1;
        debug!(u, v, components = self.components, "cut");
        Ok(())
    }

    /// All tokens of `v`'s component in current tour order.
    ///
    /// The order is the component's Euler tour in whatever rotation the
    /// preceding operations left it; only [`DynamicForest::from_edges`]
    /// and [`DynamicForest::from_adjacency`] guarantee sequences that
    /// start at a component root.
    ///
    /// O(component size); meant for diagnostics and tests, not the hot
    /// path.
    ///
    /// # Errors
    ///
    /// [`ForestError::VertexOutOfRange`] for an out-of-range argument.
    pub fn component_tokens(&mut self, v: Vertex) -> Result<Vec<Token>, ForestError> {
        let vt = self.visit_token(v)?;
        let root = self.splay.root_of(vt);
        let mut tokens = Vec::new();
        self.splay.for_each_in_order(root, |_, &token| tokens.push(token));
        Ok(tokens)
    }

    /// Number of vertices in `v`'s component.
    ///
    /// A component of k vertices holds k visit and 2(k-1) arc tokens, so k
    /// falls out of the tour length.
    ///
    /// # Errors
    ///
    /// [`ForestError::VertexOutOfRange`] for an out-of-range argument.
    pub fn component_size(&mut self, v: Vertex) -> Result<usize, ForestError> {
        let vt = self.visit_token(v)?;
        let root = self.splay.root_of(vt);
        let tokens = self.splay.tree_len(root);
        Ok((tokens + 2) / 3)
    }

    /// Range-check doubling as handle lookup: a vertex is valid exactly
    /// when its visit token is indexed.
    fn visit_token(&self, v: Vertex) -> Result<NodeId, ForestError> {
        self.index.visit(v).ok_or(ForestError::VertexOutOfRange {
            vertex: v,
            count: self.index.vertex_count(),
        })
    }

    /// Rotate `visit`'s tour so it starts at `visit`.
    ///
    /// Splits before the token and rejoins the halves in swapped order; a
    /// tour is a cyclic sequence, so this changes the starting point and
    /// nothing else. Already-first tokens fall through the `None` identity
    /// of the join.
    fn reroot(&mut self, visit: NodeId) {
        let (before, from) = self.splay.split_before(visit);
        self.splay.join(Some(from), before);
    }
}
