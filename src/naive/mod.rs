//! Linked-list Euler tours
//!
//! [`ListForest`] keeps the same token encoding as
//! [`DynamicForest`](crate::forest::DynamicForest) but stores each tour in
//! an arena-backed doubly linked list with no balancing: finding a tour's
//! head or tail is a pointer walk, so every operation costs O(component
//! size). It exists as the straightforward baseline the splay-backed forest
//! is tested and benchmarked against; both produce identical tour sequences
//! for identical operation histories.

use std::collections::HashMap;

use bitvec::prelude::*;

use crate::forest::ForestError;
use crate::tour::{Token, Vertex};

/// One cell of a tour list.
#[derive(Debug)]
struct Cell {
    token: Token,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Forest connectivity over doubly linked tour lists.
///
/// Same operations, same error taxonomy and same validation as the
/// splay-backed forest; only the cost model differs.
#[derive(Debug)]
pub struct ListForest {
    cells: Vec<Cell>,
    free: Vec<usize>,
    visits: Vec<usize>,
    arcs: HashMap<(Vertex, Vertex), usize>,
    components: usize,
}

impl ListForest {
    /// Forest of `count` isolated vertices.
    pub fn new(count: usize) -> Self {
        let mut forest = Self {
            cells: Vec::with_capacity(count),
            free: Vec::new(),
            visits: Vec::with_capacity(count),
            arcs: HashMap::new(),
            components: count,
        };
        for v in 0..count {
            let cell = forest.alloc(Token::Visit(v));
            forest.visits.push(cell);
        }
        forest
    }

    /// Forest encoding the given undirected graph; every edge must appear
    /// in both endpoint lists.
    ///
    /// # Errors
    ///
    /// [`ForestError::AlreadyConnected`] for cycles or repeated edges,
    /// [`ForestError::VertexOutOfRange`] for bad neighbor entries.
    pub fn from_adjacency(adjacency: &[Vec<Vertex>]) -> Result<Self, ForestError> {
        let count = adjacency.len();
        let mut forest = Self::new(count);
        let mut visited = bitvec![0; count];
        let mut components = 0;
        for root in 0..count {
            if !visited[root] {
                forest.thread_component(root, adjacency, &mut visited)?;
                components += 1;
            }
        }
        forest.components = components;
        Ok(forest)
    }

    /// Forest over `count` vertices with the given undirected edges.
    ///
    /// # Errors
    ///
    /// Same conditions as [`from_adjacency`](ListForest::from_adjacency).
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
        self.visits.len()
    }

    /// Number of edges currently in the forest.
    pub fn edge_count(&self) -> usize {
        self.arcs.len() / 2
    }

    /// Number of connected components.
    pub fn component_count(&self) -> usize {
        self.components
    }

    /// Whether `u` and `v` currently share a component: both tours are
    /// walked back to their heads and the heads compared.
    ///
    /// # Errors
    ///
    /// [`ForestError::VertexOutOfRange`] for an out-of-range argument.
    pub fn connected(&self, u: Vertex, v: Vertex) -> Result<bool, ForestError> {
        let uc = self.visit_cell(u)?;
        let vc = self.visit_cell(v)?;
        Ok(self.head(uc) == self.head(vc))
    }

    /// Add the edge `{u, v}` by re-rooting both tours and splicing them
    /// together around a fresh arc pair.
    ///
    /// # Errors
    ///
    /// [`ForestError::AlreadyConnected`] if the endpoints already share a
    /// component (including `u == v`), [`ForestError::VertexOutOfRange`]
    /// for an out-of-range argument.
    pub fn link(&mut self, u: Vertex, v: Vertex) -> Result<(), ForestError> {
        let uc = self.visit_cell(u)?;
        let vc = self.visit_cell(v)?;
        if self.head(uc) == self.head(vc) {
            return Err(ForestError::AlreadyConnected { u, v });
        }

        self.reroot(uc);
        self.reroot(vc);

        let arc_uv = self.alloc(Token::Arc { from: u, to: v });
        let arc_vu = self.alloc(Token::Arc { from: v, to: u });
        self.arcs.insert((u, v), arc_uv);
        self.arcs.insert((v, u), arc_vu);

        // u's tour ++ [u->v] ++ v's tour ++ [v->u]
        let u_tail = self.tail(uc);
        let v_tail = self.tail(vc);
        self.connect(u_tail, arc_uv);
        self.connect(arc_uv, vc);
        self.connect(v_tail, arc_vu);

        self.components -= 1;
        Ok(())
    }

    /// Remove the edge `{u, v}`: the stretch between its two arc cells
    /// becomes `v`'s own tour and the outer stretches are bridged.
    ///
    /// # Errors
    ///
    /// [`ForestError::NoSuchEdge`] if the edge is not in the forest,
    /// [`ForestError::VertexOutOfRange`] for an out-of-range argument.
    ///
    /// # Panics
    ///
    /// Panics if exactly one of the edge's two directed arc cells is
    /// indexed.
    pub fn cut(&mut self, u: Vertex, v: Vertex) -> Result<(), ForestError> {
        let uc = self.visit_cell(u)?;
        self.visit_cell(v)?;
        let (arc_uv, arc_vu) = match (self.arcs.get(&(u, v)), self.arcs.get(&(v, u))) {
            (Some(&uv), Some(&vu)) => (uv, vu),
            (None, None) => return Err(ForestError::NoSuchEdge { u, v }),
            _ => panic!("edge {u}-{v} has one directed arc cell but not its reverse"),
        };

        self.reroot(uc);
        // The tour reads: u's prefix, u->v, v's side, v->u, u's suffix.
        let before = self.cells[arc_uv].prev;
        let side_head = self.cells[arc_uv].next;
        let side_tail = self.cells[arc_vu].prev;
        let after = self.cells[arc_vu].next;
        debug_assert!(before.is_some(), "tour cannot begin with an arc");
        debug_assert!(
            side_head.is_some() && side_tail.is_some(),
            "an edge always encloses a visit"
        );

        if let Some(before) = before {
            self.cells[before].next = after;
            if let Some(after) = after {
                self.cells[after].prev = Some(before);
            }
        }
        if let Some(head) = side_head {
            self.cells[head].prev = None;
        }
        if let Some(tail) = side_tail {
            self.cells[tail].next = None;
        }

        self.arcs.remove(&(u, v));
        self.arcs.remove(&(v, u));
        self.release(arc_uv);
        self.release(arc_vu);
        self.components += 1;
        Ok(())
    }

    /// All tokens of `v`'s component in current tour order.
    ///
    /// # Errors
    ///
    /// [`ForestError::VertexOutOfRange`] for an out-of-range argument.
    pub fn component_tokens(&self, v: Vertex) -> Result<Vec<Token>, ForestError> {
        let start = self.head(self.visit_cell(v)?);
        let mut tokens = Vec::new();
        let mut cursor = Some(start);
        while let Some(cell) = cursor {
            tokens.push(self.cells[cell].token);
            cursor = self.cells[cell].next;
        }
        Ok(tokens)
    }

    /// Number of vertices in `v`'s component.
    ///
    /// # Errors
    ///
    /// [`ForestError::VertexOutOfRange`] for an out-of-range argument.
    pub fn component_size(&self, v: Vertex) -> Result<usize, ForestError> {
        Ok((self.component_tokens(v)?.len() + 2) / 3)
    }

    fn visit_cell(&self, v: Vertex) -> Result<usize, ForestError> {
        self.visits
            .get(v)
            .copied()
            .ok_or(ForestError::VertexOutOfRange {
                vertex: v,
                count: self.visits.len(),
            })
    }

    fn alloc(&mut self, token: Token) -> usize {
        let cell = Cell {
            token,
            prev: None,
            next: None,
        };
        match self.free.pop() {
            Some(slot) => {
                self.cells[slot] = cell;
                slot
            }
            None => {
                self.cells.push(cell);
                self.cells.len() - 1
            }
        }
    }

    fn release(&mut self, slot: usize) {
        self.cells[slot].prev = None;
        self.cells[slot].next = None;
        self.free.push(slot);
    }

    fn connect(&mut self, left: usize, right: usize) {
        self.cells[left].next = Some(right);
        self.cells[right].prev = Some(left);
    }

    /// Append `cell` at the growing end of a list under construction.
    fn append_cell(&mut self, tail: &mut Option<usize>, cell: usize) {
        if let Some(t) = *tail {
            self.connect(t, cell);
        }
        *tail = Some(cell);
    }

    fn head(&self, mut at: usize) -> usize {
        while let Some(prev) = self.cells[at].prev {
            at = prev;
        }
        at
    }

    fn tail(&self, mut at: usize) -> usize {
        while let Some(next) = self.cells[at].next {
            at = next;
        }
        at
    }

    /// Rotate `cell`'s tour so it becomes the head: sever before it, then
    /// hang the old front stretch off the old tail.
    fn reroot(&mut self, cell: usize) {
        let Some(prev) = self.cells[cell].prev else {
            return;
        };
        let front = self.head(cell);
        self.cells[prev].next = None;
        self.cells[cell].prev = None;
        let tail = self.tail(cell);
        self.connect(tail, front);
    }

    /// Depth-first threading of one component, emitting each token by
    /// appending its cell to the growing list.
    fn thread_component(
        &mut self,
        root: Vertex,
        adjacency: &[Vec<Vertex>],
        visited: &mut BitVec,
    ) -> Result<(), ForestError> {
        struct Frame {
            vertex: Vertex,
            parent: Option<Vertex>,
            next_neighbor: usize,
            parent_edge_skipped: bool,
        }

        let count = self.visits.len();
        let mut tail: Option<usize> = None;

        visited.set(root, true);
        let root_cell = self.visits[root];
        self.append_cell(&mut tail, root_cell);
        let mut stack = vec![Frame {
            vertex: root,
            parent: None,
            next_neighbor: 0,
            parent_edge_skipped: false,
        }];

        while let Some(frame) = stack.last_mut() {
            let vertex = frame.vertex;
            match adjacency[vertex].get(frame.next_neighbor).copied() {
                Some(neighbor) => {
                    frame.next_neighbor += 1;
                    if neighbor >= count {
                        return Err(ForestError::VertexOutOfRange {
                            vertex: neighbor,
                            count,
                        });
                    }
                    if !visited[neighbor] {
                        visited.set(neighbor, true);
                        let arc = self.alloc(Token::Arc {
                            from: vertex,
                            to: neighbor,
                        });
                        self.arcs.insert((vertex, neighbor), arc);
                        self.append_cell(&mut tail, arc);
                        let neighbor_cell = self.visits[neighbor];
                        self.append_cell(&mut tail, neighbor_cell);
                        stack.push(Frame {
                            vertex: neighbor,
                            parent: Some(vertex),
                            next_neighbor: 0,
                            parent_edge_skipped: false,
                        });
                    } else if frame.parent == Some(neighbor) && !frame.parent_edge_skipped {
                        frame.parent_edge_skipped = true;
                    } else {
                        return Err(ForestError::AlreadyConnected {
                            u: vertex,
                            v: neighbor,
                        });
                    }
                }
                None => {
                    let parent = frame.parent;
                    stack.pop();
                    if let Some(parent) = parent {
                        let arc = self.alloc(Token::Arc {
                            from: vertex,
                            to: parent,
                        });
                        self.arcs.insert((vertex, parent), arc);
                        self.append_cell(&mut tail, arc);
                    }
                }
            }
        }
        Ok(())
    }
}
