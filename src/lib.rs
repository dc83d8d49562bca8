//! # Dynamic Forest Connectivity via Euler Tours
//!
//! This library answers "are `u` and `v` connected?" over a forest that
//! changes: [`link`](DynamicForest::link) adds an edge between two trees,
//! [`cut`](DynamicForest::cut) removes one, and
//! [`connected`](DynamicForest::connected) queries the current partition.
//! All three are amortized O(log n).
//!
//! ## Core Algorithm
//!
//! 1. **Euler tours**: each tree is flattened into a token sequence with one
//!    visit token per vertex and one token per directed arc of every edge
//! 2. **Splay-backed sequences**: tours live in self-adjusting binary trees
//!    supporting split and join in amortized O(log n), with no keys at all
//! 3. **Re-rooting as rotation**: a tour is cyclic, so re-rooting a tree is
//!    splitting its sequence once and swapping the halves
//! 4. **Connectivity by representative**: two vertices are connected exactly
//!    when their tours share a canonical first token
//!
//! ## Usage Example
//!
//! ```
//! use tourtree::DynamicForest;
//!
//! # fn main() -> Result<(), tourtree::ForestError> {
//! let mut forest = DynamicForest::from_edges(4, &[(0, 1), (1, 2)])?;
//! assert!(forest.connected(0, 2)?);
//! assert!(!forest.connected(0, 3)?);
//!
//! forest.link(2, 3)?;
//! assert!(forest.connected(0, 3)?);
//!
//! forest.cut(1, 2)?;
//! assert!(!forest.connected(0, 3)?);
//! assert!(forest.connected(2, 3)?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

// Core modules - each one layer of the encoding
pub mod splay; // self-adjusting sequence arena
pub mod tour; // tour tokens, index, initial construction
pub mod forest; // link/cut/connected API
pub mod naive; // linked-list baseline
pub mod queries; // batch-query driver records

// Re-exports for convenience
pub use forest::{DynamicForest, ForestError};
pub use naive::ListForest;
pub use queries::{process_queries, Query, QueryError, QueryKind};
pub use tour::{Token, Vertex};
