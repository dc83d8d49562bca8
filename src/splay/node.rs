//! Arena slots and handles for the splay sequence forest
//!
//! Nodes live in a flat `Vec` and point at each other through `NodeId`
//! indices instead of owned pointers, so the parent back-reference needs no
//! lifetime or interior-mutability machinery.

use std::fmt;

/// Stable handle to a node slot inside a [`super::SplayForest`].
///
/// Handles stay valid across rotations, splits and joins; they are
/// invalidated only by [`super::SplayForest::release`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(super) fn new(index: usize) -> Self {
        let index = u32::try_from(index).expect("arena index overflow");
        Self(index)
    }

    pub(super) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Which side of a parent a child hangs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    /// The in-order-earlier side.
    Left = 0,
    /// The in-order-later side.
    Right = 1,
}

impl Branch {
    /// The mirror side.
    pub fn opposite(self) -> Self {
        match self {
            Branch::Left => Branch::Right,
            Branch::Right => Branch::Left,
        }
    }

    pub(super) fn index(self) -> usize {
        self as usize
    }
}

/// One arena slot: a payload plus non-owning navigation links.
#[derive(Debug)]
pub(super) struct Node<T> {
    pub(super) value: T,
    pub(super) parent: Option<NodeId>,
    pub(super) children: [Option<NodeId>; 2],
}

impl<T> Node<T> {
    pub(super) fn new(value: T) -> Self {
        Self {
            value,
            parent: None,
            children: [None, None],
        }
    }
}
