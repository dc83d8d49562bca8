//! Self-adjusting sequence forest
//!
//! A [`SplayForest`] maintains many independent ordered sequences inside one
//! arena. Payloads are opaque to this layer: no comparisons ever drive
//! descent, every operation starts from a node the caller already holds by
//! [`NodeId`], and balance comes from splaying alone. This is the substrate
//! the Euler-tour layers build on; amortized over any call sequence,
//! splay-touching operations cost O(log n).
//!
//! Sequence order is in-order traversal order. Splits and joins recombine
//! whole trees; handles remain stable throughout because nodes never move
//! between slots.

mod node;

pub use node::{Branch, NodeId};

use node::Node;

/// Arena-backed forest of splay sequence trees.
///
/// Released slots are recycled through an internal free list, so a
/// `cut`/`link` pair in the layers above leaves no garbage behind.
///
/// Handles obtained from [`SplayForest::alloc`] are invalidated by
/// [`SplayForest::release`]; using a released handle afterwards is a logic
/// error the arena cannot detect.
#[derive(Debug)]
pub struct SplayForest<T> {
    nodes: Vec<Node<T>>,
    free: Vec<NodeId>,
}

impl<T> SplayForest<T> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Create an empty arena with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    /// Number of live (allocated, not released) nodes.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Whether the arena holds no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocate a detached single-node tree holding `value`.
    pub fn alloc(&mut self, value: T) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = Node::new(value);
                id
            }
            None => {
                let id = NodeId::new(self.nodes.len());
                self.nodes.push(Node::new(value));
                id
            }
        }
    }

    /// Return a fully detached node's slot to the free list.
    ///
    /// The node must be a singleton: no parent and no children. Detach it
    /// with splits before releasing.
    pub fn release(&mut self, id: NodeId) {
        let node = &self.nodes[id.index()];
        debug_assert!(
            node.parent.is_none() && node.children == [None, None],
            "release of an attached node"
        );
        self.free.push(id);
    }

    /// Payload of `id`.
    pub fn value(&self, id: NodeId) -> &T {
        &self.nodes[id.index()].value
    }

    /// Parent link of `id`, `None` at a tree root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// Whether `id` currently roots its tree.
    pub fn is_root(&self, id: NodeId) -> bool {
        self.parent(id).is_none()
    }

    fn child(&self, id: NodeId, branch: Branch) -> Option<NodeId> {
        self.nodes[id.index()].children[branch.index()]
    }

    /// Parent of `id` together with the side `id` hangs on.
    fn locate(&self, id: NodeId) -> Option<(NodeId, Branch)> {
        let parent = self.parent(id)?;
        if self.child(parent, Branch::Left) == Some(id) {
            Some((parent, Branch::Left))
        } else {
            debug_assert_eq!(self.child(parent, Branch::Right), Some(id));
            Some((parent, Branch::Right))
        }
    }

    /// Install `child` (possibly `None`) into `parent`'s `branch` slot.
    fn set_child(&mut self, parent: NodeId, branch: Branch, child: Option<NodeId>) {
        self.nodes[parent.index()].children[branch.index()] = child;
        if let Some(child) = child {
            self.nodes[child.index()].parent = Some(parent);
        }
    }

    /// Remove and return `parent`'s `branch` child, clearing its parent link.
    fn take_child(&mut self, parent: NodeId, branch: Branch) -> Option<NodeId> {
        let child = self.nodes[parent.index()].children[branch.index()].take()?;
        self.nodes[child.index()].parent = None;
        Some(child)
    }

    /// Single left rotation: lift `id`'s right child into `id`'s place.
    ///
    /// Pure pointer surgery, O(1); in-order sequence is preserved and the
    /// grandparent's child link is repaired.
    ///
    /// # Panics
    ///
    /// Panics if `id` has no right child; that is a caller bug, and failing
    /// fast beats silently corrupting links.
    pub fn rotate_left(&mut self, id: NodeId) {
        match self.child(id, Branch::Right) {
            Some(lifted) => self.lift(lifted, id, Branch::Right),
            None => panic!("rotate_left on a node without a right child"),
        }
    }

    /// Single right rotation: lift `id`'s left child into `id`'s place.
    ///
    /// # Panics
    ///
    /// Panics if `id` has no left child.
    pub fn rotate_right(&mut self, id: NodeId) {
        match self.child(id, Branch::Left) {
            Some(lifted) => self.lift(lifted, id, Branch::Left),
            None => panic!("rotate_right on a node without a left child"),
        }
    }

    /// Shared rotation body: `lifted` is `parent`'s `branch` child and takes
    /// `parent`'s place; `parent` descends to `lifted`'s opposite side.
    fn lift(&mut self, lifted: NodeId, parent: NodeId, branch: Branch) {
        let grand = self.locate(parent);
        let mid = self.child(lifted, branch.opposite());

        self.set_child(parent, branch, mid);
        self.set_child(lifted, branch.opposite(), Some(parent));
        match grand {
            Some((grandparent, grand_branch)) => {
                self.set_child(grandparent, grand_branch, Some(lifted));
            }
            None => self.nodes[lifted.index()].parent = None,
        }
    }

    /// Rotate `id` one level up, whichever side it hangs on.
    ///
    /// # Panics
    ///
    /// Panics if `id` is already a root.
    fn rotate_up(&mut self, id: NodeId) {
        match self.locate(id) {
            Some((parent, Branch::Left)) => self.rotate_right(parent),
            Some((parent, Branch::Right)) => self.rotate_left(parent),
            None => panic!("cannot rotate a tree root"),
        }
    }

    /// Splay `id` to the root of its tree.
    ///
    /// Applies zig, zig-zig or zig-zag steps depending on whether `id`, its
    /// parent and its grandparent form a straight or bent chain. Amortized
    /// O(log n) by the access-potential argument, independent of payload.
    pub fn splay(&mut self, id: NodeId) {
        while let Some((parent, branch)) = self.locate(id) {
            match self.locate(parent) {
                // zig: parent is the root
                None => self.rotate_up(id),
                // zig-zig: straight chain, rotate the parent first
                Some((_, parent_branch)) if parent_branch == branch => {
                    self.rotate_up(parent);
                    self.rotate_up(id);
                }
                // zig-zag: bent chain, rotate id twice
                Some(_) => {
                    self.rotate_up(id);
                    self.rotate_up(id);
                }
            }
        }
    }

    /// First node (in order) of the subtree under `id`.
    pub fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.child(id, Branch::Left) {
            id = left;
        }
        id
    }

    /// Last node (in order) of the subtree under `id`.
    pub fn rightmost(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.child(id, Branch::Right) {
            id = right;
        }
        id
    }

    /// In-order successor of `id` within its tree, if any.
    pub fn successor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(right) = self.child(id, Branch::Right) {
            return Some(self.leftmost(right));
        }
        let mut cur = id;
        while let Some((parent, branch)) = self.locate(cur) {
            if branch == Branch::Left {
                return Some(parent);
            }
            cur = parent;
        }
        None
    }

    /// In-order predecessor of `id` within its tree, if any.
    pub fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(left) = self.child(id, Branch::Left) {
            return Some(self.rightmost(left));
        }
        let mut cur = id;
        while let Some((parent, branch)) = self.locate(cur) {
            if branch == Branch::Right {
                return Some(parent);
            }
            cur = parent;
        }
        None
    }

    /// Append the detached singleton `id` after everything in `root`'s tree
    /// and splay it, returning the new root (`id` itself).
    ///
    /// With `root == None` the node simply becomes a tree of its own.
    pub fn append(&mut self, root: Option<NodeId>, id: NodeId) -> NodeId {
        debug_assert!(
            self.is_root(id) && self.nodes[id.index()].children == [None, None],
            "append expects a detached singleton"
        );
        if let Some(root) = root {
            debug_assert!(self.is_root(root), "append expects a tree root");
            let last = self.rightmost(root);
            self.set_child(last, Branch::Right, Some(id));
            self.splay(id);
        }
        id
    }

    /// Split off everything after `id`.
    ///
    /// Returns `(left, right)` where `left` (rooted at `id`) holds the
    /// sequence up to and including `id` and `right` holds the rest. When
    /// `id` is already the last element there is no successor to splay and
    /// no link to sever; `right` is `None`.
    pub fn split_after(&mut self, id: NodeId) -> (NodeId, Option<NodeId>) {
        self.splay(id);
        let Some(right) = self.child(id, Branch::Right) else {
            return (id, None);
        };
        // In-order successor of the root: first node of its right subtree.
        let succ = self.leftmost(right);
        self.splay(succ);
        // Splaying the old root's successor leaves the old root as its
        // direct left child; severing that one link completes the split.
        let detached = self.take_child(succ, Branch::Left);
        debug_assert_eq!(detached, Some(id));
        (id, Some(succ))
    }

    /// Split off everything before `id`; the mirror of
    /// [`SplayForest::split_after`].
    ///
    /// Returns `(left, right)` where `right` (rooted at `id`) holds the
    /// sequence from `id` onward. When `id` is already first, `left` is
    /// `None`.
    pub fn split_before(&mut self, id: NodeId) -> (Option<NodeId>, NodeId) {
        self.splay(id);
        let Some(left) = self.child(id, Branch::Left) else {
            return (None, id);
        };
        let pred = self.rightmost(left);
        self.splay(pred);
        let detached = self.take_child(pred, Branch::Right);
        debug_assert_eq!(detached, Some(id));
        (Some(pred), id)
    }

    /// Concatenate two trees; every element of `right` must sequence
    /// strictly after every element of `left`. The arena has no keys to
    /// check that with, so the precondition is the caller's responsibility.
    ///
    /// `None` operands act as identity. Returns the root of the combined
    /// tree.
    pub fn join(&mut self, left: Option<NodeId>, right: Option<NodeId>) -> Option<NodeId> {
        match (left, right) {
            (Some(left), Some(right)) => Some(self.join_roots(left, right)),
            (left, None) => left,
            (None, right) => right,
        }
    }

    fn join_roots(&mut self, left: NodeId, right: NodeId) -> NodeId {
        debug_assert!(self.is_root(left) && self.is_root(right) && left != right);
        let last = self.rightmost(left);
        self.splay(last);
        self.set_child(last, Branch::Right, Some(right));
        last
    }

    /// Canonical root of `id`'s tree: the first node of its sequence.
    ///
    /// Splays `id` and then the first node, so repeated connectivity
    /// queries stay within the amortized O(log n) bound instead of walking
    /// an unchanged access path over and over. The returned handle is
    /// stable for a given sequence no matter which member was asked.
    pub fn root_of(&mut self, id: NodeId) -> NodeId {
        self.splay(id);
        let first = self.leftmost(id);
        self.splay(first);
        first
    }

    /// Visit the subtree under `root` in sequence order.
    pub fn for_each_in_order(&self, root: NodeId, mut visit: impl FnMut(NodeId, &T)) {
        let mut stack = Vec::new();
        let mut cursor = Some(root);
        while cursor.is_some() || !stack.is_empty() {
            while let Some(id) = cursor {
                stack.push(id);
                cursor = self.child(id, Branch::Left);
            }
            // stack cannot be empty here
            if let Some(id) = stack.pop() {
                visit(id, self.value(id));
                cursor = self.child(id, Branch::Right);
            }
        }
    }

    /// Number of nodes in the tree under `root`.
    pub fn tree_len(&self, root: NodeId) -> usize {
        let mut count = 0;
        self.for_each_in_order(root, |_, _| count += 1);
        count
    }
}
