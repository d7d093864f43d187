//! Red-black tree keyed by ride number
//!
//! The key index of the ledger. Nodes live in an [`Arena`] and link to each
//! other through [`NodeKey`]s; a single black sentinel node stands in for
//! every absent child and for the root's parent.
//!
//! # Time Complexity
//!
//! | Operation     | Complexity   |
//! |---------------|--------------|
//! | `search`      | O(log n)     |
//! | `insert`      | O(log n)     |
//! | `delete_node` | O(log n)     |
//! | `range`       | O(log n + m) |
//! | `iter`        | O(n)         |
//!
//! `delete_node` takes a node key rather than a ride number: callers reach the
//! node through the heap slot's cross-handle and never search twice.
//!
//! # Example
//!
//! ```rust
//! use ride_ledger::rbtree::RedBlackTree;
//! use ride_ledger::Record;
//!
//! let mut tree = RedBlackTree::new();
//! for key in [5, 1, 9, 3] {
//!     tree.insert(Record::new(key, 0, 0));
//! }
//!
//! let node = tree.search(3).unwrap();
//! assert_eq!(tree.record(node), Some(Record::new(3, 0, 0)));
//!
//! let keys: Vec<i64> = tree.range(2, 9).iter().map(|r| r.key).collect();
//! assert_eq!(keys, vec![3, 5, 9]);
//!
//! tree.delete_node(node);
//! assert!(tree.search(3).is_none());
//! ```

use crate::record::Record;
use crate::storage::{Arena, NodeKey, SlotKey};
use log::trace;
use slotmap::Key;
use smallvec::SmallVec;

/// Traversal stack; inline capacity covers trees of roughly 2^32 nodes
type NodeStack = SmallVec<[NodeKey; 64]>;

/// Node color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Red node, never the child of another red node
    Red,
    /// Black node; the sentinel is always black
    Black,
}

/// A tree node and its cross-handle into the heap
#[derive(Debug, Clone)]
pub struct TreeNode {
    record: Record,
    color: Color,
    parent: NodeKey,
    left: NodeKey,
    right: NodeKey,
    heap_handle: SlotKey,
}

impl TreeNode {
    fn new(record: Record, color: Color, nil: NodeKey) -> Self {
        Self {
            record,
            color,
            parent: nil,
            left: nil,
            right: nil,
            heap_handle: SlotKey::null(),
        }
    }

    /// The record held by this node
    pub fn record(&self) -> Record {
        self.record
    }

    /// The heap slot holding the same record, null until linked
    pub fn heap_handle(&self) -> SlotKey {
        self.heap_handle
    }

    /// Current color of the node
    pub fn color(&self) -> Color {
        self.color
    }
}

/// Arena-backed red-black tree ordered by `Record::key`
#[derive(Debug, Clone)]
pub struct RedBlackTree {
    nodes: Arena<NodeKey, TreeNode>,
    /// Shared black sentinel
    nil: NodeKey,
    root: NodeKey,
}

impl RedBlackTree {
    /// Creates an empty tree
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty tree with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Arena::with_capacity_and_key(capacity + 1);
        let nil = nodes.insert_with_key(|nil| TreeNode::new(Record::default(), Color::Black, nil));
        Self {
            nodes,
            nil,
            root: nil,
        }
    }

    /// Returns the number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Returns true if the tree holds no nodes
    pub fn is_empty(&self) -> bool {
        self.root == self.nil
    }

    /// Finds the node holding `key`
    pub fn search(&self, key: i64) -> Option<NodeKey> {
        let mut current = self.root;
        while current != self.nil {
            let node = &self.nodes[current];
            current = match key.cmp(&node.record.key) {
                std::cmp::Ordering::Equal => return Some(current),
                std::cmp::Ordering::Less => node.left,
                std::cmp::Ordering::Greater => node.right,
            };
        }
        None
    }

    /// Returns the live node behind `node`, if any
    pub fn get(&self, node: NodeKey) -> Option<&TreeNode> {
        if node == self.nil {
            return None;
        }
        self.nodes.get(node)
    }

    /// Returns the record held by `node`
    pub fn record(&self, node: NodeKey) -> Option<Record> {
        self.get(node).map(TreeNode::record)
    }

    /// Returns the heap cross-handle of `node`
    pub fn heap_handle(&self, node: NodeKey) -> Option<SlotKey> {
        self.get(node).map(TreeNode::heap_handle)
    }

    /// Points `node` at its heap slot; returns false for a stale node
    pub fn set_heap_handle(&mut self, node: NodeKey, slot: SlotKey) -> bool {
        if node == self.nil {
            return false;
        }
        match self.nodes.get_mut(node) {
            Some(n) => {
                n.heap_handle = slot;
                true
            }
            None => false,
        }
    }

    /// Smallest key in the tree
    pub fn min_key(&self) -> Option<i64> {
        if self.is_empty() {
            return None;
        }
        Some(self.nodes[self.minimum(self.root)].record.key)
    }

    /// Largest key in the tree
    pub fn max_key(&self) -> Option<i64> {
        if self.is_empty() {
            return None;
        }
        let mut current = self.root;
        while self.nodes[current].right != self.nil {
            current = self.nodes[current].right;
        }
        Some(self.nodes[current].record.key)
    }

    /// Inserts `record` as a new red leaf and rebalances
    ///
    /// The key must not already be present; the ledger checks this before
    /// calling. The new node's heap handle is null until the caller links it.
    pub fn insert(&mut self, record: Record) -> NodeKey {
        debug_assert!(self.search(record.key).is_none(), "duplicate key in tree");

        let mut parent = self.nil;
        let mut current = self.root;
        while current != self.nil {
            parent = current;
            current = if record.key < self.nodes[current].record.key {
                self.nodes[current].left
            } else {
                self.nodes[current].right
            };
        }

        let mut node = TreeNode::new(record, Color::Red, self.nil);
        node.parent = parent;
        let key = self.nodes.insert(node);

        if parent == self.nil {
            self.root = key;
        } else if record.key < self.nodes[parent].record.key {
            self.nodes[parent].left = key;
        } else {
            self.nodes[parent].right = key;
        }

        self.balance_after_insert(key);
        key
    }

    /// Unlinks and frees `node`, returning it
    ///
    /// Returns `None` for the sentinel or a node that is no longer live.
    pub fn delete_node(&mut self, node: NodeKey) -> Option<TreeNode> {
        if node == self.nil || !self.nodes.contains_key(node) {
            return None;
        }

        let mut removed_color = self.nodes[node].color;
        let replacement;

        if self.nodes[node].left == self.nil {
            replacement = self.nodes[node].right;
            self.transplant(node, replacement);
        } else if self.nodes[node].right == self.nil {
            replacement = self.nodes[node].left;
            self.transplant(node, replacement);
        } else {
            let successor = self.minimum(self.nodes[node].right);
            removed_color = self.nodes[successor].color;
            replacement = self.nodes[successor].right;

            if self.nodes[successor].parent == node {
                // Replacement may be the sentinel; fix-up walks up from it
                self.nodes[replacement].parent = successor;
            } else {
                self.transplant(successor, replacement);
                let right = self.nodes[node].right;
                self.nodes[successor].right = right;
                self.nodes[right].parent = successor;
            }

            self.transplant(node, successor);
            let left = self.nodes[node].left;
            self.nodes[successor].left = left;
            self.nodes[left].parent = successor;
            self.nodes[successor].color = self.nodes[node].color;
        }

        if removed_color == Color::Black {
            self.balance_after_delete(replacement);
        }

        let nil = self.nil;
        self.nodes[nil].parent = nil;

        self.nodes.remove(node)
    }

    /// Records with `low <= key <= high`, ascending by key
    ///
    /// Subtrees entirely below `low` are skipped on the way down and the walk
    /// stops at the first key above `high`, so only O(log n + m) nodes are
    /// visited. Returns an empty vector when `low > high`.
    pub fn range(&self, low: i64, high: i64) -> Vec<Record> {
        let mut out = Vec::new();
        if low > high {
            return out;
        }

        let mut stack = NodeStack::new();
        let mut current = self.root;
        loop {
            while current != self.nil {
                let node = &self.nodes[current];
                if node.record.key < low {
                    current = node.right;
                } else {
                    stack.push(current);
                    current = node.left;
                }
            }

            let Some(top) = stack.pop() else { break };
            let node = &self.nodes[top];
            if node.record.key > high {
                break;
            }
            out.push(node.record);
            current = node.right;
        }
        out
    }

    /// All records in ascending key order
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter {
            tree: self,
            stack: NodeStack::new(),
            remaining: self.len(),
        };
        iter.push_left_spine(self.root);
        iter
    }

    /// Live nodes with their keys, in arena order
    pub(crate) fn nodes(&self) -> impl Iterator<Item = (NodeKey, &TreeNode)> + '_ {
        let nil = self.nil;
        self.nodes.iter().filter(move |(key, _)| *key != nil)
    }

    /// Removes every node
    pub fn clear(&mut self) {
        let nil = self.nil;
        self.nodes.retain(|key, _| key == nil);
        self.nodes[nil].parent = nil;
        self.root = nil;
    }

    /// Checks the red-black, ordering and parent-link invariants
    ///
    /// - the sentinel and the root are black
    /// - no red node has a red child
    /// - every root-to-sentinel path has the same black count
    /// - keys are strictly increasing in order
    /// - every child's parent link points back to its parent
    pub fn verify_structure(&self) -> bool {
        if self.nodes[self.nil].color != Color::Black {
            return false;
        }
        if self.root != self.nil {
            let root = &self.nodes[self.root];
            if root.color != Color::Black || root.parent != self.nil {
                return false;
            }
        }

        let mut count = 0;
        self.black_height(self.root, None, None, &mut count).is_some() && count == self.len()
    }

    /// Black height of the subtree at `node`, or `None` if any invariant fails
    fn black_height(
        &self,
        node: NodeKey,
        lower: Option<i64>,
        upper: Option<i64>,
        count: &mut usize,
    ) -> Option<usize> {
        if node == self.nil {
            return Some(1);
        }
        let n = &self.nodes[node];
        *count += 1;

        if lower.is_some_and(|low| n.record.key <= low) || upper.is_some_and(|up| n.record.key >= up) {
            return None;
        }
        for child in [n.left, n.right] {
            if child == self.nil {
                continue;
            }
            let c = &self.nodes[child];
            if c.parent != node || (n.color == Color::Red && c.color == Color::Red) {
                return None;
            }
        }

        let left = self.black_height(n.left, lower, Some(n.record.key), count)?;
        let right = self.black_height(n.right, Some(n.record.key), upper, count)?;
        if left != right {
            return None;
        }
        Some(left + usize::from(n.color == Color::Black))
    }

    fn minimum(&self, mut node: NodeKey) -> NodeKey {
        while self.nodes[node].left != self.nil {
            node = self.nodes[node].left;
        }
        node
    }

    fn color(&self, node: NodeKey) -> Color {
        self.nodes[node].color
    }

    fn parent(&self, node: NodeKey) -> NodeKey {
        self.nodes[node].parent
    }

    /// Puts `new` where `old` hangs under `parent` (or at the root)
    fn replace_child(&mut self, parent: NodeKey, old: NodeKey, new: NodeKey) {
        if parent == self.nil {
            self.root = new;
        } else if self.nodes[parent].left == old {
            self.nodes[parent].left = new;
        } else {
            self.nodes[parent].right = new;
        }
    }

    /// Replaces the subtree at `old` with the subtree at `new`
    fn transplant(&mut self, old: NodeKey, new: NodeKey) {
        let parent = self.nodes[old].parent;
        self.replace_child(parent, old, new);
        self.nodes[new].parent = parent;
    }

    fn rotate_left(&mut self, node: NodeKey) {
        let pivot = self.nodes[node].right;
        let inner = self.nodes[pivot].left;

        self.nodes[node].right = inner;
        if inner != self.nil {
            self.nodes[inner].parent = node;
        }

        let parent = self.nodes[node].parent;
        self.nodes[pivot].parent = parent;
        self.replace_child(parent, node, pivot);

        self.nodes[pivot].left = node;
        self.nodes[node].parent = pivot;
    }

    fn rotate_right(&mut self, node: NodeKey) {
        let pivot = self.nodes[node].left;
        let inner = self.nodes[pivot].right;

        self.nodes[node].left = inner;
        if inner != self.nil {
            self.nodes[inner].parent = node;
        }

        let parent = self.nodes[node].parent;
        self.nodes[pivot].parent = parent;
        self.replace_child(parent, node, pivot);

        self.nodes[pivot].right = node;
        self.nodes[node].parent = pivot;
    }

    /// Restores the red-black invariants after inserting red `node`
    fn balance_after_insert(&mut self, mut node: NodeKey) {
        // The root's parent is the black sentinel, so the loop stops there
        while self.color(self.parent(node)) == Color::Red {
            let parent = self.parent(node);
            let grandparent = self.parent(parent);

            if parent == self.nodes[grandparent].left {
                let uncle = self.nodes[grandparent].right;
                if self.color(uncle) == Color::Red {
                    self.nodes[parent].color = Color::Black;
                    self.nodes[uncle].color = Color::Black;
                    self.nodes[grandparent].color = Color::Red;
                    node = grandparent;
                    continue;
                }
                if node == self.nodes[parent].right {
                    node = parent;
                    self.rotate_left(node);
                }
                let parent = self.parent(node);
                let grandparent = self.parent(parent);
                trace!("insert fix-up: rotate right at {:?}", grandparent);
                self.nodes[parent].color = Color::Black;
                self.nodes[grandparent].color = Color::Red;
                self.rotate_right(grandparent);
            } else {
                let uncle = self.nodes[grandparent].left;
                if self.color(uncle) == Color::Red {
                    self.nodes[parent].color = Color::Black;
                    self.nodes[uncle].color = Color::Black;
                    self.nodes[grandparent].color = Color::Red;
                    node = grandparent;
                    continue;
                }
                if node == self.nodes[parent].left {
                    node = parent;
                    self.rotate_right(node);
                }
                let parent = self.parent(node);
                let grandparent = self.parent(parent);
                trace!("insert fix-up: rotate left at {:?}", grandparent);
                self.nodes[parent].color = Color::Black;
                self.nodes[grandparent].color = Color::Red;
                self.rotate_left(grandparent);
            }
        }

        let root = self.root;
        self.nodes[root].color = Color::Black;
    }

    /// Pushes the extra black carried by `node` up the tree after a delete
    fn balance_after_delete(&mut self, mut node: NodeKey) {
        while node != self.root && self.color(node) == Color::Black {
            let parent = self.parent(node);

            if node == self.nodes[parent].left {
                let mut sibling = self.nodes[parent].right;
                if self.color(sibling) == Color::Red {
                    self.nodes[sibling].color = Color::Black;
                    self.nodes[parent].color = Color::Red;
                    self.rotate_left(parent);
                    sibling = self.nodes[parent].right;
                }

                let near = self.nodes[sibling].left;
                let far = self.nodes[sibling].right;
                if self.color(near) == Color::Black && self.color(far) == Color::Black {
                    self.nodes[sibling].color = Color::Red;
                    node = parent;
                    continue;
                }

                if self.color(far) == Color::Black {
                    self.nodes[near].color = Color::Black;
                    self.nodes[sibling].color = Color::Red;
                    self.rotate_right(sibling);
                    sibling = self.nodes[parent].right;
                }

                trace!("delete fix-up: rotate left at {:?}", parent);
                self.nodes[sibling].color = self.nodes[parent].color;
                self.nodes[parent].color = Color::Black;
                let far = self.nodes[sibling].right;
                self.nodes[far].color = Color::Black;
                self.rotate_left(parent);
                node = self.root;
            } else {
                let mut sibling = self.nodes[parent].left;
                if self.color(sibling) == Color::Red {
                    self.nodes[sibling].color = Color::Black;
                    self.nodes[parent].color = Color::Red;
                    self.rotate_right(parent);
                    sibling = self.nodes[parent].left;
                }

                let near = self.nodes[sibling].right;
                let far = self.nodes[sibling].left;
                if self.color(near) == Color::Black && self.color(far) == Color::Black {
                    self.nodes[sibling].color = Color::Red;
                    node = parent;
                    continue;
                }

                if self.color(far) == Color::Black {
                    self.nodes[near].color = Color::Black;
                    self.nodes[sibling].color = Color::Red;
                    self.rotate_left(sibling);
                    sibling = self.nodes[parent].left;
                }

                trace!("delete fix-up: rotate right at {:?}", parent);
                self.nodes[sibling].color = self.nodes[parent].color;
                self.nodes[parent].color = Color::Black;
                let far = self.nodes[sibling].left;
                self.nodes[far].color = Color::Black;
                self.rotate_right(parent);
                node = self.root;
            }
        }

        self.nodes[node].color = Color::Black;
    }
}

impl Default for RedBlackTree {
    fn default() -> Self {
        Self::new()
    }
}

/// In-order iterator over a [`RedBlackTree`]
pub struct Iter<'a> {
    tree: &'a RedBlackTree,
    stack: NodeStack,
    remaining: usize,
}

impl Iter<'_> {
    fn push_left_spine(&mut self, mut node: NodeKey) {
        while node != self.tree.nil {
            self.stack.push(node);
            node = self.tree.nodes[node].left;
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        let top = self.stack.pop()?;
        let tree = self.tree;
        let node = &tree.nodes[top];
        self.push_left_spine(node.right);
        self.remaining -= 1;
        Some(node.record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a RedBlackTree {
    type Item = Record;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}
