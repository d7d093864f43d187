//! Arena storage for tree nodes and heap slots
//!
//! Both halves of the ledger keep their elements in a [`SlotMap`] and refer to
//! each other through the keys defined here instead of through references:
//!
//! - [`NodeKey`]: a red-black tree node. Parent/child links inside the tree and
//!   the heap slot's back-reference are `NodeKey`s.
//! - [`SlotKey`]: a heap slot. The tree node's cross-handle is a `SlotKey`.
//!
//! # Why keys, not pointers
//!
//! The tree needs parent back-references, which form ownership cycles, and heap
//! slots move inside the heap array on every swap. A `SlotKey` names the slot,
//! not its array index, so a swap only rewrites the slot's `position` field and
//! every cross-handle stays valid.
//!
//! Keys are generational: once a node or slot is removed, its old key never
//! resolves again, even if the arena reuses the storage cell.
//!
//! # Example
//!
//! ```rust
//! use ride_ledger::storage::{Arena, NodeKey};
//!
//! let mut arena: Arena<NodeKey, &str> = Arena::with_key();
//! let key = arena.insert("node");
//! assert_eq!(arena[key], "node");
//!
//! arena.remove(key);
//! assert!(arena.get(key).is_none());
//! ```

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Arena key of a red-black tree node
    pub struct NodeKey;

    /// Arena key of a binary heap slot
    pub struct SlotKey;
}

/// Generational arena used for nodes and slots
pub type Arena<K, N> = SlotMap<K, N>;
