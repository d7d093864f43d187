//! Dual-indexed ride ledger
//!
//! [`RideLedger`] owns a [`RedBlackTree`] keyed by ride number and an
//! [`IndexedBinaryHeap`] ordered by `(cost, duration)`, and keeps each
//! record's two representations cross-linked:
//!
//! ```text
//! tree node ──heap_handle──▶ heap slot
//!     ▲                          │
//!     └────────key_handle────────┘
//! ```
//!
//! A record found through either index is removed from the other in
//! O(log n) by following its cross-handle; no second search is needed.
//!
//! # Time Complexity
//!
//! | Operation      | Complexity   |
//! |----------------|--------------|
//! | `insert`       | O(log n)     |
//! | `cancel`       | O(log n)     |
//! | `extract_min`  | O(log n)     |
//! | `update`       | O(log n)     |
//! | `lookup`       | O(log n)     |
//! | `range_lookup` | O(log n + m) |
//! | `peek_min`     | O(1)         |
//!
//! # Example
//!
//! ```rust
//! use ride_ledger::{Record, RideLedger};
//!
//! let mut ledger = RideLedger::new();
//! ledger.insert(5, 10, 20).unwrap();
//! ledger.insert(3, 8, 25).unwrap();
//!
//! assert_eq!(ledger.extract_min(), Some(Record::new(3, 8, 25)));
//! assert_eq!(ledger.lookup(3), None);
//! assert_eq!(ledger.lookup(5), Some(Record::new(5, 10, 20)));
//! ```

use crate::binary_heap::IndexedBinaryHeap;
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::rbtree::{self, RedBlackTree};
use crate::record::Record;
use crate::storage::NodeKey;
use log::{debug, warn};

/// Which branch of the update policy ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// No record with that key; nothing changed
    Absent,
    /// The new duration exceeded the drop threshold; holds the removed record
    Dropped(Record),
    /// The trip grew within the threshold; holds the surcharged record
    Surcharged(Record),
    /// The trip did not grow; holds the record with its new duration
    Rescheduled(Record),
}

/// Ride records indexed by key and by `(cost, duration)` priority
#[derive(Debug, Clone)]
pub struct RideLedger {
    tree: RedBlackTree,
    heap: IndexedBinaryHeap,
    config: LedgerConfig,
}

impl RideLedger {
    /// Creates an empty ledger with the default fare rules
    pub fn new() -> Self {
        Self::build(LedgerConfig::default())
    }

    /// Creates an empty ledger with room for `capacity` records
    pub fn with_capacity(capacity: usize) -> Self {
        Self::build(LedgerConfig::default().with_capacity(capacity))
    }

    /// Creates an empty ledger with custom fare rules
    ///
    /// # Errors
    /// Returns `LedgerError::InvalidConfig` if the configuration is rejected
    /// by [`LedgerConfig::validate`].
    pub fn with_config(config: LedgerConfig) -> Result<Self, LedgerError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: LedgerConfig) -> Self {
        Self {
            tree: RedBlackTree::with_capacity(config.capacity),
            heap: IndexedBinaryHeap::with_capacity(config.capacity),
            config,
        }
    }

    /// The fare rules in effect
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns true if no records are live
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns true if a record with `key` is live
    pub fn contains(&self, key: i64) -> bool {
        self.tree.search(key).is_some()
    }

    /// Adds a new record
    ///
    /// # Errors
    /// Returns `LedgerError::DuplicateKey` if `key` is already live; the
    /// ledger is left untouched.
    pub fn insert(&mut self, key: i64, cost: i64, duration: i64) -> Result<(), LedgerError> {
        if self.tree.search(key).is_some() {
            warn!("rejecting duplicate ride {}", key);
            return Err(LedgerError::DuplicateKey(key));
        }
        self.link(Record::new(key, cost, duration));
        debug!("inserted ride ({}, {}, {})", key, cost, duration);
        self.check_invariants();
        Ok(())
    }

    /// Removes the record with `key`, returning it
    ///
    /// A missing key is not an error: the ledger is unchanged and `None` is
    /// returned.
    pub fn cancel(&mut self, key: i64) -> Option<Record> {
        let node = self.tree.search(key)?;
        let record = self.unlink(node);
        debug!("cancelled ride {}", key);
        self.check_invariants();
        record
    }

    /// Removes and returns the record with the lowest `(cost, duration)`
    ///
    /// Returns `None` when there are no active records.
    pub fn extract_min(&mut self) -> Option<Record> {
        let Some(slot) = self.heap.extract_min() else {
            debug!("no active ride requests");
            return None;
        };
        self.tree.delete_node(slot.key_handle());
        debug!("extracted ride {}", slot.record().key);
        self.check_invariants();
        Some(slot.record())
    }

    /// The record `extract_min` would return, left in place
    pub fn peek_min(&self) -> Option<Record> {
        self.heap.peek_min().map(|slot| slot.record())
    }

    /// The record with `key`, if live
    pub fn lookup(&self, key: i64) -> Option<Record> {
        self.tree.search(key).and_then(|node| self.tree.record(node))
    }

    /// Records with `low <= key <= high`, ascending by key
    ///
    /// Empty when `low > high` or nothing lies in range.
    pub fn range_lookup(&self, low: i64, high: i64) -> Vec<Record> {
        self.tree.range(low, high)
    }

    /// Changes the duration of the record with `key`
    ///
    /// The record is always removed and, unless dropped, reinserted; cost and
    /// duration are never edited in place.
    ///
    /// - `new_duration > cancel_factor × old`: dropped.
    /// - `old < new_duration <= cancel_factor × old`: reinserted with
    ///   `cost + surcharge`.
    /// - `new_duration <= old`: reinserted with the same cost.
    pub fn update(&mut self, key: i64, new_duration: i64) -> UpdateOutcome {
        let Some(node) = self.tree.search(key) else {
            return UpdateOutcome::Absent;
        };
        let Some(old) = self.unlink(node) else {
            return UpdateOutcome::Absent;
        };

        let limit = old.duration.saturating_mul(self.config.cancel_factor);
        let outcome = if new_duration > limit {
            UpdateOutcome::Dropped(old)
        } else if new_duration > old.duration {
            let record = Record::new(key, old.cost.saturating_add(self.config.surcharge), new_duration);
            self.link(record);
            UpdateOutcome::Surcharged(record)
        } else {
            let record = Record::new(key, old.cost, new_duration);
            self.link(record);
            UpdateOutcome::Rescheduled(record)
        };

        debug!("updated ride {}: {:?}", key, outcome);
        self.check_invariants();
        outcome
    }

    /// All live records, ascending by key
    pub fn iter(&self) -> rbtree::Iter<'_> {
        self.tree.iter()
    }

    /// Removes every record
    pub fn clear(&mut self) {
        self.tree.clear();
        self.heap.clear();
    }

    /// Checks both structures and the cross-links between them
    ///
    /// True when the tree is a valid red-black tree, the heap is heap-ordered
    /// with correct positions, both hold the same number of records, and for
    /// every record the tree node and heap slot point at each other and hold
    /// the same `(key, cost, duration)`.
    pub fn verify_invariants(&self) -> bool {
        if !self.tree.verify_structure() || !self.heap.verify_heap_order() {
            return false;
        }
        if self.tree.len() != self.heap.len() {
            return false;
        }

        let nodes_linked = self.tree.nodes().all(|(node, tree_node)| {
            self.heap
                .get(tree_node.heap_handle())
                .is_some_and(|slot| slot.key_handle() == node && slot.record() == tree_node.record())
        });
        let slots_linked = self.heap.slots().all(|(slot, heap_slot)| {
            self.tree.heap_handle(heap_slot.key_handle()) == Some(slot)
        });
        nodes_linked && slots_linked
    }

    /// Inserts `record` into both structures and cross-links them
    fn link(&mut self, record: Record) -> NodeKey {
        let node = self.tree.insert(record);
        let slot = self.heap.insert(record, node);
        self.tree.set_heap_handle(node, slot);
        node
    }

    /// Removes the record at tree `node` from both structures
    fn unlink(&mut self, node: NodeKey) -> Option<Record> {
        // Read the cross-handle before either structure changes
        let slot = self.tree.heap_handle(node)?;
        self.heap.remove(slot);
        self.tree.delete_node(node).map(|removed| removed.record())
    }

    #[inline]
    fn check_invariants(&self) {
        if cfg!(feature = "strict-invariants") {
            assert!(self.verify_invariants(), "ledger invariants violated");
        }
    }
}

impl Default for RideLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a RideLedger {
    type Item = Record;
    type IntoIter = rbtree::Iter<'a>;

    fn into_iter(self) -> rbtree::Iter<'a> {
        self.iter()
    }
}
