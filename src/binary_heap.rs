//! Indexed binary min-heap
//!
//! An array-backed binary min-heap ordered by [`Priority`] whose slots know
//! their own array position. The position lets the ledger delete a slot it
//! reached through the red-black tree without scanning the array.
//!
//! Slots live in an [`Arena`] and the heap array holds their [`SlotKey`]s.
//! Index 0 of the array is a guard and never holds a slot, so the root is at
//! position 1 and the children of position `i` are `2i` and `2i + 1`.
//!
//! # Time Complexity
//!
//! | Operation     | Complexity |
//! |---------------|------------|
//! | `insert`      | O(log n)   |
//! | `peek_min`    | O(1)       |
//! | `extract_min` | O(log n)   |
//! | `delete_at`   | O(log n)   |
//!
//! # Example
//!
//! ```rust
//! use ride_ledger::binary_heap::IndexedBinaryHeap;
//! use ride_ledger::storage::NodeKey;
//! use ride_ledger::Record;
//!
//! let mut heap = IndexedBinaryHeap::new();
//! heap.insert(Record::new(1, 30, 5), NodeKey::default());
//! let slot = heap.insert(Record::new(2, 10, 5), NodeKey::default());
//! heap.insert(Record::new(3, 20, 5), NodeKey::default());
//!
//! assert_eq!(heap.position(slot), Some(1));
//! assert_eq!(heap.extract_min().map(|s| s.record().key), Some(2));
//! assert_eq!(heap.extract_min().map(|s| s.record().key), Some(3));
//! ```

use crate::record::{Priority, Record};
use crate::storage::{Arena, NodeKey, SlotKey};
use log::trace;
use slotmap::Key;
use std::cmp::Ordering;

/// A heap slot and its cross-handle into the key index
#[derive(Debug, Clone)]
pub struct HeapSlot {
    record: Record,
    /// 1-based array index; 0 once the slot has left the heap
    position: usize,
    key_handle: NodeKey,
}

impl HeapSlot {
    /// The record held by this slot
    pub fn record(&self) -> Record {
        self.record
    }

    /// Current array position, 0 if detached
    pub fn position(&self) -> usize {
        self.position
    }

    /// The tree node holding the same record
    pub fn key_handle(&self) -> NodeKey {
        self.key_handle
    }
}

/// Binary min-heap over [`HeapSlot`]s with positional delete
#[derive(Debug, Clone)]
pub struct IndexedBinaryHeap {
    slots: Arena<SlotKey, HeapSlot>,
    /// `order[0]` is the guard; `order[1..]` is heap-ordered
    order: Vec<SlotKey>,
}

impl IndexedBinaryHeap {
    /// Creates an empty heap
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty heap with room for `capacity` slots
    pub fn with_capacity(capacity: usize) -> Self {
        let mut order = Vec::with_capacity(capacity + 1);
        order.push(SlotKey::null());
        Self {
            slots: Arena::with_capacity_and_key(capacity),
            order,
        }
    }

    /// Returns the number of slots in the heap
    pub fn len(&self) -> usize {
        self.order.len() - 1
    }

    /// Returns true if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the live slot behind `slot`
    pub fn get(&self, slot: SlotKey) -> Option<&HeapSlot> {
        self.slots.get(slot)
    }

    /// Current array position of `slot`
    pub fn position(&self, slot: SlotKey) -> Option<usize> {
        self.slots.get(slot).map(HeapSlot::position)
    }

    /// Points `slot` back at its tree node; returns false for a stale slot
    pub fn set_key_handle(&mut self, slot: SlotKey, node: NodeKey) -> bool {
        match self.slots.get_mut(slot) {
            Some(s) => {
                s.key_handle = node;
                true
            }
            None => false,
        }
    }

    /// Appends a slot for `record` and sifts it up
    pub fn insert(&mut self, record: Record, key_handle: NodeKey) -> SlotKey {
        let position = self.order.len();
        let slot = self.slots.insert(HeapSlot {
            record,
            position,
            key_handle,
        });
        self.order.push(slot);
        self.sift_up(position);
        slot
    }

    /// The slot with the lowest priority
    pub fn peek_min(&self) -> Option<&HeapSlot> {
        let root = *self.order.get(1)?;
        self.slots.get(root)
    }

    /// Removes and returns the slot with the lowest priority
    ///
    /// Returns `None` on an empty heap.
    pub fn extract_min(&mut self) -> Option<HeapSlot> {
        let last = self.len();
        if last == 0 {
            return None;
        }

        self.swap(1, last);
        let root = self.order.pop()?;
        if last > 1 {
            self.sift_down(1);
        }
        self.detach(root)
    }

    /// Removes the slot at array `position`
    ///
    /// The last slot fills the hole and moves in the single direction its
    /// priority requires: up if it beats the removed one, down if it is worse,
    /// nowhere if they tie. Returns `None` if `position` is out of range.
    pub fn delete_at(&mut self, position: usize) -> Option<HeapSlot> {
        let last = self.len();
        if position == 0 || position > last {
            return None;
        }

        let removed_priority = self.priority_at(position);
        self.swap(position, last);
        let removed = self.order.pop()?;

        if position < last {
            match self.priority_at(position).cmp(&removed_priority) {
                Ordering::Less => self.sift_up(position),
                Ordering::Greater => self.sift_down(position),
                Ordering::Equal => {}
            }
        }
        self.detach(removed)
    }

    /// Removes `slot` wherever it currently sits
    pub fn remove(&mut self, slot: SlotKey) -> Option<HeapSlot> {
        let position = self.slots.get(slot)?.position;
        self.delete_at(position)
    }

    /// Slots in array order, root first
    pub fn iter(&self) -> impl Iterator<Item = &HeapSlot> + '_ {
        self.order[1..].iter().map(|&slot| &self.slots[slot])
    }

    /// Removes every slot
    pub fn clear(&mut self) {
        self.slots.clear();
        self.order.truncate(1);
    }

    /// Checks heap order and that every slot's `position` matches the array
    pub fn verify_heap_order(&self) -> bool {
        if self.order.first() != Some(&SlotKey::null()) || self.slots.len() != self.len() {
            return false;
        }
        for position in 1..self.order.len() {
            match self.slots.get(self.order[position]) {
                Some(slot) if slot.position == position => {}
                _ => return false,
            }
            if position > 1 && self.priority_at(position) < self.priority_at(position / 2) {
                return false;
            }
        }
        true
    }

    /// Slots with their keys, in arena order
    pub(crate) fn slots(&self) -> impl Iterator<Item = (SlotKey, &HeapSlot)> + '_ {
        self.slots.iter()
    }

    fn detach(&mut self, slot: SlotKey) -> Option<HeapSlot> {
        let mut removed = self.slots.remove(slot)?;
        removed.position = 0;
        Some(removed)
    }

    #[inline]
    fn priority_at(&self, position: usize) -> Priority {
        self.slots[self.order[position]].record.priority()
    }

    /// Swaps two array positions and rewrites both slots' `position`
    fn swap(&mut self, a: usize, b: usize) {
        self.order.swap(a, b);
        let (slot_a, slot_b) = (self.order[a], self.order[b]);
        self.slots[slot_a].position = a;
        self.slots[slot_b].position = b;
    }

    /// Move the slot at `position` up while it beats its parent
    fn sift_up(&mut self, mut position: usize) {
        while position > 1 {
            let parent = position / 2;
            if self.priority_at(position) < self.priority_at(parent) {
                self.swap(position, parent);
                position = parent;
            } else {
                break;
            }
        }
        trace!("sift_up settled at {}", position);
    }

    /// Move the slot at `position` down while its better child beats it
    fn sift_down(&mut self, mut position: usize) {
        let len = self.len();
        while 2 * position <= len {
            let left = 2 * position;
            let right = left + 1;
            let child = if right <= len && self.priority_at(right) < self.priority_at(left) {
                right
            } else {
                left
            };

            if self.priority_at(child) < self.priority_at(position) {
                self.swap(position, child);
                position = child;
            } else {
                break;
            }
        }
        trace!("sift_down settled at {}", position);
    }
}

impl Default for IndexedBinaryHeap {
    fn default() -> Self {
        Self::new()
    }
}
