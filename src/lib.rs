//! Dual-Indexed Ride Ledger
//!
//! This crate keeps a collection of ride requests searchable two ways at once,
//! each in logarithmic time:
//!
//! - by **ride number**, for exact lookup and ascending range queries, through
//!   a red-black tree ([`rbtree::RedBlackTree`]);
//! - by **priority** `(cost, duration)`, for taking the cheapest ride next,
//!   through an indexed binary min-heap ([`binary_heap::IndexedBinaryHeap`]).
//!
//! Every record owns one tree node and one heap slot that hold arena keys to
//! each other, so a record reached through either index is removed from the
//! other in O(log n) without searching again.
//!
//! # Features
//!
//! - **Red-black key index**: O(log n) search/insert/delete, O(log n + m) range
//! - **Indexed binary heap**: O(log n) insert, extract-min and delete-at-position
//! - **Ride ledger**: cross-linked insert, cancel, extract-min and policy-driven update
//!
//! # Example
//!
//! ```rust
//! use ride_ledger::{Record, RideLedger, UpdateOutcome};
//!
//! let mut ledger = RideLedger::new();
//! ledger.insert(1, 5, 10).unwrap();
//! ledger.insert(2, 3, 40).unwrap();
//!
//! // 15 > 10 but within twice the old duration: cost goes up by 10
//! assert_eq!(ledger.update(1, 15), UpdateOutcome::Surcharged(Record::new(1, 15, 15)));
//!
//! assert_eq!(ledger.range_lookup(0, 5).len(), 2);
//! assert_eq!(ledger.extract_min(), Some(Record::new(2, 3, 40)));
//! ```
//!
//! # Cargo features
//!
//! - `strict-invariants`: re-verify every structural invariant after each
//!   mutating ledger operation.

pub mod binary_heap;
pub mod config;
pub mod error;
pub mod ledger;
pub mod rbtree;
pub mod record;
pub mod storage;

// Re-export the main types for convenience
pub use config::LedgerConfig;
pub use error::LedgerError;
pub use ledger::{RideLedger, UpdateOutcome};
pub use record::{Priority, Record};
