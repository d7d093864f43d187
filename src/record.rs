//! Ride records and their composite priority
//!
//! A [`Record`] is the unit stored in the ledger: a unique `key`, a `cost`
//! and a `duration`. The key orders the red-black index; the
//! [`Priority`] pair `(cost, duration)` orders the binary heap.

use std::cmp::Ordering;

/// One ride request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Record {
    /// Unique ride number, immutable once inserted
    pub key: i64,
    /// Fare cost, the primary priority component
    pub cost: i64,
    /// Trip duration, breaks ties between equal costs
    pub duration: i64,
}

impl Record {
    /// Creates a record from its three fields
    pub const fn new(key: i64, cost: i64, duration: i64) -> Self {
        Self {
            key,
            cost,
            duration,
        }
    }

    /// Returns the heap ordering value of this record
    #[inline]
    pub const fn priority(&self) -> Priority {
        Priority {
            cost: self.cost,
            duration: self.duration,
        }
    }
}

impl From<(i64, i64, i64)> for Record {
    fn from((key, cost, duration): (i64, i64, i64)) -> Self {
        Self::new(key, cost, duration)
    }
}

impl From<Record> for (i64, i64, i64) {
    fn from(record: Record) -> Self {
        (record.key, record.cost, record.duration)
    }
}

/// Composite heap priority: lower cost wins, ties go to the lower duration
///
/// Two records with equal priorities are interchangeable for ordering
/// purposes; there is no further tiebreak on the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Priority {
    /// Fare cost
    pub cost: i64,
    /// Trip duration
    pub duration: i64,
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.cost.cmp(&other.cost) {
            Ordering::Equal => self.duration.cmp(&other.duration),
            other => other,
        }
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
