//! Ledger configuration
//!
//! The update policy constants and the preallocation hint. Defaults match the
//! fare rules: a trip that grows past twice its duration is dropped, a smaller
//! overrun costs a surcharge of 10.

use crate::error::LedgerError;

/// Tunables for a [`RideLedger`](crate::ledger::RideLedger)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Added to the cost when an update lengthens a trip without dropping it
    pub surcharge: i64,
    /// An update to more than `cancel_factor × old duration` drops the ride
    pub cancel_factor: i64,
    /// Number of records to preallocate for
    pub capacity: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            surcharge: 10,
            cancel_factor: 2,
            capacity: 0,
        }
    }
}

impl LedgerConfig {
    /// Sets the overrun surcharge
    pub fn with_surcharge(mut self, surcharge: i64) -> Self {
        self.surcharge = surcharge;
        self
    }

    /// Sets the drop threshold multiplier
    pub fn with_cancel_factor(mut self, cancel_factor: i64) -> Self {
        self.cancel_factor = cancel_factor;
        self
    }

    /// Sets the preallocation hint
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Rejects settings the update policy cannot work with
    ///
    /// # Errors
    /// Returns `LedgerError::InvalidConfig` if `cancel_factor < 1` (every
    /// lengthened trip would be dropped before it could be surcharged) or if
    /// `surcharge` is negative.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.cancel_factor < 1 {
            return Err(LedgerError::InvalidConfig("cancel_factor must be at least 1"));
        }
        if self.surcharge < 0 {
            return Err(LedgerError::InvalidConfig("surcharge must not be negative"));
        }
        Ok(())
    }
}
