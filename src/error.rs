//! Error type for ledger operations
//!
//! Only conditions the caller must react to are errors. A missing key on
//! `cancel`, `update` or `lookup`, and an empty queue on `extract_min`, are
//! ordinary results and are reported through `Option` or
//! [`UpdateOutcome`](crate::ledger::UpdateOutcome) instead.

use std::fmt;

/// Error type for ledger operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    /// A record with this key is already live in the ledger
    DuplicateKey(i64),
    /// A [`LedgerConfig`](crate::config::LedgerConfig) field is out of range
    InvalidConfig(&'static str),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::DuplicateKey(key) => {
                write!(f, "duplicate key {key}: a record with this key is already live")
            }
            LedgerError::InvalidConfig(reason) => {
                write!(f, "invalid ledger configuration: {reason}")
            }
        }
    }
}

impl std::error::Error for LedgerError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_key() {
        let err = LedgerError::DuplicateKey(42);
        assert_eq!(
            err.to_string(),
            "duplicate key 42: a record with this key is already live"
        );
    }

    #[test]
    fn test_usable_as_boxed_error() {
        let err: Box<dyn std::error::Error> =
            Box::new(LedgerError::InvalidConfig("cancel_factor must be at least 1"));
        assert!(err.to_string().contains("cancel_factor"));
    }
}
