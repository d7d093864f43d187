//! Scenario tests for the ride ledger
//!
//! Each test drives the public API the way a command dispatcher would and
//! checks both the observable results and the cross-link invariants.

use ride_ledger::{LedgerError, Record, RideLedger, UpdateOutcome};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn ledger_with(records: &[(i64, i64, i64)]) -> RideLedger {
    let mut ledger = RideLedger::new();
    for &(key, cost, duration) in records {
        ledger.insert(key, cost, duration).unwrap();
    }
    ledger
}

#[test]
fn test_extract_min_then_lookup() {
    init_logging();
    let mut ledger = ledger_with(&[(5, 10, 20), (3, 8, 25)]);

    assert_eq!(ledger.extract_min(), Some(Record::new(3, 8, 25)));
    assert_eq!(ledger.lookup(3), None);
    assert_eq!(ledger.lookup(5), Some(Record::new(5, 10, 20)));
    assert!(ledger.verify_invariants());
}

#[test]
fn test_update_past_twice_duration_drops_ride() {
    init_logging();
    let mut ledger = ledger_with(&[(1, 5, 10)]);

    assert_eq!(
        ledger.update(1, 21),
        UpdateOutcome::Dropped(Record::new(1, 5, 10))
    );
    assert_eq!(ledger.lookup(1), None);
    assert!(ledger.is_empty());
}

#[test]
fn test_update_moderate_overrun_adds_surcharge() {
    init_logging();
    let mut ledger = ledger_with(&[(1, 5, 10)]);

    ledger.update(1, 15);
    assert_eq!(ledger.lookup(1), Some(Record::new(1, 15, 15)));
    assert!(ledger.verify_invariants());
}

#[test]
fn test_update_shorter_trip_keeps_cost() {
    init_logging();
    let mut ledger = ledger_with(&[(1, 5, 10)]);

    ledger.update(1, 8);
    assert_eq!(ledger.lookup(1), Some(Record::new(1, 5, 8)));
}

#[test]
fn test_update_equal_duration_keeps_cost() {
    let mut ledger = ledger_with(&[(1, 5, 10)]);
    assert_eq!(
        ledger.update(1, 10),
        UpdateOutcome::Rescheduled(Record::new(1, 5, 10))
    );
}

#[test]
fn test_duplicate_insert_is_rejected() {
    init_logging();
    let mut ledger = ledger_with(&[(2, 50, 5)]);

    assert_eq!(ledger.insert(2, 1, 1), Err(LedgerError::DuplicateKey(2)));
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.lookup(2), Some(Record::new(2, 50, 5)));
    assert_eq!(ledger.extract_min(), Some(Record::new(2, 50, 5)));
    assert_eq!(ledger.extract_min(), None);
}

#[test]
fn test_absent_keys_leave_ledger_unchanged() {
    let mut ledger = ledger_with(&[(1, 1, 1), (2, 2, 2)]);
    let before: Vec<Record> = ledger.iter().collect();

    assert_eq!(ledger.cancel(3), None);
    assert_eq!(ledger.update(3, 100), UpdateOutcome::Absent);
    assert_eq!(ledger.lookup(3), None);

    let after: Vec<Record> = ledger.iter().collect();
    assert_eq!(before, after);
    assert_eq!(ledger.peek_min(), Some(Record::new(1, 1, 1)));
    assert!(ledger.verify_invariants());
}

#[test]
fn test_range_lookup_ascending() {
    let ledger = ledger_with(&[
        (25, 1, 1),
        (10, 9, 9),
        (40, 2, 2),
        (5, 7, 7),
        (30, 3, 3),
        (15, 8, 8),
    ]);

    let keys: Vec<i64> = ledger.range_lookup(10, 30).iter().map(|r| r.key).collect();
    assert_eq!(keys, vec![10, 15, 25, 30]);

    assert!(ledger.range_lookup(30, 10).is_empty());
    assert!(ledger.range_lookup(41, 1000).is_empty());
    assert!(ledger.range_lookup(16, 24).is_empty());
    assert_eq!(ledger.range_lookup(5, 5), vec![Record::new(5, 7, 7)]);
}

#[test]
fn test_ties_on_cost_broken_by_duration() {
    let mut ledger = ledger_with(&[(1, 10, 30), (2, 10, 20), (3, 10, 25), (4, 11, 1)]);

    let order: Vec<i64> = std::iter::from_fn(|| ledger.extract_min().map(|r| r.key)).collect();
    assert_eq!(order, vec![2, 3, 1, 4]);
}

#[test]
fn test_equal_priorities_are_distinct_records() {
    let mut ledger = ledger_with(&[(1, 5, 5), (2, 5, 5), (3, 5, 5)]);

    let mut keys: Vec<i64> = std::iter::from_fn(|| ledger.extract_min().map(|r| r.key)).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec![1, 2, 3]);
}

#[test]
fn test_reinsert_after_cancel() {
    let mut ledger = ledger_with(&[(1, 5, 10)]);
    ledger.cancel(1);
    assert!(ledger.insert(1, 6, 11).is_ok());
    assert_eq!(ledger.lookup(1), Some(Record::new(1, 6, 11)));
    assert!(ledger.verify_invariants());
}

#[test]
fn test_update_moves_record_in_priority_order() {
    let mut ledger = ledger_with(&[(1, 10, 10), (2, 15, 5), (3, 20, 5)]);

    // Surcharge pushes ride 1 from cheapest to behind ride 2
    ledger.update(1, 12);
    assert_eq!(ledger.peek_min(), Some(Record::new(2, 15, 5)));

    let order: Vec<i64> = std::iter::from_fn(|| ledger.extract_min().map(|r| r.key)).collect();
    assert_eq!(order, vec![2, 3, 1]);
}

#[test]
fn test_negative_values() {
    let mut ledger = ledger_with(&[(-5, -10, 3), (0, 0, 0), (5, -20, 1)]);

    assert_eq!(ledger.range_lookup(-10, 0).len(), 2);
    assert_eq!(ledger.extract_min(), Some(Record::new(5, -20, 1)));
    assert_eq!(ledger.extract_min(), Some(Record::new(-5, -10, 3)));
    assert!(ledger.verify_invariants());
}

#[test]
fn test_mixed_command_sequence() {
    init_logging();
    let mut ledger = RideLedger::new();

    ledger.insert(25, 98, 46).unwrap();
    ledger.insert(42, 17, 89).unwrap();
    ledger.insert(9, 76, 31).unwrap();
    ledger.insert(53, 97, 22).unwrap();
    assert_eq!(ledger.extract_min(), Some(Record::new(42, 17, 89)));

    ledger.insert(68, 40, 51).unwrap();
    assert_eq!(ledger.extract_min(), Some(Record::new(68, 40, 51)));
    assert_eq!(
        ledger.range_lookup(1, 100),
        vec![
            Record::new(9, 76, 31),
            Record::new(25, 98, 46),
            Record::new(53, 97, 22),
        ]
    );

    ledger.update(53, 15);
    ledger.insert(96, 28, 82).unwrap();
    ledger.insert(73, 28, 56).unwrap();
    ledger.update(9, 88);
    assert_eq!(ledger.extract_min(), Some(Record::new(73, 28, 56)));
    assert_eq!(ledger.lookup(9), None);

    ledger.insert(20, 49, 59).unwrap();
    ledger.insert(62, 7, 10).unwrap();
    ledger.cancel(20);
    ledger.insert(17, 46, 76).unwrap();
    ledger.update(62, 15);
    assert_eq!(ledger.extract_min(), Some(Record::new(62, 17, 15)));
    assert_eq!(ledger.extract_min(), Some(Record::new(96, 28, 82)));

    assert_eq!(
        ledger.iter().collect::<Vec<_>>(),
        vec![
            Record::new(17, 46, 76),
            Record::new(25, 98, 46),
            Record::new(53, 97, 15),
        ]
    );
    assert!(ledger.verify_invariants());
}
