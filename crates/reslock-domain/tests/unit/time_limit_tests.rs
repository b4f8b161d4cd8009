//! Unit tests for lock value objects

use reslock_domain::value_objects::{LockId, TimeLimit};
use std::time::Duration;

#[test]
fn test_finite_limit_maps_to_ttl() {
    let limit = TimeLimit::from(Duration::from_secs(300));
    assert_eq!(limit.to_ttl().unwrap(), Some(Duration::from_secs(300)));
    assert!(!limit.is_infinite());
}

#[test]
fn test_infinite_limit_has_no_duration() {
    assert_eq!(TimeLimit::Infinite.as_duration(), None);
    assert!(TimeLimit::Infinite.is_infinite());
}

#[test]
fn test_zero_lifetime_is_invalid() {
    assert!(TimeLimit::Finite(Duration::ZERO).to_ttl().is_err());
}

#[test]
fn test_lock_id_round_trips_through_display() {
    let id = LockId::generate();
    let copy = LockId::from_string(id.to_string());
    assert_eq!(id, copy);
}
