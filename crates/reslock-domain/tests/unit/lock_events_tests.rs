//! Unit tests for lock events

use reslock_domain::events::LockEvent;

#[test]
fn test_released_constructor() {
    let event = LockEvent::released("job:42", "abc");
    assert_eq!(
        event,
        LockEvent::LockReleased {
            resource: "job:42".to_string(),
            lock_id: "abc".to_string(),
        }
    );
    assert_eq!(event.resource(), "job:42");
}

#[test]
fn test_json_shape_is_stable() {
    let event = LockEvent::released("job:42", "abc");
    let json = serde_json::to_string(&event).unwrap();
    assert_eq!(json, r#"{"LockReleased":{"resource":"job:42","lock_id":"abc"}}"#);

    let back: LockEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}
