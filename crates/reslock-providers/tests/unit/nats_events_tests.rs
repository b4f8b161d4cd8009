//! Tests for the NATS event bus
//!
//! Require a NATS server at `NATS_URL` (default `nats://localhost:4222`).

use futures::StreamExt;
use reslock_domain::events::LockEvent;
use reslock_domain::ports::EventBusProvider;
use reslock_providers::events::NatsEventBusProvider;
use std::time::Duration;

#[tokio::test]
#[ignore = "requires a running NATS server"]
async fn test_round_trip_through_nats() {
    let url = std::env::var("NATS_URL").unwrap_or_else(|_| "nats://localhost:4222".to_string());
    let bus = NatsEventBusProvider::with_options(&url, "reslock.test.events", Some("reslock-test"))
        .await
        .unwrap();

    let mut stream = bus.subscribe_events().await.unwrap();
    assert!(format!("{bus:?}").contains("subscribers: 1"));

    bus.publish_event(LockEvent::released("job:42", "abc"))
        .await
        .unwrap();
    let event = tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await
        .unwrap();
    assert_eq!(event, Some(LockEvent::released("job:42", "abc")));

    drop(stream);
    assert!(format!("{bus:?}").contains("subscribers: 0"));
}
