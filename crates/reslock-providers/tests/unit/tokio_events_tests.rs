//! Tests for the tokio broadcast event bus

use futures::StreamExt;
use reslock_domain::events::LockEvent;
use reslock_domain::ports::EventBusProvider;
use reslock_providers::events::{NullEventBusProvider, TokioEventBusProvider};

#[tokio::test]
async fn test_subscribers_receive_published_events() {
    let bus = TokioEventBusProvider::new();
    assert_eq!(bus.subscriber_count(), 0);

    let mut first = bus.subscribe_events().await.unwrap();
    let mut second = bus.subscribe_events().await.unwrap();
    assert_eq!(bus.subscriber_count(), 2);

    bus.publish_event(LockEvent::released("job:42", "abc"))
        .await
        .unwrap();

    assert_eq!(first.next().await, Some(LockEvent::released("job:42", "abc")));
    assert_eq!(second.next().await, Some(LockEvent::released("job:42", "abc")));
}

#[tokio::test]
async fn test_publish_without_subscribers_succeeds() {
    let bus = TokioEventBusProvider::with_capacity(4);
    bus.publish_event(LockEvent::released("r", "id")).await.unwrap();
}

#[tokio::test]
async fn test_lagged_subscriber_skips_to_newest_events() {
    let bus = TokioEventBusProvider::with_capacity(2);
    let mut stream = bus.subscribe_events().await.unwrap();
    for i in 0..5 {
        bus.publish_event(LockEvent::released(format!("r{i}"), "id"))
            .await
            .unwrap();
    }
    let next = stream.next().await.unwrap();
    assert_eq!(next.resource(), "r3");
}

#[tokio::test]
async fn test_null_bus_stream_is_empty() {
    let bus = NullEventBusProvider::new();
    bus.publish_event(LockEvent::released("r", "id")).await.unwrap();
    let mut stream = bus.subscribe_events().await.unwrap();
    assert!(stream.next().await.is_none());
}
