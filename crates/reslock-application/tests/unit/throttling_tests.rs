//! Fixed-window throttling

use crate::common::{FailingStorage, TokioClock};
use reslock_application::{AcquireOptions, LockProvider, ThrottlingLockProvider, ThrottlingOptions};
use reslock_domain::value_objects::TimeLimit;
use reslock_providers::storage::MemoryLockStorage;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::Barrier;
use tokio::time::Instant;

/// Start of a one-second window in Unix milliseconds
const WINDOW_START_MS: i64 = 1_700_000_000_000;

fn throttle(max_hits: u64, period: Duration) -> ThrottlingLockProvider {
    ThrottlingLockProvider::with_clock(
        Arc::new(MemoryLockStorage::new()),
        Arc::new(TokioClock::starting_at(WINDOW_START_MS)),
        ThrottlingOptions {
            max_hits_per_period: max_hits,
            period,
            ..ThrottlingOptions::default()
        },
    )
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_two_per_second_blocks_third_until_next_window() {
    let provider = throttle(2, Duration::from_secs(1));

    for _ in 0..2 {
        assert!(
            provider
                .try_acquire("api", AcquireOptions::no_wait())
                .await
                .unwrap()
                .is_some()
        );
    }
    assert!(
        provider
            .try_acquire("api", AcquireOptions::no_wait())
            .await
            .unwrap()
            .is_none()
    );
    assert!(provider.is_locked("api").await.unwrap());

    let started = Instant::now();
    let third = provider
        .try_acquire("api", AcquireOptions::new())
        .await
        .unwrap();
    assert!(third.is_some());
    let waited = started.elapsed();
    assert!(waited >= Duration::from_secs(1), "waited {waited:?}");
    assert!(waited < Duration::from_millis(1100), "waited {waited:?}");

    assert_eq!(provider.current_hits("api").await.unwrap(), 1);
    assert!(!provider.is_locked("api").await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_exactly_max_hits_per_window() {
    let provider = throttle(5, Duration::from_secs(60));
    let mut granted = 0;
    for _ in 0..8 {
        if provider
            .try_acquire("api", AcquireOptions::no_wait())
            .await
            .unwrap()
            .is_some()
        {
            granted += 1;
        }
    }
    assert_eq!(granted, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_share_the_window_limit() {
    let provider = throttle(3, Duration::from_secs(3600));
    let barrier = Arc::new(Barrier::new(10));

    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let provider = provider.clone();
            let barrier = Arc::clone(&barrier);
            tokio::spawn(async move {
                barrier.wait().await;
                provider
                    .try_acquire("api", AcquireOptions::no_wait())
                    .await
                    .unwrap()
                    .is_some()
            })
        })
        .collect();

    let mut granted = 0;
    for task in tasks {
        if task.await.unwrap() {
            granted += 1;
        }
    }
    assert_eq!(granted, 3);
    assert!(provider.current_hits("api").await.unwrap() >= 3);
    assert!(provider.is_locked("api").await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_resources_are_throttled_independently() {
    let provider = throttle(1, Duration::from_secs(60));
    let options = AcquireOptions::no_wait;
    assert!(provider.try_acquire("a", options()).await.unwrap().is_some());
    assert!(provider.try_acquire("b", options()).await.unwrap().is_some());
    assert!(provider.try_acquire("a", options()).await.unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_timeout_shorter_than_window_gives_up() {
    let provider = throttle(1, Duration::from_secs(60));
    provider
        .try_acquire("api", AcquireOptions::no_wait())
        .await
        .unwrap()
        .unwrap();

    let started = Instant::now();
    let result = provider
        .try_acquire(
            "api",
            AcquireOptions::new().with_acquire_timeout(Duration::from_secs(5)),
        )
        .await
        .unwrap();
    assert!(result.is_none());
    assert_eq!(started.elapsed(), Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn test_infinite_timeout_waits_for_next_window() {
    let provider = throttle(1, Duration::from_secs(10));
    provider
        .try_acquire("api", AcquireOptions::no_wait())
        .await
        .unwrap()
        .unwrap();
    let handle = provider
        .try_acquire(
            "api",
            AcquireOptions::new().with_acquire_timeout(TimeLimit::Infinite),
        )
        .await
        .unwrap();
    assert!(handle.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_handles_have_nothing_to_release() {
    let provider = throttle(1, Duration::from_secs(60));
    let handle = provider
        .try_acquire("api", AcquireOptions::no_wait())
        .await
        .unwrap()
        .unwrap();
    assert!(handle.renew(None).await.unwrap());
    handle.release().await.unwrap();
    // The permit stays consumed.
    assert!(provider.is_locked("api").await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_repeated_storage_errors_end_the_attempt() {
    let storage = Arc::new(FailingStorage::default());
    let provider = ThrottlingLockProvider::with_clock(
        storage.clone(),
        Arc::new(TokioClock::starting_at(WINDOW_START_MS)),
        ThrottlingOptions::default(),
    )
    .unwrap();

    let result = provider
        .try_acquire(
            "api",
            AcquireOptions::new().with_acquire_timeout(TimeLimit::Infinite),
        )
        .await
        .unwrap();
    assert!(result.is_none());
    assert_eq!(storage.calls.load(Ordering::SeqCst), 3);
}
