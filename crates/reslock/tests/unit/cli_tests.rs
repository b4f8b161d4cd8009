//! Admin commands against an in-memory backend

use reslock::cli::{Command, execute};
use reslock::infrastructure::config::AppConfig;
use reslock::infrastructure::di::AppContext;
use reslock::providers::events::NullEventBusProvider;
use reslock::providers::storage::MemoryLockStorage;
use reslock::{AcquireOptions, LockProvider};
use std::sync::Arc;
use std::time::Duration;

fn context() -> AppContext {
    AppContext::from_parts(
        AppConfig::default(),
        Arc::new(MemoryLockStorage::new()),
        NullEventBusProvider::new_shared(),
    )
    .unwrap()
}

async fn output(context: &AppContext, command: Command) -> String {
    let mut out = Vec::new();
    execute(context, &command, &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_list_count_and_info() {
    let context = context();
    assert_eq!(output(&context, Command::List).await, "No active locks\n");
    assert_eq!(output(&context, Command::Count).await, "0\n");

    let handle = context
        .lock_provider()
        .try_acquire(
            "invoices",
            AcquireOptions::new().with_time_until_expires(Duration::from_secs(30)),
        )
        .await
        .unwrap()
        .unwrap();

    let listed = output(&context, Command::List).await;
    assert_eq!(listed, format!("invoices\t{}\t30s\n", handle.lock_id()));
    assert_eq!(output(&context, Command::Count).await, "1\n");

    let info = output(
        &context,
        Command::Info {
            resource: "invoices".to_string(),
        },
    )
    .await;
    assert!(info.contains(handle.lock_id()));
    assert!(info.contains("expires in: 30s"));

    let missing = output(
        &context,
        Command::Info {
            resource: "payroll".to_string(),
        },
    )
    .await;
    assert_eq!(missing, "payroll is not locked\n");
}

#[tokio::test]
async fn test_force_release() {
    let context = context();
    let handle = context
        .lock_provider()
        .try_acquire("invoices", AcquireOptions::no_wait())
        .await
        .unwrap()
        .unwrap();

    let wrong = output(
        &context,
        Command::Release {
            resource: "invoices".to_string(),
            lock_id: "someone-else".to_string(),
        },
    )
    .await;
    assert_eq!(wrong, "invoices is not held by someone-else\n");
    assert!(context.lock_provider().is_locked("invoices").await.unwrap());

    let released = output(
        &context,
        Command::Release {
            resource: "invoices".to_string(),
            lock_id: handle.lock_id().to_string(),
        },
    )
    .await;
    assert_eq!(released, "Released invoices\n");
    assert!(!context.lock_provider().is_locked("invoices").await.unwrap());
}

#[tokio::test]
async fn test_throttle_status() {
    let context = context();
    let throttle = context.throttling_provider();
    throttle
        .try_acquire("exports", AcquireOptions::no_wait())
        .await
        .unwrap()
        .unwrap();

    let status = output(
        &context,
        Command::ThrottleStatus {
            resource: "exports".to_string(),
        },
    )
    .await;
    assert_eq!(
        status,
        "exports: 1/100 permits used in the current 900s window\n"
    );
}

#[tokio::test]
async fn test_invalid_resource_is_an_error() {
    let context = context();
    let mut out = Vec::new();
    let result = execute(
        &context,
        &Command::Info {
            resource: String::new(),
        },
        &mut out,
    )
    .await;
    assert!(result.is_err());
}
