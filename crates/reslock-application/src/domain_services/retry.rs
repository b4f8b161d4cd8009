//! Bounded retry for storage calls

use std::future::Future;
use std::time::Duration;

use reslock_domain::error::{Error, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Pause between retries of a failed storage call
const RETRY_DELAY: Duration = Duration::from_millis(20);

/// Run `op` up to `max_attempts` times, retrying only transient errors
///
/// Non-transient errors and the last transient error are returned as-is.
/// A cancelled token stops the loop with [`Error::Cancelled`].
pub async fn retry_transient<T, F, Fut>(
    operation: &str,
    max_attempts: u32,
    cancellation: Option<&CancellationToken>,
    mut op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        if cancellation.is_some_and(CancellationToken::is_cancelled) {
            return Err(Error::cancelled(operation));
        }

        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < max_attempts => {
                warn!(
                    operation,
                    attempt,
                    max_attempts,
                    error = %e,
                    "Transient storage failure, retrying"
                );
            }
            Err(e) => {
                debug!(operation, attempt, error = %e, "Giving up");
                return Err(e);
            }
        }

        attempt += 1;
        match cancellation {
            Some(token) => {
                tokio::select! {
                    () = tokio::time::sleep(RETRY_DELAY) => {}
                    () = token.cancelled() => return Err(Error::cancelled(operation)),
                }
            }
            None => tokio::time::sleep(RETRY_DELAY).await,
        }
    }
}
