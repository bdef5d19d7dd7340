use std::future::Future;
use std::sync::Arc;

use super::clock::Sleeper;
use crate::error::RemoteError;
use crate::transport::RemoteResult;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Runs remote calls with a bounded attempt budget.
///
/// - `RateLimited { wait }` sleeps exactly `wait`, then retries.
/// - `Fatal` retries immediately until the budget runs out.
///
/// No sleep follows the final attempt. Exhaustion returns the last error.
pub struct RetryExecutor {
    max_attempts: u32,
    sleeper: Arc<dyn Sleeper>,
}

impl RetryExecutor {
    pub fn new(max_attempts: u32, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            sleeper,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn sleeper(&self) -> &Arc<dyn Sleeper> {
        &self.sleeper
    }

    pub async fn execute<T, F, Fut>(&self, operation: &str, mut call: F) -> RemoteResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = RemoteResult<T>>,
    {
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            match call().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!(operation, attempt, "Remote call recovered after retries");
                    }
                    return Ok(value);
                }
                Err(RemoteError::RateLimited { wait }) => {
                    tracing::warn!(
                        operation,
                        attempt,
                        max_attempts = self.max_attempts,
                        wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                        "Rate limited, waiting before retry"
                    );
                    if attempt < self.max_attempts {
                        self.sleeper.sleep(wait).await;
                    }
                    last_error = Some(RemoteError::RateLimited { wait });
                }
                Err(err @ RemoteError::Fatal { .. }) => {
                    tracing::debug!(
                        operation,
                        attempt,
                        max_attempts = self.max_attempts,
                        "Remote call failed: {err}"
                    );
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| RemoteError::fatal(operation, "no attempts made")))
    }
}
