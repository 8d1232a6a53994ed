use tokio::time::{sleep, Duration};
use tracing::{error, warn};

use crate::error::{Error, Result};

/// Fixed-delay bounded retry. `attempts` is the total number of underlying
/// calls. Zero is a caller-side signal to bypass the wrapper entirely and
/// never enters the loop.
#[derive(Debug, Clone)]
pub struct RetrySettings {
    pub attempts: u32,
    pub delay_ms: u64,
}

impl RetrySettings {
    pub async fn run_with_retry<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let attempts = self.attempts.max(1);

        for attempt in 1..=attempts {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < attempts => {
                    warn!("attempt {attempt}/{attempts} failed: {e}");
                    sleep(Duration::from_millis(self.delay_ms)).await;
                }
                Err(e) => {
                    error!("all {attempts} attempts failed: {e}");
                    return Err(Error::RetryExhausted {
                        attempts,
                        source: Box::new(e),
                    });
                }
            }
        }
        unreachable!("retry loop exhausted unexpectedly")
    }
}
