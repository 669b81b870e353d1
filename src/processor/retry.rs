// src/processor/retry.rs
use std::time::Duration;

use tracing::warn;

use crate::gemini::GeminiError;

/// Bounded retry on rate limits: at most `max_retries` attempts in total,
/// `retry_delay` apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
        }
    }
}

/// Run `call`, retrying rate-limited failures per `policy` with a blocking sleep.
pub fn call_with_retry<T, F>(policy: &RetryPolicy, call: F) -> Result<T, GeminiError>
where
    F: FnMut() -> Result<T, GeminiError>,
{
    call_with_retry_and_sleep(policy, call, std::thread::sleep)
}

/// Same as [`call_with_retry`] with the delay delegated to `sleep`.
///
/// Non-rate-limit errors return at once. When every attempt is rate limited
/// the last error is returned; there is no sleep after the final attempt.
pub fn call_with_retry_and_sleep<T, F, S>(
    policy: &RetryPolicy,
    mut call: F,
    mut sleep: S,
) -> Result<T, GeminiError>
where
    F: FnMut() -> Result<T, GeminiError>,
    S: FnMut(Duration),
{
    let attempts = policy.max_retries.max(1);
    let mut attempt = 1;

    loop {
        match call() {
            Ok(value) => return Ok(value),
            Err(e) if e.is_rate_limited() && attempt < attempts => {
                warn!(
                    attempt,
                    max_attempts = attempts,
                    delay_secs = policy.retry_delay.as_secs_f64(),
                    "Rate limited, retrying: {e}"
                );
                sleep(policy.retry_delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
