//! Retry loop: run an attempt until success or the policy says stop.

use std::time::Duration;

use super::classify::classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::error::FetchError;

/// Calls `attempt_fn` with the 1-based attempt number until it succeeds or the
/// policy gives up. `on_retry(attempt, error, delay)` runs before each backoff
/// sleep. Blocks the current thread while sleeping.
pub fn run_with_retry<T, F, R>(
    policy: &RetryPolicy,
    mut on_retry: R,
    mut attempt_fn: F,
) -> Result<T, FetchError>
where
    F: FnMut(u32) -> Result<T, FetchError>,
    R: FnMut(u32, &FetchError, Duration),
{
    let mut attempt = 1u32;
    loop {
        match attempt_fn(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => match policy.decide(attempt, classify(&e)) {
                RetryDecision::NoRetry => return Err(e),
                RetryDecision::RetryAfter(delay) => {
                    on_retry(attempt, &e, delay);
                    std::thread::sleep(delay);
                    attempt += 1;
                }
            },
        }
    }
}
