//! Retry and backoff for feed downloads.
//!
//! Classifies a [`FetchError`](crate::error::FetchError) into a retry kind and
//! decides, per attempt, whether to try again and after how long.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
