//! Per-feed fetch error.
//!
//! Every failure of a single feed download ends up as one of these. They are
//! reported and collected into the run summary; they never abort other feeds.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The final response had a non-2xx status.
    #[error("HTTP {code} {reason}")]
    Status { code: u32, reason: String },
    /// Curl reported an error (timeout, connection, DNS, TLS, etc.).
    #[error("{0}")]
    Transport(#[from] curl::Error),
    /// Creating, writing, syncing or renaming the local file failed.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
    /// The fetch task panicked or was cancelled.
    #[error("task failed: {0}")]
    Task(String),
}

impl FetchError {
    /// Builds a status error, falling back to the standard reason phrase when
    /// the server sent none (HTTP/2 responses never carry one).
    pub fn status(code: u32, reason: Option<&str>) -> Self {
        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| canonical_reason(code).to_string());
        FetchError::Status { code, reason }
    }
}

/// Standard reason phrase for the status codes a feed endpoint is likely to return.
pub fn canonical_reason(code: u32) -> &'static str {
    match code {
        200 => "OK",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        408 => "Request Timeout",
        410 => "Gone",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown Status",
    }
}
