//! Download of a single feed: progress line, authenticated GET with retry,
//! result line.

mod transfer;

pub use transfer::{get_to_file, TransferOptions};

use std::sync::Arc;

use crate::error::FetchError;
use crate::feed::FeedJob;
use crate::report::Reporter;
use crate::retry::{run_with_retry, RetryPolicy};

/// Read-only state shared by every fetch of a run.
#[derive(Clone)]
pub struct FetchContext {
    /// Full `Authorization` header value.
    pub authorization: String,
    pub transfer: TransferOptions,
    pub retry: RetryPolicy,
    pub reporter: Arc<dyn Reporter>,
}

/// Fetches one feed to its local path, reporting progress and outcome.
///
/// Never panics on network or disk failures; they come back as `Err` after
/// being reported. Blocking.
pub fn fetch_feed(job: &FeedJob, ctx: &FetchContext) -> Result<u64, FetchError> {
    let reporter = ctx.reporter.as_ref();
    reporter.progress(&format!(
        "{} ... Downloading {} file to: {}",
        job.seq,
        job.filename,
        job.local_path.display()
    ));
    tracing::debug!(seq = job.seq, feed = %job.feed, url = %job.url, "fetching feed");

    let result = run_with_retry(
        &ctx.retry,
        |attempt, err, delay| {
            tracing::warn!(
                feed = %job.feed,
                attempt,
                "attempt failed: {}; retrying in {:?}",
                err,
                delay
            );
            reporter.warn(&format!(
                "  {} attempt {} failed ({}), retrying in {:.1}s",
                job.filename,
                attempt,
                err,
                delay.as_secs_f64()
            ));
        },
        |attempt| {
            tracing::debug!(feed = %job.feed, attempt, "GET {}", job.url);
            get_to_file(&job.url, &ctx.authorization, &job.local_path, &ctx.transfer)
        },
    );

    match &result {
        Ok(bytes) => {
            tracing::info!(feed = %job.feed, bytes, "saved {}", job.local_path.display());
            reporter.success(&format!("  Success: {} ({} bytes)", job.filename, bytes));
        }
        Err(e) => {
            tracing::warn!(feed = %job.feed, "download failed: {}", e);
            reporter.error(&format!(
                "  An error occurred while downloading the {} file",
                job.filename
            ));
            reporter.error(&format!("  Error details: {}", e));
        }
    }
    result
}
