//! One download run: banner, concurrent fan-out over every feed, fan-in,
//! completion line and summary.

use chrono::NaiveDate;
use std::sync::Arc;

use crate::error::FetchError;
use crate::feed::{format_date, FeedId, FeedJob};
use crate::fetcher::{fetch_feed, FetchContext};
use crate::report::Reporter;
use crate::settings::RunSettings;

/// Result of one feed.
#[derive(Debug)]
pub struct FeedOutcome {
    pub job: FeedJob,
    /// Bytes written on success.
    pub result: Result<u64, FetchError>,
}

impl FeedOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of a run, in launch order.
#[derive(Debug)]
pub struct RunSummary {
    pub date: NaiveDate,
    pub outcomes: Vec<FeedOutcome>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn failed_feeds(&self) -> Vec<&FeedId> {
        self.outcomes
            .iter()
            .filter(|o| !o.is_success())
            .map(|o| &o.job.feed)
            .collect()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }

    pub fn completion_message(&self) -> String {
        if self.all_succeeded() {
            return "All files downloaded successfully".to_string();
        }
        let failed: Vec<&str> = self.failed_feeds().iter().map(|f| f.as_str()).collect();
        format!(
            "Finished: {} of {} files downloaded, {} failed: {}",
            self.succeeded(),
            self.total(),
            self.failed(),
            failed.join(", ")
        )
    }
}

/// Starts every fetch at once on the blocking pool, then waits for all of them.
///
/// No concurrency cap and no early exit: a failing or panicking fetch only
/// affects its own outcome. Outcomes are returned in launch order.
pub async fn fetch_all(jobs: Vec<FeedJob>, ctx: Arc<FetchContext>) -> Vec<FeedOutcome> {
    let handles: Vec<_> = jobs
        .into_iter()
        .map(|job| {
            let ctx = Arc::clone(&ctx);
            let task_job = job.clone();
            let handle = tokio::task::spawn_blocking(move || fetch_feed(&task_job, &ctx));
            (job, handle)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (job, handle) in handles {
        let result = match handle.await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(feed = %job.feed, "fetch task failed: {}", e);
                ctx.reporter.error(&format!(
                    "  An error occurred while downloading the {} file",
                    job.filename
                ));
                ctx.reporter.error(&format!("  Error details: task failed: {}", e));
                Err(FetchError::Task(e.to_string()))
            }
        };
        outcomes.push(FeedOutcome { job, result });
    }
    outcomes
}

/// Runs a complete download for `settings`, reporting to `reporter`.
pub async fn run(settings: &RunSettings, reporter: Arc<dyn Reporter>) -> RunSummary {
    let plan = &settings.plan;
    reporter.info("Downloading Threat Intel data from whoisxmlapi.com");
    reporter.info("Contact sales@whoisxmlapi.com for more information.");
    reporter.info(&format!(
        "Preparing to download {} files for {}",
        plan.feeds.len(),
        format_date(plan.date)
    ));
    tracing::info!(
        date = %format_date(plan.date),
        feeds = plan.feeds.len(),
        dir = %plan.download_dir.display(),
        "starting run"
    );

    let ctx = Arc::new(FetchContext {
        authorization: settings.api_key.basic_auth_header(),
        transfer: settings.transfer,
        retry: settings.retry,
        reporter: Arc::clone(&reporter),
    });
    let outcomes = fetch_all(plan.jobs(), ctx).await;

    let summary = RunSummary {
        date: plan.date,
        outcomes,
    };
    reporter.info(&summary.completion_message());
    tracing::info!(
        succeeded = summary.succeeded(),
        failed = summary.failed(),
        "run finished"
    );
    summary
}
