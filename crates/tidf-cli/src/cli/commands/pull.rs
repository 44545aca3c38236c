//! `tidf pull` – download every configured feed for the target date.

use anyhow::Result;
use std::sync::Arc;
use tidf_core::auth::ApiKey;
use tidf_core::config::TidfConfig;
use tidf_core::feed::format_date;
use tidf_core::report::{ConsoleReporter, Reporter};
use tidf_core::run::{self, RunSummary};
use tidf_core::settings::{Overrides, RunSettings};

use crate::cli::EXIT_PARTIAL_FAILURE;

pub async fn run_pull(cfg: &TidfConfig, overrides: &Overrides, no_color: bool) -> Result<i32> {
    let api_key = ApiKey::from_env(&cfg.api_key_env)?;
    let settings = RunSettings::resolve(cfg, overrides, api_key)?;
    tracing::debug!("resolved settings: {:?}", settings);

    let reporter: Arc<dyn Reporter> = Arc::new(ConsoleReporter::detect(no_color));
    let summary = run::run(&settings, reporter).await;
    Ok(exit_code(&summary, settings.always_succeed))
}

/// 0 when every feed succeeded, [`EXIT_PARTIAL_FAILURE`] otherwise unless
/// `always_succeed` is set.
pub fn exit_code(summary: &RunSummary, always_succeed: bool) -> i32 {
    if summary.all_succeeded() {
        return 0;
    }
    if always_succeed {
        tracing::info!(
            "{} feed(s) failed for {}; exiting 0 because always_succeed is set",
            summary.failed(),
            format_date(summary.date)
        );
        return 0;
    }
    tracing::warn!(
        "{} of {} feed(s) failed for {}",
        summary.failed(),
        summary.total(),
        format_date(summary.date)
    );
    EXIT_PARTIAL_FAILURE
}
