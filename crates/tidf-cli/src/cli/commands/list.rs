//! `tidf list` – show what a pull would fetch, without network or disk access.

use anyhow::Result;
use tidf_core::config::TidfConfig;
use tidf_core::feed::{format_date, FeedPlan};
use tidf_core::settings::{resolve_plan, Overrides};

pub fn run_list(cfg: &TidfConfig, overrides: &Overrides) -> Result<()> {
    let plan = resolve_plan(cfg, overrides)?;
    for line in list_lines(&plan) {
        println!("{}", line);
    }
    Ok(())
}

/// Header plus one row per feed with its remote URL and local path.
pub fn list_lines(plan: &FeedPlan) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{} files for {} into {}",
            plan.feeds.len(),
            format_date(plan.date),
            plan.download_dir.display()
        ),
        format!("{:<4} {:<30} {:<70} {}", "SEQ", "FEED", "URL", "PATH"),
    ];
    for job in plan.jobs() {
        lines.push(format!(
            "{:<4} {:<30} {:<70} {}",
            job.seq,
            job.feed,
            job.url,
            job.local_path.display()
        ));
    }
    lines
}
