//! Resolve config file + command-line overrides into validated run settings.
//!
//! Everything is checked up front so a misconfigured run fails before any
//! request is sent.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};

use crate::auth::ApiKey;
use crate::config::TidfConfig;
use crate::feed::{parse_feed_list, target_date, FeedPlan};
use crate::fetcher::TransferOptions;
use crate::retry::RetryPolicy;

/// Values given on the command line; each one replaces the config value when set.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub download_dir: Option<PathBuf>,
    pub base_url: Option<String>,
    /// Non-empty replaces the configured feed list.
    pub feeds: Vec<String>,
    pub date: Option<NaiveDate>,
    pub always_succeed: bool,
}

/// Validated settings for a download run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub plan: FeedPlan,
    pub api_key: ApiKey,
    pub transfer: TransferOptions,
    pub retry: RetryPolicy,
    pub always_succeed: bool,
}

impl RunSettings {
    /// Builds the plan and checks that the download directory exists.
    pub fn resolve(cfg: &TidfConfig, overrides: &Overrides, api_key: ApiKey) -> Result<Self> {
        let plan = resolve_plan(cfg, overrides)?;
        validate_download_dir(&plan.download_dir)?;
        Ok(Self {
            plan,
            api_key,
            transfer: cfg.transfer_options()?,
            retry: cfg.retry_policy()?,
            always_succeed: overrides.always_succeed || cfg.always_succeed,
        })
    }
}

/// Resolves date, base URL, directory and feeds without touching the disk.
pub fn resolve_plan(cfg: &TidfConfig, overrides: &Overrides) -> Result<FeedPlan> {
    let date = match overrides.date {
        Some(d) => d,
        None => target_date(Utc::now().date_naive())
            .context("cannot compute the previous day's date")?,
    };

    let base_url = normalize_base_url(overrides.base_url.as_deref().unwrap_or(&cfg.base_url))?;

    let download_dir = overrides
        .download_dir
        .clone()
        .or_else(|| cfg.download_dir.clone())
        .context("no download directory: set download_dir in the config file or pass --dir")?;

    let feeds = if overrides.feeds.is_empty() {
        parse_feed_list(&cfg.feeds).context("invalid feeds in config")?
    } else {
        parse_feed_list(&overrides.feeds).context("invalid --feed")?
    };

    Ok(FeedPlan {
        date,
        base_url,
        download_dir,
        feeds,
    })
}

/// Requires an absolute http(s) URL and returns it with a trailing `/`.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let parsed = url::Url::parse(raw).with_context(|| format!("invalid base URL {:?}", raw))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => anyhow::bail!("base URL must be http or https, got {:?}", other),
    }
    if parsed.host_str().is_none() {
        anyhow::bail!("base URL {:?} has no host", raw);
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        anyhow::bail!("base URL {:?} must not have a query or fragment", raw);
    }
    let mut s = parsed.to_string();
    if !s.ends_with('/') {
        s.push('/');
    }
    Ok(s)
}

pub fn validate_download_dir(dir: &Path) -> Result<()> {
    let meta = std::fs::metadata(dir)
        .with_context(|| format!("download directory {} is not accessible", dir.display()))?;
    if !meta.is_dir() {
        anyhow::bail!("download path {} is not a directory", dir.display());
    }
    Ok(())
}
