//! Feed identifiers and the per-feed download job.

mod naming;
mod plan;

pub use naming::{format_date, parse_date, remote_filename, remote_url, target_date};
pub use plan::{FeedJob, FeedPlan};

use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Feeds published daily by the vendor. Used when the config lists none.
pub const DEFAULT_FEEDS: &[&str] = &[
    "deny-cidrs.v4",
    "deny-cidrs.v6",
    "deny-domains",
    "deny-ips.v4",
    "deny-ips.v6",
    "hosts",
    "malicious-cidrs.v4.csv",
    "malicious-cidrs.v4.jsonl",
    "malicious-cidrs.v6.csv",
    "malicious-cidrs.v6.jsonl",
    "malicious-domains.csv",
    "malicious-domains.jsonl",
    "malicious-file-hashes.csv",
    "malicious-file-hashes.jsonl",
    "malicious-ips.v4.csv",
    "malicious-ips.v6.csv",
    "malicious-ips.v4.jsonl",
    "malicious-ips.v6.jsonl",
    "malicious-urls.csv",
    "malicious-urls.jsonl",
    "nginx-access.v4",
    "nginx-access.v6",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidFeedId {
    #[error("feed identifier is empty")]
    Empty,
    #[error("feed identifier {0:?} is reserved")]
    Reserved(String),
    #[error("feed identifier {0:?} contains a path separator, whitespace or control character")]
    BadChar(String),
}

/// Name of one daily feed, e.g. `malicious-ips.v4.csv`.
///
/// Always a single path component, so the local file stays inside the
/// download directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedId(String);

impl FeedId {
    pub fn parse(raw: &str) -> Result<Self, InvalidFeedId> {
        let s = raw.trim();
        if s.is_empty() {
            return Err(InvalidFeedId::Empty);
        }
        if s == "." || s == ".." {
            return Err(InvalidFeedId::Reserved(s.to_string()));
        }
        if s
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_whitespace() || c.is_control())
        {
            return Err(InvalidFeedId::BadChar(s.to_string()));
        }
        Ok(FeedId(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// The built-in feed list.
pub fn default_feeds() -> Vec<String> {
    DEFAULT_FEEDS.iter().map(|s| s.to_string()).collect()
}

/// Parses a configured feed list. Rejects an empty list, invalid names and duplicates.
pub fn parse_feed_list<S: AsRef<str>>(items: &[S]) -> anyhow::Result<Vec<FeedId>> {
    if items.is_empty() {
        anyhow::bail!("feed list is empty");
    }
    let mut seen = HashSet::new();
    let mut feeds = Vec::with_capacity(items.len());
    for item in items {
        let id = FeedId::parse(item.as_ref())?;
        if !seen.insert(id.clone()) {
            anyhow::bail!("duplicate feed identifier {:?}", id.as_str());
        }
        feeds.push(id);
    }
    Ok(feeds)
}
