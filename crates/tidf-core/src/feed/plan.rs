//! The resolved set of downloads for one run.

use chrono::NaiveDate;
use std::path::PathBuf;

use super::naming::{remote_filename, remote_url};
use super::FeedId;

/// Everything needed to name the downloads of a run. No network or disk access.
#[derive(Debug, Clone)]
pub struct FeedPlan {
    pub date: NaiveDate,
    /// Normalized base URL, always ending in `/`.
    pub base_url: String,
    pub download_dir: PathBuf,
    pub feeds: Vec<FeedId>,
}

/// One feed download: sequence number, remote file and local destination.
#[derive(Debug, Clone)]
pub struct FeedJob {
    /// 1-based launch order; only used to make log lines easier to follow.
    pub seq: usize,
    pub feed: FeedId,
    pub filename: String,
    pub url: String,
    pub local_path: PathBuf,
}

impl FeedPlan {
    /// Jobs in feed-list order, numbered from 1.
    pub fn jobs(&self) -> Vec<FeedJob> {
        self.feeds
            .iter()
            .enumerate()
            .map(|(i, feed)| {
                let filename = remote_filename(self.date, feed);
                FeedJob {
                    seq: i + 1,
                    feed: feed.clone(),
                    url: remote_url(&self.base_url, &filename),
                    local_path: self.download_dir.join(&filename),
                    filename,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::parse_feed_list;
    use std::path::Path;

    #[test]
    fn jobs_are_numbered_and_named() {
        let plan = FeedPlan {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            base_url: "http://127.0.0.1:8080/feeds/".to_string(),
            download_dir: PathBuf::from("/srv/tidf"),
            feeds: parse_feed_list(&["a", "b"]).unwrap(),
        };
        let jobs = plan.jobs();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].seq, 1);
        assert_eq!(jobs[1].seq, 2);
        assert_eq!(jobs[0].filename, "tidf.2024-01-01.daily.a.gz");
        assert_eq!(
            jobs[1].url,
            "http://127.0.0.1:8080/feeds/tidf.2024-01-01.daily.b.gz"
        );
        assert_eq!(
            jobs[1].local_path,
            Path::new("/srv/tidf/tidf.2024-01-01.daily.b.gz")
        );
    }
}
