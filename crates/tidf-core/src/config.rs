use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::feed::default_feeds;
use crate::fetcher::TransferOptions;
use crate::retry::RetryPolicy;

/// Vendor endpoint hosting the daily feed files.
pub const DEFAULT_BASE_URL: &str =
    "https://threat-intelligence.whoisxmlapi.com/datafeeds/Threat_Intelligence_Data_Feeds/";

/// Environment variable holding the API key unless `api_key_env` says otherwise.
pub const DEFAULT_API_KEY_ENV: &str = "WXAAPIKEY";

/// Retry policy parameters (optional `[retry]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts per feed, including the first. 1 disables retries.
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.5 = 500ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let p = RetryPolicy::default();
        Self {
            max_attempts: p.max_attempts,
            base_delay_secs: p.base_delay.as_secs_f64(),
            max_delay_secs: p.max_delay.as_secs(),
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> Result<RetryPolicy> {
        if !self.base_delay_secs.is_finite() || self.base_delay_secs < 0.0 {
            anyhow::bail!(
                "retry.base_delay_secs must be a non-negative number, got {}",
                self.base_delay_secs
            );
        }
        Ok(RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_secs_f64(self.base_delay_secs),
            max_delay: Duration::from_secs(self.max_delay_secs),
        })
    }
}

/// Configuration loaded from `~/.config/tidf/config.toml`.
///
/// The API key itself is never stored here, only the name of the variable
/// it is read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TidfConfig {
    pub base_url: String,
    pub api_key_env: String,
    /// Directory the feed files are written to. Must exist.
    pub download_dir: Option<PathBuf>,
    /// Feed identifiers to download, in order.
    pub feeds: Vec<String>,
    pub connect_timeout_secs: u64,
    /// Upper bound on one whole request, body included.
    pub request_timeout_secs: u64,
    /// Abort a transfer slower than `low_speed_limit_bytes` per second for
    /// `low_speed_time_secs`. A limit of 0 disables the check.
    pub low_speed_limit_bytes: u32,
    pub low_speed_time_secs: u64,
    /// Exit 0 even when some feeds failed.
    pub always_succeed: bool,
    /// Optional retry policy; if missing, built-in defaults are used.
    pub retry: Option<RetryConfig>,
}

impl Default for TidfConfig {
    fn default() -> Self {
        let transfer = TransferOptions::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            download_dir: None,
            feeds: default_feeds(),
            connect_timeout_secs: transfer.connect_timeout.as_secs(),
            request_timeout_secs: transfer.request_timeout.as_secs(),
            low_speed_limit_bytes: transfer.low_speed_limit,
            low_speed_time_secs: transfer.low_speed_time.as_secs(),
            always_succeed: false,
            retry: None,
        }
    }
}

impl TidfConfig {
    pub fn transfer_options(&self) -> Result<TransferOptions> {
        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 {
            anyhow::bail!("connect_timeout_secs and request_timeout_secs must be greater than 0");
        }
        if self.low_speed_limit_bytes > 0 && self.low_speed_time_secs == 0 {
            anyhow::bail!(
                "low_speed_time_secs must be greater than 0 when low_speed_limit_bytes is set"
            );
        }
        Ok(TransferOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            low_speed_limit: self.low_speed_limit_bytes,
            low_speed_time: Duration::from_secs(self.low_speed_time_secs),
        })
    }

    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        match &self.retry {
            Some(r) => r.to_policy(),
            None => Ok(RetryPolicy::default()),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tidf")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TidfConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = TidfConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit path. The file must exist.
pub fn load_from(path: &Path) -> Result<TidfConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: TidfConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
