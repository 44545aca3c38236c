//! Single authenticated GET via libcurl, streaming a 2xx body to disk.
//!
//! Blocking; run from `spawn_blocking` when used from async code.

use std::cell::RefCell;
use std::io;
use std::path::Path;
use std::str;
use std::time::Duration;

use crate::error::FetchError;
use crate::storage::PendingFile;

/// Per-request limits. There is always an overall timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOptions {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Abort if the rate stays below `low_speed_limit` bytes/s for `low_speed_time`.
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            request_timeout: Duration::from_secs(120),
            low_speed_limit: 1024,
            low_speed_time: Duration::from_secs(60),
        }
    }
}

/// Status code and reason phrase of one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StatusLine {
    pub code: u32,
    pub reason: String,
}

impl StatusLine {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

/// Parses `HTTP/1.1 404 Not Found` (or `HTTP/2 404`). Other header lines yield `None`.
pub(crate) fn parse_status_line(data: &[u8]) -> Option<StatusLine> {
    let line = str::from_utf8(data).ok()?.trim_end();
    let rest = line.strip_prefix("HTTP/")?;
    let mut parts = rest.splitn(3, ' ');
    let _version = parts.next()?;
    let code = parts.next()?.trim().parse::<u32>().ok()?;
    let reason = parts.next().unwrap_or("").trim().to_string();
    Some(StatusLine { code, reason })
}

/// GETs `url` with the given `Authorization` value and writes the body to `dest`.
///
/// Follows redirects; the decision uses the final response. The body of a
/// non-2xx response is discarded and `dest` is never touched. Returns the
/// number of bytes written.
pub fn get_to_file(
    url: &str,
    authorization: &str,
    dest: &Path,
    opts: &TransferOptions,
) -> Result<u64, FetchError> {
    let status: RefCell<Option<StatusLine>> = RefCell::new(None);
    let pending = RefCell::new(PendingFile::new(dest));
    let write_error: RefCell<Option<io::Error>> = RefCell::new(None);

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.request_timeout)?;
    easy.low_speed_limit(opts.low_speed_limit)?;
    easy.low_speed_time(opts.low_speed_time)?;

    let mut list = curl::easy::List::new();
    list.append(&format!("Authorization: {}", authorization))?;
    list.append("Accept: application/octet-stream")?;
    easy.http_headers(list)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            // A new status line starts each response in a redirect chain.
            if let Some(line) = parse_status_line(data) {
                *status.borrow_mut() = Some(line);
            }
            true
        })?;
        transfer.write_function(|data| {
            let ok = status.borrow().as_ref().is_some_and(StatusLine::is_success);
            if !ok {
                return Ok(data.len());
            }
            match pending.borrow_mut().write(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    *write_error.borrow_mut() = Some(e);
                    Ok(0) // abort transfer
                }
            }
        })?;
        transfer.perform()
    };

    if let Some(e) = write_error.into_inner() {
        return Err(FetchError::Storage(e));
    }
    performed?;

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        let reason = status.into_inner().map(|s| s.reason);
        return Err(FetchError::status(code, reason.as_deref()));
    }

    Ok(pending.into_inner().commit()?)
}
