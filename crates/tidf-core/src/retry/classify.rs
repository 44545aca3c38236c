//! Map fetch errors onto retry kinds.

use super::policy::ErrorKind;
use crate::error::FetchError;

pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::ServerError(code),
        _ => ErrorKind::Fatal,
    }
}

pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_ssl_connect_error()
        || e.is_got_nothing()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_partial_file()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Fatal
}

pub fn classify(e: &FetchError) -> ErrorKind {
    match e {
        FetchError::Status { code, .. } => classify_http_status(*code),
        FetchError::Transport(ce) => classify_curl_error(ce),
        FetchError::Storage(_) | FetchError::Task(_) => ErrorKind::Fatal,
    }
}
