//! Minimal HTTP/1.1 server for integration tests.
//!
//! Each path (file name without the leading `/`) gets a list of replies
//! served in order; the last one repeats. Unknown paths get 404. Every
//! connection is handled on its own thread so slow replies overlap. The
//! `Authorization` header of each request is recorded.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 with this body.
    Body(Vec<u8>),
    /// Given status, small text body.
    Status(u16, &'static str),
    /// 302 to another path on this server.
    Redirect(String),
    /// Close the connection without sending anything.
    Hangup,
}

#[derive(Debug, Clone)]
pub struct Route {
    pub replies: Vec<Reply>,
    pub delay: Duration,
}

impl Route {
    pub fn new(reply: Reply) -> Self {
        Self {
            replies: vec![reply],
            delay: Duration::ZERO,
        }
    }

    pub fn sequence(replies: Vec<Reply>) -> Self {
        Self {
            replies,
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Default)]
struct State {
    routes: HashMap<String, Route>,
    hits: HashMap<String, usize>,
    authorizations: Vec<Option<String>>,
}

pub struct FeedServer {
    base_url: String,
    state: Arc<Mutex<State>>,
}

impl FeedServer {
    /// Starts the server in a background thread. It runs until the process exits.
    pub fn start(routes: Vec<(String, Route)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(Mutex::new(State {
            routes: routes.into_iter().collect(),
            ..State::default()
        }));
        let server_state = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&server_state);
                thread::spawn(move || handle(stream, &state));
            }
        });
        Self {
            base_url: format!("http://127.0.0.1:{}/", port),
            state,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn hits(&self, path: &str) -> usize {
        self.state.lock().unwrap().hits.get(path).copied().unwrap_or(0)
    }

    pub fn authorizations(&self) -> Vec<Option<String>> {
        self.state.lock().unwrap().authorizations.clone()
    }
}

/// Base URL of a port nothing listens on.
pub fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

fn handle(mut stream: TcpStream, state: &Mutex<State>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let Some(request) = read_request(&mut stream) else {
        return;
    };
    let (path, authorization) = parse_request(&request);

    let (reply, delay) = {
        let mut st = state.lock().unwrap();
        st.authorizations.push(authorization);
        let n = {
            let hits = st.hits.entry(path.clone()).or_insert(0);
            *hits += 1;
            *hits
        };
        match st.routes.get(&path) {
            Some(route) => {
                let idx = (n - 1).min(route.replies.len().saturating_sub(1));
                let reply = route
                    .replies
                    .get(idx)
                    .cloned()
                    .unwrap_or(Reply::Status(404, "Not Found"));
                (reply, route.delay)
            }
            None => (Reply::Status(404, "Not Found"), Duration::ZERO),
        }
    };

    if !delay.is_zero() {
        thread::sleep(delay);
    }

    match reply {
        Reply::Body(body) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/gzip\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&body);
        }
        Reply::Status(code, reason) => {
            let body = format!("{} {}", code, reason);
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                code,
                reason,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
        Reply::Redirect(to) => {
            let response = format!(
                "HTTP/1.1 302 Found\r\nLocation: /{}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                to
            );
            let _ = stream.write_all(response.as_bytes());
        }
        Reply::Hangup => {}
    }
    let _ = stream.flush();
}

fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
        if data.windows(4).any(|w| w == b"\r\n\r\n") || data.len() > 64 * 1024 {
            break;
        }
    }
    String::from_utf8(data).ok()
}

/// Returns (path without leading `/`, Authorization header value).
fn parse_request(request: &str) -> (String, Option<String>) {
    let mut lines = request.lines();
    let path = lines
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/")
        .trim_start_matches('/')
        .to_string();
    let mut authorization = None;
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("authorization") {
                authorization = Some(value.trim().to_string());
            }
        }
    }
    (path, authorization)
}
