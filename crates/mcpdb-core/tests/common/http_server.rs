//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves canned responses keyed by request target (path + query). One
//! request per connection; unknown targets get 404.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: &'static str,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// Sent as `Set-Cookie` when present.
    pub set_cookie: Option<&'static str>,
    /// When present, requests without this cookie pair get 403.
    pub require_cookie: Option<&'static str>,
    /// Overrides the announced `Content-Length` (to simulate truncation).
    pub announced_len: Option<usize>,
}

impl Route {
    pub fn ok(content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: "200 OK",
            content_type,
            body: body.into(),
            set_cookie: None,
            require_cookie: None,
            announced_len: None,
        }
    }

    pub fn status(status: &'static str) -> Self {
        Self {
            status,
            ..Self::ok("text/plain", status.as_bytes().to_vec())
        }
    }
}

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Runs until the process exits.
pub fn start(routes: Vec<(&'static str, Route)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<&'static str, Route>> = Arc::new(routes.into_iter().collect());
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            thread::spawn(move || handle(stream, &routes));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: std::net::TcpStream, routes: &HashMap<&'static str, Route>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));

    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];
    while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => raw.extend_from_slice(&buf[..n]),
        }
    }
    let request = String::from_utf8_lossy(&raw);
    let (target, cookie) = parse_request(&request);

    let fallback = Route::status("404 Not Found");
    let mut route = routes.get(target.as_str()).unwrap_or(&fallback);
    let forbidden = Route::status("403 Forbidden");
    if let Some(required) = route.require_cookie {
        if !cookie.split(';').any(|c| c.trim() == required) {
            route = &forbidden;
        }
    }

    let mut head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        route.status,
        route.content_type,
        route.announced_len.unwrap_or(route.body.len())
    );
    if let Some(c) = route.set_cookie {
        head.push_str(&format!("Set-Cookie: {}; Path=/\r\n", c));
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&route.body);
}

/// Returns (request target, Cookie header value).
fn parse_request(request: &str) -> (String, String) {
    let mut lines = request.lines();
    let target = lines
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    let cookie = lines
        .take_while(|l| !l.trim().is_empty())
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("cookie"))
        .map(|(_, v)| v.trim().to_string())
        .unwrap_or_default();
    (target, cookie)
}
