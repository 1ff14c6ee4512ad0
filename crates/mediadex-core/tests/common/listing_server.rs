//! Minimal HTTP/1.1 server that serves directory listing pages for integration tests.
//!
//! Serves a fixed map of request path to HTML body. Unknown paths get 404,
//! anything but GET gets 405.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

/// Builder for the pages a test server exposes.
#[derive(Debug, Default, Clone)]
pub struct Listings {
    pages: HashMap<String, String>,
}

impl Listings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listing at `path` (e.g. "/" or "/2020/") whose entries link to themselves.
    pub fn dir(mut self, path: &str, entries: &[&str]) -> Self {
        let mut html = String::from(
            "<html><head><title>Index</title></head><body><pre>\n\
             <a href=\"../\">Parent directory/</a>\n",
        );
        for entry in entries {
            html.push_str(&format!(
                "<a href=\"{entry}\">{entry}</a>    01-Feb-2020 10:00    -\n"
            ));
        }
        html.push_str("</pre></body></html>\n");
        self.pages.insert(path.to_string(), html);
        self
    }
}

/// Starts a server in a background thread. Returns the base URL
/// (e.g. "http://127.0.0.1:12345/"). The server runs until the process exits.
pub fn start(listings: Listings) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let pages = Arc::new(listings.pages);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let pages = Arc::clone(&pages);
            thread::spawn(move || handle(stream, &pages));
        }
    });
    format!("http://127.0.0.1:{}/", port)
}

fn handle(mut stream: std::net::TcpStream, pages: &HashMap<String, String>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (method, path) = parse_request_line(request);
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    }
    let (status, body) = match pages.get(path) {
        Some(html) => ("200 OK", html.as_str()),
        None => ("404 Not Found", "<html><body><h1>404 Not Found</h1></body></html>"),
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(body.as_bytes());
}

/// Returns (method, path) from the request line.
fn parse_request_line(request: &str) -> (&str, &str) {
    let line = request.lines().next().unwrap_or("");
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("/");
    (method, path)
}
