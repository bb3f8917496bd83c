//! Minimal HTTP/1.1 framing for the page server.
//!
//! Only what a browser needs to fetch pages: the request line is parsed,
//! headers are skipped, and every response closes the connection.

use thiserror::Error;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, Take,
};

/// Upper bound on the request head (request line + headers)
pub const MAX_HEAD_BYTES: usize = 8 * 1024;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Malformed request line: {0}")]
    BadRequestLine(String),

    #[error("Request head exceeds {} bytes", MAX_HEAD_BYTES)]
    HeadTooLarge,

    #[error("Connection closed before request was complete")]
    Incomplete,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Other,
}

impl Method {
    fn parse(s: &str) -> Self {
        match s {
            "GET" => Method::Get,
            "HEAD" => Method::Head,
            _ => Method::Other,
        }
    }
}

/// Parsed request line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    /// Raw method token, for logging
    pub method_name: String,
    /// Request target with any query string removed
    pub path: String,
}

/// Read a request head from `reader`, discarding the headers
pub async fn read_request<R>(reader: &mut R) -> Result<Request, HttpError>
where
    R: AsyncBufRead + Unpin,
{
    let mut limited = reader.take(MAX_HEAD_BYTES as u64);

    let mut request_line = String::new();
    if limited.read_line(&mut request_line).await? == 0 {
        return Err(exhausted(&limited));
    }

    loop {
        let mut header = String::new();
        if limited.read_line(&mut header).await? == 0 {
            return Err(exhausted(&limited));
        }
        if header == "\r\n" || header == "\n" {
            break;
        }
    }

    parse_request_line(request_line.trim_end())
}

/// Distinguish a hit size limit from a peer that hung up early
fn exhausted<R: AsyncRead>(limited: &Take<R>) -> HttpError {
    if limited.limit() == 0 {
        HttpError::HeadTooLarge
    } else {
        HttpError::Incomplete
    }
}

fn parse_request_line(line: &str) -> Result<Request, HttpError> {
    let mut parts = line.split_whitespace();
    let (Some(method), Some(target), Some(version)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(HttpError::BadRequestLine(line.to_string()));
    };
    if !version.starts_with("HTTP/") || !target.starts_with('/') {
        return Err(HttpError::BadRequestLine(line.to_string()));
    }

    let path = target.split(['?', '#']).next().unwrap_or("/").to_string();

    Ok(Request {
        method: Method::parse(method),
        method_name: method.to_string(),
        path,
    })
}

/// A complete response with an in-memory body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// Extra headers such as `Allow` or `Location`
    pub headers: Vec<(&'static str, String)>,
}

impl Response {
    pub fn new(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
            headers: Vec::new(),
        }
    }

    pub fn html(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, "text/html; charset=utf-8", body)
    }

    pub fn text(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, "text/plain; charset=utf-8", body)
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Write the response; HEAD requests get headers only
    pub async fn write_to<W>(&self, writer: &mut W, include_body: bool) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let mut head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n",
            self.status,
            reason_phrase(self.status),
            self.content_type,
            self.body.len()
        );
        for (name, value) in &self.headers {
            head.push_str(&format!("{}: {}\r\n", name, value));
        }
        head.push_str("\r\n");

        writer.write_all(head.as_bytes()).await?;
        if include_body {
            writer.write_all(&self.body).await?;
        }
        writer.flush().await
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        301 => "Moved Permanently",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        431 => "Request Header Fields Too Large",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Decode `%XX` escapes in a URL path. `None` if the result is not UTF-8
/// or an escape is malformed.
pub fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input.get(i + 1..i + 3)?;
            if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return None;
            }
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

/// Content type by file extension
pub fn content_type_for(path: &std::path::Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("md") | Some("txt") => "text/plain; charset=utf-8",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}
