use std::collections::HashMap;

use bytes::{Bytes, BytesMut};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

use crate::http::request::{Method, Request};

/// Upper bound on the up-front allocation for a request body.
/// Larger bodies grow the buffer as bytes actually arrive.
const MAX_BODY_PREALLOC: usize = 64 * 1024;

/// Longest request line or header line accepted, terminator included.
pub const MAX_LINE_LEN: usize = 8 * 1024;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed request line")]
    MalformedRequestLine,
    #[error("stream closed before the request head was complete")]
    StreamClosed,
    #[error("request head line exceeds {MAX_LINE_LEN} bytes")]
    LineTooLong,
    #[error("truncated body: expected {expected} bytes, received {received}")]
    TruncatedBody { expected: usize, received: usize },
    #[error("invalid Content-Length: {0:?}")]
    InvalidContentLength(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

enum Line {
    /// A line with its terminator (`\n` or `\r\n`) stripped.
    Complete(Vec<u8>),
    /// Whatever was read before the stream ended.
    Eof(Vec<u8>),
}

/// Reads one request from a byte stream.
///
/// The head (request line and headers) is consumed by [`read_request`].
/// The body stays in the stream until a handler asks for it with
/// [`read_body`], so nothing beyond the declared length is ever consumed.
///
/// [`read_request`]: RequestReader::read_request
/// [`read_body`]: RequestReader::read_body
pub struct RequestReader<S> {
    inner: BufReader<S>,
}

impl<S: AsyncRead + Unpin> RequestReader<S> {
    pub fn new(stream: S) -> Self {
        Self {
            inner: BufReader::new(stream),
        }
    }

    /// Access to the underlying stream, e.g. to write the response.
    pub fn get_mut(&mut self) -> &mut S {
        self.inner.get_mut()
    }

    /// Reads the request line and headers.
    ///
    /// Returns `Ok(None)` if the peer closed without sending a single byte.
    /// Fails with [`ParseError::StreamClosed`] if the peer closed before the
    /// blank line ending the headers, and with
    /// [`ParseError::MalformedRequestLine`] if the first line is cut short,
    /// is not UTF-8, has fewer than three tokens, or has a path without a
    /// leading `/`. Any head line longer than [`MAX_LINE_LEN`] is
    /// [`ParseError::LineTooLong`].
    pub async fn read_request(&mut self) -> Result<Option<Request>, ParseError> {
        let line = match self.read_line().await? {
            Line::Complete(line) => line,
            Line::Eof(partial) if partial.is_empty() => return Ok(None),
            Line::Eof(_) => return Err(ParseError::MalformedRequestLine),
        };

        let (method, path, version) = parse_request_line(&line)?;
        let headers = self.read_headers().await?;

        Ok(Some(Request {
            method,
            path,
            version,
            headers,
        }))
    }

    /// Reads exactly `len` body bytes.
    ///
    /// Returns [`ParseError::TruncatedBody`] if the stream ends first.
    pub async fn read_body(&mut self, len: usize) -> Result<Bytes, ParseError> {
        let mut body = BytesMut::with_capacity(len.min(MAX_BODY_PREALLOC));
        let mut limited = (&mut self.inner).take(len as u64);

        while body.len() < len {
            let n = limited.read_buf(&mut body).await?;
            if n == 0 {
                return Err(ParseError::TruncatedBody {
                    expected: len,
                    received: body.len(),
                });
            }
        }

        Ok(body.freeze())
    }

    /// Consumes and drops up to `len` body bytes a handler left unread, so
    /// the socket is not closed with data pending. Returns how many were
    /// dropped; an early end of stream is not an error here.
    pub async fn discard_body(&mut self, len: usize) -> Result<u64, ParseError> {
        let mut limited = (&mut self.inner).take(len as u64);
        Ok(tokio::io::copy(&mut limited, &mut tokio::io::sink()).await?)
    }

    async fn read_headers(&mut self) -> Result<HashMap<String, String>, ParseError> {
        let mut headers = HashMap::new();

        loop {
            let line = match self.read_line().await? {
                Line::Complete(line) => line,
                Line::Eof(_) => return Err(ParseError::StreamClosed),
            };

            if line.is_empty() {
                return Ok(headers);
            }

            // Lines without a colon are skipped, not rejected
            if let Some((key, value)) = parse_header_line(&String::from_utf8_lossy(&line)) {
                headers.insert(key, value);
            }
        }
    }

    async fn read_line(&mut self) -> Result<Line, ParseError> {
        let mut buf = Vec::new();
        (&mut self.inner)
            .take(MAX_LINE_LEN as u64)
            .read_until(b'\n', &mut buf)
            .await?;

        if buf.last() != Some(&b'\n') {
            if buf.len() >= MAX_LINE_LEN {
                return Err(ParseError::LineTooLong);
            }
            return Ok(Line::Eof(buf));
        }

        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }

        Ok(Line::Complete(buf))
    }
}

/// Splits `METHOD PATH VERSION` on whitespace. Extra tokens are ignored and
/// the version is not checked against a particular protocol revision.
pub fn parse_request_line(line: &[u8]) -> Result<(Method, String, String), ParseError> {
    let line = std::str::from_utf8(line).map_err(|_| ParseError::MalformedRequestLine)?;
    let mut parts = line.split_whitespace();

    let method = parts.next().ok_or(ParseError::MalformedRequestLine)?;
    let path = parts.next().ok_or(ParseError::MalformedRequestLine)?;
    let version = parts.next().ok_or(ParseError::MalformedRequestLine)?;

    if !path.starts_with('/') {
        return Err(ParseError::MalformedRequestLine);
    }

    Ok((Method::from(method), path.to_string(), version.to_string()))
}

/// Splits a header line on its first `:` and trims both halves.
pub fn parse_header_line(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once(':')?;
    Some((key.trim().to_string(), value.trim().to_string()))
}
