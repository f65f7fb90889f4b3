use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};
use tracing::debug;

use crate::http::request::ParsedRequest;

/// Longest request or header line accepted, excluding the line terminator.
pub const MAX_LINE_LEN: usize = 8 * 1024;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("connection closed before a request line was received")]
    EmptyRequest,

    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),

    #[error("connection closed before the end of the header block")]
    UnterminatedHeaders,

    #[error("request line or header exceeds the line length limit")]
    LineTooLong,

    #[error("failed to read request")]
    Io(#[from] std::io::Error),
}

/// Reads one request head from `reader`.
///
/// The request line is split on whitespace; the first token (the method) is
/// ignored and the second one becomes the target path. Header lines are read
/// and thrown away up to the blank line that ends the head.
pub async fn parse_request<R>(reader: &mut R) -> Result<ParsedRequest, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let request_line = read_line(reader).await?.ok_or(ParseError::EmptyRequest)?;
    debug!(request_line = %request_line, "Request line received");

    let target_path = parse_request_line(&request_line)?.to_string();

    loop {
        match read_line(reader).await? {
            Some(line) if line.is_empty() => break,
            Some(line) => debug!(header = %line, "Discarding header"),
            None => return Err(ParseError::UnterminatedHeaders),
        }
    }

    Ok(ParsedRequest::new(target_path))
}

/// Extracts the target path (second whitespace-separated token) from a
/// request line.
pub fn parse_request_line(line: &str) -> Result<&str, ParseError> {
    let mut tokens = line.split_whitespace();
    let _method = tokens.next();

    tokens
        .next()
        .ok_or_else(|| ParseError::MalformedRequestLine(line.to_string()))
}

/// Reads a single line without its `\n` or `\r\n` terminator.
///
/// Returns `None` at end of stream. A final line with no terminator is still
/// returned as a line.
async fn read_line<R>(reader: &mut R) -> Result<Option<String>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let limit = (MAX_LINE_LEN + 2) as u64;
    let n = (&mut *reader).take(limit).read_until(b'\n', &mut buf).await?;

    if n == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }

    if buf.len() > MAX_LINE_LEN {
        return Err(ParseError::LineTooLong);
    }

    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}
