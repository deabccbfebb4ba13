use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::http::request::{Method, Request};

/// Longest request or header line accepted, terminator excluded.
pub const MAX_LINE_LEN: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Blank request line
    Empty,
    /// Not exactly three whitespace-separated tokens
    InvalidRequestLine,
    /// Request line is not valid UTF-8
    InvalidEncoding,
    /// Line exceeds `MAX_LINE_LEN`
    LineTooLong,
}

/// Outcome of reading one line from the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRead {
    /// A line is in the buffer, terminator stripped.
    Line,
    /// The line was longer than `MAX_LINE_LEN` and has been discarded.
    TooLong,
    /// The peer closed before sending any byte of a new line.
    Eof,
}

/// Parses `METHOD SP PATH SP VERSION`.
///
/// Runs of whitespace separate tokens. Method and version are not validated.
pub fn parse_request_line(line: &[u8]) -> Result<Request, ParseError> {
    let line = std::str::from_utf8(line).map_err(|_| ParseError::InvalidEncoding)?;

    let mut parts = line.split_whitespace();
    let method = parts.next().ok_or(ParseError::Empty)?;
    let path = parts.next().ok_or(ParseError::InvalidRequestLine)?;
    let version = parts.next().ok_or(ParseError::InvalidRequestLine)?;

    if parts.next().is_some() {
        return Err(ParseError::InvalidRequestLine);
    }

    Ok(Request {
        method: Method::parse(method),
        path: path.to_string(),
        version: version.to_string(),
    })
}

/// Reads one LF-terminated line into `buf`, replacing its contents.
///
/// The trailing LF and an optional CR before it are removed. A final line
/// cut off by EOF is returned as a normal line. An overlong line is read
/// through to its LF and discarded, so the next call starts on a fresh line.
pub async fn read_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();

    // room for the CR LF terminator
    let limit = (MAX_LINE_LEN + 2) as u64;
    let n = (&mut *reader).take(limit).read_until(b'\n', buf).await?;

    if n == 0 {
        return Ok(LineRead::Eof);
    }

    if buf.last() != Some(&b'\n') {
        if n as u64 == limit {
            skip_line(reader, buf).await?;
            return Ok(LineRead::TooLong);
        }
        return Ok(LineRead::Line);
    }

    buf.pop();
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }

    if buf.len() > MAX_LINE_LEN {
        buf.clear();
        return Ok(LineRead::TooLong);
    }

    Ok(LineRead::Line)
}

/// Discards input up to and including the next LF, in bounded pieces.
async fn skip_line<R>(reader: &mut R, scratch: &mut Vec<u8>) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        scratch.clear();
        let n = (&mut *reader)
            .take(MAX_LINE_LEN as u64)
            .read_until(b'\n', scratch)
            .await?;

        if n == 0 || scratch.last() == Some(&b'\n') {
            scratch.clear();
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = parse_request_line(b"GET / HTTP/1.1").unwrap();

        assert_eq!(req.method, Method::GET);
        assert_eq!(req.path, "/");
        assert_eq!(req.version, "HTTP/1.1");
    }

    #[tokio::test]
    async fn read_line_strips_crlf() {
        let mut input: &[u8] = b"GET / HTTP/1.0\r\nHost: x\r\n";
        let mut buf = Vec::new();

        assert_eq!(read_line(&mut input, &mut buf).await.unwrap(), LineRead::Line);
        assert_eq!(buf, b"GET / HTTP/1.0");
        assert_eq!(read_line(&mut input, &mut buf).await.unwrap(), LineRead::Line);
        assert_eq!(buf, b"Host: x");
        assert_eq!(read_line(&mut input, &mut buf).await.unwrap(), LineRead::Eof);
    }
}
