use anyhow::bail;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::{Body, Response};

const HTTP_VERSION: &str = "HTTP/1.0";

/// Size of each chunk copied from a file to the client.
pub const CHUNK_SIZE: usize = 1024;

/// Serializes the status line, headers and the blank separator line.
pub fn serialize_head(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    for (k, v) in &resp.headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// Writes one response to a stream, body last.
///
/// File bodies are never held in memory; they are copied `CHUNK_SIZE`
/// bytes at a time.
pub struct ResponseWriter {
    head: Vec<u8>,
    body: Body,
}

impl ResponseWriter {
    pub fn new(response: Response) -> Self {
        Self {
            head: serialize_head(&response),
            body: response.body,
        }
    }

    /// Sends the response and returns the number of body bytes written.
    pub async fn write_to_stream<W>(self, stream: &mut W) -> anyhow::Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        stream.write_all(&self.head).await?;

        let sent = match self.body {
            Body::Static(bytes) => {
                stream.write_all(&bytes).await?;
                bytes.len() as u64
            }
            Body::File { mut file, len } => {
                let mut chunk = [0u8; CHUNK_SIZE];
                let mut remaining = len;

                while remaining > 0 {
                    let want = remaining.min(CHUNK_SIZE as u64) as usize;
                    let n = file.read(&mut chunk[..want]).await?;

                    if n == 0 {
                        bail!("file shrank while sending, {} of {} bytes missing", remaining, len);
                    }

                    stream.write_all(&chunk[..n]).await?;
                    remaining -= n as u64;
                }
                len
            }
        };

        stream.flush().await?;
        Ok(sent)
    }
}
