use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::config::StaticFilesConfig;
use crate::http::parser::{LineRead, ParseError, parse_request_line, read_line};
use crate::http::request::Request;
use crate::http::resolve::resolve;
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;

/// One client connection, served exactly once and then closed.
pub struct Connection<S> {
    stream: BufReader<S>,
    peer: SocketAddr,
    static_files: Arc<StaticFilesConfig>,
    line: Vec<u8>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(Response),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: SocketAddr, static_files: Arc<StaticFilesConfig>) -> Self {
        Self {
            stream: BufReader::new(stream),
            peer,
            static_files,
            line: Vec::with_capacity(256),
            state: ConnectionState::Reading,
        }
    }

    /// Drives the connection to `Closed`.
    ///
    /// I/O errors are returned to the caller; the stream is dropped either way.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        Some(Ok(req)) => ConnectionState::Processing(req),
                        Some(Err(e)) => {
                            warn!(peer = %self.peer, error = ?e, "Malformed request");
                            ConnectionState::Writing(Response::bad_request())
                        }
                        None => {
                            debug!(peer = %self.peer, "Client closed before sending a request");
                            ConnectionState::Closed
                        }
                    };
                }

                ConnectionState::Processing(req) => {
                    let response = self.handle_request(&req).await;
                    self.state = ConnectionState::Writing(response);
                }

                ConnectionState::Writing(response) => {
                    let status = response.status;
                    let sent = ResponseWriter::new(response)
                        .write_to_stream(self.stream.get_mut())
                        .await?;

                    match status {
                        StatusCode::Ok => info!(
                            peer = %self.peer,
                            "Sent: {} {} ({} bytes)",
                            status.as_u16(),
                            status.reason_phrase(),
                            sent
                        ),
                        _ => info!(
                            peer = %self.peer,
                            "Sent: {} {}",
                            status.as_u16(),
                            status.reason_phrase()
                        ),
                    }
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    // peer may already be gone
                    let _ = self.stream.get_mut().shutdown().await;
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads the request line and discards the headers after it.
    ///
    /// Returns `None` if the peer closed before sending a non-empty line.
    async fn read_request(&mut self) -> anyhow::Result<Option<Result<Request, ParseError>>> {
        let parsed = loop {
            match read_line(&mut self.stream, &mut self.line).await? {
                LineRead::Eof => return Ok(None),
                LineRead::TooLong => break Err(ParseError::LineTooLong),
                LineRead::Line if self.line.is_empty() => continue,
                LineRead::Line => {
                    info!(peer = %self.peer, "{}", String::from_utf8_lossy(&self.line));
                    break parse_request_line(&self.line);
                }
            }
        };

        self.consume_headers().await?;
        Ok(Some(parsed))
    }

    async fn consume_headers(&mut self) -> anyhow::Result<()> {
        loop {
            match read_line(&mut self.stream, &mut self.line).await? {
                LineRead::Eof => break,
                LineRead::Line if self.line.is_empty() => break,
                LineRead::Line | LineRead::TooLong => continue,
            }
        }
        Ok(())
    }

    async fn handle_request(&self, req: &Request) -> Response {
        match resolve(&self.static_files, &req.path).await {
            Ok(file) => {
                debug!(peer = %self.peer, path = %file.path.display(), "Serving file");
                Response::file(file)
            }
            Err(e) => {
                debug!(peer = %self.peer, path = %req.path, error = ?e, "No file for request");
                Response::not_found()
            }
        }
    }
}
