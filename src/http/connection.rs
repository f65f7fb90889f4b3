use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf, WriteHalf};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::http::parser::{ParseError, parse_request};
use crate::http::request::ParsedRequest;
use crate::http::resolver::Resolver;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

/// Optional limits on how long one connection may take.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timeouts {
    /// Bound on reading the request line and headers.
    pub read: Option<Duration>,
    /// Bound on writing the whole response.
    pub write: Option<Duration>,
}

/// Handles exactly one request on one connection, then closes it.
pub struct Connection<S> {
    reader: BufReader<ReadHalf<S>>,
    writer: WriteHalf<S>,
    resolver: Arc<Resolver>,
    timeouts: Timeouts,
    state: ConnectionState,
}

pub(crate) enum ConnectionState {
    Parsing,
    Resolving(ParsedRequest),
    Responding(ParsedRequest, Response),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite,
{
    pub fn new(stream: S, resolver: Arc<Resolver>) -> Self {
        let (read_half, write_half) = tokio::io::split(stream);

        Self {
            reader: BufReader::new(read_half),
            writer: write_half,
            resolver,
            timeouts: Timeouts::default(),
            state: ConnectionState::Parsing,
        }
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Runs the connection to completion.
    ///
    /// The output stream is shut down and the stream released on every exit
    /// path, including parse failures and I/O errors.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let result = self.drive().await;

        // Output first, then the input wrapper, then the connection.
        let shutdown = self.writer.shutdown().await;
        let Connection { reader, writer, .. } = self;
        drop(reader);
        drop(writer);

        result?;
        shutdown.context("failed to close connection")
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::Parsing => {
                    let read = parse_request(&mut self.reader);
                    let parsed = with_timeout(self.timeouts.read, read)
                        .await
                        .context("timed out reading request")?;

                    match parsed {
                        Ok(request) => ConnectionState::Resolving(request),
                        Err(ParseError::Io(e)) => {
                            return Err(e).context("failed to read request");
                        }
                        Err(ParseError::EmptyRequest) => {
                            debug!("Empty request, closing");
                            ConnectionState::Closed
                        }
                        Err(e) => {
                            warn!(error = %e, "Bad request, closing without a response");
                            ConnectionState::Closed
                        }
                    }
                }

                ConnectionState::Resolving(request) => {
                    let resolved = self.resolver.resolve(&request.target_path).await;
                    ConnectionState::Responding(request, Response::from(resolved))
                }

                ConnectionState::Responding(request, response) => {
                    let status = response.status;
                    let writer = ResponseWriter::new(response);

                    let write = writer.write_to_stream(&mut self.writer);
                    let written = with_timeout(self.timeouts.write, write)
                        .await
                        .context("timed out writing response")?
                        .context("failed to write response")?;

                    info!(
                        status = status.as_u16(),
                        path = %request.target_path,
                        bytes = written,
                        "Request served"
                    );
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }
}

async fn with_timeout<F>(
    limit: Option<Duration>,
    fut: F,
) -> Result<F::Output, tokio::time::error::Elapsed>
where
    F: Future,
{
    match limit {
        Some(limit) => timeout(limit, fut).await,
        None => Ok(fut.await),
    }
}
