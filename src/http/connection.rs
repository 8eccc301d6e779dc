use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::handlers;
use crate::http::parser::RequestReader;
use crate::http::request::Request;
use crate::http::writer::ResponseWriter;
use crate::routing::Route;
use crate::storage::FileStore;

/// Drives exactly one request/response cycle over a byte stream.
pub struct Connection<S> {
    reader: RequestReader<S>,
    store: Arc<FileStore>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    pub fn new(stream: S, store: Arc<FileStore>) -> Self {
        Self {
            reader: RequestReader::new(stream),
            store,
            state: ConnectionState::Reading,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Runs the cycle to completion. Transport-level failures (bad request
    /// line, peer gone mid-head, write errors) are returned without a
    /// response having been sent.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    match self.reader.read_request().await? {
                        Some(req) => {
                            self.state = ConnectionState::Processing(req);
                        }
                        None => {
                            debug!("Peer closed without sending a request");
                            self.state = ConnectionState::Closed;
                        }
                    }
                }

                ConnectionState::Processing(req) => {
                    let route = Route::resolve(&req.method, &req.path);
                    debug!(
                        method = %req.method,
                        path = %req.path,
                        route = route.name(),
                        "Dispatching request"
                    );

                    let reads_body = matches!(route, Route::FilePost(_));
                    let response =
                        handlers::dispatch(route, &req, &mut self.reader, &self.store).await;
                    debug!(status = response.status.as_u16(), "Response ready");

                    if !reads_body {
                        self.discard_unread_body(&req).await;
                    }

                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(mut writer) => {
                    writer.write_to_stream(self.reader.get_mut()).await?;

                    // No keep-alive: one request per connection
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        if let Err(e) = self.reader.get_mut().shutdown().await {
            debug!(error = %e, "Shutdown after response failed");
        }

        Ok(())
    }

    /// Drops a declared body the route ignored, so closing the socket does
    /// not reset the connection under the response.
    async fn discard_unread_body(&mut self, req: &Request) {
        let Ok(Some(len)) = req.content_length() else {
            return;
        };

        if let Err(e) = self.reader.discard_body(len).await {
            debug!(error = %e, "Discarding unread body failed");
        }
    }
}
