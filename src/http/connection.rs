use bytes::BytesMut;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::http::mime;
use crate::http::parser::{MAX_HEAD_SIZE, find_headers_end, parse_http_request};
use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::http::streamer::{DeliveryMode, RangeStreamer, TransferOutcome, is_disconnect};
use crate::http::writer::ResponseWriter;
use crate::media::{ListingRenderer, MediaCatalog};
use crate::server::gate::ConnectionPermit;

/// Everything a connection needs, shared read-only between workers.
pub struct ConnectionContext {
    pub catalog: Arc<MediaCatalog>,
    pub renderer: Arc<dyn ListingRenderer>,
    pub streamer: RangeStreamer,
    pub server_name: String,
}

/// Where a request goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Close without answering: malformed request line, favicon, or a
    /// method other than GET/HEAD.
    Ignore,
    /// Directory listing page.
    Listing { head_only: bool },
    /// Headers of a catalog entry.
    Head(i64),
    /// Contents of a catalog entry.
    Media(i64),
}

impl Route {
    /// Decides how to answer `req`.
    ///
    /// # Example
    ///
    /// ```
    /// # use mediaserve::http::connection::Route;
    /// # use mediaserve::http::parser::parse_http_request;
    /// let req = parse_http_request(b"GET /3 HTTP/1.1\r\n\r\n");
    /// assert_eq!(Route::of(&req), Route::Media(3));
    /// ```
    pub fn of(req: &Request) -> Self {
        if req.is_malformed() || req.target.contains("favicon.ico") {
            return Route::Ignore;
        }

        let Some(method) = req.method_kind() else {
            return Route::Ignore;
        };

        match (method, req.index()) {
            (Method::GET, Some(i)) => Route::Media(i),
            (Method::HEAD, Some(i)) => Route::Head(i),
            (method, None) => Route::Listing {
                head_only: method == Method::HEAD,
            },
        }
    }
}

/// One accepted client.
///
/// Owns the socket and the gate permit for its whole lifetime; both are
/// released when the connection is dropped.
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    buffer: BytesMut,
    ctx: Arc<ConnectionContext>,
    permit: ConnectionPermit,
}

impl Connection {
    pub fn new(
        stream: TcpStream,
        peer: SocketAddr,
        permit: ConnectionPermit,
        ctx: Arc<ConnectionContext>,
    ) -> Self {
        Self {
            stream,
            peer,
            buffer: BytesMut::with_capacity(4096),
            ctx,
            permit,
        }
    }

    /// Serves a single request and closes the connection.
    ///
    /// Errors are logged here and never reach the accept loop.
    pub async fn run(mut self) {
        if let Err(e) = self.serve().await {
            tracing::error!(peer = %self.peer, error = %e, "Error processing request");
        }
        self.close().await;
    }

    async fn serve(&mut self) -> anyhow::Result<()> {
        let Some(request) = self.read_request().await? else {
            tracing::debug!(peer = %self.peer, "Connection closed before a request arrived");
            return Ok(());
        };

        tracing::debug!(
            peer = %self.peer,
            method = %request.method,
            target = %request.target,
            headers = ?request.headers,
            "Request received"
        );

        match Route::of(&request) {
            Route::Ignore => {
                tracing::debug!(peer = %self.peer, method = %request.method, "Closing without response");
                Ok(())
            }
            Route::Listing { head_only } => self.send_listing(head_only).await,
            Route::Head(index) => self.send_head(index).await,
            Route::Media(index) => self.send_media(index, &request).await,
        }
    }

    /// Reads until the blank line ending the request head.
    ///
    /// If the peer stops sending before that, whatever arrived is parsed.
    pub async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        loop {
            if let Some(end) = find_headers_end(&self.buffer) {
                return Ok(Some(parse_http_request(&self.buffer[..end])));
            }

            if self.buffer.len() > MAX_HEAD_SIZE {
                tracing::warn!(peer = %self.peer, size = self.buffer.len(), "Request head too large");
                return Ok(None);
            }

            let n = self.stream.read_buf(&mut self.buffer).await?;
            tracing::trace!(peer = %self.peer, bytes = n, "Received bytes");

            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(parse_http_request(&self.buffer)));
            }
        }
    }

    async fn send_listing(&mut self, head_only: bool) -> anyhow::Result<()> {
        let catalog = &self.ctx.catalog;
        let page = self.ctx.renderer.render(catalog.root(), &catalog.listing());
        let now = mime::now();

        let response = ResponseBuilder::new(StatusCode::Ok)
            .header("Server", self.ctx.server_name.as_str())
            .header("Content-Type", "text/html")
            .header("Last-Modified", now.as_str())
            .header("Date", now)
            .header("Accept-Ranges", "bytes")
            .body(page.into_bytes())
            .build();

        let response = if head_only { response.into_head() } else { response };
        self.respond(&response).await
    }

    async fn send_head(&mut self, index: i64) -> anyhow::Result<()> {
        let Some((path, len)) = self.lookup(index).await else {
            return self.respond(&Response::not_found()).await;
        };

        tracing::debug!(peer = %self.peer, path = %path.display(), "HEAD requested for file");

        let response = ResponseBuilder::new(StatusCode::Ok)
            .header("Server", self.ctx.server_name.as_str())
            .header("Content-Type", mime::content_type(&path.to_string_lossy()))
            .header("Accept-Ranges", "bytes")
            .header("Content-Length", len.to_string())
            .build();

        self.respond(&response).await
    }

    async fn send_media(&mut self, index: i64, request: &Request) -> anyhow::Result<()> {
        let Some((path, _)) = self.lookup(index).await else {
            return self.respond(&Response::not_found()).await;
        };

        let mode = DeliveryMode::select(&path, request.range());
        tracing::debug!(peer = %self.peer, path = %path.display(), ?mode, "GET requested for file");

        let transfer = self.ctx.streamer.send(&mut self.stream, &path, mode).await?;

        match transfer.outcome {
            TransferOutcome::Completed => tracing::info!(
                peer = %self.peer,
                path = %path.display(),
                bytes = transfer.bytes_sent,
                "File sent"
            ),
            TransferOutcome::Stopped => tracing::info!(
                peer = %self.peer,
                path = %path.display(),
                bytes = transfer.bytes_sent,
                expected = transfer.expected(),
                "Transfer interrupted by shutdown"
            ),
            TransferOutcome::Disconnected => tracing::debug!(
                peer = %self.peer,
                path = %path.display(),
                bytes = transfer.bytes_sent,
                "Client disconnected mid-transfer"
            ),
        }

        Ok(())
    }

    /// Resolves an index to an existing regular file and its length.
    async fn lookup(&self, index: i64) -> Option<(std::path::PathBuf, u64)> {
        let path = match self.ctx.catalog.resolve(index) {
            Ok(path) => path.to_path_buf(),
            Err(e) => {
                tracing::debug!(peer = %self.peer, error = %e, "Index lookup failed");
                return None;
            }
        };

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Some((path, meta.len())),
            _ => {
                tracing::debug!(peer = %self.peer, path = %path.display(), "Catalogued file is gone");
                None
            }
        }
    }

    async fn respond(&mut self, response: &Response) -> anyhow::Result<()> {
        match ResponseWriter::new(response).write_to_stream(&mut self.stream).await {
            Ok(()) => Ok(()),
            Err(e) if is_disconnect(&e) => {
                tracing::debug!(peer = %self.peer, "Client went away before the response was sent");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Best-effort close: shut down the write side, ignore errors from a
    /// peer that already left, then release the socket and the permit.
    pub async fn close(mut self) {
        if let Err(e) = self.stream.shutdown().await {
            if !is_disconnect(&e) {
                tracing::debug!(peer = %self.peer, error = %e, "Socket shutdown failed");
            }
        }
        tracing::info!(
            peer = %self.peer,
            active = self.permit.active() - 1,
            "Client disconnected"
        );
    }
}
