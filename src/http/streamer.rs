//! Range-aware file transmission
//!
//! A file is delivered either whole (`200 OK`) or from a byte offset to the
//! end of the file (`206 Partial Content`), always in bounded chunks so that
//! large movies never sit in memory. The running flag is polled before every
//! chunk, so a server stop is observed within one chunk's transfer time.

use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWrite, AsyncWriteExt};

use crate::http::mime;
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::http::writer::ResponseWriter;
use crate::server::shutdown::Shutdown;

/// Chunk size for whole files up to [`LARGE_FILE_THRESHOLD`] bytes.
pub const SMALL_CHUNK: usize = 50_000;

/// Chunk size for large files and for every ranged transfer.
pub const LARGE_CHUNK: usize = 500_000;

/// Files above this size are sent with [`LARGE_CHUNK`].
pub const LARGE_FILE_THRESHOLD: u64 = 8_000_000;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while streaming: {0}")]
    Io(#[from] std::io::Error),
}

/// A parsed `Range: bytes=<start>-[<end>]` header.
///
/// Only `start` is honored; a transfer always runs to end-of-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: Option<u64>,
}

impl ByteRange {
    /// Parses a range header value. Unparsable text yields a start of 0.
    ///
    /// # Example
    ///
    /// ```
    /// # use mediaserve::http::streamer::ByteRange;
    /// assert_eq!(ByteRange::parse("bytes=100-").start, 100);
    /// assert_eq!(ByteRange::parse("bytes=100-199").end, Some(199));
    /// assert_eq!(ByteRange::parse("garbage").start, 0);
    /// ```
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        let ranges = match value.get(..6) {
            Some(prefix) if prefix.eq_ignore_ascii_case("bytes=") => &value[6..],
            _ => value,
        };

        let (start, end) = ranges.split_once('-').unwrap_or((ranges, ""));

        Self {
            start: start.trim().parse().unwrap_or(0),
            end: end.trim().parse().ok(),
        }
    }
}

/// How a file is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Whole file, `200 OK`.
    Full,
    /// From the given offset to end-of-file, `206 Partial Content`.
    Range(u64),
}

impl DeliveryMode {
    /// Picks the mode for a file given the request's `Range` header.
    ///
    /// Music and images are always sent whole.
    pub fn select(path: &Path, range: Option<&str>) -> Self {
        let name = path.to_string_lossy();
        match range {
            Some(value) if !mime::is_music_or_image(&name) => {
                DeliveryMode::Range(ByteRange::parse(value).start)
            }
            _ => DeliveryMode::Full,
        }
    }
}

/// Chunk size used for a whole-file transfer.
pub fn full_chunk_size(file_len: u64) -> usize {
    if file_len > LARGE_FILE_THRESHOLD {
        LARGE_CHUNK
    } else {
        SMALL_CHUNK
    }
}

/// How a transfer ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Every byte up to end-of-file was written.
    Completed,
    /// The running flag cleared before the end.
    Stopped,
    /// The peer went away mid-transfer.
    Disconnected,
}

/// State of one file transfer.
#[derive(Debug)]
pub struct TransferContext {
    pub path: PathBuf,
    pub file_len: u64,
    /// First byte sent (0 for a whole-file transfer).
    pub start: u64,
    pub chunk_size: usize,
    /// Body bytes written so far.
    pub bytes_sent: u64,
    pub outcome: TransferOutcome,
}

impl TransferContext {
    /// Number of body bytes a complete transfer sends.
    pub fn expected(&self) -> u64 {
        self.file_len - self.start
    }
}

/// Streams files to clients.
#[derive(Debug, Clone)]
pub struct RangeStreamer {
    shutdown: Shutdown,
    server_name: String,
}

impl RangeStreamer {
    pub fn new(shutdown: Shutdown, server_name: impl Into<String>) -> Self {
        Self {
            shutdown,
            server_name: server_name.into(),
        }
    }

    /// Sends `path` to `out`: the response head, then the body chunk by chunk.
    ///
    /// The file handle is owned by this call and closed on every return path.
    /// A peer that disconnects is reported as [`TransferOutcome::Disconnected`],
    /// not as an error.
    pub async fn send<W>(
        &self,
        out: &mut W,
        path: &Path,
        mode: DeliveryMode,
    ) -> Result<TransferContext, StreamError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut file = File::open(path).await.map_err(|source| StreamError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let file_len = file.metadata().await?.len();

        let (start, chunk_size) = match mode {
            // Nothing to range over; a start past the end restarts from 0.
            DeliveryMode::Range(_) if file_len == 0 => (None, full_chunk_size(file_len)),
            DeliveryMode::Range(start) if start >= file_len => (Some(0), LARGE_CHUNK),
            DeliveryMode::Range(start) => (Some(start), LARGE_CHUNK),
            DeliveryMode::Full => (None, full_chunk_size(file_len)),
        };

        let content_type = mime::content_type(&path.to_string_lossy());
        let head = match start {
            Some(start) => self.partial_head(content_type, start, file_len),
            None => self.full_head(content_type, file_len),
        };

        let mut ctx = TransferContext {
            path: path.to_path_buf(),
            file_len,
            start: start.unwrap_or(0),
            chunk_size,
            bytes_sent: 0,
            outcome: TransferOutcome::Completed,
        };

        tracing::debug!(
            path = %path.display(),
            status = head.status.as_u16(),
            start = ctx.start,
            bytes = ctx.expected(),
            file_len,
            "Sending file"
        );

        if let Err(e) = ResponseWriter::new(&head).write_to_stream(out).await {
            return disconnected_or(ctx, e);
        }

        if ctx.start > 0 {
            file.seek(SeekFrom::Start(ctx.start)).await?;
        }

        let mut buf = vec![0u8; chunk_size];
        loop {
            if !self.shutdown.is_running() {
                ctx.outcome = TransferOutcome::Stopped;
                break;
            }

            let n = file.read(&mut buf).await?;
            if n == 0 {
                break;
            }

            if let Err(e) = out.write_all(&buf[..n]).await {
                return disconnected_or(ctx, e);
            }
            ctx.bytes_sent += n as u64;
        }

        if ctx.outcome == TransferOutcome::Completed {
            if let Err(e) = out.flush().await {
                return disconnected_or(ctx, e);
            }
        }

        Ok(ctx)
    }

    fn full_head(&self, content_type: &str, file_len: u64) -> Response {
        ResponseBuilder::new(StatusCode::Ok)
            .header("Server", self.server_name.as_str())
            .header("Content-Type", content_type)
            .header("Accept-Ranges", "bytes")
            .header("Date", mime::now())
            .header("Content-Length", file_len.to_string())
            .build()
    }

    fn partial_head(&self, content_type: &str, start: u64, file_len: u64) -> Response {
        ResponseBuilder::new(StatusCode::PartialContent)
            .header("Server", self.server_name.as_str())
            .header("Content-Type", content_type)
            .header("Accept-Ranges", "bytes")
            .header("Date", mime::now())
            .header("Content-Length", (file_len - start).to_string())
            .header(
                "Content-Range",
                format!("bytes {}-{}/{}", start, file_len - 1, file_len),
            )
            .build()
    }
}

fn disconnected_or(
    mut ctx: TransferContext,
    err: std::io::Error,
) -> Result<TransferContext, StreamError> {
    if is_disconnect(&err) {
        ctx.outcome = TransferOutcome::Disconnected;
        Ok(ctx)
    } else {
        Err(StreamError::Io(err))
    }
}

/// I/O errors meaning the peer is gone rather than that something broke.
pub fn is_disconnect(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::BrokenPipe
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected
            | ErrorKind::WriteZero
            | ErrorKind::UnexpectedEof
    )
}
