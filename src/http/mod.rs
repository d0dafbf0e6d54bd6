//! HTTP protocol implementation.
//!
//! This module implements the small subset of HTTP/1.1 that browsers and
//! DLNA/UPnP renderers need to list and play media: GET and HEAD, a single
//! `Range: bytes=<start>-` per request, and `Connection: close` on every
//! response. There is no keep-alive, chunked encoding, or multi-range.
//!
//! # Architecture
//!
//! - **`connection`**: Reads one request, routes it, answers, and closes
//! - **`parser`**: Frames and parses request heads from byte buffers
//! - **`request`**: HTTP request representation and header lookup
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes response heads to the client
//! - **`streamer`**: Sends files whole or from a byte offset, in chunks
//! - **`mime`**: MIME type detection and HTTP date formatting
//!
//! # Connection Lifecycle
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Buffer bytes until the blank line
//!        └──────┬──────┘
//!               │ Request head received
//!               ▼
//!        ┌──────────────────┐
//!        │     Routing      │ ← favicon / bad method → close silently
//!        └──────┬───────────┘
//!               │ Listing, HEAD, or file
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Head, then body in bounded chunks
//!        └──────┬───────────┘
//!               │
//!               ▼
//!             Closed  ← socket shut down, gate permit released
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod streamer;
pub mod writer;
