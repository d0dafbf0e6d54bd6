//! mediaserve - Minimal media server
//!
//! Core library: media catalog, the HTTP subset spoken to browsers and
//! DLNA/UPnP renderers, range-aware file streaming, and the bounded
//! connection scheduler.

pub mod config;
pub mod http;
pub mod media;
pub mod server;
