//! Media catalog and listing
//!
//! This module owns the scanned index of media files and the rendering of the
//! listing page that links to them.

pub mod catalog;
pub mod listing;

pub use catalog::{CatalogError, MediaCatalog};
pub use listing::{ListingRenderer, TemplateRenderer};
