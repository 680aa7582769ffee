//! File-serving pipeline
//!
//! This module turns incoming requests into responses against the published
//! directory tree: path sanitization, the resolution cascade, directory
//! listings, and the configurable error documents.

pub mod error_docs;
pub mod listing;
pub mod resolver;
pub mod sanitize;

pub use error_docs::ErrorDocs;
pub use listing::ListingEntry;
pub use resolver::resolve;
pub use sanitize::{SanitizeError, sanitize};
