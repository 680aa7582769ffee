//! Liteserve - Static File Web Server
//!
//! Core library for serving a directory tree over HTTP, with optional
//! directory listings and configurable error documents.

pub mod config;
pub mod http;
pub mod observe;
pub mod serve;
pub mod server;
