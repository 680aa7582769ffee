//! The request-resolution pipeline.
//!
//! Turns an incoming method and path into exactly one response. The decision
//! sequence is a fixed cascade, each step either terminal or falling through
//! to the next:
//!
//! ```text
//! MethodCheck ──── non-GET rejected ────────────────▶ 405
//!      │
//! PathResolution ─ sanitize, map to candidate file
//!      │
//! FileAttempt ──── regular file found ──────────────▶ 200 (streamed)
//!      │
//! FallbackDecision
//!      ├─ directory, no trailing slash ─────────────▶ 302 to path + "/"
//!      ├─ directory, listings enabled ──────────────▶ 200 (listing)
//!      ├─ directory, listings disabled ─────────────▶ 404
//!      └─ nothing there ────────────────────────────▶ 404
//!
//! any unexpected I/O fault at any step ─────────────▶ 500
//! ```
//!
//! Every filesystem fault is absorbed here; the resolver never returns an
//! error and never panics past the request boundary.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::http::mime;
use crate::http::request::Method;
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::serve::listing;
use crate::serve::sanitize::sanitize;

/// Resolves one request to its response.
///
/// `raw_path` is the URL-encoded request path without a query string; the
/// transport strips queries before resolution so they never reach the
/// filesystem.
pub async fn resolve(config: &ServerConfig, method: Method, raw_path: &str) -> Response {
    // MethodCheck
    if config.accept_only_get && method != Method::GET {
        return method_not_allowed(config);
    }

    // PathResolution
    let path = match sanitize(raw_path) {
        Ok(path) => path,
        Err(err) => {
            // Client-sent garbage; no file can match it.
            debug!(path = %raw_path, error = %err, "unusable request path");
            return not_found(config, raw_path);
        }
    };

    let candidate = candidate_file(config, &path);

    // FileAttempt
    match fs::metadata(&candidate).await {
        Ok(meta) if meta.is_file() => match serve_file(&candidate, meta.len()).await {
            Ok(response) => return response,
            Err(err) => {
                warn!(path = %path, error = %err, "failed to open file");
                return Response::internal_error();
            }
        },
        // Exists but is not a regular file; try the directory fallback.
        Ok(_) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => {
            warn!(path = %path, error = %err, "failed to stat candidate file");
            return Response::internal_error();
        }
    }

    // FallbackDecision
    fallback(config, &path).await
}

/// Maps the sanitized path to the file the request asks for.
///
/// "/" serves the configured root file; a trailing slash serves the
/// directory's `index.html` when that is enabled; everything else maps
/// directly into the published tree.
fn candidate_file(config: &ServerConfig, path: &str) -> PathBuf {
    if path == "/" {
        config
            .root_dir
            .join(config.root_file.trim_start_matches('/'))
    } else if path.ends_with('/') && config.use_index_html {
        config
            .root_dir
            .join(path.trim_start_matches('/'))
            .join("index.html")
    } else {
        config.root_dir.join(path.trim_start_matches('/'))
    }
}

async fn serve_file(candidate: &Path, len: u64) -> std::io::Result<Response> {
    let file = fs::File::open(candidate).await?;
    let content_type = mime::content_type(candidate).unwrap_or("text/plain");

    Ok(ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", content_type)
        .header("Content-Length", len.to_string())
        .file_body(file, len)
        .build())
}

/// The fallback cascade once no file matched: canonicalizing redirect for
/// directories, then listing or not-found.
async fn fallback(config: &ServerConfig, path: &str) -> Response {
    let dir = config
        .root_dir
        .join(path.trim_start_matches('/').trim_end_matches('/'));

    match fs::metadata(&dir).await {
        Ok(meta) if meta.is_dir() => {
            // Canonicalize the directory URL first so relative links inside
            // a listing resolve correctly.
            if !path.ends_with('/') {
                return Response::redirect(format!("{}/", path));
            }

            if !config.serve_index {
                return not_found(config, path);
            }

            match listing::list(&dir, path).await {
                Ok(html) => ResponseBuilder::new(StatusCode::Ok)
                    .header("Content-Type", "text/html; charset=utf-8")
                    .header("X-Content-Type-Options", "nosniff")
                    .body(html.into_bytes())
                    .build(),
                Err(err) => {
                    debug!(path = %path, error = %err, "directory unreadable, serving 404");
                    not_found(config, path)
                }
            }
        }
        Ok(_) => not_found(config, path),
        Err(err) if err.kind() == ErrorKind::NotFound => not_found(config, path),
        Err(err) => {
            warn!(path = %path, error = %err, "failed to stat directory");
            Response::internal_error()
        }
    }
}

fn not_found(config: &ServerConfig, requested_path: &str) -> Response {
    ResponseBuilder::new(StatusCode::NotFound)
        .header("Content-Type", "text/html")
        .body(
            config
                .error_docs
                .render_not_found(requested_path)
                .into_bytes(),
        )
        .build()
}

fn method_not_allowed(config: &ServerConfig) -> Response {
    ResponseBuilder::new(StatusCode::MethodNotAllowed)
        .header("Content-Type", "text/html")
        .body(config.error_docs.method_not_allowed.clone().into_bytes())
        .build()
}
