//! MIME type detection based on file extensions.

use std::path::Path;

/// Looks up the content type for a file path by its extension.
///
/// Returns `None` for unknown or missing extensions; callers pick their own
/// default (the file pipeline falls back to `text/plain`).
///
/// # Example
///
/// ```
/// # use liteserve::http::mime::content_type;
/// # use std::path::Path;
/// assert_eq!(content_type(Path::new("index.html")), Some("text/html"));
/// assert_eq!(content_type(Path::new("data.xyz")), None);
/// ```
pub fn content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    from_extension(&ext)
}

/// Looks up the content type for a bare extension (no dot, any case).
pub fn from_extension(ext: &str) -> Option<&'static str> {
    let ty = match ext.to_ascii_lowercase().as_str() {
        // Text
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "md" | "markdown" => "text/markdown",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "avif" => "image/avif",

        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",

        // Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Documents
        "pdf" => "application/pdf",
        "rtf" => "application/rtf",

        // Archives
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "tar" => "application/x-tar",
        "7z" => "application/x-7z-compressed",

        // Misc binaries
        "wasm" => "application/wasm",
        "bin" | "exe" | "iso" | "img" => "application/octet-stream",

        _ => return None,
    };

    Some(ty)
}
