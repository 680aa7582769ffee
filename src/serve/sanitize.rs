//! Request path sanitization.

use std::fmt;

use percent_encoding::percent_decode_str;

/// Errors produced by [`sanitize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizeError {
    /// The path is not a usable string: broken percent-encoding or embedded
    /// NUL bytes.
    InvalidInput,
}

impl fmt::Display for SanitizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanitizeError::InvalidInput => write!(f, "invalid request path"),
        }
    }
}

impl std::error::Error for SanitizeError {}

/// Normalizes a raw URL path into a safe, root-confined request path.
///
/// The input is percent-decoded, then resolved segment by segment: empty
/// segments and `.` are dropped, and `..` pops the previous segment without
/// ever rising above the root. The result always begins with `/`, contains no
/// `..` segment and no `//`, and joined onto a served root can never name
/// anything outside that root. A trailing slash on the input is preserved,
/// and an empty input becomes `/`.
///
/// This is lexical only: symlinks inside the root that point outside it are
/// not detected.
///
/// # Example
///
/// ```
/// # use liteserve::serve::sanitize::sanitize;
/// assert_eq!(sanitize("/a//b").unwrap(), "/a/b");
/// assert_eq!(sanitize("/a/../../etc/passwd").unwrap(), "/etc/passwd");
/// assert_eq!(sanitize("/docs/").unwrap(), "/docs/");
/// assert_eq!(sanitize("").unwrap(), "/");
/// ```
pub fn sanitize(raw_path: &str) -> Result<String, SanitizeError> {
    let decoded = percent_decode_str(raw_path)
        .decode_utf8()
        .map_err(|_| SanitizeError::InvalidInput)?;

    // NUL never names a real file and confuses everything downstream.
    if decoded.contains('\0') {
        return Err(SanitizeError::InvalidInput);
    }

    let had_trailing_slash = decoded.ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return Ok("/".to_string());
    }

    let mut out = String::with_capacity(decoded.len() + 1);
    for segment in &segments {
        out.push('/');
        out.push_str(segment);
    }
    if had_trailing_slash {
        out.push('/');
    }

    Ok(out)
}
