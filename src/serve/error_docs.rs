//! Configurable 404/405 error documents.
//!
//! Documents are read from disk exactly once, while the configuration is
//! being validated. An unreadable configured path degrades to the built-in
//! default for the lifetime of the server and surfaces as a warning; fixing
//! the file on disk requires a restart to take effect.

use std::path::Path;

use crate::config::ConfigWarning;

/// Literal token in the 404 document replaced with the escaped request path.
pub const NOT_FOUND_URL_TOKEN: &str = "<!--${404URL}-->";

const DEFAULT_NOT_FOUND: &str = "<!DOCTYPE html>\n\
<html>\n\
<head>\n\
<title>404 Not Found</title>\n\
</head>\n\
<body>\n\
<center>\n\
<h1>404 Not Found</h1>\n\
<p><!--${404URL}--></p>\n\
</center>\n\
<hr>\n\
<center>liteserve</center>\n\
</body>\n\
</html>\n";

const DEFAULT_METHOD_NOT_ALLOWED: &str = "<!DOCTYPE html>\n\
<html>\n\
<head>\n\
<title>405 Method Not Allowed</title>\n\
</head>\n\
<body>\n\
<center>\n\
<h1>405 Method Not Allowed</h1>\n\
</center>\n\
<hr>\n\
<center>liteserve</center>\n\
</body>\n\
</html>\n";

/// The 404 and 405 document bodies in effect for this server.
#[derive(Debug, Clone)]
pub struct ErrorDocs {
    /// 404 template; may contain [`NOT_FOUND_URL_TOKEN`].
    pub not_found: String,
    /// 405 body, served as-is.
    pub method_not_allowed: String,
}

impl ErrorDocs {
    /// Loads the configured documents, falling back to the built-in defaults.
    ///
    /// `None` means "not configured" and silently uses the default; a
    /// configured path that cannot be read uses the default too, but reports
    /// a [`ConfigWarning`] for the caller to log.
    pub fn load(
        not_found: Option<&Path>,
        method_not_allowed: Option<&Path>,
    ) -> (Self, Vec<ConfigWarning>) {
        let mut warnings = Vec::new();

        let not_found = load_one(not_found, DEFAULT_NOT_FOUND, 404, &mut warnings);
        let method_not_allowed = load_one(
            method_not_allowed,
            DEFAULT_METHOD_NOT_ALLOWED,
            405,
            &mut warnings,
        );

        (
            Self {
                not_found,
                method_not_allowed,
            },
            warnings,
        )
    }

    /// Builds the defaults without touching the filesystem.
    pub fn default_docs() -> Self {
        Self {
            not_found: DEFAULT_NOT_FOUND.to_string(),
            method_not_allowed: DEFAULT_METHOD_NOT_ALLOWED.to_string(),
        }
    }

    /// Renders the 404 body for a request, substituting every occurrence of
    /// the URL token with the HTML-escaped requested path.
    pub fn render_not_found(&self, requested_path: &str) -> String {
        let escaped = html_escape::encode_text(requested_path);
        self.not_found.replace(NOT_FOUND_URL_TOKEN, &escaped)
    }
}

fn load_one(
    path: Option<&Path>,
    default: &str,
    status: u16,
    warnings: &mut Vec<ConfigWarning>,
) -> String {
    match path {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(body) => body,
            Err(_) => {
                warnings.push(ConfigWarning::ErrorDocumentUnreadable {
                    status,
                    path: path.to_path_buf(),
                });
                default.to_string()
            }
        },
        None => default.to_string(),
    }
}
