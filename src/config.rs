//! Server configuration.
//!
//! Options come in as an all-optional [`RawOptions`] value (deserialized from
//! a YAML file, or defaulted when no file is given) and are validated exactly
//! once into an immutable [`ServerConfig`]. Validation is a pure function of
//! the raw options: it either fails with a [`ConfigError`] or returns the
//! config together with any non-fatal [`ConfigWarning`]s for the caller to
//! log. Nothing mutates a `ServerConfig` after construction.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::serve::error_docs::ErrorDocs;

/// Raw, unvalidated server options as they appear in the config file.
///
/// Every field is optional; missing fields take the defaults documented on
/// [`ServerConfig`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawOptions {
    /// Address to bind, e.g. "127.0.0.1:3000".
    pub listen: Option<String>,
    /// Directory tree to publish.
    pub directory: Option<PathBuf>,
    /// File served for the "/" request.
    pub root_file: Option<String>,
    /// Reject every method other than GET with 405.
    pub accept_only_get: Option<bool>,
    /// Serve `index.html` when a directory is requested.
    pub use_index_html: Option<bool>,
    /// Render a directory listing when no index file matches.
    pub serve_index: Option<bool>,
    /// Custom error document locations.
    #[serde(default)]
    pub error_documents: ErrorDocumentPaths,
}

/// Optional paths to custom 404/405 documents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorDocumentPaths {
    pub not_found: Option<PathBuf>,
    pub method_not_allowed: Option<PathBuf>,
}

/// Fatal configuration problems. Construction fails; the server never starts.
#[derive(Debug)]
pub enum ConfigError {
    /// The published directory is missing or unreadable.
    RootDirectory { path: PathBuf, source: std::io::Error },
    /// The config file could not be read.
    FileRead { path: PathBuf, source: std::io::Error },
    /// The config file is not valid YAML for [`RawOptions`].
    FileParse(serde_yaml::Error),
}

/// Non-fatal problems surfaced during construction. The server still starts;
/// the caller decides how to report these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// A configured error document could not be read; the built-in default
    /// document is used for the lifetime of this server.
    ErrorDocumentUnreadable { status: u16, path: PathBuf },
}

/// Validated, immutable server configuration.
///
/// Shared read-only across connection tasks via `Arc`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind. Default "127.0.0.1:3000".
    pub listen_addr: String,
    /// Directory tree to publish. Must exist and be readable at construction.
    pub root_dir: PathBuf,
    /// File served for the "/" request, as an absolute request path.
    /// Default "/index.html".
    pub root_file: String,
    /// Reject every method other than GET with 405. Default true.
    pub accept_only_get: bool,
    /// Serve `<dir>/index.html` for directory requests. Default true.
    pub use_index_html: bool,
    /// Render directory listings. Default false.
    pub serve_index: bool,
    /// 404/405 documents, loaded once at construction.
    pub error_docs: ErrorDocs,
}

impl ServerConfig {
    /// Validates raw options into a usable configuration.
    ///
    /// The published directory must exist and be readable, otherwise this
    /// fails with [`ConfigError::RootDirectory`]. Unreadable error documents
    /// are downgraded to the built-in defaults and reported as warnings.
    pub fn from_raw(raw: RawOptions) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        let root_dir = raw.directory.unwrap_or_else(|| PathBuf::from("./public"));

        // Probe readability up front so a bad root fails the start, not the
        // first request.
        std::fs::read_dir(&root_dir).map_err(|source| ConfigError::RootDirectory {
            path: root_dir.clone(),
            source,
        })?;

        let mut root_file = raw.root_file.unwrap_or_else(|| "/index.html".to_string());
        if !root_file.starts_with('/') {
            root_file.insert(0, '/');
        }

        let (error_docs, warnings) = ErrorDocs::load(
            raw.error_documents.not_found.as_deref(),
            raw.error_documents.method_not_allowed.as_deref(),
        );

        let config = Self {
            listen_addr: raw.listen.unwrap_or_else(|| "127.0.0.1:3000".to_string()),
            root_dir,
            root_file,
            accept_only_get: raw.accept_only_get.unwrap_or(true),
            use_index_html: raw.use_index_html.unwrap_or(true),
            serve_index: raw.serve_index.unwrap_or(false),
            error_docs,
        };

        Ok((config, warnings))
    }

    /// Loads options from a YAML file, or uses the defaults when `path` is
    /// `None`, then validates via [`ServerConfig::from_raw`].
    pub fn load(path: Option<&Path>) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        let raw = match path {
            Some(path) => {
                let text =
                    std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
                        path: path.to_path_buf(),
                        source,
                    })?;
                serde_yaml::from_str(&text).map_err(ConfigError::FileParse)?
            }
            None => RawOptions::default(),
        };

        Self::from_raw(raw)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::RootDirectory { path, source } => {
                write!(
                    f,
                    "published directory {:?} is not readable ({}); create it first",
                    path, source
                )
            }
            ConfigError::FileRead { path, source } => {
                write!(f, "cannot read config file {:?}: {}", path, source)
            }
            ConfigError::FileParse(err) => write!(f, "invalid config file: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::RootDirectory { source, .. } => Some(source),
            ConfigError::FileRead { source, .. } => Some(source),
            ConfigError::FileParse(err) => Some(err),
        }
    }
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::ErrorDocumentUnreadable { status, path } => {
                write!(
                    f,
                    "invalid {} error document location {:?}; the default document will be used",
                    status, path
                )
            }
        }
    }
}
