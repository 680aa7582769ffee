use tokio::fs::File;

/// HTTP status codes this server can produce.
///
/// Every request terminates in exactly one of these:
/// - `Ok` (200): File or directory listing served
/// - `Found` (302): Redirect to the canonical directory URL
/// - `NotFound` (404): No matching file or directory
/// - `MethodNotAllowed` (405): Method restriction violated
/// - `InternalServerError` (500): Unexpected I/O fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 302 Found
    Found,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use liteserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Found => 302,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use liteserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::Found.reason_phrase(), "Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Found => "Found",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// Ordered response headers.
///
/// Header names are unique case-insensitively; setting a header that already
/// exists replaces its value in place, so the serialization order is the
/// insertion order.
#[derive(Debug, Default)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header, replacing any existing value under the same name
    /// (compared case-insensitively) while keeping its position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Looks up a header value by name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

/// Response body source.
///
/// Small generated bodies (listings, error documents, redirects) are
/// materialized; file bodies keep the open handle and are streamed out by the
/// writer, so a large file never sits in memory. The handle is dropped, and
/// therefore closed, when the response goes out of scope on any path.
#[derive(Debug)]
pub enum Body {
    /// Fully materialized body bytes.
    Bytes(Vec<u8>),
    /// An open file and its length in bytes.
    File(File, u64),
}

impl Body {
    /// Body length in bytes.
    pub fn len(&self) -> u64 {
        match self {
            Body::Bytes(bytes) => bytes.len() as u64,
            Body::File(_, len) => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A complete HTTP response ready to be written to a client.
#[derive(Debug)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Response headers in serialization order
    pub headers: Headers,
    /// Response body source
    pub body: Body,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/html")
///     .body(b"<p>hi</p>".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Headers,
    body: Body,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code and an
    /// empty body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Body::Bytes(Vec::new()),
        }
    }

    /// Sets a header, replacing any previous value under the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Sets a materialized body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Body::Bytes(body);
        self
    }

    /// Sets an open file as the body; `len` must be the file's size.
    pub fn file_body(mut self, file: File, len: u64) -> Self {
        self.body = Body::File(file, len);
        self
    }

    /// Builds the final Response.
    ///
    /// Adds a Content-Length header from the body length if none was set.
    pub fn build(mut self) -> Response {
        if !self.headers.contains("Content-Length") {
            self.headers.set("Content-Length", self.body.len().to_string());
        }

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// Creates a 302 redirect to `location` with an empty body.
    pub fn redirect(location: impl Into<String>) -> Self {
        ResponseBuilder::new(StatusCode::Found)
            .header("Location", location)
            .build()
    }

    /// Creates the fixed 500 response used when an unexpected I/O fault
    /// interrupts request handling.
    pub fn internal_error() -> Self {
        ResponseBuilder::new(StatusCode::InternalServerError)
            .header("Content-Type", "text/html")
            .body(b"<center><h1>Internal Server Error</h1></center>".to_vec())
            .build()
    }
}
