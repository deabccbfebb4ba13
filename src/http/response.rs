use bytes::Bytes;
use tokio::fs::File;

use crate::http::resolve::ResolvedFile;

/// Body sent for every 404 response.
pub const NOT_FOUND_BODY: &str = "<HTML>\
<HEAD><TITLE>404 Not Found</TITLE></HEAD>\
<BODY>\
<H1>404 Not Found</H1>\
<P>The requested resource was not found on this server.</P>\
</BODY>\
</HTML>";

/// Body sent for every 400 response.
pub const BAD_REQUEST_BODY: &str = "<HTML>\
<HEAD><TITLE>400 Bad Request</TITLE></HEAD>\
<BODY>\
<H1>400 Bad Request</H1>\
<P>The server could not understand the request line.</P>\
</BODY>\
</HTML>";

/// HTTP status codes produced by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use webserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
        }
    }
}

/// Where the response body comes from.
#[derive(Debug)]
pub enum Body {
    /// Fixed in-memory payload
    Static(Bytes),
    /// Open file streamed in chunks; `len` bytes are sent
    File { file: File, len: u64 },
}

impl Body {
    pub fn len(&self) -> u64 {
        match self {
            Body::Static(bytes) => bytes.len() as u64,
            Body::File { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A complete HTTP response.
///
/// Headers keep insertion order, which is the order they go on the wire.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/plain")
///     .body(Body::Static(Bytes::from_static(b"hi")))
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Body,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Body::Static(Bytes::new()),
        }
    }

    /// Sets a header, replacing an existing one of the same name in place.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        {
            Some(existing) => existing.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Builds the final Response.
    ///
    /// Appends Content-Length from the body size if not already present.
    pub fn build(mut self) -> Response {
        let has_length = self
            .headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("Content-Length"));
        if !has_length {
            self.headers
                .push(("Content-Length".to_string(), self.body.len().to_string()));
        }

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// 200 OK streaming the resolved file.
    pub fn file(resolved: ResolvedFile) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", resolved.content_type)
            .body(Body::File {
                file: resolved.file,
                len: resolved.len,
            })
            .build()
    }

    pub fn not_found() -> Self {
        Self::html(StatusCode::NotFound, NOT_FOUND_BODY)
    }

    pub fn bad_request() -> Self {
        Self::html(StatusCode::BadRequest, BAD_REQUEST_BODY)
    }

    fn html(status: StatusCode, body: &'static str) -> Self {
        ResponseBuilder::new(status)
            .header("Content-Type", "text/html")
            .body(Body::Static(Bytes::from_static(body.as_bytes())))
            .build()
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}
