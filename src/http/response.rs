use tokio::fs::File;

use crate::http::resolver::ResolvedResource;

/// Body sent with every 404.
pub const NOT_FOUND_BODY: &str =
    "<HTML><HEAD><TITLE>Not Found</TITLE></HEAD><BODY>Not Found</BODY></HTML>";

pub const NOT_FOUND_CONTENT_TYPE: &str = "text/html";

/// HTTP status codes the server can answer with.
///
/// - `Ok` (200): the resolved file follows
/// - `NotFound` (404): nothing could be served for the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 404 Not Found
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use fileserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NotFound => 404,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotFound => "Not Found",
        }
    }
}

/// Where the response body comes from.
#[derive(Debug)]
pub enum Body {
    /// Streamed from an open file.
    File(File),
    /// A fixed in-memory page.
    Static(&'static str),
}

/// A response ready to be written: status, one content type, body.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: Body,
}

impl Response {
    /// Creates a 200 response streaming `file`.
    pub fn ok(content_type: &'static str, file: File) -> Self {
        Self {
            status: StatusCode::Ok,
            content_type,
            body: Body::File(file),
        }
    }

    /// Creates the fixed 404 Not Found response.
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NotFound,
            content_type: NOT_FOUND_CONTENT_TYPE,
            body: Body::Static(NOT_FOUND_BODY),
        }
    }
}

impl From<ResolvedResource> for Response {
    fn from(resolved: ResolvedResource) -> Self {
        match resolved {
            ResolvedResource::Found(found) => Response::ok(found.mime, found.file),
            ResolvedResource::NotFound => Response::not_found(),
        }
    }
}
