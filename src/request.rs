//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use thiserror::Error;

use crate::response::{IntoResponse, Response};
use crate::status::Status;

/// Why a request body could not be turned into a typed value.
#[derive(Debug, Error, PartialEq)]
pub enum BodyError {
    /// `Content-Type` missing or not `application/json`.
    #[error("Content-Type must be application/json")]
    UnsupportedMediaType,

    /// Not parseable as JSON at all.
    #[error("Malformed JSON body: {0}")]
    Malformed(String),

    /// Valid JSON with the wrong shape (e.g. a string where a bool belongs).
    #[error("Invalid request body: {0}")]
    Invalid(String),
}

impl IntoResponse for BodyError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::UnsupportedMediaType => Status::UnsupportedMediaType,
            Self::Malformed(_) | Self::Invalid(_) => Status::BadRequest,
        };
        Response::error(status, self.to_string())
    }
}

impl From<BodyError> for Response {
    fn from(e: BodyError) -> Self {
        e.into_response()
    }
}

/// An incoming HTTP request with its body fully buffered.
pub struct Request {
    pub(crate) query: Option<String>,
    pub(crate) headers: http::HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(
        parts: http::request::Parts,
        body: Bytes,
        params: HashMap<String, String>,
    ) -> Self {
        Self {
            query: parts.uri.query().map(str::to_owned),
            headers: parts.headers,
            body,
            params,
        }
    }

    /// Header lookup (names are case-insensitive). Non-UTF-8 values read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/customers/{id}`, `req.param("id")` on `/customers/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Decodes the query string into `T`. A missing query string decodes as empty.
    pub fn query<T: DeserializeOwned>(&self) -> Result<T, serde_urlencoded::de::Error> {
        serde_urlencoded::from_str(self.query.as_deref().unwrap_or(""))
    }

    /// Decodes a JSON body into `T`.
    ///
    /// The request must declare `application/json`; media-type parameters
    /// such as `charset=utf-8` are accepted.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, BodyError> {
        if !self.is_json() {
            return Err(BodyError::UnsupportedMediaType);
        }
        serde_json::from_slice(&self.body).map_err(|e| match e.classify() {
            Category::Data => BodyError::Invalid(e.to_string()),
            Category::Syntax | Category::Eof | Category::Io => BodyError::Malformed(e.to_string()),
        })
    }

    fn is_json(&self) -> bool {
        self.header("content-type")
            .and_then(|ct| ct.split(';').next())
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Flag {
        on: bool,
    }

    fn request(uri: &str, content_type: Option<&str>, body: &'static [u8]) -> Request {
        let mut builder = http::Request::builder().uri(uri);
        if let Some(ct) = content_type {
            builder = builder.header("content-type", ct);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        Request::new(parts, Bytes::from_static(body), HashMap::new())
    }

    #[test]
    fn accepts_json_with_charset() {
        let req = request("/", Some("application/json; charset=utf-8"), br#"{"on":true}"#);
        assert_eq!(req.json::<Flag>(), Ok(Flag { on: true }));
    }

    #[test]
    fn rejects_other_media_types() {
        let req = request("/", Some("text/plain"), br#"{"on":true}"#);
        assert_eq!(req.json::<Flag>(), Err(BodyError::UnsupportedMediaType));

        let req = request("/", None, br#"{"on":true}"#);
        assert_eq!(req.json::<Flag>(), Err(BodyError::UnsupportedMediaType));
    }

    #[test]
    fn separates_syntax_errors_from_shape_errors() {
        let req = request("/", Some("application/json"), b"{not json");
        assert!(matches!(req.json::<Flag>(), Err(BodyError::Malformed(_))));

        let req = request("/", Some("application/json"), br#"{"on":"yes"}"#);
        assert!(matches!(req.json::<Flag>(), Err(BodyError::Invalid(_))));
    }

    #[test]
    fn decodes_query_string() {
        #[derive(Deserialize)]
        struct Q {
            name: Option<String>,
        }
        let req = request("/customers?name=Jane%20Doe", None, b"");
        assert_eq!(req.query::<Q>().unwrap().name.as_deref(), Some("Jane Doe"));

        let req = request("/customers", None, b"");
        assert!(req.query::<Q>().unwrap().name.is_none());
    }
}
