//! Fezz HTTP Response type: the canonical response returned by applications.

use crate::ordered::OrderedMap;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCode(pub u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    pub const PAYLOAD_TOO_LARGE: StatusCode = StatusCode(413);
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);
}

impl Default for StatusCode {
    fn default() -> Self {
        StatusCode::OK
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode(code)
    }
}

impl From<StatusCode> for u16 {
    fn from(code: StatusCode) -> Self {
        code.0
    }
}

/// A response header value; `set-cookie` and friends may carry several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Single(String),
    Multi(Vec<String>),
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Single(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Single(value)
    }
}

impl From<Vec<String>> for HeaderValue {
    fn from(values: Vec<String>) -> Self {
        HeaderValue::Multi(values)
    }
}

/// Response body. Whether it is text or bytes decides how the platform
/// adapter transports it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Body {
    #[default]
    Empty,
    Text(String),
    Binary(Bytes),
}

impl Body {
    pub fn is_empty(&self) -> bool {
        match self {
            Body::Empty => true,
            Body::Text(text) => text.is_empty(),
            Body::Binary(bytes) => bytes.is_empty(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Body::Empty => &[],
            Body::Text(text) => text.as_bytes(),
            Body::Binary(bytes) => bytes,
        }
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Binary(bytes.into())
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Body::Binary(bytes)
    }
}

/// Fetch-like HTTP response for Fezz functions.
#[derive(Debug, Clone, Default)]
pub struct FezzResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// HTTP headers in the order the application set them.
    pub headers: OrderedMap<HeaderValue>,
    /// Response body.
    pub body: Body,
}

impl FezzResponse {
    /// Create a new FezzResponse with the given status code.
    pub fn new(status: impl Into<StatusCode>) -> Self {
        Self {
            status: status.into(),
            headers: OrderedMap::new(),
            body: Body::Empty,
        }
    }

    /// Create an OK response.
    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    /// Create a response with JSON body.
    pub fn json<T: Serialize>(data: &T) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_string(data)?;
        Ok(Self::new(StatusCode::OK)
            .header("content-type", "application/json")
            .body(body))
    }

    /// Create a text response.
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(StatusCode::OK)
            .header("content-type", "text/plain")
            .body(Body::Text(content.into()))
    }

    /// Create a binary response.
    pub fn bytes(content: impl Into<Bytes>, content_type: &str) -> Self {
        Self::new(StatusCode::OK)
            .header("content-type", content_type)
            .body(Body::Binary(content.into()))
    }

    /// Create an error response.
    pub fn error(status: impl Into<StatusCode>, message: impl Into<String>) -> Self {
        Self::new(status)
            .header("content-type", "text/plain")
            .body(Body::Text(message.into()))
    }

    /// Set a header, replacing any previous value.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        self.headers.insert(key, value.into());
        self
    }

    /// Append a value to a header, turning it into a multi-valued header.
    pub fn append_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.headers.get_mut(&key) {
            Some(slot) => {
                let mut values = match std::mem::replace(slot, HeaderValue::Multi(Vec::new())) {
                    HeaderValue::Single(first) => vec![first],
                    HeaderValue::Multi(values) => values,
                };
                values.push(value);
                *slot = HeaderValue::Multi(values);
            }
            None => {
                self.headers.insert(key, HeaderValue::Single(value));
            }
        }
        self
    }

    /// Set the response body.
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    /// Get the body as text.
    pub fn text_body(&self) -> Option<String> {
        if matches!(self.body, Body::Empty) {
            return None;
        }
        Some(String::from_utf8_lossy(self.body.as_bytes()).to_string())
    }

    /// Parse the body as JSON if present.
    pub fn json_body<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Option<Result<T, serde_json::Error>> {
        if matches!(self.body, Body::Empty) {
            return None;
        }
        Some(serde_json::from_slice(self.body.as_bytes()))
    }
}
