//! Fezz HTTP Request type: the canonical request handed to applications.

use crate::ordered::OrderedMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// HTTP method enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    /// Any other method, upper-cased.
    Other(String),
}

impl Method {
    /// Parse a method name case-insensitively. Empty names mean `GET`.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "" | "GET" => Method::Get,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            "PATCH" => Method::Patch,
            "HEAD" => Method::Head,
            "OPTIONS" => Method::Options,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Other(name) => name,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Method {
    fn from(name: String) -> Self {
        Method::from_name(&name)
    }
}

impl From<Method> for String {
    fn from(method: Method) -> Self {
        method.as_str().to_string()
    }
}

/// A query parameter value; repeated parameters keep every value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Single(String),
    Multi(Vec<String>),
}

impl QueryValue {
    /// All values, in order.
    pub fn values(&self) -> Vec<&str> {
        match self {
            QueryValue::Single(value) => vec![value.as_str()],
            QueryValue::Multi(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(value.to_string())
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        QueryValue::Multi(values)
    }
}

/// Parsed query parameters in the order they were merged.
pub type Query = OrderedMap<QueryValue>;

/// Fetch-like HTTP request for Fezz functions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FezzRequest {
    /// HTTP method.
    pub method: Method,
    /// Raw request path without the query string.
    pub path: String,
    /// Request URL: path plus serialized query.
    pub url: String,
    /// HTTP headers, keys lower-cased.
    pub headers: HashMap<String, String>,
    /// Query parameters.
    #[serde(default)]
    pub query: Query,
    /// Request body exactly as the platform delivered it. When the event
    /// declared it base64, it is still encoded here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl FezzRequest {
    /// Create a new FezzRequest. `url` may carry a query string.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        let url = url.into();
        let path = url.split('?').next().unwrap_or_default().to_string();
        Self {
            method,
            path,
            url,
            headers: HashMap::new(),
            query: Query::new(),
            body: None,
        }
    }

    /// Add a header to the request. The name is lower-cased.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(key.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Get a header value, case-insensitively.
    pub fn get_header(&self, key: &str) -> Option<&String> {
        self.headers.get(&key.to_ascii_lowercase())
    }

    /// Get the body as text if present.
    pub fn text(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Parse the body as JSON if present.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T, serde_json::Error>> {
        self.body.as_deref().map(serde_json::from_str)
    }
}

impl Default for FezzRequest {
    fn default() -> Self {
        Self::new(Method::Get, "/")
    }
}
