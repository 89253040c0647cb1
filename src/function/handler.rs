//! The function seam and what the adapter hands it on each invocation.

use crate::http::{FezzRequest, FezzResponse, StatusCode};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;

/// What a function sees besides the request.
///
/// The adapter owns one base context per loaded function and derives a
/// per-invocation copy with [`FunctionContext::for_invocation`].
#[derive(Debug, Clone, Default)]
pub struct FunctionContext {
    /// Deployment environment.
    pub env: HashMap<String, String>,
    pub function_name: String,
    /// Platform request ID, or a generated one.
    pub request_id: String,
    /// The platform declared the request body as base64. The body is passed
    /// through undecoded; applications that accept binary uploads decode it.
    pub body_base64_encoded: bool,
}

impl FunctionContext {
    pub fn new(function_name: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            request_id: request_id.into(),
            ..Self::default()
        }
    }

    /// Replace the deployment environment.
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Copy of this context for one invocation.
    pub fn for_invocation(&self, request_id: &str, body_base64_encoded: bool) -> Self {
        Self {
            env: self.env.clone(),
            function_name: self.function_name.clone(),
            request_id: request_id.to_string(),
            body_base64_encoded,
        }
    }

    pub fn var(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }
}

/// The application behind a platform adapter.
///
/// `on_load` runs once when the adapter is created (a cold start on
/// Netlify); `fetch` runs once per invocation and may run concurrently.
#[async_trait]
pub trait FezzFunction: Send + Sync {
    async fn on_load(&mut self, ctx: &FunctionContext) -> Result<(), FezzError> {
        let _ = ctx;
        Ok(())
    }

    async fn fetch(
        &self,
        request: FezzRequest,
        ctx: &FunctionContext,
    ) -> Result<FezzResponse, FezzError>;

    fn name(&self) -> &str;
}

/// Failure raised by a function.
///
/// The adapter never turns these into responses; they reach the platform as
/// a failed invocation. The preview server renders them with
/// `From<FezzError> for FezzResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FezzError {
    pub message: String,
    /// HTTP status to report when the error is rendered.
    pub code: u16,
}

impl FezzError {
    /// Internal failure (500).
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_code(StatusCode::INTERNAL_SERVER_ERROR.0, message)
    }

    pub fn with_code(code: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_code(StatusCode::NOT_FOUND.0, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_code(StatusCode::BAD_REQUEST.0, message)
    }

    pub fn status(&self) -> StatusCode {
        StatusCode(self.code)
    }
}

impl fmt::Display for FezzError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "function failed with {}: {}", self.code, self.message)
    }
}

impl std::error::Error for FezzError {}

impl From<FezzError> for FezzResponse {
    fn from(err: FezzError) -> Self {
        FezzResponse::error(err.status(), err.message)
    }
}

impl From<std::io::Error> for FezzError {
    fn from(err: std::io::Error) -> Self {
        FezzError::new(err.to_string())
    }
}

impl From<serde_json::Error> for FezzError {
    fn from(err: serde_json::Error) -> Self {
        FezzError::bad_request(format!("invalid json: {err}"))
    }
}

impl From<base64::DecodeError> for FezzError {
    fn from(err: base64::DecodeError) -> Self {
        FezzError::bad_request(format!("invalid base64 body: {err}"))
    }
}
