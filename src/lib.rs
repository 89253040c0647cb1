//! # Fezz Netlify - Netlify packaging for Fezz applications
//!
//! Packages a Fezz function for Netlify. Two pieces do the real work:
//!
//! - **Rule compilation** ([`rules`]): route rules keyed by path pattern
//!   (redirects, response headers, on-demand regeneration) are compiled
//!   into Netlify's `_redirects` and `_headers` files and merged with any
//!   hand-authored rules already in the public directory.
//! - **Event adaptation** ([`lambda`]): Netlify Functions invoke the
//!   server with Lambda proxy events. Each event is normalized into a
//!   [`FezzRequest`], dispatched to the function, and the [`FezzResponse`]
//!   is serialized back, with byte bodies sent as base64.
//!
//! ## Architecture
//!
//! ```text
//!  build time                                 request time
//! ┌──────────────────────────────┐          ┌──────────────────────────────┐
//! │ PresetConfig (route rules)   │          │ Netlify invocation event     │
//! │            │                 │          │            │                 │
//! │            ▼                 │          │            ▼                 │
//! │ migrate (static/swr → isr)   │          │ LambdaAdapter                │
//! │            │                 │          │  headers / query / body      │
//! │            ▼                 │          │            │                 │
//! │ compile_redirects            │          │            ▼                 │
//! │ compile_headers              │          │ FezzFunction::fetch          │
//! │            │                 │          │            │                 │
//! │            ▼                 │          │            ▼                 │
//! │ _redirects, _headers,        │          │ invocation result            │
//! │ deploy config, manifests     │          │ (base64 for byte bodies)     │
//! └──────────────────────────────┘          └──────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fezz_netlify::prelude::*;
//!
//! struct HelloFunction;
//!
//! #[async_trait::async_trait]
//! impl FezzFunction for HelloFunction {
//!     async fn fetch(
//!         &self,
//!         request: FezzRequest,
//!         _ctx: &FunctionContext,
//!     ) -> Result<FezzResponse, FezzError> {
//!         Ok(FezzResponse::text(format!("Hello from {}!", request.path)))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "hello"
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let adapter =
//!         LambdaAdapter::load(Box::new(HelloFunction), FunctionContext::new("server", "")).await?;
//!
//!     let event: LambdaEvent = serde_json::from_str(r#"{"path": "/", "httpMethod": "GET"}"#)?;
//!     let result = adapter.invoke(event).await?;
//!     println!("{}", serde_json::to_string(&result)?);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod function;
pub mod http;
pub mod lambda;
pub mod ordered;
pub mod rules;
pub mod runtime;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::error::BuildError;
    pub use crate::function::{FezzError, FezzFunction, FunctionContext};
    pub use crate::http::{Body, FezzRequest, FezzResponse, Method, QueryValue, StatusCode};
    pub use crate::lambda::{LambdaAdapter, LambdaEvent, LambdaResult};
    pub use crate::rules::{RouteRule, RuleSet};
    pub use crate::runtime::{NetlifyBuild, PresetConfig, PreviewConfig, PreviewServer};
    pub use async_trait::async_trait;
}

// Re-export for convenience
pub use error::BuildError;
pub use function::{FezzError, FezzFunction, FunctionContext};
pub use http::{FezzRequest, FezzResponse};
pub use lambda::{LambdaAdapter, LambdaEvent, LambdaResult};
pub use runtime::{NetlifyBuild, PresetConfig};
