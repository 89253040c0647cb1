//! Netlify Functions adapter.
//!
//! Netlify invokes functions with AWS Lambda proxy events. This module turns
//! those events into [`FezzRequest`](crate::http::FezzRequest)s and turns
//! responses back into results, including the base64 decision for bodies.

pub mod adapter;
pub mod body;
mod event;
pub mod headers;

pub use adapter::{handle, LambdaAdapter};
pub use body::EncodedBody;
pub use event::{LambdaEvent, LambdaResult};
