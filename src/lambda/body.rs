//! Response body transport encoding.
//!
//! The decision is made on the body's type, never on its content: byte
//! bodies always travel as base64, text bodies always as-is.

use crate::function::FezzError;
use crate::http::Body;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// A body ready for the invocation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub payload: String,
    pub is_binary: bool,
}

pub fn encode(body: &Body) -> EncodedBody {
    match body {
        Body::Binary(bytes) => EncodedBody {
            payload: STANDARD.encode(bytes),
            is_binary: true,
        },
        Body::Text(text) => EncodedBody {
            payload: text.clone(),
            is_binary: false,
        },
        Body::Empty => EncodedBody {
            payload: String::new(),
            is_binary: false,
        },
    }
}

/// Decode a base64 payload.
pub fn decode(payload: &str) -> Result<Vec<u8>, FezzError> {
    Ok(STANDARD.decode(payload)?)
}
