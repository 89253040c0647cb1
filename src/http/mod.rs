//! Canonical HTTP types shared by Fezz functions and platform adapters.

mod request;
mod response;

pub use request::{FezzRequest, Method, Query, QueryValue};
pub use response::{Body, FezzResponse, HeaderValue, StatusCode};
