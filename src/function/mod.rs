//! The application seam: Fezz functions served behind a platform adapter.

pub mod handler;

pub use handler::{FezzError, FezzFunction, FunctionContext};
