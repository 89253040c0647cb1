//! Build pipeline and local preview for Netlify deployments.

pub mod build;
mod config;
pub mod manifest;
mod server;

pub use build::{BuildReport, NetlifyBuild};
pub use config::{FutureFlags, Preset, PresetConfig, PreviewConfig};
pub use manifest::{EdgeManifest, FunctionConfig};
pub use server::PreviewServer;
