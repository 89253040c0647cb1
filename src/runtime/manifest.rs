//! Function manifests read by the Netlify runtime.

use serde::{Deserialize, Serialize};

/// Identifier recorded in manifests, `name@version`.
pub const GENERATOR: &str = concat!(env!("CARGO_PKG_NAME"), "@", env!("CARGO_PKG_VERSION"));

/// One edge function declaration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EdgeFunction {
    /// Path pattern served by the function.
    pub path: String,
    /// Display name.
    pub name: String,
    /// Function bundle name under `.netlify/edge-functions/`.
    pub function: String,
    /// Tool that produced the declaration.
    pub generator: String,
}

/// `.netlify/edge-functions/manifest.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EdgeManifest {
    pub version: u32,
    pub functions: Vec<EdgeFunction>,
}

impl EdgeManifest {
    /// Manifest routing every path to the server function.
    pub fn server() -> Self {
        Self {
            version: 1,
            functions: vec![EdgeFunction {
                path: "/*".to_string(),
                name: "fezz server handler".to_string(),
                function: "server".to_string(),
                generator: GENERATOR.to_string(),
            }],
        }
    }
}

/// Runtime options of a Lambda-compatible function bundle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionOptions {
    pub node_module_format: String,
}

/// `<server_dir>/server.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionConfig {
    pub config: FunctionOptions,
    pub version: u32,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            config: FunctionOptions {
                node_module_format: "esm".to_string(),
            },
            version: 1,
        }
    }
}
