//! Build and preview configuration.

use crate::error::BuildError;
use crate::rules::RuleSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Netlify deployment flavor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Netlify Functions (Lambda-compatible).
    #[default]
    Netlify,
    /// Netlify Functions with on-demand builders for ISR routes.
    NetlifyBuilder,
    /// Netlify Edge Functions.
    NetlifyEdge,
    /// Prerendered site, no server function.
    NetlifyStatic,
}

/// Opt-in behavior changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FutureFlags {
    /// Use native stale-while-revalidate instead of migrating legacy cache flags.
    #[serde(default, alias = "nativeSWR")]
    pub native_swr: bool,
}

/// Configuration for a Netlify build.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetConfig {
    #[serde(default)]
    pub preset: Preset,
    /// Project root; `.netlify/` artifacts are written below it.
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
    /// Published directory holding `_redirects` and `_headers`. Defaults to `<root>/dist`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_dir: Option<PathBuf>,
    /// Directory of the server function bundle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_dir: Option<PathBuf>,
    /// Prerendered-only build.
    #[serde(default, rename = "static")]
    pub static_mode: bool,
    #[serde(default)]
    pub route_rules: RuleSet,
    /// Deploy configuration written verbatim to `.netlify/deploy/v1/config.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netlify: Option<serde_json::Value>,
    #[serde(default)]
    pub future: FutureFlags,
}

fn default_root_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for PresetConfig {
    fn default() -> Self {
        Self {
            preset: Preset::default(),
            root_dir: default_root_dir(),
            public_dir: None,
            server_dir: None,
            static_mode: false,
            route_rules: RuleSet::new(),
            netlify: None,
            future: FutureFlags::default(),
        }
    }
}

impl PresetConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, BuildError> {
        let json = std::fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
        Self::from_json(&json)
    }

    /// Set the preset.
    pub fn preset(mut self, preset: Preset) -> Self {
        self.preset = preset;
        self
    }

    /// Set the project root.
    pub fn root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
        self.root_dir = root_dir.into();
        self
    }

    /// Set the public directory.
    pub fn public_dir(mut self, public_dir: impl Into<PathBuf>) -> Self {
        self.public_dir = Some(public_dir.into());
        self
    }

    /// Set the route rules.
    pub fn route_rules(mut self, rules: RuleSet) -> Self {
        self.route_rules = rules;
        self
    }

    /// Set the deploy configuration.
    pub fn netlify(mut self, config: serde_json::Value) -> Self {
        self.netlify = Some(config);
        self
    }

    /// Mark the build as prerendered-only.
    pub fn static_mode(mut self, static_mode: bool) -> Self {
        self.static_mode = static_mode;
        self
    }

    /// Opt into native stale-while-revalidate.
    pub fn native_swr(mut self, native_swr: bool) -> Self {
        self.future.native_swr = native_swr;
        self
    }

    /// Whether no server function is deployed.
    pub fn is_static(&self) -> bool {
        self.static_mode || self.preset == Preset::NetlifyStatic
    }

    /// Resolved public directory.
    pub fn public_path(&self) -> PathBuf {
        match &self.public_dir {
            Some(dir) => self.root_dir.join(dir),
            None => self.root_dir.join("dist"),
        }
    }

    /// Resolved server function directory.
    pub fn server_path(&self) -> PathBuf {
        match (&self.server_dir, self.preset) {
            (Some(dir), _) => self.root_dir.join(dir),
            (None, Preset::NetlifyEdge) => self.root_dir.join(".netlify/edge-functions/server"),
            (None, _) => self.root_dir.join(".netlify/functions-internal/server"),
        }
    }
}

/// Configuration for the local preview server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Environment variables exposed to the function.
    pub env: HashMap<String, String>,
    /// Whether to answer `/_health` without invoking the function.
    pub enable_health: bool,
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8888,
            env: HashMap::new(),
            enable_health: true,
            // Netlify's synchronous function payload limit.
            max_body_size: 6 * 1024 * 1024,
        }
    }
}

impl PreviewConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host address.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Add an environment variable.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set the request body limit.
    pub fn max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    /// Get the bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
