//! The Netlify build: rule migration and deploy artifacts.
//!
//! [`NetlifyBuild::prepare`] runs before bundling and folds legacy cache
//! options into `isr`. [`NetlifyBuild::compiled`] runs once the bundle
//! exists and writes `_headers`, `_redirects`, the deploy config and the
//! preset's function manifest.
//!
//! Concurrent builds into the same output directories are not supported.

use crate::error::BuildError;
use crate::rules::{
    compile_headers, compile_redirects, migrate, write_rule_file, MergeOutcome, MigrateOptions,
    Placement, RedirectOptions, RuleSet, LEGACY_OPTIONS_WARNING,
};
use crate::runtime::config::{Preset, PresetConfig};
use crate::runtime::manifest::{EdgeManifest, FunctionConfig};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Files touched by a build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Deprecated cache options were migrated.
    pub legacy_options: bool,
    /// Files created or rewritten.
    pub written: Vec<PathBuf>,
    /// Rule files left alone because they define their own fallback.
    pub skipped: Vec<PathBuf>,
}

impl BuildReport {
    fn record(&mut self, path: PathBuf, outcome: MergeOutcome) {
        match outcome {
            MergeOutcome::Skipped => self.skipped.push(path),
            MergeOutcome::Created | MergeOutcome::Merged => self.written.push(path),
        }
    }
}

/// A build for one [`PresetConfig`].
#[derive(Debug, Clone)]
pub struct NetlifyBuild {
    config: PresetConfig,
    rules: RuleSet,
    legacy_options: bool,
}

impl NetlifyBuild {
    pub fn new(config: PresetConfig) -> Self {
        let rules = config.route_rules.clone();
        Self {
            config,
            rules,
            legacy_options: false,
        }
    }

    pub fn config(&self) -> &PresetConfig {
        &self.config
    }

    /// Rules as they will be compiled.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Migrate legacy cache options. Warns once if any were found.
    pub fn prepare(&mut self) -> bool {
        let options = MigrateOptions {
            native_swr: self.config.future.native_swr,
        };
        let migration = migrate(&self.config.route_rules, &options);
        self.rules = migration.rules;
        self.legacy_options = migration.legacy_observed;
        if self.legacy_options {
            warn!("{}", LEGACY_OPTIONS_WARNING);
        }
        self.legacy_options
    }

    /// Write all deploy artifacts.
    pub fn compiled(&self) -> Result<BuildReport, BuildError> {
        let mut report = BuildReport {
            legacy_options: self.legacy_options,
            ..BuildReport::default()
        };

        let (path, outcome) = self.write_headers()?;
        report.record(path, outcome);
        let (path, outcome) = self.write_redirects()?;
        report.record(path, outcome);

        if let Some(path) = self.write_deploy_config()? {
            report.written.push(path);
        }

        match self.config.preset {
            Preset::Netlify | Preset::NetlifyBuilder => {
                report.written.push(self.write_function_config()?);
            }
            Preset::NetlifyEdge => {
                report.written.push(self.write_edge_manifest()?);
            }
            Preset::NetlifyStatic => {}
        }

        Ok(report)
    }

    /// `prepare` followed by `compiled`.
    pub fn run(mut self) -> Result<BuildReport, BuildError> {
        self.prepare();
        self.compiled()
    }

    /// Compile and merge `<public>/_headers`.
    pub fn write_headers(&self) -> Result<(PathBuf, MergeOutcome), BuildError> {
        let path = self.config.public_path().join("_headers");
        let compiled = compile_headers(&self.rules);
        let outcome = write_rule_file(&path, &compiled, Placement::Append)?;
        debug!("_headers: {:?}", outcome);
        Ok((path, outcome))
    }

    /// Compile and merge `<public>/_redirects`.
    pub fn write_redirects(&self) -> Result<(PathBuf, MergeOutcome), BuildError> {
        let public = self.config.public_path();
        let path = public.join("_redirects");
        let options = RedirectOptions {
            static_mode: self.config.is_static(),
            has_404_page: public.join("404.html").exists(),
        };
        let compiled = compile_redirects(&self.rules, &options);
        let outcome = write_rule_file(&path, &compiled, Placement::Prepend)?;
        debug!("_redirects: {:?}", outcome);
        Ok((path, outcome))
    }

    /// Write `.netlify/deploy/v1/config.json` when a deploy config is set.
    pub fn write_deploy_config(&self) -> Result<Option<PathBuf>, BuildError> {
        let Some(deploy_config) = &self.config.netlify else {
            return Ok(None);
        };
        let path = self.config.root_dir.join(".netlify/deploy/v1/config.json");
        write_file(&path, serde_json::to_string(deploy_config)?)?;
        Ok(Some(path))
    }

    /// Write `<server>/server.json` for Lambda-compatible presets.
    pub fn write_function_config(&self) -> Result<PathBuf, BuildError> {
        let path = self.config.server_path().join("server.json");
        write_file(&path, serde_json::to_string(&FunctionConfig::default())?)?;
        Ok(path)
    }

    /// Write `.netlify/edge-functions/manifest.json`.
    pub fn write_edge_manifest(&self) -> Result<PathBuf, BuildError> {
        let path = self
            .config
            .root_dir
            .join(".netlify/edge-functions/manifest.json");
        write_file(&path, to_pretty_json(&EdgeManifest::server())?)?;
        Ok(path)
    }
}

/// Two-space indented JSON.
fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, BuildError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Write a generated file, creating its parent directory.
fn write_file(path: &Path, contents: String) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| BuildError::io(path, e))?;
    info!("Wrote {}", path.display());
    Ok(())
}
