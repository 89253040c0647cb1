//! Merging compiled rules with a hand-authored rule file.
//!
//! Planning is pure and works on text; [`write_rule_file`] does the I/O.

use crate::error::BuildError;
use crate::rules::file::RuleFile;
use crate::rules::pattern::is_catch_all_line;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

/// Where compiled rules go relative to existing file content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Compiled rules above the existing content.
    Prepend,
    /// Compiled rules below the existing content.
    Append,
}

/// Decision for one rule file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergePlan {
    /// The existing file already has a catch-all; leave it alone.
    Skip,
    /// Write this text.
    Write(String),
}

/// What [`write_rule_file`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No file existed; the compiled rules were written.
    Created,
    /// Compiled rules were merged into the existing file.
    Merged,
    /// The existing file defines its own fallback and was not touched.
    Skipped,
}

/// Whether rule file text contains a line starting with a bare catch-all.
pub fn has_catch_all(content: &str) -> bool {
    content.lines().any(is_catch_all_line)
}

/// Decide what to write given the existing file content, if any.
pub fn plan_merge(existing: Option<&str>, compiled: &RuleFile, placement: Placement) -> MergePlan {
    let compiled = compiled.render();
    match existing {
        None => MergePlan::Write(compiled),
        Some(existing) if has_catch_all(existing) => MergePlan::Skip,
        Some(existing) => MergePlan::Write(match placement {
            Placement::Prepend => format!("{compiled}\n{existing}"),
            Placement::Append => format!("{existing}\n{compiled}"),
        }),
    }
}

/// Merge compiled rules into the rule file at `path`.
///
/// The parent directory must exist. I/O errors are returned as-is.
pub fn write_rule_file(
    path: &Path,
    compiled: &RuleFile,
    placement: Placement,
) -> Result<MergeOutcome, BuildError> {
    let existing = match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => return Err(BuildError::io(path, e)),
    };
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match plan_merge(existing.as_deref(), compiled, placement) {
        MergePlan::Skip => {
            info!(
                "Not adding fallback to `{}` (an existing fallback was found)",
                name
            );
            Ok(MergeOutcome::Skipped)
        }
        MergePlan::Write(content) => {
            if existing.is_some() {
                info!("Adding fallback to `{}` to handle all unmatched routes", name);
            }
            fs::write(path, content).map_err(|e| BuildError::io(path, e))?;
            Ok(if existing.is_some() {
                MergeOutcome::Merged
            } else {
                MergeOutcome::Created
            })
        }
    }
}
