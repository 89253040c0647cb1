//! Route rules and their compilation into Netlify rule files.
//!
//! Rules are migrated once before the build ([`migrate`]) and compiled
//! into `_redirects` ([`compile_redirects`]) and `_headers`
//! ([`compile_headers`]) when the artifact is finalized. Compilation is
//! pure; [`write_rule_file`] merges the result with whatever the user
//! already keeps in the public directory.

mod file;
pub mod headers;
pub mod merge;
pub mod migrate;
pub mod pattern;
pub mod redirects;
mod rule;

pub use file::RuleFile;
pub use headers::compile_headers;
pub use merge::{plan_merge, write_rule_file, MergeOutcome, MergePlan, Placement};
pub use migrate::{migrate, MigrateOptions, Migration, LEGACY_OPTIONS_WARNING};
pub use redirects::{compile_redirects, RedirectEntry, RedirectOptions};
pub use rule::{CacheOption, CacheOptions, Isr, Redirect, RouteRule, RuleSet};
