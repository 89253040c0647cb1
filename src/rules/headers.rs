//! `_headers` compilation.
//!
//! Unlike redirects, Netlify applies every matching header block, so blocks
//! are emitted most specific first and headers keep the order they were
//! declared in.

use crate::rules::file::RuleFile;
use crate::rules::pattern::{segment_count, to_platform_pattern};
use crate::rules::rule::{RouteRule, RuleSet};

/// Rules ordered by descending segment count; ties keep declaration order.
fn by_descending_specificity(rules: &RuleSet) -> Vec<(&str, &RouteRule)> {
    let mut sorted: Vec<_> = rules.iter().collect();
    sorted.sort_by_key(|(pattern, _)| std::cmp::Reverse(segment_count(pattern)));
    sorted
}

/// Compile the `_headers` file content.
pub fn compile_headers(rules: &RuleSet) -> RuleFile {
    let mut lines = Vec::new();
    for (pattern, rule) in by_descending_specificity(rules) {
        let Some(headers) = rule.header_entries() else {
            continue;
        };
        lines.push(to_platform_pattern(pattern));
        lines.extend(headers.iter().map(|(name, value)| format!("  {name}: {value}")));
    }
    RuleFile::terminated(lines)
}
