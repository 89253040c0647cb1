//! `_redirects` compilation.
//!
//! Netlify scans `_redirects` top to bottom and takes the first matching
//! line, so specificity is expressed purely by position. Rules are sorted
//! by ascending segment count and then emitted in reverse, which puts the
//! most specific patterns on top. Explicit redirects sit above the ISR
//! function routing lines, and the catch-all fallback is always last.

use crate::rules::file::RuleFile;
use crate::rules::pattern::{
    segment_count, to_platform_pattern, to_platform_status, to_platform_target,
};
use crate::rules::rule::{RouteRule, RuleSet};
use std::fmt;

/// Path of the regular server function.
pub const FUNCTION_PATH: &str = "/.netlify/functions/server";
/// Path of the on-demand builder function.
pub const BUILDER_PATH: &str = "/.netlify/builders/server";
/// Static 404 page served by the static fallback.
pub const NOT_FOUND_PAGE: &str = "/404.html";

/// Options for [`compile_redirects`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedirectOptions {
    /// Static site: no server function to route to.
    pub static_mode: bool,
    /// A `404.html` exists in the public directory.
    pub has_404_page: bool,
}

/// One line of a `_redirects` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectEntry {
    /// Explicit redirect declared on a rule.
    Redirect {
        pattern: String,
        target: String,
        status: u16,
    },
    /// Routes a pattern to the function or the builder function.
    Function { pattern: String, builder: bool },
    /// Catch-all for every unmatched path.
    Fallback { target: String, status: u16 },
}

impl RedirectEntry {
    fn function(pattern: &str, rule: &RouteRule) -> Option<Self> {
        let isr = rule.isr?;
        Some(RedirectEntry::Function {
            pattern: to_platform_pattern(pattern),
            builder: isr.is_enabled(),
        })
    }

    fn redirect(pattern: &str, rule: &RouteRule) -> Option<Self> {
        let redirect = rule.redirect.as_ref()?;
        Some(RedirectEntry::Redirect {
            pattern: to_platform_pattern(pattern),
            target: to_platform_target(&redirect.to),
            status: to_platform_status(redirect.status_code),
        })
    }
}

impl fmt::Display for RedirectEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedirectEntry::Redirect {
                pattern,
                target,
                status,
            } => write!(f, "{pattern}\t{target}\t{status}"),
            RedirectEntry::Function { pattern, builder } => {
                let target = if *builder { BUILDER_PATH } else { FUNCTION_PATH };
                write!(f, "{pattern}\t{target} 200")
            }
            RedirectEntry::Fallback { target, status } => write!(f, "/* {target} {status}"),
        }
    }
}

/// Rules ordered by ascending segment count; ties keep declaration order.
fn by_ascending_specificity(rules: &RuleSet) -> Vec<(&str, &RouteRule)> {
    let mut sorted: Vec<_> = rules.iter().collect();
    sorted.sort_by_key(|(pattern, _)| segment_count(pattern));
    sorted
}

/// The catch-all line for the given mode, if any.
pub fn fallback(options: &RedirectOptions) -> Option<RedirectEntry> {
    if !options.static_mode {
        Some(RedirectEntry::Fallback {
            target: FUNCTION_PATH.to_string(),
            status: 200,
        })
    } else if options.has_404_page {
        Some(RedirectEntry::Fallback {
            target: NOT_FOUND_PAGE.to_string(),
            status: 404,
        })
    } else {
        None
    }
}

/// Compile redirect entries, top to bottom.
pub fn redirect_entries(rules: &RuleSet, options: &RedirectOptions) -> Vec<RedirectEntry> {
    let sorted = by_ascending_specificity(rules);

    let mut functions: Vec<RedirectEntry> = if options.static_mode {
        Vec::new()
    } else {
        sorted
            .iter()
            .filter_map(|(pattern, rule)| RedirectEntry::function(pattern, rule))
            .collect()
    };
    functions.reverse();

    let mut redirects: Vec<RedirectEntry> = sorted
        .iter()
        .filter_map(|(pattern, rule)| RedirectEntry::redirect(pattern, rule))
        .collect();
    redirects.reverse();

    redirects
        .into_iter()
        .chain(functions)
        .chain(fallback(options))
        .collect()
}

/// Compile the `_redirects` file content.
pub fn compile_redirects(rules: &RuleSet, options: &RedirectOptions) -> RuleFile {
    let has_fallback = fallback(options).is_some();
    let lines = redirect_entries(rules, options)
        .iter()
        .map(ToString::to_string)
        .collect();
    if has_fallback {
        RuleFile::new(lines)
    } else {
        RuleFile::terminated(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::rule::Isr;

    const SERVER: RedirectOptions = RedirectOptions {
        static_mode: false,
        has_404_page: false,
    };

    #[test]
    fn test_isr_specificity_wins_by_position() {
        let rules = RuleSet::new()
            .rule("/a/**", RouteRule::new().isr(true))
            .rule("/a/b/**", RouteRule::new().isr(false));

        assert_eq!(
            compile_redirects(&rules, &SERVER).render(),
            "/a/b/*\t/.netlify/functions/server 200\n\
             /a/*\t/.netlify/builders/server 200\n\
             /* /.netlify/functions/server 200"
        );
    }

    #[test]
    fn test_declaration_order_does_not_affect_specificity() {
        let forward = RuleSet::new()
            .rule("/x", RouteRule::new().redirect("/one", 301))
            .rule("/x/y/z", RouteRule::new().redirect("/two", 301));
        let backward = RuleSet::new()
            .rule("/x/y/z", RouteRule::new().redirect("/two", 301))
            .rule("/x", RouteRule::new().redirect("/one", 301));

        for rules in [forward, backward] {
            let file = compile_redirects(&rules, &SERVER);
            assert_eq!(file.lines()[0], "/x/y/z\t/two\t301");
            assert_eq!(file.lines()[1], "/x\t/one\t301");
        }
    }

    #[test]
    fn test_redirect_status_mapping_and_splat() {
        let rules = RuleSet::new()
            .rule("/temp", RouteRule::new().redirect("/t", 307))
            .rule("/perm", RouteRule::new().redirect("/p", 308))
            .rule("/other", RouteRule::new().redirect("/o", 303))
            .rule("/wild/**", RouteRule::new().redirect("https://example.com/**", 302));

        let file = compile_redirects(&rules, &SERVER);
        assert_eq!(
            file.lines(),
            [
                "/wild/*\thttps://example.com/:splat\t302",
                "/other\t/o\t303",
                "/perm\t/p\t301",
                "/temp\t/t\t302",
                "/* /.netlify/functions/server 200",
            ]
        );
    }

    #[test]
    fn test_redirects_above_function_lines() {
        let rules = RuleSet::new()
            .rule("/cached/**", RouteRule::new().isr(Isr::Ttl(60)))
            .rule("/moved", RouteRule::new().redirect("/new", 301));

        let file = compile_redirects(&rules, &SERVER);
        assert_eq!(
            file.lines(),
            [
                "/moved\t/new\t301",
                "/cached/*\t/.netlify/builders/server 200",
                "/* /.netlify/functions/server 200",
            ]
        );
    }

    #[test]
    fn test_static_mode() {
        let rules = RuleSet::new()
            .rule("/cached/**", RouteRule::new().isr(true))
            .rule("/moved", RouteRule::new().redirect("/new", 301));

        let with_404 = RedirectOptions {
            static_mode: true,
            has_404_page: true,
        };
        assert_eq!(
            compile_redirects(&rules, &with_404).render(),
            "/moved\t/new\t301\n/* /404.html 404"
        );

        let without_404 = RedirectOptions {
            static_mode: true,
            has_404_page: false,
        };
        assert_eq!(compile_redirects(&rules, &without_404).render(), "/moved\t/new\t301\n");
        assert_eq!(compile_redirects(&RuleSet::new(), &without_404).render(), "");
    }
}
