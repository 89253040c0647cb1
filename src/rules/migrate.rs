//! Migration of deprecated cache flags into `isr`.
//!
//! Older configurations expressed on-demand regeneration through
//! `static: bool` or `cache.swr`. Both are folded into `isr` once, before
//! the rules are compiled. The pass is pure: it returns a new rule set and
//! reports whether any deprecated field was seen, leaving it to the caller
//! to warn.

use crate::rules::rule::{CacheOption, Isr, RuleSet};

/// Message logged once per build when deprecated options were migrated.
pub const LEGACY_OPTIONS_WARNING: &str = "Route rules now use the `isr` option to configure \
    on-demand regeneration on Netlify. Backwards-compatible support for `static` and `cache.swr` \
    with builder functions will be removed in a future version. Set `future.nativeSwr: true` \
    to disable this warning.";

/// Options controlling the migration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrateOptions {
    /// Opt into native stale-while-revalidate semantics; skips migration entirely.
    pub native_swr: bool,
}

/// Result of a migration pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Migration {
    pub rules: RuleSet,
    /// A rule used `static` or `cache.swr`.
    pub legacy_observed: bool,
}

/// Resolve `isr` for every rule that does not declare it.
pub fn migrate(rules: &RuleSet, options: &MigrateOptions) -> Migration {
    let mut migrated = rules.clone();
    if options.native_swr {
        return Migration {
            rules: migrated,
            legacy_observed: false,
        };
    }

    let mut legacy_observed = false;
    for (_, rule) in migrated.iter_mut() {
        if rule.isr.is_some() {
            continue;
        }
        if rule.cache.as_ref().is_some_and(CacheOption::is_disabled) {
            rule.isr = Some(Isr::Bool(false));
        }
        if let Some(is_static) = rule.static_ {
            rule.isr = Some(Isr::Bool(!is_static));
            legacy_observed = true;
        }
        if let Some(swr) = rule.cache.as_ref().and_then(CacheOption::swr) {
            rule.isr = Some(swr);
            legacy_observed = true;
        }
    }

    Migration {
        rules: migrated,
        legacy_observed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::rule::{CacheOptions, RouteRule};

    fn swr(value: Isr) -> CacheOption {
        CacheOption::Options(CacheOptions {
            swr: Some(value),
            ..CacheOptions::default()
        })
    }

    fn legacy_rules() -> RuleSet {
        RuleSet::new()
            .rule("/static/**", RouteRule::new().static_(true))
            .rule("/dynamic/**", RouteRule::new().static_(false))
            .rule("/swr/**", RouteRule::new().cache(swr(Isr::Bool(true))))
            .rule("/swr-ttl/**", RouteRule::new().cache(swr(Isr::Ttl(60))))
            .rule("/nocache", RouteRule::new().cache(CacheOption::Flag(false)))
            .rule("/explicit/**", RouteRule::new().isr(true).static_(true))
            .rule("/plain", RouteRule::new().header("x-test", "1"))
    }

    #[test]
    fn test_migrate_legacy_options() {
        let migration = migrate(&legacy_rules(), &MigrateOptions::default());
        let rules = &migration.rules;

        assert!(migration.legacy_observed);
        assert_eq!(rules.get("/static/**").unwrap().isr, Some(Isr::Bool(false)));
        assert_eq!(rules.get("/dynamic/**").unwrap().isr, Some(Isr::Bool(true)));
        assert_eq!(rules.get("/swr/**").unwrap().isr, Some(Isr::Bool(true)));
        assert_eq!(rules.get("/swr-ttl/**").unwrap().isr, Some(Isr::Ttl(60)));
        assert_eq!(rules.get("/nocache").unwrap().isr, Some(Isr::Bool(false)));
        assert_eq!(rules.get("/explicit/**").unwrap().isr, Some(Isr::Bool(true)));
        assert_eq!(rules.get("/plain").unwrap().isr, None);
    }

    #[test]
    fn test_cache_false_alone_is_not_legacy() {
        let rules =
            RuleSet::new().rule("/nocache", RouteRule::new().cache(CacheOption::Flag(false)));
        let migration = migrate(&rules, &MigrateOptions::default());
        assert!(!migration.legacy_observed);
        assert_eq!(migration.rules.get("/nocache").unwrap().isr, Some(Isr::Bool(false)));
    }

    #[test]
    fn test_migrate_leaves_input_untouched() {
        let rules = legacy_rules();
        let before = rules.clone();
        let _ = migrate(&rules, &MigrateOptions::default());
        assert_eq!(rules, before);
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let once = migrate(&legacy_rules(), &MigrateOptions::default()).rules;
        let twice = migrate(&once, &MigrateOptions::default()).rules;
        assert_eq!(once, twice);
    }

    #[test]
    fn test_native_swr_skips_migration() {
        let rules = legacy_rules();
        let migration = migrate(&rules, &MigrateOptions { native_swr: true });
        assert!(!migration.legacy_observed);
        assert_eq!(migration.rules, rules);
    }
}
