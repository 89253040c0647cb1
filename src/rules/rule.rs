//! Route rules as declared in the build configuration.

use crate::ordered::OrderedMap;
use serde::{Deserialize, Serialize};

/// Status code used when a redirect is declared as a bare target string.
pub const DEFAULT_REDIRECT_STATUS: u16 = 307;

/// On-demand regeneration directive.
///
/// `true` enables regeneration, `false` disables it, and a number enables
/// it with a time-to-live in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Isr {
    Bool(bool),
    Ttl(u64),
}

impl Isr {
    /// Whether regeneration is enabled. A zero TTL counts as disabled.
    pub fn is_enabled(&self) -> bool {
        match *self {
            Isr::Bool(enabled) => enabled,
            Isr::Ttl(ttl) => ttl != 0,
        }
    }
}

impl From<bool> for Isr {
    fn from(enabled: bool) -> Self {
        Isr::Bool(enabled)
    }
}

/// Legacy cache options. Only `swr` matters here; everything else is
/// carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swr: Option<Isr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The `cache` field of a rule: either a flag or an options object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CacheOption {
    Flag(bool),
    Options(CacheOptions),
}

impl CacheOption {
    /// `cache: false`
    pub fn is_disabled(&self) -> bool {
        matches!(self, CacheOption::Flag(false))
    }

    /// The legacy `cache.swr` value, if declared.
    pub fn swr(&self) -> Option<Isr> {
        match self {
            CacheOption::Options(options) => options.swr,
            CacheOption::Flag(_) => None,
        }
    }
}

/// Redirect target of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RedirectInput")]
pub struct Redirect {
    pub to: String,
    pub status_code: u16,
}

impl Redirect {
    pub fn new(to: impl Into<String>, status_code: u16) -> Self {
        Self {
            to: to.into(),
            status_code,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RedirectInput {
    Target(String),
    #[serde(rename_all = "camelCase")]
    Full {
        to: String,
        status_code: Option<u16>,
    },
}

impl From<RedirectInput> for Redirect {
    fn from(input: RedirectInput) -> Self {
        match input {
            RedirectInput::Target(to) => Redirect::new(to, DEFAULT_REDIRECT_STATUS),
            RedirectInput::Full { to, status_code } => {
                Redirect::new(to, status_code.unwrap_or(DEFAULT_REDIRECT_STATUS))
            }
        }
    }
}

/// Behavior attached to one path pattern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<Redirect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<OrderedMap<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isr: Option<Isr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheOption>,
    /// Deprecated alias for `isr: !static`.
    #[serde(default, rename = "static", skip_serializing_if = "Option::is_none")]
    pub static_: Option<bool>,
    /// Options this crate does not interpret (`cors`, `proxy`, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RouteRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn redirect(mut self, to: impl Into<String>, status_code: u16) -> Self {
        self.redirect = Some(Redirect::new(to, status_code));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(OrderedMap::new)
            .insert(name, value.into());
        self
    }

    pub fn isr(mut self, isr: impl Into<Isr>) -> Self {
        self.isr = Some(isr.into());
        self
    }

    pub fn cache(mut self, cache: CacheOption) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn static_(mut self, value: bool) -> Self {
        self.static_ = Some(value);
        self
    }

    /// Whether the rule carries a deprecated cache alias.
    pub fn has_legacy_options(&self) -> bool {
        self.static_.is_some() || self.cache.as_ref().and_then(CacheOption::swr).is_some()
    }

    /// Non-empty header map, if any.
    pub fn header_entries(&self) -> Option<&OrderedMap<String>> {
        self.headers.as_ref().filter(|h| !h.is_empty())
    }
}

/// Route rules keyed by path pattern, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet(OrderedMap<RouteRule>);

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rule for a pattern.
    pub fn rule(mut self, pattern: impl Into<String>, rule: RouteRule) -> Self {
        self.0.insert(pattern, rule);
        self
    }

    pub fn insert(&mut self, pattern: impl Into<String>, rule: RouteRule) -> Option<RouteRule> {
        self.0.insert(pattern, rule)
    }

    pub fn get(&self, pattern: &str) -> Option<&RouteRule> {
        self.0.get(pattern)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RouteRule)> {
        self.0.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut RouteRule)> {
        self.0.iter_mut()
    }
}

impl<K: Into<String>> FromIterator<(K, RouteRule)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (K, RouteRule)>>(iter: I) -> Self {
        RuleSet(iter.into_iter().collect())
    }
}
