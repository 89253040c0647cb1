//! Header normalization between platform and canonical shapes.

use crate::http::HeaderValue;
use crate::ordered::OrderedMap;
use std::collections::HashMap;

/// Canonicalize inbound headers.
///
/// Keys are lower-cased. The single-valued map is applied first and the
/// multi-valued map (values joined with `,`) second, so on a clash after
/// case-folding the multi-valued entry wins; within one map the later key wins.
pub fn to_canonical(
    headers: Option<&OrderedMap<String>>,
    multi_value_headers: Option<&OrderedMap<Vec<String>>>,
) -> HashMap<String, String> {
    let mut canonical = HashMap::new();
    for (name, value) in headers.into_iter().flat_map(|map| map.iter()) {
        canonical.insert(name.to_ascii_lowercase(), value.clone());
    }
    for (name, values) in multi_value_headers.into_iter().flat_map(|map| map.iter()) {
        canonical.insert(name.to_ascii_lowercase(), values.join(","));
    }
    canonical
}

/// Flatten outbound headers: multi-valued headers are joined with `,`.
pub fn from_canonical(headers: &OrderedMap<HeaderValue>) -> OrderedMap<String> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = match value {
                HeaderValue::Single(value) => value.clone(),
                HeaderValue::Multi(values) => values.join(","),
            };
            (name, value)
        })
        .collect()
}
