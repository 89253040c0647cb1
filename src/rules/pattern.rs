//! Path-pattern helpers shared by the redirect and header compilers.

/// Netlify's capture token for the remainder of a wildcard match.
pub const SPLAT: &str = ":splat";

/// Specificity of a pattern.
///
/// Counts the `/` separators that are not directly followed by `*`, plus
/// one. A trailing `/**` or `/*` is folded into the preceding segment, so
/// `/a/**` (2) ranks with `/a` (2) and below `/a/b/**` (3).
pub fn segment_count(pattern: &str) -> usize {
    let bytes = pattern.as_bytes();
    let separators = bytes
        .iter()
        .enumerate()
        .filter(|&(i, &b)| b == b'/' && bytes.get(i + 1) != Some(&b'*'))
        .count();
    separators + 1
}

/// Rewrite a rule pattern into Netlify syntax. Only the first `/**` is
/// rewritten; Netlify has no directory wildcard, `/*` already covers the rest.
pub fn to_platform_pattern(pattern: &str) -> String {
    pattern.replacen("/**", "/*", 1)
}

/// Rewrite a redirect target, turning the first `/**` into the splat capture.
pub fn to_platform_target(target: &str) -> String {
    target.replacen("/**", &format!("/{SPLAT}"), 1)
}

/// Netlify has no 307/308; fall back to the closest supported codes.
pub fn to_platform_status(code: u16) -> u16 {
    match code {
        307 => 302,
        308 => 301,
        other => other,
    }
}

/// Whether a rule file line is a bare catch-all (`/* ...`).
pub fn is_catch_all_line(line: &str) -> bool {
    line.starts_with("/* ")
}
