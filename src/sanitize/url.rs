//! URL scheme checks for link and source attributes

use std::sync::LazyLock;

use regex::Regex;

use super::allowlist::SAFE_URL_SCHEMES;

/// Pseudo-protocols that execute or embed content instead of navigating
static DANGEROUS_SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:javascript|vbscript|livescript|mocha|data):")
        .expect("dangerous scheme pattern is valid")
});

/// Leading `scheme:` of an absolute URL
static URL_SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*):").expect("scheme pattern is valid")
});

/// Browsers ignore ASCII whitespace and control characters inside a scheme,
/// so `java\tscript:` and ` JavaScript:` both resolve to `javascript:`.
fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .collect()
}

/// Check if a URL uses a script-execution or inline-data pseudo-protocol
pub fn is_dangerous_url(value: &str) -> bool {
    DANGEROUS_SCHEME.is_match(&normalize(value))
}

/// Extract the lowercased scheme of an absolute URL, if any
pub fn url_scheme(value: &str) -> Option<String> {
    let normalized = normalize(value);
    URL_SCHEME
        .captures(&normalized)
        .map(|caps| caps[1].to_ascii_lowercase())
}

/// Check if a URL may appear in a link/source attribute.
///
/// Relative, root-relative, fragment and protocol-relative URLs have no
/// scheme and always pass. Absolute URLs must use an allowlisted scheme.
pub fn is_safe_url(value: &str) -> bool {
    if is_dangerous_url(value) {
        return false;
    }
    match url_scheme(value) {
        Some(scheme) => SAFE_URL_SCHEMES.contains(&scheme.as_str()),
        None => true,
    }
}

/// Extract the host of an `http(s)` URL, lowercased
pub fn url_host(value: &str) -> Option<String> {
    static HOST: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)^(?:https?:)?//(?:[^@/?#]*@)?([^/:?#]+)").expect("host pattern is valid")
    });
    HOST.captures(value.trim())
        .map(|caps| caps[1].to_ascii_lowercase())
}
