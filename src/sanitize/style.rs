//! Inline `style` attribute filtering

use std::sync::LazyLock;

use regex::Regex;

use super::allowlist::is_allowed_style_property;
use super::url::is_safe_url;

static CSS_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("comment pattern is valid"));

static CSS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\(\s*['"]?([^'")]*)['"]?\s*\)"#).expect("url() pattern is valid")
});

/// Filter a `style` attribute value down to allowlisted declarations.
///
/// Returns `None` when no declaration survives, meaning the attribute should
/// be dropped. Surviving declarations are rejoined as `prop: value; prop: value`
/// so that filtering already-filtered output is a no-op.
pub fn filter_style(value: &str) -> Option<String> {
    let without_comments = CSS_COMMENT.replace_all(value, "");

    let kept: Vec<String> = without_comments
        .split(';')
        .filter_map(|declaration| {
            let (property, value) = declaration.split_once(':')?;
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim();
            if value.is_empty() || !is_allowed_style_property(&property) {
                return None;
            }
            if !is_safe_style_value(value) {
                return None;
            }
            Some(format!("{}: {}", property, value))
        })
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept.join("; "))
    }
}

fn is_safe_style_value(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();

    // CSS escapes can spell out anything, including `expression`
    if lower.contains('\\') || lower.contains("expression(") || lower.contains("behavior") {
        return false;
    }
    if lower.contains('<') || lower.contains('>') {
        return false;
    }

    if lower.contains("url(") {
        let references: Vec<_> = CSS_URL.captures_iter(value).collect();
        // An unparseable url( ... ) is treated as hostile
        if references.is_empty() {
            return false;
        }
        return references.iter().all(|caps| is_safe_url(&caps[1]));
    }

    true
}
