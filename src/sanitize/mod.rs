//! Allowlist markup sanitizer
//!
//! Every piece of markup that crosses from the outside world into the editable
//! surface goes through [`sanitize`]: initial loads, external content updates,
//! pasted markup, and inserted links/images/embeds.
//!
//! The walk itself is done by `ammonia` (html5ever tree, recursive visit,
//! unwrap of unknown wrappers, subtree removal of [`DANGEROUS_ELEMENTS`]).
//! On top of that we run our own attribute policy: event-handler rejection,
//! URL scheme checks on every URL-bearing attribute regardless of element,
//! and inline style filtering.
//!
//! # Example
//!
//! ```
//! use quire::sanitize::sanitize;
//!
//! assert_eq!(
//!     sanitize(r#"<p onclick="steal()">Hi <script>alert(1)</script>there</p>"#),
//!     "<p>Hi there</p>"
//! );
//! ```

mod allowlist;
mod style;
mod url;

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::editable::markup::{scan_tags, TagKind};

pub use allowlist::{
    is_allowed_attribute, is_allowed_element, is_dangerous_element, ALLOWLIST_VERSION,
    ATTRIBUTE_ALLOWLIST, DANGEROUS_ELEMENTS, ELEMENT_ALLOWLIST, LINK_REL, SAFE_URL_SCHEMES,
    STYLE_PROPERTY_ALLOWLIST,
};
pub use style::filter_style;
pub use url::{is_dangerous_url, is_safe_url, url_host, url_scheme};

/// Shared sanitizer instance (the builder is immutable once configured)
static SANITIZER: LazyLock<Sanitizer> = LazyLock::new(Sanitizer::new);

/// Upper bound on clean/re-parse rounds before the output is taken as is
const MAX_PASSES: usize = 4;

/// Sanitize untrusted markup with the default policy.
///
/// Total: never panics, never fails. Idempotent:
/// `sanitize(&sanitize(x)) == sanitize(x)`.
pub fn sanitize(raw: &str) -> String {
    SANITIZER.clean(raw)
}

/// Escape plain text so it can be spliced into markup without being
/// reinterpreted as tags or attribute delimiters.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Allowlist sanitizer built on an `ammonia` cleaner
pub struct Sanitizer {
    cleaner: ammonia::Builder<'static>,
}

impl Sanitizer {
    pub fn new() -> Self {
        let mut cleaner = ammonia::Builder::empty();
        cleaner
            .tags(ELEMENT_ALLOWLIST.iter().copied().collect())
            .clean_content_tags(DANGEROUS_ELEMENTS.iter().copied().collect())
            .generic_attributes(ATTRIBUTE_ALLOWLIST.iter().copied().collect())
            .url_schemes(SAFE_URL_SCHEMES.iter().copied().collect::<HashSet<_>>())
            .url_relative(ammonia::UrlRelative::PassThrough)
            .link_rel(Some(LINK_REL))
            .strip_comments(true)
            .attribute_filter(filter_attribute);
        Self { cleaner }
    }

    /// Sanitize `raw`, returning the serialized safe markup
    pub fn clean(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }
        let mut current = self.pass(raw);
        if current == raw {
            return current;
        }

        // Unwrapping can leave nesting the parser never builds itself (a
        // heading directly inside a heading), which the next parse flattens.
        for _ in 1..MAX_PASSES {
            let next = self.pass(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn pass(&self, markup: &str) -> String {
        restore_pre_newlines(self.cleaner.clean(markup).to_string())
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

/// The parser drops a newline directly after `<pre>` and the serializer does
/// not write it back, so a leading newline in the parsed text needs a second
/// one in front of it to survive the next pass.
fn restore_pre_newlines(html: String) -> String {
    let at: Vec<usize> = scan_tags(&html)
        .into_iter()
        .filter(|tag| tag.kind == TagKind::Open && tag.name == "pre")
        .map(|tag| tag.range.end)
        .filter(|&end| html[end..].starts_with('\n'))
        .collect();
    if at.is_empty() {
        return html;
    }

    let mut out = String::with_capacity(html.len() + at.len());
    let mut pos = 0;
    for end in at {
        out.push_str(&html[pos..end]);
        out.push('\n');
        pos = end;
    }
    out.push_str(&html[pos..]);
    out
}

/// Attribute policy applied to every attribute the allowlist let through
fn filter_attribute<'u>(element: &str, attribute: &str, value: &'u str) -> Option<Cow<'u, str>> {
    let attribute = attribute.to_ascii_lowercase();

    // Added by the cleaner itself after dropping any `rel` the input carried
    if element == "a" && attribute == "rel" && value == LINK_REL {
        return Some(Cow::Borrowed(value));
    }

    if attribute.starts_with("on") || !is_allowed_attribute(&attribute) {
        return None;
    }

    if allowlist::is_url_attribute(&attribute) {
        return if is_safe_url(value) {
            Some(Cow::Borrowed(value))
        } else {
            None
        };
    }

    if attribute == "style" {
        return filter_style(value).map(Cow::Owned);
    }

    Some(Cow::Borrowed(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_handler_and_script_removed() {
        assert_eq!(
            sanitize(r#"<p onclick="steal()">Hi <script>alert(1)</script>there</p>"#),
            "<p>Hi there</p>"
        );
    }

    #[test]
    fn test_javascript_link_keeps_rel() {
        assert_eq!(
            sanitize(r#"<a href="javascript:alert(1)">link</a>"#),
            r#"<a rel="noopener noreferrer">link</a>"#
        );
    }

    #[test]
    fn test_unknown_tag_is_unwrapped() {
        assert_eq!(sanitize("<unknown-tag>hello</unknown-tag>"), "hello");
        assert_eq!(sanitize("<section><p>a</p></section>"), "<p>a</p>");
    }

    #[test]
    fn test_dangerous_tag_is_removed_with_subtree() {
        assert_eq!(sanitize("<script>hello</script>"), "");
        assert_eq!(sanitize("<p>a<iframe src=\"https://x\">b</iframe>c</p>"), "<p>ac</p>");
        assert_eq!(sanitize("<svg><g><text>x</text></g></svg>ok"), "ok");
    }

    #[test]
    fn test_comments_are_dropped() {
        assert_eq!(sanitize("<p>a<!-- secret -->b</p>"), "<p>ab</p>");
    }

    #[test]
    fn test_rel_is_forced() {
        assert_eq!(
            sanitize(r#"<a href="https://example.com" rel="opener">x</a>"#),
            r#"<a href="https://example.com" rel="noopener noreferrer">x</a>"#
        );
    }

    #[test]
    fn test_safe_hrefs_preserved() {
        for href in [
            "https://example.com/path?q=1",
            "mailto:a@example.com",
            "tel:+4712345678",
            "/root/relative",
            "#top",
            "//cdn.example.com/lib",
        ] {
            let input = format!(r#"<a href="{}">x</a>"#, href);
            let expected = format!(r#"<a href="{}" rel="noopener noreferrer">x</a>"#, href);
            assert_eq!(sanitize(&input), expected);
        }
    }

    #[test]
    fn test_obfuscated_schemes_dropped() {
        assert_eq!(
            sanitize(r#"<img src="  JaVaScRiPt:alert(1)" alt="x">"#),
            r#"<img alt="x">"#
        );
        assert_eq!(
            sanitize(r#"<img src="data:image/svg+xml;base64,AAAA">"#),
            "<img>"
        );
    }

    #[test]
    fn test_style_is_filtered() {
        assert_eq!(
            sanitize(r#"<p style="color: red; position: fixed">x</p>"#),
            r#"<p style="color: red">x</p>"#
        );
        assert_eq!(
            sanitize(r#"<p style="position: fixed">x</p>"#),
            "<p>x</p>"
        );
    }

    #[test]
    fn test_disallowed_attributes_dropped() {
        assert_eq!(
            sanitize(r#"<p id="x" data-foo="1" class="lead">x</p>"#),
            r#"<p class="lead">x</p>"#
        );
    }

    #[test]
    fn test_safe_link_gets_rel() {
        assert_eq!(
            sanitize(r#"<a href="https://x.example">x</a>"#),
            r#"<a href="https://x.example" rel="noopener noreferrer">x</a>"#
        );
        // Only the cleaner's own value is let through
        assert_eq!(
            sanitize(r#"<p rel="noopener noreferrer">x</p>"#),
            "<p>x</p>"
        );
    }

    #[test]
    fn test_pre_leading_newline_is_stable() {
        let once = sanitize("<pre>\n\nx</pre>");
        assert_eq!(once, "<pre>\n\nx</pre>");
        assert_eq!(sanitize(&once), once);

        let once = sanitize("<pre>\nx</pre>");
        assert_eq!(once, "<pre>x</pre>");
        assert_eq!(sanitize(&once), once);

        let once = sanitize("<pre class=\"code\">\n\n\ty</pre><pre><code>\nz</code></pre>");
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn test_unwrapped_wrapper_between_headings_settles() {
        let once = sanitize("<h1><section><h2>x</h2></section></h1>");
        assert_eq!(sanitize(&once), once);
        assert!(once.contains("<h2>x</h2>"));
    }

    #[test]
    fn test_pre_inside_attribute_is_not_touched() {
        let once = sanitize("<p title=\"<pre>\n\">x</p>");
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn test_text_passes_through() {
        assert_eq!(sanitize("just text"), "just text");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(
            escape_text(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_escaped_text_survives_sanitize_as_text() {
        let escaped = escape_text("<script>alert(1)</script>");
        let cleaned = sanitize(&escaped);
        assert!(!cleaned.contains("<script"));
        assert!(cleaned.contains("&lt;script&gt;"));
    }
}
