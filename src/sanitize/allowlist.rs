//! Static allowlists for markup sanitization.
//!
//! These tables are the whole policy: anything not listed here is either
//! removed together with its subtree ([`DANGEROUS_ELEMENTS`]) or unwrapped.
//! Bump [`ALLOWLIST_VERSION`] whenever an entry is added or removed so stored
//! content can be re-sanitized against the new policy.

/// Version of the allowlist tables below
pub const ALLOWLIST_VERSION: u32 = 3;

/// Elements that survive sanitization
pub const ELEMENT_ALLOWLIST: &[&str] = &[
    // Blocks
    "p",
    "div",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "blockquote",
    "pre",
    "hr",
    "br",
    "figure",
    "figcaption",
    // Lists
    "ul",
    "ol",
    "li",
    "dl",
    "dt",
    "dd",
    // Inline formatting
    "strong",
    "b",
    "em",
    "i",
    "u",
    "s",
    "strike",
    "del",
    "ins",
    "sub",
    "sup",
    "mark",
    "small",
    "code",
    "kbd",
    "abbr",
    "cite",
    "q",
    "span",
    // Links and media
    "a",
    "img",
    // Tables
    "table",
    "caption",
    "thead",
    "tbody",
    "tfoot",
    "tr",
    "th",
    "td",
];

/// Elements removed together with everything inside them.
///
/// Script-like, style-like, embedding, form controls, and foreign
/// (vector graphics / math) containers.
pub const DANGEROUS_ELEMENTS: &[&str] = &[
    "script",
    "noscript",
    "style",
    "template",
    "link",
    "meta",
    "base",
    "iframe",
    "frame",
    "frameset",
    "noframes",
    "object",
    "embed",
    "applet",
    "param",
    "noembed",
    "form",
    "input",
    "button",
    "select",
    "option",
    "optgroup",
    "textarea",
    "datalist",
    "output",
    "svg",
    "math",
    "canvas",
    "xmp",
    "plaintext",
    "title",
];

/// Attributes that survive sanitization on any allowed element
pub const ATTRIBUTE_ALLOWLIST: &[&str] = &[
    "href",
    "src",
    "alt",
    "title",
    "class",
    "style",
    "width",
    "height",
    "colspan",
    "rowspan",
    "scope",
    "start",
    "reversed",
    "cite",
    "datetime",
    "lang",
    "dir",
    "target",
    "loading",
];

/// Attributes whose value is a URL and gets scheme-checked
pub const URL_ATTRIBUTES: &[&str] = &["href", "src", "action", "cite", "formaction", "poster"];

/// URL schemes allowed in URL attributes (relative URLs always pass)
pub const SAFE_URL_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

/// CSS properties kept inside `style` attributes
pub const STYLE_PROPERTY_ALLOWLIST: &[&str] = &[
    "color",
    "background-color",
    "text-align",
    "text-decoration",
    "text-indent",
    "font-weight",
    "font-style",
    "font-size",
    "font-family",
    "line-height",
    "vertical-align",
    "white-space",
    "list-style-type",
    "width",
    "height",
    "max-width",
    "margin",
    "margin-top",
    "margin-bottom",
    "margin-left",
    "margin-right",
    "padding",
    "padding-top",
    "padding-bottom",
    "padding-left",
    "padding-right",
    "border",
    "border-collapse",
];

/// Rel value forced onto every surviving hyperlink
pub const LINK_REL: &str = "noopener noreferrer";

/// Check if an element is allowed
pub fn is_allowed_element(name: &str) -> bool {
    ELEMENT_ALLOWLIST.contains(&name)
}

/// Check if an element must be removed along with its subtree
pub fn is_dangerous_element(name: &str) -> bool {
    DANGEROUS_ELEMENTS.contains(&name)
}

/// Check if an attribute is allowed
pub fn is_allowed_attribute(name: &str) -> bool {
    ATTRIBUTE_ALLOWLIST.contains(&name)
}

/// Check if an attribute carries a URL
pub fn is_url_attribute(name: &str) -> bool {
    URL_ATTRIBUTES.contains(&name)
}

/// Check if a CSS property is allowed
pub fn is_allowed_style_property(name: &str) -> bool {
    STYLE_PROPERTY_ALLOWLIST.contains(&name)
}
