//! Tag scanner over flat surface markup, backed by the tree-sitter HTML grammar.
//!
//! The surface is a markup string, not a DOM. Commands and format detection
//! need byte ranges for tags, elements and character references, which the
//! parse tree hands us directly. Pairing of open and close tags (including
//! implicitly closed elements like `<li>` and `<br>`) follows the grammar.

use std::cell::RefCell;
use std::ops::Range;
use std::sync::LazyLock;

use html5ever::data::NAMED_ENTITIES;
use regex::Regex;
use tree_sitter::{Node, Parser, Tree};

thread_local! {
    static PARSER: RefCell<Option<Parser>> = RefCell::new(html_parser());
}

/// Character references inside attribute values and text gaps
static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9A-Fa-f]{1,6}|[A-Za-z][A-Za-z0-9]{1,31});")
        .expect("reference pattern is valid")
});

/// Elements that never have content or a closing tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements that start a new line in the plain-text projection
pub const BLOCK_ELEMENTS: &[&str] = &[
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
    "ul",
    "ol",
    "li",
    "dl",
    "dt",
    "dd",
    "table",
    "caption",
    "tr",
    "figure",
    "figcaption",
    "hr",
    "br",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Open,
    Close,
    Void,
    Comment,
}

/// One tag (or comment) found in the markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub kind: TagKind,
    /// Lowercased tag name (empty for comments)
    pub name: String,
    /// Byte range of the whole tag including angle brackets
    pub range: Range<usize>,
}

/// An element with the byte ranges of its tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub open: Range<usize>,
    /// `None` for void elements and implicitly closed ones
    pub close: Option<Range<usize>>,
    /// Where the element's content ends when there is no closing tag
    pub end: usize,
    /// `(name, value)` pairs, names lowercased, values decoded
    pub attributes: Vec<(String, String)>,
}

impl Element {
    /// Byte range of the element's content (between its tags)
    pub fn inner(&self) -> Range<usize> {
        let end = self.close.as_ref().map_or(self.end, |c| c.start);
        self.open.end..end.max(self.open.end)
    }

    /// Byte range of the whole element including its tags
    pub fn outer(&self) -> Range<usize> {
        let end = self.close.as_ref().map_or(self.end, |c| c.end);
        self.open.start..end.max(self.open.end)
    }

    pub fn is_void(&self) -> bool {
        is_void_element(&self.name)
    }

    /// Value of an attribute on the opening tag
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.clone())
    }
}

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

pub fn is_block_element(name: &str) -> bool {
    BLOCK_ELEMENTS.contains(&name)
}

fn html_parser() -> Option<Parser> {
    let mut parser = Parser::new();
    if let Err(e) = parser.set_language(&tree_sitter_html::LANGUAGE.into()) {
        tracing::error!("Failed to set HTML language: {}", e);
        return None;
    }
    Some(parser)
}

fn parse(markup: &str) -> Option<Tree> {
    PARSER.with(|parser| parser.borrow_mut().as_mut()?.parse(markup, None))
}

/// Visit `node` and its descendants in document order
fn visit<'t>(node: Node<'t>, f: &mut impl FnMut(Node<'t>)) {
    f(node);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit(child, f);
    }
}

/// Collect every node of the parse tree that `pick` maps to a value
fn collect<T>(markup: &str, mut pick: impl FnMut(Node) -> Option<T>) -> Vec<T> {
    let Some(tree) = parse(markup) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    visit(tree.root_node(), &mut |node| out.extend(pick(node)));
    out
}

fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}

fn child_of_kind<'t>(node: &Node<'t>, kinds: &[&str]) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| kinds.contains(&c.kind()));
    found
}

fn tag_name(tag: &Node, source: &str) -> String {
    child_of_kind(tag, &["tag_name", "erroneous_end_tag_name"])
        .map(|name| node_text(&name, source).to_ascii_lowercase())
        .unwrap_or_default()
}

fn tag_attributes(tag: &Node, source: &str) -> Vec<(String, String)> {
    let mut cursor = tag.walk();
    let attributes: Vec<_> = tag
        .children(&mut cursor)
        .filter(|c| c.kind() == "attribute")
        .filter_map(|attr| {
            let name = child_of_kind(&attr, &["attribute_name"])?;
            let value = match child_of_kind(&attr, &["attribute_value", "quoted_attribute_value"]) {
                Some(v) if v.kind() == "quoted_attribute_value" => {
                    child_of_kind(&v, &["attribute_value"])
                        .map(|inner| decode_entities(node_text(&inner, source)))
                        .unwrap_or_default()
                }
                Some(v) => decode_entities(node_text(&v, source)),
                None => String::new(),
            };
            Some((node_text(&name, source).to_ascii_lowercase(), value))
        })
        .collect();
    attributes
}

/// Scan all tags and comments in document order
pub fn scan_tags(markup: &str) -> Vec<Tag> {
    let mut tags = collect(markup, |node| {
        let kind = match node.kind() {
            "start_tag" => {
                let name = tag_name(&node, markup);
                let kind = if is_void_element(&name) {
                    TagKind::Void
                } else {
                    TagKind::Open
                };
                return Some(Tag {
                    kind,
                    name,
                    range: node.byte_range(),
                });
            }
            "self_closing_tag" => TagKind::Void,
            "end_tag" | "erroneous_end_tag" => TagKind::Close,
            "comment" => TagKind::Comment,
            _ => return None,
        };
        let name = if kind == TagKind::Comment {
            String::new()
        } else {
            tag_name(&node, markup)
        };
        Some(Tag {
            kind,
            name,
            range: node.byte_range(),
        })
    });
    tags.sort_by_key(|tag| tag.range.start);
    tags
}

/// All elements, ordered by opening position.
///
/// Stray closing tags pair with nothing.
pub fn elements(markup: &str) -> Vec<Element> {
    let mut out = collect(markup, |node| {
        if !matches!(node.kind(), "element" | "script_element" | "style_element") {
            return None;
        }
        let open = child_of_kind(&node, &["start_tag", "self_closing_tag"])?;
        let close = child_of_kind(&node, &["end_tag"]).map(|c| c.byte_range());
        let end = if open.kind() == "self_closing_tag" {
            open.end_byte()
        } else {
            node.end_byte()
        };
        Some(Element {
            name: tag_name(&open, markup),
            open: open.byte_range(),
            close,
            end,
            attributes: tag_attributes(&open, markup),
        })
    });
    out.sort_by_key(|el| el.open.start);
    out
}

/// Byte ranges of character references in text content
pub fn reference_ranges(markup: &str) -> Vec<Range<usize>> {
    let mut ranges = collect(markup, |node| {
        (node.kind() == "entity").then(|| node.byte_range())
    });
    ranges.sort_by_key(|r| r.start);
    ranges
}

/// Elements whose content contains `offset`, outermost first
pub fn enclosing_elements(markup: &str, offset: usize) -> Vec<Element> {
    elements(markup)
        .into_iter()
        .filter(|el| !el.is_void() && el.open.end <= offset && offset <= el.inner().end)
        .collect()
}

/// Innermost element enclosing `offset` whose name satisfies `pred`
pub fn innermost_enclosing(
    markup: &str,
    offset: usize,
    pred: impl Fn(&str) -> bool,
) -> Option<Element> {
    enclosing_elements(markup, offset)
        .into_iter()
        .rev()
        .find(|el| pred(&el.name))
}

/// Byte ranges of text (outside any tag) within `range`
pub fn text_runs(markup: &str, range: Range<usize>) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut pos = range.start;

    for tag in scan_tags(markup) {
        if tag.range.end <= range.start {
            continue;
        }
        if tag.range.start >= range.end {
            break;
        }
        if tag.range.start > pos {
            runs.push(pos..tag.range.start);
        }
        pos = pos.max(tag.range.end);
    }
    if pos < range.end {
        runs.push(pos..range.end);
    }
    runs
}

/// Move `offset` to the nearest position where text may be inserted:
/// clamped to the markup, on a char boundary, and outside any tag or
/// character reference.
pub fn snap_offset(markup: &str, offset: usize) -> usize {
    let mut offset = offset.min(markup.len());
    while !markup.is_char_boundary(offset) {
        offset -= 1;
    }

    if let Some(tag) = scan_tags(markup)
        .into_iter()
        .find(|tag| tag.range.start < offset && offset < tag.range.end)
    {
        return tag.range.end;
    }

    if let Some(reference) = reference_ranges(markup)
        .into_iter()
        .find(|r| r.start < offset && offset < r.end)
    {
        return reference.end;
    }

    offset
}

/// Range of the character or character reference just before `offset`,
/// skipping over any tags in between
pub fn previous_text_unit(markup: &str, offset: usize) -> Option<Range<usize>> {
    let tags = scan_tags(markup);
    let mut end = offset.min(markup.len());
    while let Some(tag) = tags.iter().find(|tag| tag.range.end == end) {
        end = tag.range.start;
    }
    if let Some(reference) = reference_ranges(markup).into_iter().find(|r| r.end == end) {
        return Some(reference);
    }
    let ch = markup[..end].chars().next_back()?;
    Some(end - ch.len_utf8()..end)
}

/// Check if `offset` is a valid insertion point as-is
pub fn is_valid_offset(markup: &str, offset: usize) -> bool {
    offset <= markup.len() && snap_offset(markup, offset) == offset
}

/// Decode one reference body (`amp`, `#38`, `#x26`)
fn decode_reference(body: &str) -> Option<String> {
    let numeric = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        Some(u32::from_str_radix(hex, 16).ok())
    } else {
        body.strip_prefix('#').map(|dec| dec.parse::<u32>().ok())
    };
    if let Some(code) = numeric {
        return code.and_then(char::from_u32).map(String::from);
    }

    let &(first, second) = NAMED_ENTITIES.get(format!("{};", body).as_str())?;
    if first == 0 {
        return None;
    }
    [first, second]
        .into_iter()
        .filter(|&c| c != 0)
        .map(char::from_u32)
        .collect()
}

/// Decode character references (the full HTML named set plus numeric ones).
/// Unknown references are left as written.
pub fn decode_entities(text: &str) -> String {
    REFERENCE
        .replace_all(text, |caps: &regex::Captures| {
            decode_reference(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Plain-text projection of markup: tags removed, references decoded,
/// block boundaries turned into line breaks.
pub fn plain_text(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut pos = 0;

    for tag in scan_tags(markup) {
        if tag.range.start > pos {
            out.push_str(&decode_entities(&markup[pos..tag.range.start]));
        }
        pos = tag.range.end;

        match tag.name.as_str() {
            name if is_block_element(name) => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            "td" | "th" if tag.kind == TagKind::Close => out.push(' '),
            _ => {}
        }
    }
    if pos < markup.len() {
        out.push_str(&decode_entities(&markup[pos..]));
    }

    out.trim().to_string()
}
