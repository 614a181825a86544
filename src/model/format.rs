//! Formatting identifiers and active-format detection

use std::collections::BTreeSet;

use crate::editable::markup::{enclosing_elements, is_block_element, Element};
use crate::editable::Selection;

/// Inline formatting toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InlineFormat {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
    Subscript,
    Superscript,
    Link,
}

impl InlineFormat {
    /// Command-style identifier
    pub fn id(&self) -> &'static str {
        match self {
            InlineFormat::Bold => "bold",
            InlineFormat::Italic => "italic",
            InlineFormat::Underline => "underline",
            InlineFormat::Strikethrough => "strikeThrough",
            InlineFormat::Code => "code",
            InlineFormat::Subscript => "subscript",
            InlineFormat::Superscript => "superscript",
            InlineFormat::Link => "link",
        }
    }

    /// Tag written when the format is applied
    pub fn tag(&self) -> &'static str {
        match self {
            InlineFormat::Bold => "strong",
            InlineFormat::Italic => "em",
            InlineFormat::Underline => "u",
            InlineFormat::Strikethrough => "s",
            InlineFormat::Code => "code",
            InlineFormat::Subscript => "sub",
            InlineFormat::Superscript => "sup",
            InlineFormat::Link => "a",
        }
    }

    /// Map any tag that renders this format (`b` is bold too)
    pub fn from_tag(name: &str) -> Option<Self> {
        match name {
            "strong" | "b" => Some(InlineFormat::Bold),
            "em" | "i" => Some(InlineFormat::Italic),
            "u" => Some(InlineFormat::Underline),
            "s" | "strike" | "del" => Some(InlineFormat::Strikethrough),
            "code" | "kbd" => Some(InlineFormat::Code),
            "sub" => Some(InlineFormat::Subscript),
            "sup" => Some(InlineFormat::Superscript),
            "a" => Some(InlineFormat::Link),
            _ => None,
        }
    }
}

/// Block type of the paragraph containing the caret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum BlockType {
    #[default]
    Paragraph,
    Heading(u8),
    Blockquote,
    Pre,
}

impl BlockType {
    pub fn tag(&self) -> String {
        match self {
            BlockType::Paragraph => "p".to_string(),
            BlockType::Heading(level) => format!("h{}", level),
            BlockType::Blockquote => "blockquote".to_string(),
            BlockType::Pre => "pre".to_string(),
        }
    }

    pub fn from_tag(name: &str) -> Option<Self> {
        match name {
            "p" => Some(BlockType::Paragraph),
            "blockquote" => Some(BlockType::Blockquote),
            "pre" => Some(BlockType::Pre),
            _ => {
                let level: u8 = name.strip_prefix('h')?.parse().ok()?;
                (1..=6).contains(&level).then_some(BlockType::Heading(level))
            }
        }
    }

    /// Parse a `formatBlock` value: `h2`, `<h2>`, `H2`
    pub fn parse(value: &str) -> Option<Self> {
        let value = value
            .trim()
            .trim_start_matches('<')
            .trim_end_matches('>')
            .to_ascii_lowercase();
        Self::from_tag(&value)
    }

    pub fn id(&self) -> String {
        format!("formatBlock:{}", self.tag())
    }
}

/// Text alignment of the block containing the caret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn id(&self) -> &'static str {
        match self {
            Alignment::Left => "justifyLeft",
            Alignment::Center => "justifyCenter",
            Alignment::Right => "justifyRight",
            Alignment::Justify => "justifyFull",
        }
    }

    pub fn css(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }

    pub fn from_css(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            "justify" => Some(Alignment::Justify),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    pub fn tag(&self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            ListKind::Unordered => "insertUnorderedList",
            ListKind::Ordered => "insertOrderedList",
        }
    }

    pub fn from_tag(name: &str) -> Option<Self> {
        match name {
            "ul" => Some(ListKind::Unordered),
            "ol" => Some(ListKind::Ordered),
            _ => None,
        }
    }
}

/// Formatting in effect at the caret
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveFormatSet {
    pub inline: BTreeSet<InlineFormat>,
    pub block: BlockType,
    pub alignment: Alignment,
    pub list: Option<ListKind>,
}

impl ActiveFormatSet {
    pub fn contains(&self, format: InlineFormat) -> bool {
        self.inline.contains(&format)
    }

    /// All active identifiers, e.g. `["bold", "formatBlock:h2", "justifyCenter"]`
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.inline.iter().map(|f| f.id().to_string()).collect();
        ids.push(self.block.id());
        ids.push(self.alignment.id().to_string());
        if let Some(list) = self.list {
            ids.push(list.id().to_string());
        }
        ids
    }
}

/// Inspect the elements around the selection start. Read-only.
pub fn detect_active_formats(markup: &str, selection: Selection) -> ActiveFormatSet {
    let enclosing = enclosing_elements(markup, selection.start());
    let mut formats = ActiveFormatSet::default();

    for element in &enclosing {
        if let Some(format) = InlineFormat::from_tag(&element.name) {
            formats.inline.insert(format);
        }
    }

    // Innermost wins for block type, list and alignment
    if let Some(block) = enclosing
        .iter()
        .rev()
        .find_map(|el| BlockType::from_tag(&el.name))
    {
        formats.block = block;
    }
    formats.list = enclosing
        .iter()
        .rev()
        .find_map(|el| ListKind::from_tag(&el.name));
    formats.alignment = enclosing
        .iter()
        .rev()
        .filter(|el| is_block_element(&el.name) || matches!(el.name.as_str(), "td" | "th"))
        .find_map(text_align)
        .unwrap_or_default();

    formats
}

/// `text-align` declared in an element's inline style
pub fn text_align(element: &Element) -> Option<Alignment> {
    let style = element.attribute("style")?;
    style.split(';').find_map(|decl| {
        let (prop, value) = decl.split_once(':')?;
        if prop.trim().eq_ignore_ascii_case("text-align") {
            Alignment::from_css(value)
        } else {
            None
        }
    })
}
