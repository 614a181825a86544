//! Markup transformations behind the toolbar commands.
//!
//! Each function takes the current markup and selection and returns the
//! rewritten markup plus where the selection lands, or `None` when the
//! command has nothing to do. Nothing here touches the surface; the command
//! handler applies the [`Edit`] and commits it.

use std::ops::Range;

use crate::editable::markup::{
    elements, innermost_enclosing, is_block_element, scan_tags, text_runs, Element,
};
use crate::editable::Selection;
use crate::model::{text_align, Alignment, BlockType, InlineFormat, ListKind};
use crate::sanitize::{escape_text, LINK_REL};

/// Inline wrappers that carry presentation only
const PRESENTATIONAL: &[&str] = &["span", "font", "mark", "small", "ins"];

/// Result of a transformation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub markup: String,
    pub selection: Selection,
}

/// One replacement in the original markup
#[derive(Debug, Clone)]
struct Splice {
    range: Range<usize>,
    text: String,
    /// For pure insertions: a caret sitting exactly here moves past the text
    caret_after: bool,
}

impl Splice {
    /// Insertion that pulls a caret at `at` along (opening tags, content)
    fn open(at: usize, text: impl Into<String>) -> Self {
        Self {
            range: at..at,
            text: text.into(),
            caret_after: true,
        }
    }

    /// Insertion that leaves a caret at `at` in front of it (closing tags)
    fn close(at: usize, text: impl Into<String>) -> Self {
        Self {
            range: at..at,
            text: text.into(),
            caret_after: false,
        }
    }

    fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
            caret_after: true,
        }
    }

    fn remove(range: Range<usize>) -> Self {
        Self::replace(range, "")
    }
}

/// Apply sorted, non-overlapping splices
fn apply(markup: &str, splices: &[Splice]) -> String {
    let grow: usize = splices.iter().map(|s| s.text.len()).sum();
    let mut out = String::with_capacity(markup.len() + grow);
    let mut pos = 0;
    for splice in splices {
        out.push_str(&markup[pos..splice.range.start]);
        out.push_str(&splice.text);
        pos = splice.range.end;
    }
    out.push_str(&markup[pos..]);
    out
}

/// Where `offset` ends up after the splices are applied
fn map_offset(offset: usize, splices: &[Splice]) -> usize {
    let mut delta: isize = 0;
    for splice in splices {
        let Range { start, end } = splice.range;
        if start > offset {
            break;
        }
        let shifts = if start == end {
            start < offset || splice.caret_after
        } else {
            end <= offset
        };
        if shifts {
            delta += splice.text.len() as isize - (end - start) as isize;
        } else if start < offset {
            // Inside a replaced range
            return (start as isize + delta) as usize;
        }
    }
    (offset as isize + delta) as usize
}

fn sort_splices(splices: &mut [Splice]) {
    splices.sort_by_key(|s| (s.range.start, s.range.end));
}

/// Apply splices and carry the selection across them
fn splice_edit(markup: &str, mut splices: Vec<Splice>, selection: Selection) -> Option<Edit> {
    if splices.is_empty() {
        return None;
    }
    sort_splices(&mut splices);
    let anchor = map_offset(selection.anchor, &splices);
    let head = map_offset(selection.head, &splices);
    Some(Edit {
        markup: apply(markup, &splices),
        selection: Selection::new(anchor, head),
    })
}

/// Escape an attribute value for a double-quoted attribute
pub fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// Text runs with visible content inside `range`
fn content_runs(markup: &str, range: Range<usize>) -> Vec<Range<usize>> {
    text_runs(markup, range)
        .into_iter()
        .filter(|run| !markup[run.clone()].trim().is_empty())
        .collect()
}

fn formatted_by(markup: &str, offset: usize, format: InlineFormat) -> Option<Element> {
    innermost_enclosing(markup, offset, |name| {
        InlineFormat::from_tag(name) == Some(format)
    })
}

/// Blocks whose tag `formatBlock` may rename
fn is_formattable_block(name: &str) -> bool {
    BlockType::from_tag(name).is_some() || name == "div"
}

/// Blocks that carry their own alignment
fn is_alignable(name: &str) -> bool {
    is_formattable_block(name) || matches!(name, "li" | "td" | "th" | "figure")
}

fn is_list(name: &str) -> bool {
    ListKind::from_tag(name).is_some()
}

/// Span of top-level text around `range`, bounded by the nearest block tags
fn bare_segment(markup: &str, range: Range<usize>) -> Range<usize> {
    let tags = scan_tags(markup);
    let block_tags = || tags.iter().filter(|tag| is_block_element(&tag.name));
    let start = block_tags()
        .filter(|tag| tag.range.end <= range.start)
        .map(|tag| tag.range.end)
        .max()
        .unwrap_or(0);
    let end = block_tags()
        .filter(|tag| tag.range.start >= range.end)
        .map(|tag| tag.range.start)
        .min()
        .unwrap_or(markup.len());
    start..end.max(start)
}

/// Rebuild an opening tag under `name`, with some attributes set (`Some`)
/// or removed (`None`)
fn open_tag_with(element: &Element, name: &str, updates: &[(&str, Option<&str>)]) -> String {
    fn push(out: &mut String, name: &str, value: &str) {
        out.push_str(&format!(r#" {}="{}""#, name, escape_attribute(value)));
    }

    let mut out = format!("<{}", name);
    let mut seen: Vec<&str> = Vec::new();
    for (attr, value) in &element.attributes {
        match updates.iter().find(|(update, _)| *update == attr.as_str()) {
            Some((_, update)) => {
                if let Some(update) = update {
                    if !seen.contains(&attr.as_str()) {
                        push(&mut out, attr, update);
                    }
                }
                seen.push(attr);
            }
            None => push(&mut out, attr, value),
        }
    }
    for (attr, update) in updates {
        if let Some(value) = update {
            if !seen.contains(attr) {
                push(&mut out, attr, value);
            }
        }
    }
    out.push('>');
    out
}

fn unwrap_elements(markup: &str, targets: &[Element], selection: Selection) -> Option<Edit> {
    let mut splices = Vec::new();
    for element in targets {
        splices.push(Splice::remove(element.open.clone()));
        if let Some(close) = &element.close {
            splices.push(Splice::remove(close.clone()));
        }
    }
    splice_edit(markup, splices, selection)
}

fn rename_element(
    markup: &str,
    element: &Element,
    name: &str,
    selection: Selection,
) -> Option<Edit> {
    let open = open_tag_with(element, name, &[]);
    let mut splices = vec![Splice::replace(element.open.clone(), open)];
    if let Some(close) = &element.close {
        splices.push(Splice::replace(close.clone(), format!("</{}>", name)));
    }
    splice_edit(markup, splices, selection)
}

fn wrap_runs(
    markup: &str,
    runs: &[Range<usize>],
    open: &str,
    close: &str,
    selection: Selection,
) -> Option<Edit> {
    let splices = runs
        .iter()
        .flat_map(|run| [Splice::open(run.start, open), Splice::close(run.end, close)])
        .collect();
    splice_edit(markup, splices, selection)
}

/// Toggle an inline format over the selection.
///
/// If every selected run already has the format, the formatting elements are
/// unwrapped; otherwise the unformatted runs are wrapped. A collapsed caret
/// either leaves its formatting element or gets an empty one to type into.
pub fn toggle_inline(markup: &str, selection: Selection, format: InlineFormat) -> Option<Edit> {
    let open = format!("<{}>", format.tag());
    let close = format!("</{}>", format.tag());

    if selection.is_empty() {
        if let Some(element) = formatted_by(markup, selection.head, format) {
            return unwrap_elements(markup, &[element], selection);
        }
        let caret = selection.head;
        return splice_edit(
            markup,
            vec![Splice::open(caret, open), Splice::close(caret, close)],
            selection,
        );
    }

    let runs = content_runs(markup, selection.range());
    if runs.is_empty() {
        return None;
    }
    let formatted: Vec<Option<Element>> = runs
        .iter()
        .map(|run| formatted_by(markup, run.start, format))
        .collect();

    if formatted.iter().all(Option::is_some) {
        let mut targets: Vec<Element> = formatted.into_iter().flatten().collect();
        targets.sort_by_key(|el| el.open.start);
        targets.dedup_by_key(|el| el.open.start);
        return unwrap_elements(markup, &targets, selection);
    }

    let unformatted: Vec<Range<usize>> = runs
        .into_iter()
        .zip(formatted)
        .filter(|(_, element)| element.is_none())
        .map(|(run, _)| run)
        .collect();
    wrap_runs(markup, &unformatted, &open, &close, selection)
}

/// Change the block containing the selection start, or wrap bare text
pub fn format_block(markup: &str, selection: Selection, block: BlockType) -> Option<Edit> {
    let tag = block.tag();
    if let Some(element) = innermost_enclosing(markup, selection.start(), is_formattable_block) {
        if element.name == tag {
            return None;
        }
        return rename_element(markup, &element, &tag, selection);
    }

    let segment = bare_segment(markup, selection.range());
    splice_edit(
        markup,
        vec![
            Splice::open(segment.start, format!("<{}>", tag)),
            Splice::close(segment.end, format!("</{}>", tag)),
        ],
        selection,
    )
}

/// Set the text alignment of the block containing the selection start.
/// Left is the default and is expressed by removing `text-align`.
pub fn justify(markup: &str, selection: Selection, alignment: Alignment) -> Option<Edit> {
    let Some(element) = innermost_enclosing(markup, selection.start(), is_alignable) else {
        if alignment == Alignment::Left {
            return None;
        }
        let segment = bare_segment(markup, selection.range());
        let open = format!(r#"<p style="text-align: {}">"#, alignment.css());
        return splice_edit(
            markup,
            vec![
                Splice::open(segment.start, open),
                Splice::close(segment.end, "</p>"),
            ],
            selection,
        );
    };

    let explicit = text_align(&element);
    if explicit == Some(alignment) || (explicit.is_none() && alignment == Alignment::Left) {
        return None;
    }

    let style = element.attribute("style").unwrap_or_default();
    let mut declarations: Vec<String> = style
        .split(';')
        .map(str::trim)
        .filter(|decl| !decl.is_empty())
        .filter(|decl| {
            decl.split_once(':')
                .map_or(true, |(prop, _)| !prop.trim().eq_ignore_ascii_case("text-align"))
        })
        .map(str::to_string)
        .collect();
    if alignment != Alignment::Left {
        declarations.push(format!("text-align: {}", alignment.css()));
    }
    let style = declarations.join("; ");
    let style = (!style.is_empty()).then_some(style.as_str());

    let open = open_tag_with(&element, &element.name, &[("style", style)]);
    splice_edit(
        markup,
        vec![Splice::replace(element.open.clone(), open)],
        selection,
    )
}

/// Outermost non-list blocks touched by the selection
fn selected_blocks(markup: &str, selection: Selection) -> Vec<Element> {
    let range = selection.range();
    let candidates: Vec<Element> = elements(markup)
        .into_iter()
        .filter(|el| is_formattable_block(&el.name) && !el.is_void())
        .filter(|el| {
            let inner = el.inner();
            if range.is_empty() {
                inner.start <= range.start && range.start <= inner.end
            } else {
                el.open.start < range.end && range.start < el.outer().end
            }
        })
        .filter(|el| innermost_enclosing(markup, el.open.start, is_list).is_none())
        .collect();

    candidates
        .iter()
        .filter(|el| {
            !candidates.iter().any(|other| {
                let outer = other.outer();
                other.open != el.open
                    && outer.start <= el.open.start
                    && el.outer().end <= outer.end
            })
        })
        .cloned()
        .collect()
}

/// Toggle a list: leave a list of the same kind, switch kind, or turn the
/// selected blocks into list items
pub fn toggle_list(markup: &str, selection: Selection, kind: ListKind) -> Option<Edit> {
    let tag = kind.tag();

    if let Some(list) = innermost_enclosing(markup, selection.start(), is_list) {
        if list.name == tag {
            return unwrap_list(markup, &list, selection);
        }
        return rename_element(markup, &list, tag, selection);
    }

    let blocks = selected_blocks(markup, selection);
    if blocks.is_empty() {
        let segment = bare_segment(markup, selection.range());
        return splice_edit(
            markup,
            vec![
                Splice::open(segment.start, format!("<{}><li>", tag)),
                Splice::close(segment.end, format!("</li></{}>", tag)),
            ],
            selection,
        );
    }

    let last = blocks.len() - 1;
    let mut splices = Vec::new();
    for (i, block) in blocks.iter().enumerate() {
        let open = if i == 0 {
            format!("<{}><li>", tag)
        } else {
            "<li>".to_string()
        };
        let close = if i == last {
            format!("</li></{}>", tag)
        } else {
            "</li>".to_string()
        };
        splices.push(Splice::replace(block.open.clone(), open));
        match &block.close {
            Some(range) => splices.push(Splice::replace(range.clone(), close)),
            None => splices.push(Splice::close(block.end, close)),
        }
    }
    splice_edit(markup, splices, selection)
}

/// Remove a list, turning its items back into paragraphs
fn unwrap_list(markup: &str, list: &Element, selection: Selection) -> Option<Edit> {
    let inner = list.inner();
    let mut splices = vec![Splice::remove(list.open.clone())];
    if let Some(close) = &list.close {
        splices.push(Splice::remove(close.clone()));
    }

    let items = elements(markup).into_iter().filter(|el| {
        el.name == "li"
            && inner.start <= el.open.start
            && el.open.end <= inner.end
            && innermost_enclosing(markup, el.open.end, is_list)
                .is_some_and(|owner| owner.open == list.open)
    });
    for item in items {
        let item_inner = item.inner();
        let has_blocks = scan_tags(&markup[item_inner])
            .iter()
            .any(|tag| is_block_element(&tag.name));
        let (open, close) = if has_blocks { ("", "") } else { ("<p>", "</p>") };
        splices.push(Splice::replace(item.open.clone(), open));
        if let Some(range) = &item.close {
            splices.push(Splice::replace(range.clone(), close));
        }
    }
    splice_edit(markup, splices, selection)
}

fn is_removable_format(name: &str) -> bool {
    InlineFormat::from_tag(name).is_some_and(|format| format != InlineFormat::Link)
        || PRESENTATIONAL.contains(&name)
}

/// Strip inline formatting from the selection, or from the caret's block.
/// Links are kept.
pub fn remove_format(markup: &str, selection: Selection) -> Option<Edit> {
    let scope = if selection.is_empty() {
        match innermost_enclosing(markup, selection.head, is_alignable) {
            Some(block) => block.inner(),
            None => bare_segment(markup, selection.range()),
        }
    } else {
        selection.range()
    };
    if scope.is_empty() {
        return None;
    }

    let targets: Vec<Element> = elements(markup)
        .into_iter()
        .filter(|el| is_removable_format(&el.name))
        .filter(|el| {
            let inner = el.inner();
            inner.start < scope.end && scope.start < inner.end
        })
        .collect();
    unwrap_elements(markup, &targets, selection)
}

/// Replace the selected text with `fragment` (already safe markup) and put
/// the caret after it. Tags inside the selection are kept.
pub fn insert_fragment(markup: &str, selection: Selection, fragment: &str) -> Option<Edit> {
    let mut splices: Vec<Splice> = text_runs(markup, selection.range())
        .into_iter()
        .map(Splice::remove)
        .collect();
    if !fragment.is_empty() {
        splices.push(Splice::open(selection.start(), fragment));
    }
    if splices.is_empty() {
        return None;
    }
    sort_splices(&mut splices);
    let caret = map_offset(selection.start(), &splices);
    Some(Edit {
        markup: apply(markup, &splices),
        selection: Selection::collapsed(caret),
    })
}

/// Link the selection to `href`, or retarget the link around the caret
pub fn create_link(markup: &str, selection: Selection, href: &str) -> Option<Edit> {
    if let Some(link) = innermost_enclosing(markup, selection.start(), |name| name == "a") {
        let open = open_tag_with(&link, "a", &[("href", Some(href)), ("rel", Some(LINK_REL))]);
        return splice_edit(
            markup,
            vec![Splice::replace(link.open.clone(), open)],
            selection,
        );
    }

    let open = format!(
        r#"<a href="{}" rel="{}">"#,
        escape_attribute(href),
        LINK_REL
    );
    if selection.is_empty() {
        let fragment = format!("{}{}</a>", open, escape_text(href));
        return insert_fragment(markup, selection, &fragment);
    }

    let runs = content_runs(markup, selection.range());
    if runs.is_empty() {
        return None;
    }
    wrap_runs(markup, &runs, &open, "</a>", selection)
}

/// Remove links touched by the selection
pub fn unlink(markup: &str, selection: Selection) -> Option<Edit> {
    let range = selection.range();
    let targets: Vec<Element> = elements(markup)
        .into_iter()
        .filter(|el| el.name == "a")
        .filter(|el| {
            let inner = el.inner();
            if range.is_empty() {
                inner.start <= range.start && range.start <= inner.end
            } else {
                inner.start < range.end && range.start < inner.end
            }
        })
        .collect();
    unwrap_elements(markup, &targets, selection)
}

/// Wrap the selected text in a colored span
pub fn fore_color(markup: &str, selection: Selection, style: &str) -> Option<Edit> {
    if selection.is_empty() {
        return None;
    }
    let runs = content_runs(markup, selection.range());
    if runs.is_empty() {
        return None;
    }
    let open = format!(r#"<span style="{}">"#, escape_attribute(style));
    wrap_runs(markup, &runs, &open, "</span>", selection)
}

/// Empty `rows` x `cols` table
pub fn table_markup(rows: usize, cols: usize) -> String {
    let mut out = String::from("<table><tbody>");
    for _ in 0..rows {
        out.push_str("<tr>");
        for _ in 0..cols {
            out.push_str("<td><br></td>");
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    out
}

pub fn image_markup(src: &str, alt: &str) -> String {
    format!(
        r#"<img src="{}" alt="{}">"#,
        escape_attribute(src),
        escape_attribute(alt)
    )
}

/// Embeds are stored as a linked figure; the public renderer expands them
pub fn embed_markup(url: &str) -> String {
    format!(
        r#"<figure class="embed"><a href="{}">{}</a></figure>"#,
        escape_attribute(url),
        escape_text(url)
    )
}
