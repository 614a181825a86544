//! Command executor
//!
//! Maps toolbar intents onto surface mutations. Markup payloads are
//! sanitized and text payloads escaped before they reach the surface. A
//! command that is refused (unknown, disabled, over a limit, unsafe URL) is
//! reported to the log sink and leaves the surface untouched.

use pulldown_cmark::{html, Options, Parser};

use crate::commands::{Cmd, EditorCommand};
use crate::diagnostics::LogEvent;
use crate::editable::{EditableSurface, Selection};
use crate::messages::{HistoryMsg, SelectionMsg};
use crate::model::EditorModel;
use crate::sanitize::{escape_text, filter_style, is_dangerous_url, is_safe_url, sanitize, url_host};

use super::content::commit;
use super::format::update_selection;
use super::history::update_history;
use super::mutate::{self, Edit};
use super::upload::begin_upload;

/// Execute a command given by name, e.g. `("formatBlock", Some("h2"))`
pub fn execute_named<S: EditableSurface>(
    model: &mut EditorModel<S>,
    name: &str,
    value: Option<&str>,
) -> Option<Cmd> {
    match EditorCommand::parse(name, value) {
        Some(cmd) => update_command(model, cmd),
        None => {
            model.report(LogEvent::UnsupportedCommand {
                name: name.to_string(),
            });
            None
        }
    }
}

/// Execute a typed command
pub fn update_command<S: EditableSurface>(
    model: &mut EditorModel<S>,
    cmd: EditorCommand,
) -> Option<Cmd> {
    if !cmd.is_enabled(&model.settings.features) {
        model.report(LogEvent::FeatureDisabled {
            command: cmd.name().to_string(),
        });
        return None;
    }

    let edit = match cmd {
        EditorCommand::Undo => return update_history(model, HistoryMsg::Undo),
        EditorCommand::Redo => return update_history(model, HistoryMsg::Redo),
        EditorCommand::SelectAll => return update_selection(model, SelectionMsg::SelectAll),
        EditorCommand::UploadImage(file) => return begin_upload(model, file),
        other => plan_edit(model, &other)?,
    };

    // The surface is about to be overwritten; keep what it held undoable
    if model.history.is_empty() {
        model.history.push(model.surface.markup().to_string());
    }
    model.surface.set_markup(edit.markup);
    model.surface.set_selection(edit.selection);
    commit(model)
}

/// Work out the edit for a mutating command
fn plan_edit<S: EditableSurface>(model: &EditorModel<S>, cmd: &EditorCommand) -> Option<Edit> {
    let markup = model.surface.markup();
    let selection = model.surface.selection();
    let settings = &model.settings;

    match cmd {
        EditorCommand::ToggleInline(format) => mutate::toggle_inline(markup, selection, *format),
        EditorCommand::FormatBlock(block) => mutate::format_block(markup, selection, *block),
        EditorCommand::Justify(alignment) => mutate::justify(markup, selection, *alignment),
        EditorCommand::ToggleList(kind) => mutate::toggle_list(markup, selection, *kind),
        EditorCommand::RemoveFormat => mutate::remove_format(markup, selection),

        EditorCommand::InsertHtml(raw) => insert(markup, selection, &sanitize(raw)),
        EditorCommand::InsertText(text) => insert(markup, selection, &escape_text(text)),
        EditorCommand::InsertMarkdown(source) => {
            insert(markup, selection, &sanitize(&render_markdown(source)))
        }
        EditorCommand::InsertHorizontalRule => insert(markup, selection, "<hr>"),

        EditorCommand::CreateLink(url) => {
            let url = url.trim();
            if !is_safe_url(url) {
                model.report(LogEvent::BlockedUrl {
                    url: url.to_string(),
                });
                return None;
            }
            mutate::create_link(markup, selection, url)
        }
        EditorCommand::Unlink => mutate::unlink(markup, selection),

        EditorCommand::InsertImage { src, alt } => {
            let src = src.trim();
            if !is_safe_url(src) {
                model.report(LogEvent::BlockedUrl {
                    url: src.to_string(),
                });
                return None;
            }
            insert(markup, selection, &sanitize(&mutate::image_markup(src, alt)))
        }

        EditorCommand::InsertEmbed(url) => {
            let url = url.trim();
            if is_dangerous_url(url) {
                model.report(LogEvent::BlockedUrl {
                    url: url.to_string(),
                });
                return None;
            }
            let allowed = is_safe_url(url)
                && url_host(url).is_some_and(|host| settings.allows_embed_host(&host));
            if !allowed {
                model.report(LogEvent::DisallowedEmbed {
                    url: url.to_string(),
                });
                return None;
            }
            insert(markup, selection, &sanitize(&mutate::embed_markup(url)))
        }

        EditorCommand::InsertTable { rows, cols } => {
            let (rows, cols) = (*rows, *cols);
            if rows == 0
                || cols == 0
                || rows > settings.max_table_rows
                || cols > settings.max_table_cols
            {
                model.report(LogEvent::LimitExceeded {
                    command: cmd.name().to_string(),
                    detail: format!(
                        "{}x{} outside 1x1..{}x{}",
                        rows, cols, settings.max_table_rows, settings.max_table_cols
                    ),
                });
                return None;
            }
            insert(markup, selection, &mutate::table_markup(rows, cols))
        }

        EditorCommand::ForeColor(color) => {
            let color = color.trim();
            if !settings.allows_color(color) {
                model.report(LogEvent::LimitExceeded {
                    command: cmd.name().to_string(),
                    detail: format!("{} is not in the palette", color),
                });
                return None;
            }
            // The style filter is the arbiter of what a valid color is
            let Some(style) = filter_style(&format!("color: {}", color)) else {
                model.report(LogEvent::UnsupportedCommand {
                    name: format!("{}:{}", cmd.name(), color),
                });
                return None;
            };
            mutate::fore_color(markup, selection, &style)
        }

        EditorCommand::Undo
        | EditorCommand::Redo
        | EditorCommand::SelectAll
        | EditorCommand::UploadImage(_) => None,
    }
}

fn insert(markup: &str, selection: Selection, fragment: &str) -> Option<Edit> {
    mutate::insert_fragment(markup, selection, fragment)
}

/// Render markdown to markup. The result is untrusted until sanitized.
fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(source, options);
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
