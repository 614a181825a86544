//! Command executor tests
//!
//! Commands are driven through `update` with named messages, the way a
//! toolbar would send them.

mod common;

use common::{caret_after, execute, loaded_model, select, test_model_with, test_settings, warnings};
use quire::commands::{Cmd, CommandId, EditorCommand, COMMANDS};
use quire::diagnostics::LogEvent;
use quire::messages::{HistoryMsg, Msg};
use quire::model::{Alignment, BlockType, InlineFormat, ListKind};
use quire::update::update;

// ========================================================================
// Registry
// ========================================================================

#[test]
fn test_every_registered_command_parses() {
    for def in COMMANDS {
        let value = def.takes_value.then_some(match def.id {
            CommandId::FormatBlock => "h2",
            CommandId::InsertTable => "2x2",
            CommandId::ForeColor => "#ff0000",
            CommandId::CreateLink | CommandId::InsertImage | CommandId::InsertEmbed => {
                "https://youtube.com/x"
            }
            _ => "x",
        });
        let cmd = EditorCommand::parse(def.name, value);
        assert!(cmd.is_some(), "{} did not parse", def.name);
        assert_eq!(cmd.map(|c| c.name()), Some(def.name));
    }
}

#[test]
fn test_unsupported_and_malformed_commands_are_noops() {
    let (mut model, log) = loaded_model("<p>x</p>");
    assert!(execute(&mut model, "fontSize", Some("7")).is_none());
    assert!(execute(&mut model, "formatBlock", Some("marquee")).is_none());
    assert!(execute(&mut model, "insertTable", Some("lots")).is_none());
    assert_eq!(model.markup(), "<p>x</p>");
    assert_eq!(warnings(&log).len(), 3);
    assert!(warnings(&log)
        .iter()
        .all(|e| matches!(e, LogEvent::UnsupportedCommand { .. })));
}

// ========================================================================
// Formatting
// ========================================================================

#[test]
fn test_bold_then_detect() {
    let (mut model, _) = loaded_model("<p>hello world</p>");
    select(&mut model, "world");
    execute(&mut model, "bold", None);

    assert_eq!(model.markup(), "<p>hello <strong>world</strong></p>");
    assert!(model.formats.contains(InlineFormat::Bold));
    assert_eq!(model.formats.block, BlockType::Paragraph);

    execute(&mut model, "bold", None);
    assert_eq!(model.markup(), "<p>hello world</p>");
    assert!(!model.formats.contains(InlineFormat::Bold));
}

#[test]
fn test_format_block_with_inline_value() {
    let (mut model, _) = loaded_model("<p>Title</p>");
    caret_after(&mut model, "Ti");
    execute(&mut model, "formatBlock:h2", None);
    assert_eq!(model.markup(), "<h2>Title</h2>");
    assert_eq!(model.formats.block, BlockType::Heading(2));
    assert!(model.formats.ids().contains(&"formatBlock:h2".to_string()));
}

#[test]
fn test_justify_center() {
    let (mut model, _) = loaded_model("<p>x</p>");
    caret_after(&mut model, "x");
    execute(&mut model, "justifyCenter", None);
    assert_eq!(model.markup(), r#"<p style="text-align: center">x</p>"#);
    assert_eq!(model.formats.alignment, Alignment::Center);

    execute(&mut model, "justifyLeft", None);
    assert_eq!(model.markup(), "<p>x</p>");
}

#[test]
fn test_lists() {
    let (mut model, _) = loaded_model("<p>one</p><p>two</p>");
    let start = model.markup().find("one").unwrap();
    let end = model.markup().find("wo").unwrap();
    update(
        &mut model,
        Msg::Selection(quire::messages::SelectionMsg::Set(
            quire::editable::Selection::new(start, end),
        )),
    );
    execute(&mut model, "insertUnorderedList", None);
    assert_eq!(model.markup(), "<ul><li>one</li><li>two</li></ul>");
    assert_eq!(model.formats.list, Some(ListKind::Unordered));

    execute(&mut model, "insertOrderedList", None);
    assert_eq!(model.markup(), "<ol><li>one</li><li>two</li></ol>");
}

#[test]
fn test_remove_format() {
    let (mut model, _) = loaded_model(r#"<p><strong>a</strong> <a href="/x"><em>b</em></a></p>"#);
    caret_after(&mut model, "<strong>a");
    execute(&mut model, "removeFormat", None);
    assert_eq!(
        model.markup(),
        r#"<p>a <a href="/x" rel="noopener noreferrer">b</a></p>"#
    );
}

// ========================================================================
// Insertion
// ========================================================================

#[test]
fn test_insert_html_is_sanitized() {
    let (mut model, _) = loaded_model("<p>a</p>");
    caret_after(&mut model, "a");
    execute(
        &mut model,
        "insertHTML",
        Some(r#"<em onclick="x()">b</em><img src="javascript:y">"#),
    );
    assert_eq!(model.markup(), "<p>a<em>b</em><img></p>");
}

#[test]
fn test_insert_text_is_escaped() {
    let (mut model, _) = loaded_model("<p>a</p>");
    caret_after(&mut model, "a");
    execute(&mut model, "insertText", Some("<b>&"));
    assert_eq!(model.markup(), "<p>a&lt;b&gt;&amp;</p>");
    assert_eq!(model.plain_text(), "a<b>&");
}

#[test]
fn test_create_link_and_unlink() {
    let (mut model, _) = loaded_model("<p>go here</p>");
    select(&mut model, "here");
    execute(&mut model, "createLink", Some("https://a.example"));
    assert_eq!(
        model.markup(),
        r#"<p>go <a href="https://a.example" rel="noopener noreferrer">here</a></p>"#
    );
    assert!(model.formats.contains(InlineFormat::Link));

    execute(&mut model, "unlink", None);
    assert_eq!(model.markup(), "<p>go here</p>");
}

#[test]
fn test_blocked_link_leaves_surface_alone() {
    let (mut model, log) = loaded_model("<p>go here</p>");
    select(&mut model, "here");
    let revision = model.revision;
    execute(&mut model, "createLink", Some("data:text/html,<script>"));
    assert_eq!(model.markup(), "<p>go here</p>");
    assert_eq!(model.revision, revision);
    assert!(matches!(warnings(&log)[0], LogEvent::BlockedUrl { .. }));
}

#[test]
fn test_insert_image() {
    let (mut model, log) = loaded_model("<p>a</p>");
    caret_after(&mut model, "a");
    execute(
        &mut model,
        "insertImage",
        Some("https://cdn.example/a.png"),
    );
    assert!(model.markup().contains(r#"<img src="https://cdn.example/a.png""#));

    execute(&mut model, "insertImage", Some("javascript:alert(1)"));
    assert!(!model.markup().contains("javascript"));
    assert!(matches!(warnings(&log)[0], LogEvent::BlockedUrl { .. }));
}

#[test]
fn test_insert_table_and_rule() {
    let (mut model, log) = loaded_model("");
    execute(&mut model, "insertTable", Some("2x3"));
    assert_eq!(model.markup().matches("<tr>").count(), 2);
    assert_eq!(model.markup().matches("<td>").count(), 6);

    execute(&mut model, "insertTable", Some("1x11"));
    assert!(matches!(warnings(&log)[0], LogEvent::LimitExceeded { .. }));
    assert_eq!(model.markup().matches("<td>").count(), 6);
}

#[test]
fn test_insert_markdown() {
    let (mut model, _) = loaded_model("");
    execute(
        &mut model,
        "insertMarkdown",
        Some("# Title\n\n- one\n- ~~two~~\n\n<script>x</script>"),
    );
    let markup = model.markup();
    assert!(markup.contains("<h1>Title</h1>"));
    assert!(markup.contains("<li>one</li>"));
    assert!(markup.contains("<del>two</del>"));
    assert!(!markup.contains("<script"));
}

// ========================================================================
// Settings
// ========================================================================

#[test]
fn test_disabled_features_reject_commands() {
    let mut settings = test_settings();
    settings.features.tables = false;
    settings.features.markdown = false;
    let (mut model, log) = test_model_with("", settings);

    execute(&mut model, "insertTable", Some("2x2"));
    execute(&mut model, "insertMarkdown", Some("*x*"));
    assert_eq!(model.markup(), "");
    assert_eq!(
        warnings(&log),
        vec![
            LogEvent::FeatureDisabled {
                command: "insertTable".to_string()
            },
            LogEvent::FeatureDisabled {
                command: "insertMarkdown".to_string()
            },
        ]
    );
}

#[test]
fn test_embed_allowlist() {
    let (mut model, log) = loaded_model("");
    execute(&mut model, "insertEmbed", Some("https://player.vimeo.com/video/1"));
    assert!(model.markup().contains("https://player.vimeo.com/video/1"));

    execute(&mut model, "insertEmbed", Some("https://vimeo.com.evil.example/1"));
    assert!(matches!(warnings(&log)[0], LogEvent::DisallowedEmbed { .. }));
}

// ========================================================================
// Commands and history
// ========================================================================

#[test]
fn test_command_effects() {
    let (mut model, _) = loaded_model("<p>x</p>");
    select(&mut model, "x");
    let cmd = execute(&mut model, "italic", None).unwrap();

    assert!(cmd.any(&|c| matches!(c, Cmd::NotifyChange(change) if change.plain_text == "x")));
    assert!(cmd.any(&|c| matches!(c, Cmd::RefreshFormats)));
    assert_eq!(model.history.len(), 2);
}

#[test]
fn test_undo_redo_commands_match_history_messages() {
    let (mut model, _) = loaded_model("<p>x</p>");
    select(&mut model, "x");
    execute(&mut model, "underline", None);
    let formatted = model.markup().to_string();

    execute(&mut model, "undo", None);
    assert_eq!(model.markup(), "<p>x</p>");
    update(&mut model, Msg::History(HistoryMsg::Redo));
    assert_eq!(model.markup(), formatted);
}

#[test]
fn test_select_all() {
    let (mut model, _) = loaded_model("<p>a</p><p>b</p>");
    execute(&mut model, "selectAll", None);
    execute(&mut model, "bold", None);
    assert_eq!(
        model.markup(),
        "<p><strong>a</strong></p><p><strong>b</strong></p>"
    );
}
