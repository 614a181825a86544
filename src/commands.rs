//! Command types for the Elm-style architecture
//!
//! [`EditorCommand`] is a toolbar intent; [`Cmd`] is a side effect returned
//! from update for the runtime to perform.

use crate::config::FeatureToggles;
use crate::model::{Alignment, BlockType, ContentChange, InlineFormat, ListKind};
use crate::runtime::UploadFile;

// ============================================================================
// Command Registry
// ============================================================================

/// Identifies a named editor command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    // Inline formatting
    Bold,
    Italic,
    Underline,
    StrikeThrough,
    Code,
    Subscript,
    Superscript,

    // Blocks
    FormatBlock,
    JustifyLeft,
    JustifyCenter,
    JustifyRight,
    JustifyFull,
    InsertUnorderedList,
    InsertOrderedList,

    // Insertion
    InsertHtml,
    InsertText,
    InsertMarkdown,
    CreateLink,
    Unlink,
    InsertImage,
    InsertEmbed,
    InsertTable,
    InsertHorizontalRule,
    ForeColor,
    RemoveFormat,

    // Edit
    SelectAll,
    Undo,
    Redo,
}

/// A command definition for toolbars and the command palette
#[derive(Debug, Clone)]
pub struct CommandDef {
    pub id: CommandId,
    /// Name accepted by [`EditorCommand::parse`]
    pub name: &'static str,
    pub label: &'static str,
    pub takes_value: bool,
}

/// Static registry of all named commands
pub static COMMANDS: &[CommandDef] = &[
    CommandDef {
        id: CommandId::Bold,
        name: "bold",
        label: "Bold",
        takes_value: false,
    },
    CommandDef {
        id: CommandId::Italic,
        name: "italic",
        label: "Italic",
        takes_value: false,
    },
    CommandDef {
        id: CommandId::Underline,
        name: "underline",
        label: "Underline",
        takes_value: false,
    },
    CommandDef {
        id: CommandId::StrikeThrough,
        name: "strikeThrough",
        label: "Strikethrough",
        takes_value: false,
    },
    CommandDef {
        id: CommandId::Code,
        name: "code",
        label: "Inline Code",
        takes_value: false,
    },
    CommandDef {
        id: CommandId::Subscript,
        name: "subscript",
        label: "Subscript",
        takes_value: false,
    },
    CommandDef {
        id: CommandId::Superscript,
        name: "superscript",
        label: "Superscript",
        takes_value: false,
    },
    CommandDef {
        id: CommandId::FormatBlock,
        name: "formatBlock",
        label: "Block Type...",
        takes_value: true,
    },
    CommandDef {
        id: CommandId::JustifyLeft,
        name: "justifyLeft",
        label: "Align Left",
        takes_value: false,
    },
    CommandDef {
        id: CommandId::JustifyCenter,
        name: "justifyCenter",
        label: "Align Center",
        takes_value: false,
    },
    CommandDef {
        id: CommandId::JustifyRight,
        name: "justifyRight",
        label: "Align Right",
        takes_value: false,
    },
    CommandDef {
        id: CommandId::JustifyFull,
        name: "justifyFull",
        label: "Justify",
        takes_value: false,
    },
    CommandDef {
        id: CommandId::InsertUnorderedList,
        name: "insertUnorderedList",
        label: "Bulleted List",
        takes_value: false,
    },
    CommandDef {
        id: CommandId::InsertOrderedList,
        name: "insertOrderedList",
        label: "Numbered List",
        takes_value: false,
    },
    CommandDef {
        id: CommandId::InsertHtml,
        name: "insertHTML",
        label: "Insert HTML...",
        takes_value: true,
    },
    CommandDef {
        id: CommandId::InsertText,
        name: "insertText",
        label: "Insert Text...",
        takes_value: true,
    },
    CommandDef {
        id: CommandId::InsertMarkdown,
        name: "insertMarkdown",
        label: "Insert Markdown...",
        takes_value: true,
    },
    CommandDef {
        id: CommandId::CreateLink,
        name: "createLink",
        label: "Insert Link...",
        takes_value: true,
    },
    CommandDef {
        id: CommandId::Unlink,
        name: "unlink",
        label: "Remove Link",
        takes_value: false,
    },
    CommandDef {
        id: CommandId::InsertImage,
        name: "insertImage",
        label: "Insert Image...",
        takes_value: true,
    },
    CommandDef {
        id: CommandId::InsertEmbed,
        name: "insertEmbed",
        label: "Embed Media...",
        takes_value: true,
    },
    CommandDef {
        id: CommandId::InsertTable,
        name: "insertTable",
        label: "Insert Table...",
        takes_value: true,
    },
    CommandDef {
        id: CommandId::InsertHorizontalRule,
        name: "insertHorizontalRule",
        label: "Horizontal Rule",
        takes_value: false,
    },
    CommandDef {
        id: CommandId::ForeColor,
        name: "foreColor",
        label: "Text Color...",
        takes_value: true,
    },
    CommandDef {
        id: CommandId::RemoveFormat,
        name: "removeFormat",
        label: "Clear Formatting",
        takes_value: false,
    },
    CommandDef {
        id: CommandId::SelectAll,
        name: "selectAll",
        label: "Select All",
        takes_value: false,
    },
    CommandDef {
        id: CommandId::Undo,
        name: "undo",
        label: "Undo",
        takes_value: false,
    },
    CommandDef {
        id: CommandId::Redo,
        name: "redo",
        label: "Redo",
        takes_value: false,
    },
];

impl CommandId {
    /// Look up a command by name (ASCII case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        COMMANDS
            .iter()
            .find(|def| def.name.eq_ignore_ascii_case(name))
            .map(|def| def.id)
    }

    pub fn def(&self) -> Option<&'static CommandDef> {
        COMMANDS.iter().find(|def| def.id == *self)
    }
}

// ============================================================================
// Editor Commands (toolbar intents)
// ============================================================================

/// A parsed toolbar intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    ToggleInline(InlineFormat),
    FormatBlock(BlockType),
    Justify(Alignment),
    ToggleList(ListKind),
    /// Untrusted markup, sanitized before insertion
    InsertHtml(String),
    /// Plain text, escaped before insertion
    InsertText(String),
    /// Markdown source, rendered then sanitized
    InsertMarkdown(String),
    CreateLink(String),
    Unlink,
    InsertImage {
        src: String,
        alt: String,
    },
    InsertEmbed(String),
    InsertTable {
        rows: usize,
        cols: usize,
    },
    InsertHorizontalRule,
    ForeColor(String),
    RemoveFormat,
    SelectAll,
    Undo,
    Redo,
    /// Only available as a typed command (the file can't travel as a string)
    UploadImage(UploadFile),
}

impl EditorCommand {
    /// Parse a named command. `"formatBlock:h2"` is the same as
    /// `("formatBlock", Some("h2"))`; an explicit value wins.
    ///
    /// Returns `None` for unknown names and missing or malformed values.
    pub fn parse(name: &str, value: Option<&str>) -> Option<Self> {
        let (base, inline_value) = match name.split_once(':') {
            Some((base, v)) => (base, Some(v)),
            None => (name, None),
        };
        let value = value.or(inline_value);
        let id = CommandId::from_name(base.trim())?;

        let required = || value.map(str::trim).filter(|v| !v.is_empty());

        let cmd = match id {
            CommandId::Bold => EditorCommand::ToggleInline(InlineFormat::Bold),
            CommandId::Italic => EditorCommand::ToggleInline(InlineFormat::Italic),
            CommandId::Underline => EditorCommand::ToggleInline(InlineFormat::Underline),
            CommandId::StrikeThrough => EditorCommand::ToggleInline(InlineFormat::Strikethrough),
            CommandId::Code => EditorCommand::ToggleInline(InlineFormat::Code),
            CommandId::Subscript => EditorCommand::ToggleInline(InlineFormat::Subscript),
            CommandId::Superscript => EditorCommand::ToggleInline(InlineFormat::Superscript),
            CommandId::FormatBlock => EditorCommand::FormatBlock(BlockType::parse(required()?)?),
            CommandId::JustifyLeft => EditorCommand::Justify(Alignment::Left),
            CommandId::JustifyCenter => EditorCommand::Justify(Alignment::Center),
            CommandId::JustifyRight => EditorCommand::Justify(Alignment::Right),
            CommandId::JustifyFull => EditorCommand::Justify(Alignment::Justify),
            CommandId::InsertUnorderedList => EditorCommand::ToggleList(ListKind::Unordered),
            CommandId::InsertOrderedList => EditorCommand::ToggleList(ListKind::Ordered),
            // Text payloads keep their whitespace
            CommandId::InsertHtml => EditorCommand::InsertHtml(value?.to_string()),
            CommandId::InsertText => EditorCommand::InsertText(value?.to_string()),
            CommandId::InsertMarkdown => EditorCommand::InsertMarkdown(value?.to_string()),
            CommandId::CreateLink => EditorCommand::CreateLink(required()?.to_string()),
            CommandId::Unlink => EditorCommand::Unlink,
            CommandId::InsertImage => EditorCommand::InsertImage {
                src: required()?.to_string(),
                alt: String::new(),
            },
            CommandId::InsertEmbed => EditorCommand::InsertEmbed(required()?.to_string()),
            CommandId::InsertTable => {
                let (rows, cols) = parse_table_size(required()?)?;
                EditorCommand::InsertTable { rows, cols }
            }
            CommandId::InsertHorizontalRule => EditorCommand::InsertHorizontalRule,
            CommandId::ForeColor => EditorCommand::ForeColor(required()?.to_string()),
            CommandId::RemoveFormat => EditorCommand::RemoveFormat,
            CommandId::SelectAll => EditorCommand::SelectAll,
            CommandId::Undo => EditorCommand::Undo,
            CommandId::Redo => EditorCommand::Redo,
        };
        Some(cmd)
    }

    /// Name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            EditorCommand::ToggleInline(format) => format.id(),
            EditorCommand::FormatBlock(_) => "formatBlock",
            EditorCommand::Justify(alignment) => alignment.id(),
            EditorCommand::ToggleList(kind) => kind.id(),
            EditorCommand::InsertHtml(_) => "insertHTML",
            EditorCommand::InsertText(_) => "insertText",
            EditorCommand::InsertMarkdown(_) => "insertMarkdown",
            EditorCommand::CreateLink(_) => "createLink",
            EditorCommand::Unlink => "unlink",
            EditorCommand::InsertImage { .. } => "insertImage",
            EditorCommand::InsertEmbed(_) => "insertEmbed",
            EditorCommand::InsertTable { .. } => "insertTable",
            EditorCommand::InsertHorizontalRule => "insertHorizontalRule",
            EditorCommand::ForeColor(_) => "foreColor",
            EditorCommand::RemoveFormat => "removeFormat",
            EditorCommand::SelectAll => "selectAll",
            EditorCommand::Undo => "undo",
            EditorCommand::Redo => "redo",
            EditorCommand::UploadImage(_) => "uploadImage",
        }
    }

    /// Check the feature toggle that gates this command
    pub fn is_enabled(&self, features: &FeatureToggles) -> bool {
        match self {
            EditorCommand::CreateLink(_) | EditorCommand::Unlink => features.links,
            EditorCommand::InsertImage { .. } | EditorCommand::UploadImage(_) => features.images,
            EditorCommand::InsertTable { .. } => features.tables,
            EditorCommand::InsertEmbed(_) => features.embeds,
            EditorCommand::InsertMarkdown(_) => features.markdown,
            EditorCommand::ToggleInline(InlineFormat::Code)
            | EditorCommand::FormatBlock(BlockType::Pre) => features.code_blocks,
            EditorCommand::ToggleList(_) => features.lists,
            EditorCommand::ForeColor(_) => features.colors,
            _ => true,
        }
    }
}

/// Parse `"3x4"` (rows x columns)
fn parse_table_size(value: &str) -> Option<(usize, usize)> {
    let (rows, cols) = value.split_once(['x', 'X', '×', ','])?;
    Some((rows.trim().parse().ok()?, cols.trim().parse().ok()?))
}

// ============================================================================
// Side-Effect Commands (returned from update)
// ============================================================================

/// Commands returned by update functions
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Tell the observer about a committed change
    NotifyChange(ContentChange),
    /// Recompute active formats on the next event-loop turn
    RefreshFormats,
    /// Persist to the fallback store after `delay_ms` unless a newer edit lands
    DebouncedAutosave { revision: u64, delay_ms: u64 },
    /// Write the draft to the fallback store now
    PersistFallback { markup: String },
    /// Hand a file to the upload collaborator
    UploadImage { ticket: u64, file: UploadFile },
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands, dropping no-ops
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        let mut cmds: Vec<Cmd> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Cmd::None,
            1 => cmds.remove(0),
            _ => Cmd::Batch(cmds),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }

    /// Check whether this command, or any command in a batch, matches
    pub fn any(&self, pred: &impl Fn(&Cmd) -> bool) -> bool {
        match self {
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.any(pred)),
            other => pred(other),
        }
    }
}
