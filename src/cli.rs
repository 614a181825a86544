//! Command-line interface
//!
//! Supports:
//! - Sanitizing a file or stdin
//! - Printing content metrics
//! - Checking whether markup is already clean (for CI / pre-commit use)
//! - Listing toolbar commands
//! - Recovering (or discarding) the autosaved draft

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::commands::COMMANDS;
use crate::config::EditorSettings;
use crate::editable::markup::plain_text;
use crate::model::EditorMetrics;
use crate::runtime::{FallbackStore, FileFallbackStore};
use crate::sanitize::{sanitize, ALLOWLIST_VERSION};

/// Sanitize rich-text markup
#[derive(Parser, Debug)]
#[command(name = "quire", version, about = "Sanitize rich-text markup")]
pub struct CliArgs {
    /// Settings file (defaults to the user config directory)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Print sanitized markup
    Sanitize {
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,
    },
    /// Print word count, character count and reading time
    Stats {
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,

        /// Print the metrics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Exit non-zero when sanitizing would change the input
    Check {
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,
    },
    /// List the named toolbar commands
    Commands,
    /// Print the autosaved draft, sanitized
    Draft {
        /// Delete the draft after printing it
        #[arg(long)]
        clear: bool,
    },
}

impl CliCommand {
    pub fn file(&self) -> Option<&Path> {
        match self {
            CliCommand::Sanitize { file }
            | CliCommand::Stats { file, .. }
            | CliCommand::Check { file } => file.as_deref(),
            CliCommand::Commands | CliCommand::Draft { .. } => None,
        }
    }

    /// Whether the command consumes markup from a file or stdin
    pub fn reads_input(&self) -> bool {
        !matches!(self, CliCommand::Commands | CliCommand::Draft { .. })
    }
}

impl CliArgs {
    /// Resolve settings: `--config` must load, the default location may not exist
    pub fn settings(&self) -> anyhow::Result<EditorSettings> {
        match &self.config {
            Some(path) => EditorSettings::load_from(path),
            None => Ok(EditorSettings::load()),
        }
    }
}

/// Read the whole input from `file`, or stdin
pub fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

/// Run `command` on `input`, writing the report to `out`.
/// Returns `false` when a check found unsafe markup.
pub fn run(
    command: &CliCommand,
    input: &str,
    settings: &EditorSettings,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    match command {
        CliCommand::Sanitize { .. } => {
            write!(out, "{}", sanitize(input))?;
            Ok(true)
        }
        CliCommand::Stats { json, .. } => {
            let metrics = EditorMetrics::compute(&plain_text(&sanitize(input)), settings);
            if *json {
                serde_json::to_writer_pretty(&mut *out, &metrics)?;
                writeln!(out)?;
                return Ok(true);
            }
            writeln!(out, "words: {}", metrics.word_count)?;
            writeln!(out, "characters: {}", metrics.char_count)?;
            writeln!(out, "reading time: {} min", metrics.reading_time_minutes)?;
            if metrics.limit_exceeded {
                writeln!(out, "limit exceeded")?;
            }
            Ok(true)
        }
        CliCommand::Check { file } => {
            let name = file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<stdin>".to_string());
            if sanitize(input) == input {
                writeln!(out, "{}: clean (allowlist v{})", name, ALLOWLIST_VERSION)?;
                Ok(true)
            } else {
                writeln!(out, "{}: would be changed by sanitizing", name)?;
                Ok(false)
            }
        }
        CliCommand::Commands => {
            for def in COMMANDS {
                let value = if def.takes_value { " <value>" } else { "" };
                writeln!(out, "{:<24} {}", format!("{}{}", def.name, value), def.label)?;
            }
            Ok(true)
        }
        CliCommand::Draft { clear } => {
            let store = FileFallbackStore::default_location()?;
            print_draft(&store, *clear, out)
        }
    }
}

/// Write the stored draft through the sanitizer. Returns `false` when there is none.
pub fn print_draft(
    store: &impl FallbackStore,
    clear: bool,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    let Some(draft) = store.load()? else {
        writeln!(out, "no draft")?;
        return Ok(false);
    };
    write!(out, "{}", sanitize(&draft))?;
    if clear {
        store.clear()?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(command: CliCommand, input: &str) -> (bool, String) {
        let mut out = Vec::new();
        let ok = run(&command, input, &EditorSettings::default(), &mut out).unwrap();
        (ok, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_subcommands() {
        let args = CliArgs::try_parse_from(["quire", "sanitize"]).unwrap();
        assert_eq!(args.command, CliCommand::Sanitize { file: None });

        let args = CliArgs::try_parse_from(["quire", "check", "doc.html", "--config", "s.yaml"])
            .unwrap();
        assert_eq!(args.command.file(), Some(Path::new("doc.html")));
        assert_eq!(args.config, Some(PathBuf::from("s.yaml")));

        assert!(CliArgs::try_parse_from(["quire"]).is_err());
    }

    #[test]
    fn test_sanitize_output() {
        let (ok, out) = output(
            CliCommand::Sanitize { file: None },
            "<p onclick=\"x()\">a<script>b</script></p>",
        );
        assert!(ok);
        assert_eq!(out, "<p>a</p>");
    }

    #[test]
    fn test_stats_output() {
        let input = "<p>one two</p><p>three</p>";
        let (_, out) = output(CliCommand::Stats { file: None, json: false }, input);
        assert!(out.contains("words: 3"));
        assert!(out.contains("reading time: 1 min"));

        let (_, out) = output(CliCommand::Stats { file: None, json: true }, input);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["word_count"], 3);
        assert_eq!(value["limit_exceeded"], false);
    }

    #[test]
    fn test_check() {
        let (ok, _) = output(CliCommand::Check { file: None }, "<p>fine</p>");
        assert!(ok);
        let (ok, out) = output(CliCommand::Check { file: None }, "<img src=x onerror=y>");
        assert!(!ok);
        assert!(out.contains("<stdin>"));
    }

    #[test]
    fn test_commands_lists_labels() {
        let args = CliArgs::try_parse_from(["quire", "commands"]).unwrap();
        assert!(!args.command.reads_input());

        let (ok, out) = output(CliCommand::Commands, "");
        assert!(ok);
        assert_eq!(out.lines().count(), COMMANDS.len());
        let link = out.lines().find(|l| l.starts_with("createLink")).unwrap();
        assert!(link.contains("<value>"));
        assert!(out.lines().any(|l| l.starts_with("bold ") && l.ends_with("Bold")));
    }

    #[test]
    fn test_draft_is_sanitized_then_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileFallbackStore::new(dir.path().join("autosave.html"));
        store.save("<p>kept<script>x()</script></p>").unwrap();

        let mut out = Vec::new();
        assert!(print_draft(&store, false, &mut out).unwrap());
        assert_eq!(String::from_utf8(out).unwrap(), "<p>kept</p>");
        assert!(store.load().unwrap().is_some());

        let mut out = Vec::new();
        assert!(print_draft(&store, true, &mut out).unwrap());
        assert!(store.load().unwrap().is_none());

        let mut out = Vec::new();
        assert!(!print_draft(&store, true, &mut out).unwrap());
        assert_eq!(String::from_utf8(out).unwrap(), "no draft\n");
    }

    #[test]
    fn test_check_accepts_sanitize_output() {
        for raw in ["<pre>\n\ncode</pre>", "<h1><section><h2>t</h2></section></h1>"] {
            let (_, cleaned) = output(CliCommand::Sanitize { file: None }, raw);
            let (ok, out) = output(CliCommand::Check { file: None }, &cleaned);
            assert!(ok, "{}: {}", cleaned, out);
        }
    }
}
