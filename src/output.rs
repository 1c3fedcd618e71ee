//! Rendering of the selected files into one LLM-ready text document, plus
//! the stdout/clipboard publishing sinks.
//!
//! Rendering is partial-failure tolerant: an unreadable file becomes a
//! placeholder line inside its block and the rest of the document still
//! renders. The project-structure block and the clipboard are decorative
//! collaborators and degrade silently or with a warning.

use std::fs;
use std::path::Path;
use std::process::Command;

use colored::Colorize;
use log::debug;

use crate::lang;

const WRAP_START: &str = "===== BEGIN SYNOPSIS =====";
const WRAP_END: &str = "===== END SYNOPSIS =====";

/// Knobs for [`assemble`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Wrap the whole document in a fixed delimiter pair.
    pub wrap: bool,
    /// Prepend a project-structure block when one can be sourced.
    pub structure: bool,
}

/// Render the selected paths into one deterministic text document.
///
/// `paths` must already be sorted (the persistence ordering); each entry is
/// resolved against `root` for reading.
pub fn assemble(root: &Path, paths: &[String], opts: RenderOptions) -> String {
    let mut doc = String::new();

    if opts.wrap {
        doc.push_str(WRAP_START);
        doc.push_str("\n\n");
    }

    if opts.structure
        && let Some(listing) = project_structure(root)
    {
        doc.push_str("Project structure:\n\n```\n");
        doc.push_str(&listing);
        if !listing.ends_with('\n') {
            doc.push('\n');
        }
        doc.push_str("```\n\n");
    }

    for path in paths {
        let content = match fs::read_to_string(root.join(path)) {
            Ok(content) => content,
            Err(e) => format!("[Error reading file: {e}]"),
        };
        let file_name = path.rsplit('/').next().unwrap_or(path);
        doc.push_str(path);
        doc.push_str("\n\n```");
        doc.push_str(lang::hint(file_name));
        doc.push('\n');
        doc.push_str(content.trim_end_matches('\n'));
        doc.push_str("\n```\n\n");
    }

    if opts.wrap {
        doc.push_str(WRAP_END);
        doc.push('\n');
    }
    doc
}

/// File listing for the structure block, sourced from `git ls-files`.
///
/// Returns `None` whenever git is absent, the root is not a repository, or
/// the listing comes back empty. Never fatal.
fn project_structure(root: &Path) -> Option<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(root)
        .arg("ls-files")
        .output()
        .ok()?;
    if !output.status.success() {
        debug!("git ls-files unavailable, omitting structure block");
        return None;
    }
    let listing = String::from_utf8_lossy(&output.stdout).into_owned();
    if listing.trim().is_empty() {
        None
    } else {
        Some(listing)
    }
}

/// Emit the document to stdout and to the system clipboard.
///
/// The stdout path always succeeds independently; a clipboard failure is a
/// warning on stderr, never an error.
pub fn publish(document: &str) {
    println!("{document}");

    match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(document.to_string())) {
        Ok(()) => eprintln!("{} Output copied to clipboard.", "✓".green().bold()),
        Err(e) => eprintln!(
            "{} Failed to copy to clipboard: {e}",
            "Warning:".yellow().bold()
        ),
    }
}
