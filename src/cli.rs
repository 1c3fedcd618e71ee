//! CLI surface and top-level orchestration.
//!
//! Pipeline: decode the selection store, mirror the directory tree seeded
//! with it, run the interactive selector when there is no usable selection
//! (or `--regen` forces one), persist the result, then assemble and
//! publish the document.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::debug;
use thiserror::Error;

use crate::output::{self, RenderOptions};
use crate::selector::{self, Outcome};
use crate::store::{self, STORE_FILE};
use crate::tree::FileTree;

/// Select files from a directory tree and emit their contents as a single
/// LLM-ready text block
#[derive(Parser)]
#[command(name = "synopsis")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Root directory to mirror (defaults to the current directory)
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Re-run interactive selection even if a non-empty store exists
    #[arg(short, long)]
    pub regen: bool,

    /// Wrap the output in a fixed start/end delimiter pair
    #[arg(short, long)]
    pub wrap: bool,

    /// Override the selection store path (defaults to .synopsis in DIR)
    #[arg(long, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Skip the project-structure block
    #[arg(long)]
    pub no_structure: bool,
}

/// The user quit the interactive session; edits are discarded and nothing
/// is persisted or rendered. `main` maps this to a cancel notice + exit 1.
#[derive(Debug, Error)]
#[error("selection cancelled")]
pub struct Cancelled;

pub fn run(cli: Cli) -> Result<()> {
    let root = cli
        .dir
        .canonicalize()
        .with_context(|| format!("directory not found: {}", cli.dir.display()))?;
    if !root.is_dir() {
        bail!("not a directory: {}", root.display());
    }

    let store_path = cli.store.unwrap_or_else(|| root.join(STORE_FILE));
    let initial = store::load(&store_path)?;

    let selected: Vec<String> = if cli.regen || initial.is_empty() {
        debug!("running interactive selection (regen: {})", cli.regen);
        let mut tree = FileTree::build(&root, &initial)?;
        match selector::select(&mut tree)? {
            Outcome::Confirmed(paths) => {
                let set: BTreeSet<String> = paths.iter().cloned().collect();
                store::save(&store_path, &set)?;
                paths
            }
            Outcome::Cancelled => return Err(Cancelled.into()),
        }
    } else {
        // BTreeSet iteration order is the persistence encode order.
        initial.into_iter().collect()
    };

    let document = output::assemble(
        &root,
        &selected,
        RenderOptions {
            wrap: cli.wrap,
            structure: !cli.no_structure,
        },
    );
    output::publish(&document);
    Ok(())
}
