//! synopsis - Select files from a directory tree and emit their contents as
//! one LLM-ready text block.
//!
//! The core is a hierarchical selection engine: an arena-backed mirror of
//! the filesystem ([`tree`]), a blocking-terminal navigation loop over it
//! ([`selector`]), a flat-file codec persisting the selected leaf paths
//! ([`store`]), and a renderer concatenating the selected files into a
//! single document ([`output`]).

pub mod cli;
pub mod lang;
pub mod output;
pub mod selector;
pub mod store;
pub mod tree;

pub use selector::Outcome;
pub use store::{STORE_FILE, StoreError};
pub use tree::{Collapse, FileTree, Node, NodeId, NodeKind};
