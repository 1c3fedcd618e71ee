//! In-memory mirror of a directory tree plus per-node selection state.
//!
//! The tree is built once per session from a single read-only filesystem
//! pass and its shape never changes afterwards; only the `selected` and
//! `expanded` flags mutate. Nodes live in a flat arena and reference each
//! other by index, which keeps parent links cheap and cycle-free.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use log::debug;

/// Index of a node within the tree arena.
pub type NodeId = usize;

/// Directory-or-file discriminant with the directory-only payload.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Dir {
        /// Child indices, sorted directories-first then by name. Fixed at
        /// construction time.
        children: Vec<NodeId>,
        /// Whether the children are shown in the navigation view.
        expanded: bool,
    },
    File,
}

/// A single entry in the mirrored tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Base name segment.
    pub name: String,
    /// Path relative to the tree root, `/`-separated. Empty for the root.
    pub path: String,
    /// Enclosing directory, `None` for the root.
    pub parent: Option<NodeId>,
    pub selected: bool,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Dir { .. })
    }

    fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Dir { children, .. } => children,
            NodeKind::File => &[],
        }
    }

    pub fn expanded(&self) -> bool {
        matches!(self.kind, NodeKind::Dir { expanded: true, .. })
    }
}

/// Outcome of a collapse request, so the caller can relocate its cursor
/// when the collapse bubbled up to the parent directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collapse {
    /// The node itself was collapsed.
    Collapsed,
    /// The parent was collapsed instead; focus should move to it.
    Refocus(NodeId),
    /// Nothing to collapse (already at the top level).
    Noop,
}

/// Arena-backed snapshot of a directory tree with selection flags.
pub struct FileTree {
    nodes: Vec<Node>,
}

impl FileTree {
    /// Mirror the directory at `root` and seed selection from `initial`.
    ///
    /// `initial` holds relative `/`-separated file paths; files found in it
    /// start selected, and directory `selected`/`expanded` flags are rolled
    /// up bottom-up from the leaves. The traversal follows symlinks and
    /// performs no cycle detection.
    pub fn build(root: &Path, initial: &BTreeSet<String>) -> Result<Self> {
        if !root.is_dir() {
            bail!("not a directory: {}", root.display());
        }

        let mut tree = FileTree {
            nodes: vec![Node {
                name: String::new(),
                path: String::new(),
                parent: None,
                selected: false,
                kind: NodeKind::Dir {
                    children: Vec::new(),
                    expanded: true,
                },
            }],
        };
        tree.scan_dir(root, 0)?;
        tree.init_selection(0, initial);
        debug!(
            "mirrored {} nodes under {}",
            tree.nodes.len() - 1,
            root.display()
        );
        Ok(tree)
    }

    /// Enumerate the immediate children of `dir` and recurse into
    /// subdirectories, appending nodes under the arena entry `parent`.
    fn scan_dir(&mut self, dir: &Path, parent: NodeId) -> Result<()> {
        let mut entries: Vec<(String, bool)> = Vec::new();
        for entry in fs::read_dir(dir)
            .with_context(|| format!("failed to list directory: {}", dir.display()))?
        {
            let entry = entry
                .with_context(|| format!("failed to read entry in: {}", dir.display()))?;
            let is_dir = entry
                .file_type()
                .with_context(|| format!("failed to stat: {}", entry.path().display()))?
                .is_dir();
            entries.push((entry.file_name().to_string_lossy().into_owned(), is_dir));
        }

        // Directories first, then files, each group byte-lexicographic.
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        for (name, is_dir) in entries {
            let path = if self.nodes[parent].path.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", self.nodes[parent].path, name)
            };
            let id = self.nodes.len();
            self.nodes.push(Node {
                name: name.clone(),
                path,
                parent: Some(parent),
                selected: false,
                kind: if is_dir {
                    NodeKind::Dir {
                        children: Vec::new(),
                        expanded: false,
                    }
                } else {
                    NodeKind::File
                },
            });
            match &mut self.nodes[parent].kind {
                NodeKind::Dir { children, .. } => children.push(id),
                NodeKind::File => unreachable!("files never parent other nodes"),
            }
            if is_dir {
                self.scan_dir(&dir.join(&name), id)?;
            }
        }
        Ok(())
    }

    /// Post-order pass deriving directory `selected`/`expanded` flags from
    /// the initial leaf-path set. Returns (selected, expanded) for `id`.
    fn init_selection(&mut self, id: NodeId, initial: &BTreeSet<String>) -> (bool, bool) {
        match self.nodes[id].kind {
            NodeKind::File => {
                let selected = initial.contains(&self.nodes[id].path);
                self.nodes[id].selected = selected;
                (selected, false)
            }
            NodeKind::Dir { .. } => {
                let children = self.nodes[id].children().to_vec();
                let mut all_selected = !children.is_empty();
                let mut any_open = false;
                for child in children {
                    let (sel, exp) = self.init_selection(child, initial);
                    all_selected &= sel;
                    any_open |= sel || exp;
                }
                self.nodes[id].selected = all_selected;
                if let NodeKind::Dir { expanded, .. } = &mut self.nodes[id].kind {
                    *expanded = any_open;
                }
                (all_selected, any_open)
            }
        }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root always exists; "empty" means no real entries.
        self.nodes.len() == 1
    }

    /// Flip the selection of `id`. For a directory the new value is written
    /// over every file in the subtree, directory flags are re-derived
    /// bottom-up, then ancestor directories are re-rolled-up.
    pub fn toggle(&mut self, id: NodeId) {
        let value = !self.nodes[id].selected;
        self.overwrite_subtree(id, value);
        self.roll_up_from(self.nodes[id].parent);
    }

    /// Post-order overwrite: files take `value` directly, directories are
    /// derived from their just-written children so a childless directory
    /// (pinned unselected) also keeps its ancestors honest.
    fn overwrite_subtree(&mut self, id: NodeId, value: bool) {
        match self.nodes[id].kind {
            NodeKind::File => self.nodes[id].selected = value,
            NodeKind::Dir { .. } => {
                let children = self.nodes[id].children().to_vec();
                for &child in &children {
                    self.overwrite_subtree(child, value);
                }
                self.nodes[id].selected =
                    !children.is_empty() && children.iter().all(|&c| self.nodes[c].selected);
            }
        }
    }

    /// Re-derive `selected` for each ancestor directory on the path to the
    /// root: selected iff it has children and all of them are selected.
    fn roll_up_from(&mut self, mut cursor: Option<NodeId>) {
        while let Some(id) = cursor {
            let children = self.nodes[id].children().to_vec();
            self.nodes[id].selected =
                !children.is_empty() && children.iter().all(|&c| self.nodes[c].selected);
            cursor = self.nodes[id].parent;
        }
    }

    /// Show the children of a directory. No-op on files, childless
    /// directories, and directories already expanded.
    pub fn expand(&mut self, id: NodeId) {
        if self.nodes[id].children().is_empty() {
            return;
        }
        if let NodeKind::Dir { expanded, .. } = &mut self.nodes[id].kind {
            *expanded = true;
        }
    }

    /// Hide the children of an expanded directory. On a file or a
    /// collapsed/childless directory the collapse bubbles to the parent,
    /// unless the parent is the invisible root.
    pub fn collapse(&mut self, id: NodeId) -> Collapse {
        if self.nodes[id].expanded() && !self.nodes[id].children().is_empty() {
            if let NodeKind::Dir { expanded, .. } = &mut self.nodes[id].kind {
                *expanded = false;
            }
            return Collapse::Collapsed;
        }
        match self.nodes[id].parent {
            Some(parent) if parent != self.root() => {
                if let NodeKind::Dir { expanded, .. } = &mut self.nodes[parent].kind {
                    *expanded = false;
                }
                Collapse::Refocus(parent)
            }
            _ => Collapse::Noop,
        }
    }

    /// Sorted relative paths of every selected file. Directory flags never
    /// appear in the output; they exist for display roll-up only.
    pub fn collect_selected(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .nodes
            .iter()
            .filter(|n| !n.is_dir() && n.selected)
            .map(|n| n.path.clone())
            .collect();
        paths.sort();
        paths
    }

    /// Pre-order flattening of the visible rows: the root's children and,
    /// for each expanded directory, its children in turn. The root itself
    /// is never listed. Each row carries its tree depth for indentation.
    pub fn visible_nodes(&self) -> Vec<(NodeId, usize)> {
        let mut rows = Vec::new();
        let mut stack: Vec<(NodeId, usize)> = self.nodes[self.root()]
            .children()
            .iter()
            .rev()
            .map(|&id| (id, 0))
            .collect();
        while let Some((id, depth)) = stack.pop() {
            rows.push((id, depth));
            if self.nodes[id].expanded() {
                for &child in self.nodes[id].children().iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
        }
        rows
    }

    /// Whether a directory holds at least one selected file without being
    /// fully selected itself. Display-only tri-state derivation.
    pub fn partially_selected(&self, id: NodeId) -> bool {
        if !self.nodes[id].is_dir() || self.nodes[id].selected {
            return false;
        }
        let mut stack = self.nodes[id].children().to_vec();
        while let Some(next) = stack.pop() {
            if !self.nodes[next].is_dir() && self.nodes[next].selected {
                return true;
            }
            stack.extend_from_slice(self.nodes[next].children());
        }
        false
    }
}
