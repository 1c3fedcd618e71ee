//! Interactive tree selection UI.
//!
//! A single-threaded loop over a blocking `event::read()`: render the
//! visible slice of the tree, wait for one key, apply the transition,
//! repeat. The tree itself carries the selection flags; this module only
//! owns the cursor, the scroll offset, and the terminal.

use std::io::{self, IsTerminal, Write};

use anyhow::{Result, bail};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, ClearType},
};

use crate::tree::{Collapse, FileTree, NodeId};

/// Rows kept visible above the cursor when scrolling upward.
const SCROLL_LOOKAHEAD: usize = 3;

/// Rows consumed by the header and help chrome around the file list.
const CHROME_ROWS: u16 = 4;

/// How the interactive session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// User confirmed; the sorted selected file paths.
    Confirmed(Vec<String>),
    /// User aborted; edits must be discarded and nothing persisted.
    Cancelled,
}

/// What the key handler asks the loop to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavAction {
    Continue,
    Finish,
    Quit,
}

/// Cursor and viewport over the tree's visible flattening.
struct Navigator<'a> {
    tree: &'a mut FileTree,
    cursor: usize,
    scroll_offset: usize,
}

impl<'a> Navigator<'a> {
    fn new(tree: &'a mut FileTree) -> Self {
        Self {
            tree,
            cursor: 0,
            scroll_offset: 0,
        }
    }

    fn current(&self) -> Option<NodeId> {
        self.tree.visible_nodes().get(self.cursor).map(|&(id, _)| id)
    }

    fn move_down(&mut self, viewport_rows: usize) {
        let len = self.tree.visible_nodes().len();
        if self.cursor + 1 < len {
            self.cursor += 1;
            if self.cursor >= self.scroll_offset + viewport_rows {
                self.scroll_offset = self.cursor + 1 - viewport_rows;
            }
        }
    }

    fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            // Keep a few rows of lookahead above the cursor where possible.
            if self.cursor < self.scroll_offset + SCROLL_LOOKAHEAD {
                self.scroll_offset = self.cursor.saturating_sub(SCROLL_LOOKAHEAD);
            }
        }
    }

    fn expand_current(&mut self) {
        if let Some(id) = self.current() {
            self.tree.expand(id);
        }
    }

    /// Collapse the current node, following the bubble rule: on a file or
    /// an already-collapsed directory the parent collapses and the cursor
    /// relocates to the parent's row.
    fn collapse_current(&mut self, viewport_rows: usize) {
        let Some(id) = self.current() else { return };
        let refocus = match self.tree.collapse(id) {
            Collapse::Collapsed => id,
            Collapse::Refocus(parent) => parent,
            Collapse::Noop => return,
        };
        if let Some(row) = self
            .tree
            .visible_nodes()
            .iter()
            .position(|&(vid, _)| vid == refocus)
        {
            self.cursor = row;
        }
        self.clamp(viewport_rows);
    }

    fn toggle_current(&mut self) {
        if let Some(id) = self.current() {
            self.tree.toggle(id);
        }
    }

    /// Re-bound cursor and scroll after the visible list shrank.
    fn clamp(&mut self, viewport_rows: usize) {
        let len = self.tree.visible_nodes().len();
        if len == 0 {
            self.cursor = 0;
            self.scroll_offset = 0;
            return;
        }
        self.cursor = self.cursor.min(len - 1);
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + viewport_rows {
            self.scroll_offset = self.cursor + 1 - viewport_rows;
        }
    }

    fn handle_key(&mut self, key: KeyEvent, viewport_rows: usize) -> NavAction {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_down(viewport_rows),
            KeyCode::Right | KeyCode::Char('l') => self.expand_current(),
            KeyCode::Left | KeyCode::Char('h') => self.collapse_current(viewport_rows),
            KeyCode::Char(' ') => self.toggle_current(),
            KeyCode::Enter => return NavAction::Finish,
            KeyCode::Esc | KeyCode::Char('q') => return NavAction::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return NavAction::Quit;
            }
            _ => {}
        }
        NavAction::Continue
    }
}

/// Raw-mode guard: restores cooked mode and cursor visibility on every
/// exit path, including early returns and panics inside the loop.
struct TerminalGuard;

impl TerminalGuard {
    fn acquire() -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), cursor::Hide, terminal::Clear(ClearType::All))?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            cursor::Show,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::All),
        );
    }
}

/// Check if the terminal is interactive.
///
/// Returns false when stdin/stdout is not a TTY, in CI, or when TERM is
/// unset or "dumb".
fn is_interactive() -> bool {
    if std::env::var("CI").is_ok() {
        return false;
    }
    match std::env::var("TERM") {
        Ok(term) if !term.is_empty() && term != "dumb" => {}
        _ => return false,
    }
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

/// Run the interactive session over `tree`.
///
/// Blocks until the user finishes or quits. Requires a real terminal;
/// there is no selection to fall back to when invoked without one.
pub fn select(tree: &mut FileTree) -> Result<Outcome> {
    if !is_interactive() {
        bail!("interactive selection requires a terminal (stdin/stdout is not a TTY)");
    }
    if tree.is_empty() {
        return Ok(Outcome::Confirmed(Vec::new()));
    }

    let guard = TerminalGuard::acquire()?;
    let outcome = run_loop(tree);
    drop(guard);
    outcome
}

fn run_loop(tree: &mut FileTree) -> Result<Outcome> {
    let mut nav = Navigator::new(tree);
    let mut stdout = io::stdout();

    loop {
        let (_, rows) = terminal::size()?;
        let viewport_rows = rows.saturating_sub(CHROME_ROWS).max(1) as usize;
        render(&mut stdout, &nav, viewport_rows)?;

        if let Event::Key(key) = event::read()? {
            match nav.handle_key(key, viewport_rows) {
                NavAction::Continue => {}
                NavAction::Finish => return Ok(Outcome::Confirmed(nav.tree.collect_selected())),
                NavAction::Quit => return Ok(Outcome::Cancelled),
            }
        }
    }
}

fn render(stdout: &mut io::Stdout, nav: &Navigator, viewport_rows: usize) -> io::Result<()> {
    let (width, _) = terminal::size()?;

    execute!(
        stdout,
        cursor::MoveTo(0, 0),
        terminal::Clear(ClearType::FromCursorDown),
        SetForegroundColor(Color::Cyan),
        Print("Select files to include"),
        ResetColor,
        Print("\r\n\r\n"),
    )?;

    let visible = nav.tree.visible_nodes();
    for (row, &(id, depth)) in visible
        .iter()
        .enumerate()
        .skip(nav.scroll_offset)
        .take(viewport_rows)
    {
        render_row(stdout, nav, id, depth, row == nav.cursor, width as usize)?;
    }

    execute!(stdout, Print("\r\n"))?;
    render_key_hint(stdout, "↑↓", "move")?;
    render_key_hint(stdout, "→←", "expand/collapse")?;
    render_key_hint(stdout, "Space", "toggle")?;
    render_key_hint(stdout, "Enter", "finish")?;
    render_key_hint(stdout, "q", "quit")?;
    stdout.flush()
}

fn render_row(
    stdout: &mut io::Stdout,
    nav: &Navigator,
    id: NodeId,
    depth: usize,
    is_cursor: bool,
    width: usize,
) -> io::Result<()> {
    let node = nav.tree.node(id);
    let glyph = if node.is_dir() {
        if node.expanded() { "▾ " } else { "▸ " }
    } else {
        "· "
    };
    let mut text = format!("{}{}{}", "  ".repeat(depth), glyph, node.name);
    if node.is_dir() {
        text.push('/');
    }
    // Clip to the viewport width, leaving the last column free.
    let text: String = text.chars().take(width.saturating_sub(1)).collect();

    let color = if node.selected {
        Color::Green
    } else if nav.tree.partially_selected(id) {
        Color::Yellow
    } else {
        Color::Red
    };

    if is_cursor {
        execute!(stdout, SetAttribute(Attribute::Reverse))?;
    }
    execute!(
        stdout,
        SetForegroundColor(color),
        Print(text),
        SetAttribute(Attribute::Reset),
        ResetColor,
        Print("\r\n"),
    )
}

fn render_key_hint(stdout: &mut io::Stdout, key: &str, action: &str) -> io::Result<()> {
    execute!(
        stdout,
        SetForegroundColor(Color::Cyan),
        Print(key),
        SetForegroundColor(Color::DarkGrey),
        Print(format!(" {action}  ")),
        ResetColor,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// `docs/{a.md,b.md}` and ten top-level numbered files.
    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/a.md"), "a").unwrap();
        fs::write(dir.path().join("docs/b.md"), "b").unwrap();
        for i in 0..10 {
            fs::write(dir.path().join(format!("f{i:02}.txt")), "x").unwrap();
        }
        dir
    }

    fn build(dir: &TempDir) -> FileTree {
        FileTree::build(dir.path(), &BTreeSet::new()).unwrap()
    }

    fn path_at_cursor(nav: &Navigator) -> String {
        let id = nav.current().unwrap();
        nav.tree.node(id).path.clone()
    }

    #[test]
    fn cursor_stays_within_bounds() {
        let dir = fixture();
        let mut tree = build(&dir);
        let mut nav = Navigator::new(&mut tree);

        nav.move_up();
        assert_eq!(nav.cursor, 0);

        for _ in 0..50 {
            nav.move_down(100);
        }
        // 1 dir + 10 files visible, collapsed docs.
        assert_eq!(nav.cursor, 10);
    }

    #[test]
    fn move_down_scrolls_to_keep_cursor_in_viewport() {
        let dir = fixture();
        let mut tree = build(&dir);
        let mut nav = Navigator::new(&mut tree);

        for _ in 0..6 {
            nav.move_down(5);
        }
        assert_eq!(nav.cursor, 6);
        assert_eq!(nav.scroll_offset, 2);
    }

    #[test]
    fn move_up_keeps_lookahead_rows_above_cursor() {
        let dir = fixture();
        let mut tree = build(&dir);
        let mut nav = Navigator::new(&mut tree);

        for _ in 0..10 {
            nav.move_down(5);
        }
        for _ in 0..3 {
            nav.move_up();
        }
        assert_eq!(nav.cursor, 7);
        assert_eq!(nav.scroll_offset, 4);

        for _ in 0..7 {
            nav.move_up();
        }
        assert_eq!(nav.cursor, 0);
        assert_eq!(nav.scroll_offset, 0);
    }

    #[test]
    fn expand_then_collapse_keeps_cursor_on_directory() {
        let dir = fixture();
        let mut tree = build(&dir);
        let mut nav = Navigator::new(&mut tree);

        assert_eq!(path_at_cursor(&nav), "docs");
        nav.expand_current();
        assert_eq!(nav.tree.visible_nodes().len(), 13);
        nav.collapse_current(10);
        assert_eq!(nav.tree.visible_nodes().len(), 11);
        assert_eq!(path_at_cursor(&nav), "docs");
    }

    #[test]
    fn collapse_on_child_bubbles_cursor_to_parent() {
        let dir = fixture();
        let mut tree = build(&dir);
        let mut nav = Navigator::new(&mut tree);

        nav.expand_current();
        nav.move_down(10);
        assert_eq!(path_at_cursor(&nav), "docs/a.md");
        nav.collapse_current(10);
        assert_eq!(path_at_cursor(&nav), "docs");
        assert!(!nav.tree.node(nav.current().unwrap()).expanded());
    }

    #[test]
    fn collapse_on_top_level_file_is_a_noop() {
        let dir = fixture();
        let mut tree = build(&dir);
        let mut nav = Navigator::new(&mut tree);

        nav.move_down(100);
        let before = path_at_cursor(&nav);
        nav.collapse_current(100);
        assert_eq!(path_at_cursor(&nav), before);
    }

    #[test]
    fn toggle_directory_selects_its_files() {
        let dir = fixture();
        let mut tree = build(&dir);
        let mut nav = Navigator::new(&mut tree);

        assert_eq!(path_at_cursor(&nav), "docs");
        nav.toggle_current();
        let selected = nav.tree.collect_selected();
        assert_eq!(selected, ["docs/a.md", "docs/b.md"]);
    }

    #[test]
    fn key_handler_maps_finish_and_quit() {
        let dir = fixture();
        let mut tree = build(&dir);
        let mut nav = Navigator::new(&mut tree);

        assert_eq!(nav.handle_key(key(KeyCode::Enter), 10), NavAction::Finish);
        assert_eq!(nav.handle_key(key(KeyCode::Esc), 10), NavAction::Quit);
        assert_eq!(nav.handle_key(key(KeyCode::Char('q')), 10), NavAction::Quit);
        assert_eq!(
            nav.handle_key(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                10
            ),
            NavAction::Quit
        );
        assert_eq!(
            nav.handle_key(key(KeyCode::Char('x')), 10),
            NavAction::Continue
        );
    }

    #[test]
    fn key_handler_moves_and_toggles() {
        let dir = fixture();
        let mut tree = build(&dir);
        let mut nav = Navigator::new(&mut tree);

        nav.handle_key(key(KeyCode::Down), 10);
        assert_eq!(nav.cursor, 1);
        nav.handle_key(key(KeyCode::Char('k')), 10);
        assert_eq!(nav.cursor, 0);
        nav.handle_key(key(KeyCode::Char(' ')), 10);
        assert!(!nav.tree.collect_selected().is_empty());
    }
}
