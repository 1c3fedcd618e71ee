//! Flat-file persistence for the selected-path set.
//!
//! The store is UTF-8 text, one relative path per line, `/`-separated,
//! sorted on write and order-insensitive on read. A missing store decodes
//! to the empty set; any real I/O failure is fatal to the caller.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

/// Default store file name, resolved against the tree root.
pub const STORE_FILE: &str = ".synopsis";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read selection store {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write selection store {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read the store into a path set.
///
/// Lines are trimmed and blank lines dropped; duplicates collapse into the
/// set. An absent file yields an empty set, which callers treat as "no
/// selection yet".
pub fn load(path: &Path) -> Result<BTreeSet<String>, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("no selection store at {}", path.display());
            return Ok(BTreeSet::new());
        }
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let paths: BTreeSet<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    debug!("loaded {} path(s) from {}", paths.len(), path.display());
    Ok(paths)
}

/// Write the path set back out, sorted, one per line, newline-terminated.
pub fn save(path: &Path, paths: &BTreeSet<String>) -> Result<(), StoreError> {
    let mut content = String::new();
    for p in paths {
        content.push_str(p);
        content.push('\n');
    }
    fs::write(path, content).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("saved {} path(s) to {}", paths.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn set(paths: &[&str]) -> BTreeSet<String> {
        paths.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn round_trip_preserves_the_set() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join(STORE_FILE);
        let original = set(&["src/b.py", "src/a.py", "README.md"]);
        save(&store, &original).unwrap();
        assert_eq!(load(&store).unwrap(), original);
    }

    #[test]
    fn save_writes_sorted_newline_terminated_lines() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join(STORE_FILE);
        save(&store, &set(&["z.txt", "a.txt", "m/n.txt"])).unwrap();
        let content = std::fs::read_to_string(&store).unwrap();
        assert_eq!(content, "a.txt\nm/n.txt\nz.txt\n");
    }

    #[test]
    fn load_trims_and_drops_blank_and_duplicate_lines() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join(STORE_FILE);
        std::fs::write(&store, "  src/a.py \n\n\nsrc/a.py\nsrc/b.py\n   \n").unwrap();
        assert_eq!(load(&store).unwrap(), set(&["src/a.py", "src/b.py"]));
    }

    #[test]
    fn missing_store_decodes_to_empty_set() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join(STORE_FILE);
        assert!(load(&store).unwrap().is_empty());
    }

    #[test]
    fn unreadable_store_is_an_error() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be forces a read failure that
        // is not NotFound.
        let store = dir.path().join(STORE_FILE);
        std::fs::create_dir(&store).unwrap();
        assert!(matches!(load(&store), Err(StoreError::Read { .. })));
        assert!(matches!(
            save(&store, &set(&["a"])),
            Err(StoreError::Write { .. })
        ));
    }
}
