//! Directory walking over a `FileTree`
//!
//! Pre-order: a directory is yielded before its children, children in name
//! order. A failed read yields one error and ends the walk.

use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use std::vec;

use refscale_core::{RefscaleError, Result};

use crate::tree::{join, DirItem, FileTree, ItemKind};

/// A file system entry encountered during traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Path relative to the tree root
    pub path: PathBuf,
    /// File name without extension
    pub name: String,
    /// Extension with its leading dot, empty when there is none
    pub ext: String,
    pub is_dir: bool,
    pub is_file: bool,
}

impl WalkEntry {
    fn new(parent: &Path, item: &DirItem) -> Self {
        let (name, ext) = match item.name.rfind('.') {
            Some(dot) => (&item.name[..dot], &item.name[dot..]),
            None => (item.name.as_str(), ""),
        };

        WalkEntry {
            path: join(parent, &item.name),
            name: name.to_string(),
            ext: ext.to_string(),
            is_dir: item.kind == ItemKind::Dir,
            is_file: item.kind == ItemKind::File,
        }
    }

    /// Regular file with the given extension (e.g., ".json")
    pub fn is_file_with_ext(&self, ext: &str) -> bool {
        self.is_file && self.ext == ext
    }

    pub fn is_json_file(&self) -> bool {
        self.is_file_with_ext(".json")
    }
}

/// Lazy walk over a file tree
pub struct Walk<'t, T: FileTree + ?Sized> {
    tree: &'t T,
    stack: Vec<(PathBuf, vec::IntoIter<DirItem>)>,
    /// Directory to read before the next item is produced
    pending: Option<PathBuf>,
    done: bool,
}

/// Walk `tree` starting at `start` (`.` for the tree root)
pub fn walk<T: FileTree + ?Sized>(tree: &T, start: impl AsRef<Path>) -> Walk<'_, T> {
    Walk {
        tree,
        stack: Vec::new(),
        pending: Some(start.as_ref().to_path_buf()),
        done: false,
    }
}

impl<T: FileTree + ?Sized> Walk<'_, T> {
    fn fail(&mut self, dir: &Path, err: std::io::Error) -> RefscaleError {
        self.done = true;
        self.stack.clear();
        RefscaleError::io(format!("directory '{}'", dir.display()), err)
    }
}

impl<T: FileTree + ?Sized> Iterator for Walk<'_, T> {
    type Item = Result<WalkEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if let Some(dir) = self.pending.take() {
            match self.tree.read_dir(&dir) {
                Ok(items) => self.stack.push((dir, items.into_iter())),
                Err(e) => return Some(Err(self.fail(&dir, e))),
            }
        }

        loop {
            let Some((dir, items)) = self.stack.last_mut() else {
                self.done = true;
                return None;
            };

            match items.next() {
                Some(item) => {
                    let entry = WalkEntry::new(dir, &item);
                    if entry.is_dir {
                        self.pending = Some(entry.path.clone());
                    }
                    return Some(Ok(entry));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

impl<T: FileTree + ?Sized> FusedIterator for Walk<'_, T> {}
