//! File trees - where unit definition files come from
//!
//! `DiskTree` reads a directory on disk, `MemTree` serves bytes held in
//! memory (the bundled unit files, test fixtures). Paths are relative to
//! the tree root; `.` and the empty path name the root itself.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

/// Kind of a directory item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Dir,
    File,
    /// Symlinks, sockets and the like
    Other,
}

/// One child of a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirItem {
    pub name: String,
    pub kind: ItemKind,
}

impl DirItem {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        DirItem {
            name: name.into(),
            kind,
        }
    }
}

/// Read-only view of a directory tree
pub trait FileTree {
    /// Children of a directory, sorted by name
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirItem>>;

    /// Open a regular file for reading
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>>;
}

/// Join a child name onto a tree-relative directory path
pub(crate) fn join(parent: &Path, name: &str) -> PathBuf {
    if is_root(parent) {
        PathBuf::from(name)
    } else {
        parent.join(name)
    }
}

fn is_root(path: &Path) -> bool {
    path.as_os_str().is_empty() || path == Path::new(".")
}

// ============ DiskTree ============

/// Directory tree on disk
#[derive(Debug, Clone)]
pub struct DiskTree {
    root: PathBuf,
}

impl DiskTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DiskTree { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if is_root(path) {
            self.root.clone()
        } else {
            self.root.join(path)
        }
    }
}

impl FileTree for DiskTree {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirItem>> {
        let mut items = Vec::new();
        for entry in fs::read_dir(self.resolve(path))? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let kind = if file_type.is_dir() {
                ItemKind::Dir
            } else if file_type.is_file() {
                ItemKind::File
            } else {
                ItemKind::Other
            };
            items.push(DirItem::new(entry.file_name().to_string_lossy(), kind));
        }
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        let file = File::open(self.resolve(path))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

// ============ MemTree ============

/// In-memory tree of files keyed by `/`-separated paths
///
/// Directories exist implicitly as prefixes of file paths.
#[derive(Debug, Clone, Default)]
pub struct MemTree {
    files: BTreeMap<String, Cow<'static, [u8]>>,
}

impl MemTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a file
    pub fn with_file(mut self, path: &str, data: impl Into<Cow<'static, [u8]>>) -> Self {
        self.insert(path, data);
        self
    }

    pub fn insert(&mut self, path: &str, data: impl Into<Cow<'static, [u8]>>) {
        self.files.insert(normalize(Path::new(path)), data.into());
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn normalize(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    let mut rest = raw.as_str();
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped;
    }
    let rest = rest.trim_matches('/');
    if rest == "." {
        String::new()
    } else {
        rest.to_string()
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{}: no such file or directory", path.display()),
    )
}

impl FileTree for MemTree {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirItem>> {
        let dir = normalize(path);
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{}/", dir)
        };

        let mut children: BTreeMap<&str, ItemKind> = BTreeMap::new();
        for key in self.files.keys() {
            if let Some(rest) = key.strip_prefix(prefix.as_str()) {
                match rest.split_once('/') {
                    Some((child, _)) => children.insert(child, ItemKind::Dir),
                    None => children.insert(rest, ItemKind::File),
                };
            }
        }

        if children.is_empty() && !dir.is_empty() {
            return Err(not_found(path));
        }

        Ok(children
            .into_iter()
            .map(|(name, kind)| DirItem::new(name, kind))
            .collect())
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        let data = self.files.get(&normalize(path)).ok_or_else(|| not_found(path))?;
        Ok(Box::new(Cursor::new(data.as_ref())))
    }
}
