//! Unit registries - named unit groups
//!
//! Groups are kept in key order, so `find` answers with the first group by
//! key when several groups share an alias.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use refscale_core::{RefscaleError, Result, ResultExt};
use tracing::{debug, info, warn};

use crate::export::RegistryExport;
use crate::tree::{DiskTree, FileTree};
use crate::unit::UnitGroup;
use crate::walk::walk;

/// Unit groups by registry key
pub type UnitGroups = BTreeMap<String, UnitGroup>;

/// Lookup of unit groups by alias
pub trait UnitRegistry {
    fn groups(&self) -> &UnitGroups;

    fn groups_mut(&mut self) -> &mut UnitGroups;

    /// First group (by key) whose aliases contain `alias`
    fn find(&self, alias: &str) -> Option<&UnitGroup> {
        self.find_keyed(alias).map(|(_, group)| group)
    }

    /// Like `find`, also returning the group's key
    fn find_keyed(&self, alias: &str) -> Option<(&str, &UnitGroup)> {
        self.groups()
            .iter()
            .find(|(_, group)| group.contains(alias))
            .map(|(key, group)| (key.as_str(), group))
    }

    /// Register a group; an existing key is overwritten
    fn add(&mut self, key: &str, group: UnitGroup) {
        for (other, existing) in self.groups().iter().filter(|(k, _)| k.as_str() != key) {
            let shared: Vec<&str> = group
                .aliases()
                .map(|(alias, _)| alias)
                .filter(|alias| existing.contains(alias))
                .collect();
            if !shared.is_empty() {
                warn!(group = key, other = %other, aliases = ?shared, "aliases shared between groups");
            }
        }

        if self.groups_mut().insert(key.to_string(), group).is_some() {
            debug!(group = key, "replaced unit group");
        }
    }

    fn get(&self, key: &str) -> Option<&UnitGroup> {
        self.groups().get(key)
    }

    fn len(&self) -> usize {
        self.groups().len()
    }

    fn is_empty(&self) -> bool {
        self.groups().is_empty()
    }

    /// Serializable view of every group
    fn export(&self) -> RegistryExport {
        self.groups()
            .iter()
            .map(|(key, group)| (key.clone(), group.export()))
            .collect()
    }

    /// Pretty-printed JSON export
    fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.export())
            .map_err(|e| RefscaleError::encode("unit registry", e.to_string()))
    }
}

/// Load every `.json` file under `start` as a unit group keyed by its base name
pub fn load_groups<T, R>(tree: &T, start: &Path, registry: &mut R) -> Result<()>
where
    T: FileTree + ?Sized,
    R: UnitRegistry + ?Sized,
{
    for entry in walk(tree, start) {
        let entry = entry?;
        if !entry.is_json_file() {
            continue;
        }

        let group = load_group(tree, &entry.path)?;
        debug!(group = %entry.name, path = %entry.path.display(), units = group.len(), "loaded unit group");
        registry.add(&entry.name, group);
    }
    Ok(())
}

fn load_group<T: FileTree + ?Sized>(tree: &T, path: &Path) -> Result<UnitGroup> {
    let reader = tree
        .open(path)
        .map_err(|e| RefscaleError::io(format!("'{}'", path.display()), e))?;
    UnitGroup::from_reader(reader)
        .with_context(|| format!("failed to load unit group from '{}'", path.display()))
}

// ============ TreeRegistry ============

/// Registry built from the unit files of a file tree
#[derive(Debug, Clone, Default)]
pub struct TreeRegistry {
    source: Option<PathBuf>,
    groups: UnitGroups,
}

impl TreeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every unit file under `start` in `tree`
    pub fn from_tree<T: FileTree + ?Sized>(tree: &T, start: impl AsRef<Path>) -> Result<Self> {
        let mut registry = TreeRegistry::new();
        load_groups(tree, start.as_ref(), &mut registry)?;
        info!(groups = registry.len(), "unit registry built");
        Ok(registry)
    }

    /// Load every unit file under a directory on disk
    pub fn from_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let tree = DiskTree::new(&dir);
        let mut registry = Self::from_tree(&tree, ".")
            .with_context(|| format!("failed to load units from '{}'", dir.display()))?;
        registry.source = Some(dir);
        Ok(registry)
    }

    /// Directory the registry was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl UnitRegistry for TreeRegistry {
    fn groups(&self) -> &UnitGroups {
        &self.groups
    }

    fn groups_mut(&mut self) -> &mut UnitGroups {
        &mut self.groups
    }
}
