//! Refscale Units - Unit definitions and registries
//!
//! Unit definitions come as JSON arrays of
//! `{"name": ..., "value": ..., "aliases": [...]}` objects, one file per
//! measurement kind. Each file becomes a `UnitGroup`; a registry maps file
//! base names to groups and answers which group knows an alias.
//!
//! Registries:
//! - `TreeRegistry`: unit files found by walking a directory (or any `FileTree`)
//! - `EmbeddedRegistry`: the bundled time, length, mass and data units

mod embedded;
mod entry;
mod export;
mod registry;
mod tree;
mod unit;
mod walk;

pub use embedded::{bundled_tree, EmbeddedRegistry, UNITS_PATH};
pub use entry::{read_unit_entries, UnitEntries, UnitEntry};
pub use export::{GroupExport, RegistryExport, UnitExport};
pub use registry::{load_groups, TreeRegistry, UnitGroups, UnitRegistry};
pub use tree::{DirItem, DiskTree, FileTree, ItemKind, MemTree};
pub use unit::{Unit, UnitGroup};
pub use walk::{walk, Walk, WalkEntry};
