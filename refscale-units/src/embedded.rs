//! Bundled unit definitions
//!
//! The files under `units_db/` are compiled into the library and loaded
//! through the same walk and entry reader as files on disk.

use std::path::Path;

use refscale_core::{Result, ResultExt};
use tracing::info;

use crate::registry::{load_groups, UnitGroups, UnitRegistry};
use crate::tree::MemTree;

/// Directory of the bundled unit files inside the bundled tree
pub const UNITS_PATH: &str = "units_db";

const BUNDLED: [(&str, &[u8]); 4] = [
    ("units_db/data.json", include_bytes!("../units_db/data.json")),
    ("units_db/length.json", include_bytes!("../units_db/length.json")),
    ("units_db/mass.json", include_bytes!("../units_db/mass.json")),
    ("units_db/time.json", include_bytes!("../units_db/time.json")),
];

/// Tree holding the bundled unit files
pub fn bundled_tree() -> MemTree {
    let mut tree = MemTree::new();
    for (path, data) in BUNDLED {
        tree.insert(path, data);
    }
    tree
}

/// Registry of the bundled unit groups, usable without filesystem access
#[derive(Debug, Clone)]
pub struct EmbeddedRegistry {
    groups: UnitGroups,
}

impl EmbeddedRegistry {
    pub fn new() -> Result<Self> {
        let mut registry = EmbeddedRegistry {
            groups: UnitGroups::new(),
        };
        load_groups(&bundled_tree(), Path::new(UNITS_PATH), &mut registry)
            .context("failed to load bundled units")?;
        info!(groups = registry.len(), "embedded unit registry built");
        Ok(registry)
    }
}

impl UnitRegistry for EmbeddedRegistry {
    fn groups(&self) -> &UnitGroups {
        &self.groups
    }

    fn groups_mut(&mut self) -> &mut UnitGroups {
        &mut self.groups
    }
}
