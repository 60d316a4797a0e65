//! Registry export - unit groups as JSON
//!
//! Units are listed ascending by multiplier. Aliases are sorted and leave out
//! the canonical name, which makes an exported group valid unit entry input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::unit::UnitGroup;

/// One exported unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitExport {
    pub name: String,
    pub value: f64,
    pub aliases: Vec<String>,
}

pub type GroupExport = Vec<UnitExport>;

/// Exported groups by registry key
pub type RegistryExport = BTreeMap<String, GroupExport>;

impl UnitGroup {
    /// Serializable view of this group
    pub fn export(&self) -> GroupExport {
        let mut units: GroupExport = self
            .iter()
            .map(|unit| UnitExport {
                name: unit.name().to_string(),
                value: unit.multiplier(),
                aliases: Vec::new(),
            })
            .collect();

        for (alias, id) in self.alias_targets() {
            let Some(pos) = self.position_of(id) else {
                continue;
            };
            if alias != units[pos].name {
                units[pos].aliases.push(alias.to_string());
            }
        }

        for unit in &mut units {
            unit.aliases.sort();
        }
        units
    }
}
