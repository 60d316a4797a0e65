//! Units and unit groups
//!
//! A group holds the units of one measurement kind (time, length, ...).
//! Every unit in a group converts to every other through the ratio of
//! their multipliers.

use std::collections::HashMap;
use std::fmt;
use std::io::Read;

use refscale_core::{RefscaleError, Result};
use tracing::{debug, warn};

use crate::entry::{read_unit_entries, UnitEntry};

/// A named unit and its size in base units
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    name: String,
    multiplier: f64,
}

impl Unit {
    pub fn new(name: impl Into<String>, multiplier: f64) -> Self {
        Unit {
            name: name.into(),
            multiplier,
        }
    }

    /// Canonical unit name (e.g., "hour")
    pub fn name(&self) -> &str {
        &self.name
    }

    /// How many base units one of this unit equals
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Convert a value in this unit to base units
    pub fn to_base(&self, value: f64) -> f64 {
        value * self.multiplier
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Units of one measurement kind, indexed by every alias
#[derive(Debug, Clone, Default)]
pub struct UnitGroup {
    /// Units in insertion order; alias targets index into this
    units: Vec<Unit>,
    /// Indices into `units`, ascending by multiplier
    order: Vec<usize>,
    aliases: HashMap<String, usize>,
}

impl UnitGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a group from a JSON array of unit entries
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut group = UnitGroup::new();
        for entry in read_unit_entries(reader) {
            let entry = entry.map_err(|e| e.context("error reading unit entry"))?;
            group.add(entry);
        }
        Ok(group)
    }

    /// Insert a unit and register its name and aliases
    ///
    /// An alias already pointing at another unit is re-pointed to the new one.
    pub fn add(&mut self, entry: UnitEntry) {
        let id = self.units.len();
        let UnitEntry { name, value, aliases } = entry;
        debug!(unit = %name, multiplier = value, "adding unit");

        self.units.push(Unit::new(name.clone(), value));
        self.register_alias(name, id);
        for alias in aliases {
            self.register_alias(alias, id);
        }

        self.order.push(id);
        let units = &self.units;
        self.order
            .sort_by(|&a, &b| units[a].multiplier.total_cmp(&units[b].multiplier));
    }

    fn register_alias(&mut self, alias: String, id: usize) {
        if let Some(previous) = self.aliases.insert(alias, id) {
            if previous != id {
                warn!(
                    from = %self.units[previous].name,
                    to = %self.units[id].name,
                    "alias re-pointed to a later unit"
                );
            }
        }
    }

    /// Look up a unit by name or alias
    pub fn get(&self, alias: &str) -> Option<&Unit> {
        self.aliases.get(alias).map(|&id| &self.units[id])
    }

    /// Look up a unit, failing with a lookup error naming the alias
    pub fn require(&self, alias: &str) -> Result<&Unit> {
        self.get(alias)
            .ok_or_else(|| RefscaleError::alias_not_found(alias))
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.aliases.contains_key(alias)
    }

    /// Units from smallest to largest multiplier
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Unit> + ExactSizeIterator + '_ {
        self.order.iter().map(move |&id| &self.units[id])
    }

    /// Units from largest to smallest multiplier
    pub fn iter_descending(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.iter().rev()
    }

    /// Every (alias, unit) pair, canonical names included
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &Unit)> + '_ {
        self.aliases
            .iter()
            .map(move |(alias, &id)| (alias.as_str(), &self.units[id]))
    }

    /// Number of distinct units (not aliases)
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub(crate) fn alias_targets(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.aliases.iter().map(|(alias, &id)| (alias.as_str(), id))
    }

    pub(crate) fn position_of(&self, id: usize) -> Option<usize> {
        self.order.iter().position(|&o| o == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refscale_core::codes;

    const FIXTURE: &str = r#"[
        {"name": "kilometer", "value": 1000.0, "aliases": ["km", "kilometers"]},
        {"name": "meter", "value": 1.0, "aliases": ["m", "meters"]}
    ]"#;

    fn fixture_entries() -> Vec<UnitEntry> {
        vec![
            UnitEntry::new("kilometer", 1000.0, &["km", "kilometers"]),
            UnitEntry::new("meter", 1.0, &["m", "meters"]),
        ]
    }

    fn verify_group(group: &UnitGroup) {
        for entry in fixture_entries() {
            let unit = group
                .get(&entry.name)
                .unwrap_or_else(|| panic!("{} not present in group", entry.name));
            assert_eq!(unit.multiplier(), entry.value);

            for alias in &entry.aliases {
                let aliased = group
                    .get(alias)
                    .unwrap_or_else(|| panic!("alias {} for {} not present", alias, entry.name));
                assert!(std::ptr::eq(unit, aliased), "{} aliased as {} points elsewhere", entry.name, alias);
            }
        }
    }

    #[test]
    fn test_group_from_reader() {
        let group = UnitGroup::from_reader(FIXTURE.as_bytes()).unwrap();
        assert_eq!(group.len(), 2);
        verify_group(&group);
    }

    #[test]
    fn test_units_sorted_ascending() {
        let group = UnitGroup::from_reader(FIXTURE.as_bytes()).unwrap();
        let names: Vec<&str> = group.iter().map(Unit::name).collect();
        assert_eq!(names, vec!["meter", "kilometer"]);

        let names: Vec<&str> = group.iter_descending().map(Unit::name).collect();
        assert_eq!(names, vec!["kilometer", "meter"]);
    }

    #[test]
    fn test_sort_after_each_add() {
        let mut group = UnitGroup::new();
        group.add(UnitEntry::new("hour", 3600.0, &["h"]));
        group.add(UnitEntry::new("second", 1.0, &["s"]));
        group.add(UnitEntry::new("minute", 60.0, &["min"]));

        let multipliers: Vec<f64> = group.iter().map(Unit::multiplier).collect();
        assert_eq!(multipliers, vec![1.0, 60.0, 3600.0]);
        assert_eq!(group.get("h").unwrap().name(), "hour");
        assert_eq!(group.get("min").unwrap().name(), "minute");
    }

    #[test]
    fn test_alias_last_write_wins() {
        let mut group = UnitGroup::new();
        group.add(UnitEntry::new("meter", 1.0, &["m"]));
        group.add(UnitEntry::new("mile", 1609.344, &["m"]));

        assert_eq!(group.len(), 2);
        assert_eq!(group.get("m").unwrap().name(), "mile");
        assert_eq!(group.get("meter").unwrap().name(), "meter");
    }

    #[test]
    fn test_len_counts_units_not_aliases() {
        let group = UnitGroup::from_reader(FIXTURE.as_bytes()).unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(group.aliases().count(), 6);
    }

    #[test]
    fn test_empty_group() {
        let group = UnitGroup::from_reader("[]".as_bytes()).unwrap();
        assert!(group.is_empty());
        assert_eq!(group.iter_descending().count(), 0);
        assert!(group.get("m").is_none());
    }

    #[test]
    fn test_require_missing_alias() {
        let group = UnitGroup::from_reader(FIXTURE.as_bytes()).unwrap();
        let err = group.require("parsec").unwrap_err();
        assert_eq!(err.code(), codes::LOOKUP_ERROR);
        assert_eq!(err.to_string(), "alias 'parsec' not found");
    }

    #[test]
    fn test_reader_error_is_wrapped() {
        let err = UnitGroup::from_reader(r#"[{"name": "meter", "value": 0}]"#.as_bytes()).unwrap_err();
        assert_eq!(err.code(), codes::VALIDATION_ERROR);
        assert!(err.to_string().starts_with("error reading unit entry"));
    }

    #[test]
    fn test_to_base() {
        let unit = Unit::new("hour", 3600.0);
        assert_eq!(unit.to_base(0.75), 2700.0);
        assert_eq!(unit.to_string(), "hour");
    }
}
