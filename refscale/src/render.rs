//! Record renderer
//!
//! Breaks a value into a descending sum of units from the governing group,
//! e.g. "3 month, 1 day, 6.00 hour". Every unit but the last used one shows
//! an integer part; the last used unit shows the remaining quotient with two
//! decimals.

use refscale_units::{Unit, UnitGroup};

use crate::enlistment::Record;

/// Default cap on the number of units in one rendering
pub const DEFAULT_MAX_UNITS: usize = 3;

/// Separator between the parts of a decomposition
pub const PART_SEPARATOR: &str = ", ";

/// Greedy multi-unit renderer
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    max_units: usize,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNITS)
    }
}

impl Renderer {
    /// Renderer using at most `max_units` units per value (0 means no cap)
    pub fn new(max_units: usize) -> Self {
        Self { max_units }
    }

    pub fn max_units(&self) -> usize {
        self.max_units
    }

    /// Render every record as "label: decomposition"
    pub fn render(&self, records: &[Record], group: &UnitGroup) -> Vec<String> {
        let units = record_units(records, group);
        records
            .iter()
            .map(|record| self.render_record(record, &units))
            .collect()
    }

    /// Decomposition of every record, without labels
    pub fn render_values(&self, records: &[Record], group: &UnitGroup) -> Vec<String> {
        let units = record_units(records, group);
        records
            .iter()
            .map(|record| self.render_value(record.value(), &units))
            .collect()
    }

    pub fn render_record(&self, record: &Record, units: &[&Unit]) -> String {
        format!("{}: {}", record.label(), self.render_value(record.value(), units))
    }

    /// Greedy decomposition of `value` over `units`, largest unit first
    pub fn render_value(&self, value: f64, units: &[&Unit]) -> String {
        let mut parts = Vec::new();
        let mut leftover = value;

        for unit in units {
            if leftover == 0.0 {
                break;
            }

            let quotient = leftover / unit.multiplier();
            let whole = quotient.floor();
            if whole <= 0.0 {
                continue;
            }

            if parts.len() + 1 == self.max_units {
                parts.push(format!("{:.2} {}", quotient, unit.name()));
                break;
            }

            leftover -= whole * unit.multiplier();
            parts.push(format!("{:.0} {}", whole, unit.name()));
        }

        parts.join(PART_SEPARATOR)
    }
}

/// Candidate units for `records`: those no larger than the largest record
fn record_units<'g>(records: &[Record], group: &'g UnitGroup) -> Vec<&'g Unit> {
    let largest = records
        .iter()
        .map(Record::value)
        .fold(f64::NEG_INFINITY, f64::max);
    unit_subset(group, largest)
}

/// Units of `group` with a multiplier no larger than `max_value`, largest first
pub fn unit_subset(group: &UnitGroup, max_value: f64) -> Vec<&Unit> {
    group
        .iter_descending()
        .filter(|unit| unit.multiplier() <= max_value)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use refscale_units::UnitEntry;

    fn time_group() -> UnitGroup {
        let mut group = UnitGroup::new();
        group.add(UnitEntry::new("second", 1.0, &["s"]));
        group.add(UnitEntry::new("minute", 60.0, &["min"]));
        group.add(UnitEntry::new("hour", 3600.0, &["h"]));
        group.add(UnitEntry::new("day", 86_400.0, &["d"]));
        group
    }

    fn names(units: &[&Unit]) -> Vec<String> {
        units.iter().map(|u| u.name().to_string()).collect()
    }

    #[test]
    fn test_unit_subset() {
        let group = time_group();
        assert_eq!(names(&unit_subset(&group, 7200.0)), vec!["hour", "minute", "second"]);
        assert_eq!(names(&unit_subset(&group, 3600.0)), vec!["hour", "minute", "second"]);
        assert!(unit_subset(&group, 0.5).is_empty());
    }

    #[test]
    fn test_render_value_exact() {
        let group = time_group();
        let units = unit_subset(&group, 86_400.0);
        let renderer = Renderer::default();
        assert_eq!(renderer.render_value(86_400.0, &units), "1 day");
        assert_eq!(renderer.render_value(3660.0, &units), "1 hour, 1 minute");
    }

    #[test]
    fn test_render_value_last_unit_decimals() {
        let group = time_group();
        let units = unit_subset(&group, 86_400.0);
        assert_eq!(
            Renderer::new(3).render_value(90_066.0, &units),
            "1 day, 1 hour, 1.10 minute"
        );
        assert_eq!(Renderer::new(1).render_value(5400.0, &units), "1.50 hour");
    }

    #[test]
    fn test_render_value_no_cap() {
        let group = time_group();
        let units = unit_subset(&group, 86_400.0);
        assert_eq!(
            Renderer::new(0).render_value(90_066.0, &units),
            "1 day, 1 hour, 1 minute, 6 second"
        );
    }

    #[test]
    fn test_render_value_below_smallest_unit() {
        let group = time_group();
        let units = unit_subset(&group, 86_400.0);
        assert_eq!(Renderer::default().render_value(0.25, &units), "");
        assert_eq!(Renderer::default().render_value(-60.0, &units), "");
    }

    #[test]
    fn test_render_value_float_remainder() {
        let group = time_group();
        let units = unit_subset(&group, 86_400.0);
        let value = 3600.0 + 1e-9;
        assert_ne!(value, 3600.0);
        assert_eq!(Renderer::new(0).render_value(value, &units), "1 hour");
        assert_eq!(Renderer::new(2).render_value(value, &units), "1 hour");
    }

    #[test]
    fn test_render_value_beyond_integer_range() {
        let group = time_group();
        let units = unit_subset(&group, 1.0);
        assert_eq!(
            Renderer::new(0).render_value(1e20, &units),
            "100000000000000000000 second"
        );
    }

    #[test]
    fn test_render_records() {
        let group = time_group();
        let records = vec![
            Record::new("long", 7200.0),
            Record::new("short", 90.0),
        ];
        assert_eq!(
            Renderer::default().render(&records, &group),
            vec!["long: 2 hour", "short: 1 minute, 30 second"]
        );
        assert_eq!(
            Renderer::new(1).render_values(&records, &group),
            vec!["2.00 hour", "1.50 minute"]
        );
    }
}
