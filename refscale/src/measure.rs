//! Measure parsing - "0.75 hour, 15 minutes" into base-unit values

use std::str::FromStr;

use refscale_core::prelude::*;
use refscale_units::UnitGroup;

/// Separator between the clauses of a measure text
pub const CLAUSE_SEPARATOR: char = ',';

/// One `<value> <alias>` clause of a measure text
#[derive(Debug, Clone, PartialEq)]
pub struct RawMeasure {
    pub value: f64,
    pub alias: String,
}

impl RawMeasure {
    /// Parse a single clause such as "15 minutes"
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RefscaleError::empty_input(format!("raw measure '{}' is empty", raw)));
        }

        let Some((value, alias)) = trimmed.split_once(' ') else {
            let reason = if trimmed.parse::<f64>().is_ok() {
                "missing unit alias"
            } else {
                "missing value"
            };
            return Err(RefscaleError::malformed(raw, reason));
        };

        if value.is_empty() {
            return Err(RefscaleError::malformed(raw, "missing value"));
        }
        if alias.is_empty() {
            return Err(RefscaleError::malformed(raw, "missing unit alias"));
        }

        let number: f64 = value.parse().map_err(|e| {
            RefscaleError::validation("value", format!("'{}' failed to be parsed: {}", value, e), raw)
        })?;
        if !number.is_finite() {
            return Err(RefscaleError::validation("value", "must be a finite number", raw));
        }

        Ok(RawMeasure {
            value: number,
            alias: alias.to_string(),
        })
    }
}

impl FromStr for RawMeasure {
    type Err = RefscaleError;

    fn from_str(s: &str) -> Result<Self> {
        RawMeasure::parse(s)
    }
}

/// Split a measure text on commas and parse every clause
pub fn parse_measures(text: &str) -> Result<Vec<RawMeasure>> {
    if text.trim().is_empty() {
        return Err(RefscaleError::empty_input("measures are empty"));
    }
    text.split(CLAUSE_SEPARATOR).map(RawMeasure::parse).collect()
}

/// Sum of the clauses converted to base units of `group`
///
/// Every alias must belong to `group`. A total of exactly zero, or one that
/// overflows to infinity or NaN, is an error.
pub fn sum_measures(measures: &[RawMeasure], text: &str, group: &UnitGroup) -> Result<f64> {
    let mut total = 0.0;
    for raw in measures {
        total += group.require(&raw.alias)?.to_base(raw.value);
    }

    if !total.is_finite() {
        return Err(RefscaleError::validation("value", "must be a finite number", text));
    }
    if total == 0.0 {
        return Err(RefscaleError::zero_value(text));
    }
    Ok(total)
}

/// Parse a measure text and convert it to base units of `group`
pub fn measure_value(text: &str, group: &UnitGroup) -> Result<f64> {
    parse_measures(text)
        .and_then(|measures| sum_measures(&measures, text, group))
        .with_context(|| format!("failed to create measure value from '{}'", text))
}
