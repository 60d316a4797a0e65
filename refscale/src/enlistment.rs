//! Enlistments - labeled measures sharing one unit group
//!
//! An enlistment is read from lines of the form `label: measures`, e.g.
//! `Item 1: 0.75 hour, 15 minutes`. Blank lines and lines starting with `#`
//! are skipped. The unit group is chosen by the first alias of the first
//! entry; every later entry must use aliases of that same group.
//!
//! Records are kept sorted by value, largest first. The reference record is
//! the first record seen with the strictly largest value, which after sorting
//! is always the first record.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use refscale_core::prelude::*;
use refscale_units::{UnitGroup, UnitRegistry};
use tracing::{debug, info};

use crate::measure::{measure_value, parse_measures, sum_measures, RawMeasure};
use crate::render::Renderer;

/// Lines starting with this prefix are comments
pub const COMMENT_PREFIX: &str = "#";

/// Separator between an entry's label and its measures
pub const LABEL_SEPARATOR: &str = ": ";

// ========== Entry ==========

/// One non-blank, non-comment input line split into label and measures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub label: String,
    pub measures: String,
    /// Trimmed source line
    pub line: String,
    /// 1-based line number in the input
    pub line_no: usize,
}

impl Entry {
    /// Split a trimmed line at the first `": "`
    pub fn parse(line: &str, line_no: usize) -> Result<Self> {
        Self::split(line)
            .map(|(label, measures)| Entry {
                label: label.to_string(),
                measures: measures.to_string(),
                line: line.to_string(),
                line_no,
            })
            .with_context(|| format!("line {}", line_no))
    }

    fn split(line: &str) -> Result<(&str, &str)> {
        let (label, measures) = line
            .split_once(LABEL_SEPARATOR)
            .ok_or_else(|| RefscaleError::malformed(line, "missing ': ' separator"))?;

        if label.is_empty() {
            return Err(RefscaleError::malformed(line, "missing label"));
        }
        if measures.is_empty() {
            return Err(RefscaleError::malformed(line, "missing value"));
        }
        Ok((label, measures))
    }
}

/// Lazily parsed entries of `reader`, skipping blank and comment lines
fn entries<R: BufRead>(reader: R) -> impl Iterator<Item = Result<Entry>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let line = match line {
                Ok(line) => line,
                Err(e) => return Some(Err(RefscaleError::io("enlistment input", e))),
            };

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX) {
                return None;
            }
            Some(Entry::parse(trimmed, idx + 1))
        })
}

fn entry_measures(entry: &Entry) -> Result<Vec<RawMeasure>> {
    parse_measures(&entry.measures)
        .with_context(|| format!("failed to create measure value from '{}'", entry.measures))
        .with_context(|| format!("failed to add entry '{}'", entry.line))
        .with_context(|| format!("line {}", entry.line_no))
}

// ========== Record ==========

/// A label with its value in base units of the governing group
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    label: String,
    value: f64,
}

impl Record {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    fn from_measures(entry: &Entry, measures: &[RawMeasure], group: &UnitGroup) -> Result<Self> {
        let value = sum_measures(measures, &entry.measures, group)
            .with_context(|| format!("failed to create measure value from '{}'", entry.measures))?;
        Ok(Record::new(entry.label.clone(), value))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

// ========== Enlistment ==========

/// Sorted records, their reference and the governing unit group
#[derive(Debug, Clone)]
pub struct Enlistment<'g> {
    records: Vec<Record>,
    reference: usize,
    group: &'g UnitGroup,
}

/// Accumulates records while an enlistment is read
struct Builder<'g> {
    records: Vec<Record>,
    reference: Option<usize>,
    group: &'g UnitGroup,
}

impl<'g> Builder<'g> {
    fn add(&mut self, entry: &Entry, measures: &[RawMeasure]) -> Result<()> {
        let record = Record::from_measures(entry, measures, self.group)
            .with_context(|| format!("failed to add entry '{}'", entry.line))
            .with_context(|| format!("line {}", entry.line_no))?;

        debug!(label = %record.label, value = record.value, "added record");

        let index = self.records.len();
        let replaces = match self.reference {
            None => true,
            Some(current) => self.records[current].value < record.value,
        };
        if replaces {
            self.reference = Some(index);
        }
        self.records.push(record);
        Ok(())
    }

    fn add_line(&mut self, entry: &Entry) -> Result<()> {
        let measures = entry_measures(entry)?;
        self.add(entry, &measures)
    }

    /// Sort descending, keeping equal values in input order
    fn finish(self) -> Enlistment<'g> {
        let reference = self.reference.unwrap_or(0);

        let mut indexed: Vec<(usize, Record)> = self.records.into_iter().enumerate().collect();
        indexed.sort_by(|(_, a), (_, b)| b.value.total_cmp(&a.value));

        let position = indexed
            .iter()
            .position(|(index, _)| *index == reference)
            .unwrap_or(0);
        debug_assert_eq!(position, 0, "reference must sort first");

        Enlistment {
            records: indexed.into_iter().map(|(_, record)| record).collect(),
            reference: position,
            group: self.group,
        }
    }
}

impl<'g> Enlistment<'g> {
    /// Read an enlistment, choosing its unit group from `registry`
    pub fn parse<R, U>(reader: R, registry: &'g U) -> Result<Self>
    where
        R: BufRead,
        U: UnitRegistry + ?Sized,
    {
        let mut lines = entries(reader);

        let first = lines
            .next()
            .ok_or_else(|| RefscaleError::empty_input("enlistment is empty"))??;

        let measures = entry_measures(&first)?;
        let group = Self::determine_group(&measures, registry)
            .with_context(|| format!("line {}", first.line_no))?;

        let mut builder = Builder {
            records: Vec::new(),
            reference: None,
            group,
        };
        builder.add(&first, &measures)?;

        for entry in lines {
            builder.add_line(&entry?)?;
        }

        let enlistment = builder.finish();
        info!(
            records = enlistment.len(),
            reference = %enlistment.reference().label,
            "enlistment loaded"
        );
        Ok(enlistment)
    }

    /// Read an enlistment from in-memory text
    pub fn parse_str<U: UnitRegistry + ?Sized>(text: &str, registry: &'g U) -> Result<Self> {
        Self::parse(text.as_bytes(), registry)
    }

    /// Read an enlistment file
    pub fn from_path<U: UnitRegistry + ?Sized>(path: impl AsRef<Path>, registry: &'g U) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| RefscaleError::io(format!("'{}'", path.display()), e))?;
        Self::parse(BufReader::new(file), registry)
            .with_context(|| format!("failed to load enlistment from '{}'", path.display()))
    }

    fn determine_group<U: UnitRegistry + ?Sized>(
        measures: &[RawMeasure],
        registry: &'g U,
    ) -> Result<&'g UnitGroup> {
        let alias = measures
            .first()
            .map(|raw| raw.alias.as_str())
            .ok_or_else(|| RefscaleError::empty_input("measures are empty"))?;

        match registry.find_keyed(alias) {
            Some((key, group)) => {
                debug!(alias, group = key, "determined unit group");
                Ok(group)
            }
            None => Err(RefscaleError::unknown_group(alias)),
        }
    }

    /// Records, largest value first
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The record every scaling is relative to
    pub fn reference(&self) -> &Record {
        &self.records[self.reference]
    }

    pub fn group(&self) -> &'g UnitGroup {
        self.group
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Convert a measure text (e.g. "1 year") with the governing unit group
    pub fn measure(&self, text: &str) -> Result<f64> {
        measure_value(text, self.group)
    }

    /// Rescale so the reference record equals `scale`
    ///
    /// Every record becomes `value / reference * scale`. Order, labels and
    /// the reference position are kept.
    pub fn scaled(&self, scale: f64) -> Enlistment<'g> {
        let reference = self.reference().value;
        let records = self
            .records
            .iter()
            .map(|record| Record::new(record.label.clone(), record.value / reference * scale))
            .collect();

        Enlistment {
            records,
            reference: self.reference,
            group: self.group,
        }
    }

    /// Parse `text` as a measure and rescale to it
    pub fn scaled_to(&self, text: &str) -> Result<Enlistment<'g>> {
        let scale = self.measure(text)?;
        debug!(scale = text, value = scale, "scaling enlistment");
        Ok(self.scaled(scale))
    }

    /// Render every record with at most `max_units` units (0 means no cap)
    pub fn render(&self, max_units: usize) -> Vec<String> {
        Renderer::new(max_units).render(&self.records, self.group)
    }
}
