//! Refscale - labeled measures rescaled against a reference
//!
//! ```text
//! Item 1: 0.75 hour, 15 minutes
//! Item 2: 15 minutes
//! Item 3: 60 seconds
//! ```
//!
//! Each line becomes a record valued in base units of one unit group. The
//! largest record is the reference; `Enlistment::scaled` maps it onto a new
//! value and moves every other record proportionally, and
//! `Enlistment::render` prints the result as "3 month, 1 day, 6.00 hour".

mod enlistment;
mod measure;
mod render;

pub use enlistment::{Enlistment, Entry, Record, COMMENT_PREFIX, LABEL_SEPARATOR};
pub use measure::{measure_value, parse_measures, sum_measures, RawMeasure, CLAUSE_SEPARATOR};
pub use render::{unit_subset, Renderer, DEFAULT_MAX_UNITS, PART_SEPARATOR};

pub use refscale_core::{RefscaleError, Result};
pub use refscale_units::{EmbeddedRegistry, TreeRegistry, UnitGroup, UnitRegistry};
