//! Refscale Core - Fundamental types
//!
//! This crate provides the types shared by every refscale crate:
//! - `RefscaleError`: Fail-fast errors wrapped with the offending input
//! - `codes`: Machine-readable error codes
//! - `ErrorReport`: Serializable error summary

mod error;

pub use error::{codes, ErrorReport, RefscaleError, Result, ResultExt};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::codes;
    pub use crate::{RefscaleError, Result, ResultExt};
}
