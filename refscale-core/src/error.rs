//! Structured errors
//!
//! Every failure in the pipeline is fail-fast: an error aborts the current
//! construction step and travels to the caller wrapped with the raw line,
//! measure text or file path that produced it.

use serde::Serialize;
use std::io;
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const LOOKUP_ERROR: &str = "LOOKUP_ERROR";
    pub const MALFORMED_LINE: &str = "MALFORMED_LINE";
    pub const EMPTY_INPUT: &str = "EMPTY_INPUT";
    pub const ZERO_VALUE: &str = "ZERO_VALUE";
    pub const IO_ERROR: &str = "IO_ERROR";
    pub const ENCODE_ERROR: &str = "ENCODE_ERROR";
}

/// Error type shared by every refscale crate
#[derive(Debug, Error)]
pub enum RefscaleError {
    /// Malformed JSON or text structure
    #[error("parse error at byte {offset}: {message} (content: {fragment})")]
    Parse {
        offset: usize,
        message: String,
        fragment: String,
    },

    /// Semantically invalid field
    #[error("invalid {field} in {fragment}: {reason}")]
    Validation {
        field: String,
        reason: String,
        fragment: String,
    },

    /// Alias missing from the governing unit group
    #[error("alias '{alias}' not found")]
    AliasNotFound { alias: String },

    /// No registered group knows the alias
    #[error("failed to determine unit group for alias '{alias}'")]
    UnknownGroup { alias: String },

    /// Missing separator, label or measure text
    #[error("'{text}' is malformed: {reason}")]
    Malformed { text: String, reason: String },

    #[error("{0}")]
    EmptyInput(String),

    /// Measures of an entry sum up to exactly zero
    #[error("value of '{0}' cannot equal 0")]
    ZeroValue(String),

    #[error("failed to read {target}: {source}")]
    Io {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode {target}: {message}")]
    Encode { target: String, message: String },

    /// Another error annotated with the input that caused it
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<RefscaleError>,
    },
}

/// Result alias used across the workspace
pub type Result<T> = std::result::Result<T, RefscaleError>;

impl RefscaleError {
    // ========== Constructors ==========

    pub fn parse(offset: usize, message: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            message: message.into(),
            fragment: fragment.into(),
        }
    }

    pub fn validation(
        field: impl Into<String>,
        reason: impl Into<String>,
        fragment: impl Into<String>,
    ) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
            fragment: fragment.into(),
        }
    }

    pub fn alias_not_found(alias: impl Into<String>) -> Self {
        Self::AliasNotFound { alias: alias.into() }
    }

    pub fn unknown_group(alias: impl Into<String>) -> Self {
        Self::UnknownGroup { alias: alias.into() }
    }

    pub fn malformed(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            text: text.into(),
            reason: reason.into(),
        }
    }

    pub fn empty_input(details: impl Into<String>) -> Self {
        Self::EmptyInput(details.into())
    }

    pub fn zero_value(measures: impl Into<String>) -> Self {
        Self::ZeroValue(measures.into())
    }

    pub fn io(target: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            target: target.into(),
            source,
        }
    }

    pub fn encode(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encode {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Builder: wrap with the input that caused the error
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    // ========== Inspection ==========

    /// Innermost error, past every `Context` layer
    pub fn root(&self) -> &RefscaleError {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// Machine-readable code of the innermost error
    pub fn code(&self) -> &'static str {
        match self.root() {
            Self::Parse { .. } => codes::PARSE_ERROR,
            Self::Validation { .. } => codes::VALIDATION_ERROR,
            Self::AliasNotFound { .. } | Self::UnknownGroup { .. } => codes::LOOKUP_ERROR,
            Self::Malformed { .. } => codes::MALFORMED_LINE,
            Self::EmptyInput(_) => codes::EMPTY_INPUT,
            Self::ZeroValue(_) => codes::ZERO_VALUE,
            Self::Io { .. } => codes::IO_ERROR,
            Self::Encode { .. } => codes::ENCODE_ERROR,
            Self::Context { .. } => unreachable!("root() never returns a Context"),
        }
    }

    /// Context annotations from outermost to innermost
    pub fn contexts(&self) -> Vec<&str> {
        let mut notes = Vec::new();
        let mut current = self;
        while let Self::Context { context, source } = current {
            notes.push(context.as_str());
            current = source.as_ref();
        }
        notes
    }

    /// Serializable summary of this error
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code().to_string(),
            message: self.root().to_string(),
            context: self.contexts().into_iter().map(str::to_string).collect(),
        }
    }
}

/// Error summary for JSON consumers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    /// Machine-readable error code
    pub code: String,

    /// Message of the innermost error
    pub message: String,

    /// Wrapping annotations, outermost first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,
}

/// Attach context to a fallible result
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(context))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| e.context(f()))
    }
}
