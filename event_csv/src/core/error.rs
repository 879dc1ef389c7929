//! Error types for configuring, formatting and writing rows

use thiserror::Error;

use crate::core::field_reference::FieldReferenceError;

/// Error raised while building a [`RowFormatter`](crate::RowFormatter) or loading its
/// configuration
///
/// All of these are fatal to the formatter instance and are reported before any record is
/// processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No field references were configured
    #[error("at least one field reference must be configured")]
    EmptyFieldList,
    /// A configured field reference could not be parsed
    #[error(transparent)]
    InvalidFieldReference(#[from] FieldReferenceError),
    /// A separator option was set to the empty string
    #[error("option '{option}' must not be empty")]
    EmptySeparator {
        /// Name of the offending option
        option: &'static str,
    },
    /// Column and row separator are identical, so rows could not be told apart from cells
    #[error("column separator and row separator must differ (both are {separator:?})")]
    SeparatorsCollide {
        /// The shared separator value
        separator: String,
    },
    /// The quote character appears inside one of the separators
    #[error("quote character {quote:?} must not be part of the {option}")]
    QuoteInSeparator {
        /// The configured quote character
        quote: char,
        /// Name of the separator option containing the quote character
        option: &'static str,
    },
    /// Explicit header labels do not line up with the configured fields
    #[error("{labels} header labels were given for {fields} fields")]
    HeaderLabelCount {
        /// Number of configured field references
        fields: usize,
        /// Number of configured header labels
        labels: usize,
    },
    /// Reading a configuration file failed
    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// A configuration document was not valid
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error raised while turning a single record into a row
#[derive(Debug, Error)]
pub enum FormatError {
    /// A value could not be encoded as JSON
    #[error("could not serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The input did not serialize to a key/value record
    #[error("expected a record (JSON object) but found {found}")]
    NotARecord {
        /// Kind of value that was found instead
        found: &'static str,
    },
}

/// Error raised by the sink while writing formatted rows to a destination
#[derive(Debug, Error)]
pub enum SinkError {
    /// The record could not be formatted
    #[error(transparent)]
    Format(#[from] FormatError),
    /// Writing to or flushing the destination failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
