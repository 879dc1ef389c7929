//! Core record-to-row projection
//!
//! Everything in here is pure: no I/O, no shared mutable state.

/// Error types
pub mod error;
/// Field reference parsing and resolution
pub mod field_reference;
/// [`FormatConfig`] and [`QuotePolicy`]
pub mod format_config;
/// [`Record`] data model
pub mod record;
/// [`RowFormatter`]
pub mod row_formatter;
/// Cell serialization and spreadsheet-safe escaping
pub mod value_serializer;

pub use error::{ConfigError, FormatError, SinkError};
pub use field_reference::FieldReference;
pub use format_config::{FormatConfig, QuotePolicy};
pub use record::{Record, Value};
pub use row_formatter::{FormattedRow, RowFormatter};
