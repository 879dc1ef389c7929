#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]

#![doc = include_str!("../README.md")]

///
/// Record-to-row projection: field references, value serialization, quoting
///
pub mod core;

/// Output configuration ([`CsvOutputConfig`])
pub mod config;

///
/// Destinations, per-destination writers and batch export
///
pub mod sink;


#[doc(inline)]
pub use crate::core::record::{parse_record, Record, Value};

#[doc(inline)]
pub use crate::core::field_reference::FieldReference;

#[doc(inline)]
pub use crate::core::format_config::{FormatConfig, QuotePolicy};

#[doc(inline)]
pub use crate::core::row_formatter::{FormattedRow, RowFormatter};

#[doc(inline)]
pub use crate::core::value_serializer::{escape_formula, serialize_value};

#[doc(inline)]
pub use crate::core::error::{ConfigError, FormatError, SinkError};

#[doc(inline)]
pub use config::CsvOutputConfig;

#[doc(inline)]
pub use sink::{
    CsvFileSink, Destination, DestinationWriter, FileDestination, HeaderCheck, MemoryDestination,
};

#[doc(inline)]
pub use sink::export::{
    export_records_csv, export_records_csv_to_path, export_records_csv_to_string,
};
