//! Writing formatted rows to destinations
//!
//! The [`RowFormatter`](crate::RowFormatter) does not perform I/O itself. The types in here
//! own the destinations, decide when a header is due, and serialize writes to each
//! destination.

/// [`Destination`] trait, file and in-memory destinations
pub mod destination;
/// [`DestinationWriter`]: one formatter, one destination
pub mod destination_writer;
/// Batch export of record slices
pub mod export;
/// [`CsvFileSink`]: one writer per destination path
pub mod file_sink;

pub use destination::{Destination, FileDestination, MemoryDestination};
pub use destination_writer::{DestinationWriter, HeaderCheck};
pub use file_sink::CsvFileSink;
