//! Writing formatted records to a single destination

use std::{io, sync::Arc};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    core::{error::SinkError, record::Record, row_formatter::RowFormatter},
    sink::destination::Destination,
};

/// How a [`DestinationWriter`] finds out whether the header still has to be written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum HeaderCheck {
    /// Ask the destination before every record
    ///
    /// Picks up destinations that were truncated or removed by someone else.
    #[default]
    EveryWrite,
    /// Ask the destination once, then remember that it was written to
    Cached,
}

/// Writes records to one destination using a shared [`RowFormatter`]
///
/// The writer is the single writer of its destination, so the header (if any) is always
/// written before the first data line.
#[derive(Debug)]
pub struct DestinationWriter<D> {
    formatter: Arc<RowFormatter>,
    destination: D,
    header_check: HeaderCheck,
    written: Option<bool>,
    rows_written: u64,
}

impl<D: Destination> DestinationWriter<D> {
    /// Writer checking the destination state before every record
    pub fn new(formatter: Arc<RowFormatter>, destination: D) -> Self {
        Self {
            formatter,
            destination,
            header_check: HeaderCheck::default(),
            written: None,
            rows_written: 0,
        }
    }

    /// Use the given [`HeaderCheck`] strategy
    pub fn with_header_check(mut self, header_check: HeaderCheck) -> Self {
        self.header_check = header_check;
        self
    }

    fn header_already_written(&mut self) -> io::Result<bool> {
        match (self.header_check, self.written) {
            (HeaderCheck::Cached, Some(written)) => Ok(written),
            _ => Ok(!self.destination.is_empty_or_new()?),
        }
    }

    /// Format `record` and append it (preceded by the header if needed), then flush
    pub fn write_record(&mut self, record: &Record) -> Result<(), SinkError> {
        let header_already_written = self.header_already_written()?;
        let row = self.formatter.format(record, header_already_written)?;
        if let Some(header) = &row.header {
            tracing::debug!("writing header row");
            self.destination.write(header.as_bytes())?;
        }
        self.destination.write(row.data.as_bytes())?;
        self.destination.flush()?;
        self.written = Some(true);
        self.rows_written += 1;
        Ok(())
    }

    /// Number of data rows written by this writer
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// The formatter used by this writer
    pub fn formatter(&self) -> &RowFormatter {
        &self.formatter
    }

    /// The underlying destination
    pub fn destination(&self) -> &D {
        &self.destination
    }

    /// Mutable access to the underlying destination
    pub fn destination_mut(&mut self) -> &mut D {
        &mut self.destination
    }

    /// Flush the underlying destination
    pub fn flush(&mut self) -> io::Result<()> {
        self.destination.flush()
    }

    /// Consume the writer, returning the destination
    pub fn into_destination(self) -> D {
        self.destination
    }
}
