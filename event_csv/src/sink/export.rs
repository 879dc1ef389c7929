//! Batch export of records to delimited text
//!
//! Unlike [`DestinationWriter`](crate::DestinationWriter), the batch functions assume a
//! fresh target: the header row is written whenever the configuration requests one.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use rayon::prelude::*;

use crate::core::{
    error::{FormatError, SinkError},
    record::Record,
    row_formatter::RowFormatter,
};

fn render_data_lines(
    records: &[Record],
    formatter: &RowFormatter,
) -> Result<Vec<String>, FormatError> {
    records
        .par_iter()
        .map(|record| formatter.data_line(record))
        .collect()
}

/// Export `records` (with header, if requested) to a writer
pub fn export_records_csv<W: Write>(
    mut writer: W,
    records: &[Record],
    formatter: &RowFormatter,
) -> Result<(), SinkError> {
    let lines = render_data_lines(records, formatter)?;
    if formatter.config().headers_requested() {
        writer.write_all(formatter.header_line().as_bytes())?;
    }
    for line in &lines {
        writer.write_all(line.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Export `records` to a new file at `path` (replacing existing content)
pub fn export_records_csv_to_path<P: AsRef<Path>>(
    path: P,
    records: &[Record],
    formatter: &RowFormatter,
) -> Result<(), SinkError> {
    export_records_csv(
        BufWriter::new(File::create(path)?),
        records,
        formatter,
    )
}

/// Export `records` to a [`String`]
pub fn export_records_csv_to_string(
    records: &[Record],
    formatter: &RowFormatter,
) -> Result<String, FormatError> {
    let lines = render_data_lines(records, formatter)?;
    let mut out = String::new();
    if formatter.config().headers_requested() {
        out.push_str(&formatter.header_line());
    }
    for line in &lines {
        out.push_str(line);
    }
    Ok(out)
}
