//! Sink writing records to CSV files identified by already resolved paths

use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    core::{error::SinkError, record::Record, row_formatter::RowFormatter},
    sink::{
        destination::FileDestination,
        destination_writer::{DestinationWriter, HeaderCheck},
    },
};

/// Keeps one [`DestinationWriter`] per destination path, all sharing the same formatter
///
/// Resolving the path for a record (e.g., from a template) is up to the caller.
#[derive(Debug)]
pub struct CsvFileSink {
    formatter: Arc<RowFormatter>,
    header_check: HeaderCheck,
    writers: HashMap<PathBuf, DestinationWriter<FileDestination>>,
}

impl CsvFileSink {
    /// New sink without any open destination
    pub fn new(formatter: RowFormatter) -> Self {
        Self {
            formatter: Arc::new(formatter),
            header_check: HeaderCheck::default(),
            writers: HashMap::new(),
        }
    }

    /// Use the given [`HeaderCheck`] strategy for all destinations
    pub fn with_header_check(mut self, header_check: HeaderCheck) -> Self {
        self.header_check = header_check;
        self
    }

    /// Append `record` to the CSV file at `path`
    pub fn receive(&mut self, path: impl AsRef<Path>, record: &Record) -> Result<(), SinkError> {
        let path = path.as_ref();
        let formatter = &self.formatter;
        let header_check = self.header_check;
        self.writers
            .entry(path.to_path_buf())
            .or_insert_with(|| {
                DestinationWriter::new(formatter.clone(), FileDestination::new(path))
                    .with_header_check(header_check)
            })
            .write_record(record)
    }

    /// Paths written to so far
    pub fn destinations(&self) -> impl Iterator<Item = &Path> {
        self.writers.keys().map(PathBuf::as_path)
    }

    /// Number of data rows written to `path` by this sink
    pub fn rows_written(&self, path: impl AsRef<Path>) -> u64 {
        self.writers
            .get(path.as_ref())
            .map(DestinationWriter::rows_written)
            .unwrap_or_default()
    }

    /// Flush all destinations
    pub fn flush_all(&mut self) -> io::Result<()> {
        for writer in self.writers.values_mut() {
            writer.flush()?;
        }
        Ok(())
    }

    /// Flush and close all destinations
    pub fn close(mut self) -> io::Result<()> {
        for (path, mut writer) in self.writers.drain() {
            writer.destination_mut().close()?;
            tracing::debug!(
                path = %path.display(),
                rows = writer.rows_written(),
                "closed csv destination"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::format_config::FormatConfig;
    use serde_json::json;

    fn event(foo: &str) -> Record {
        json!({"foo": foo, "baz": "quux"})
            .as_object()
            .cloned()
            .unwrap()
    }

    #[test]
    fn writes_each_path_with_its_own_header() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("sub").join("b.csv");
        let formatter = RowFormatter::configure(
            ["foo", "baz"],
            FormatConfig {
                write_headers: true,
                ..FormatConfig::default()
            },
        )
        .unwrap();

        let mut sink = CsvFileSink::new(formatter);
        sink.receive(&a, &event("1")).unwrap();
        sink.receive(&b, &event("2")).unwrap();
        sink.receive(&a, &event("3")).unwrap();

        assert_eq!(sink.destinations().count(), 2);
        assert_eq!(sink.rows_written(&a), 2);
        assert_eq!(sink.rows_written(&b), 1);
        assert_eq!(sink.rows_written(dir.path().join("c.csv")), 0);
        sink.close().unwrap();

        assert_eq!(
            std::fs::read_to_string(&a).unwrap(),
            "foo,baz\n1,quux\n3,quux\n"
        );
        assert_eq!(std::fs::read_to_string(&b).unwrap(), "foo,baz\n2,quux\n");
    }

    #[test]
    fn rows_are_visible_after_each_receive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut sink = CsvFileSink::new(
            RowFormatter::configure(["foo"], FormatConfig::default()).unwrap(),
        )
        .with_header_check(HeaderCheck::Cached);

        sink.receive(&path, &event("bar")).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "bar\n");
        sink.receive(&path, &event("baz")).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "bar\nbaz\n");
    }

    #[test]
    fn io_errors_are_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a file
        let mut sink =
            CsvFileSink::new(RowFormatter::configure(["foo"], FormatConfig::default()).unwrap());
        let err = sink.receive(dir.path(), &event("bar")).unwrap_err();
        assert!(matches!(err, SinkError::Io(_)));
    }
}
