//! Projection of records into delimited rows
//!
//! A [`RowFormatter`] is configured once with an ordered list of field references and a
//! [`FormatConfig`]. Afterwards it is immutable: formatting a record performs no I/O and
//! touches no shared state, so one formatter can be shared between threads (e.g., behind an
//! [`Arc`](std::sync::Arc)).
//!
//! Whether a header row is emitted is decided by the caller, who knows if the destination is
//! still empty:
//!
//! ```
//! use event_csv::{FormatConfig, RowFormatter};
//! use serde_json::json;
//!
//! let formatter = RowFormatter::configure(
//!     ["foo", "[nested][value]"],
//!     FormatConfig { write_headers: true, ..FormatConfig::default() },
//! )
//! .unwrap();
//! let record = json!({"foo": "one,two", "nested": {"value": 42}});
//!
//! let first = formatter.format(record.as_object().unwrap(), false).unwrap();
//! assert_eq!(first.header.as_deref(), Some("foo,[nested][value]\n"));
//! assert_eq!(first.data, "\"one,two\",42\n");
//!
//! let next = formatter.format(record.as_object().unwrap(), true).unwrap();
//! assert_eq!(next.header, None);
//! ```

use std::borrow::Cow;

use serde::Serialize;

use crate::core::{
    error::{ConfigError, FormatError},
    field_reference::FieldReference,
    format_config::FormatConfig,
    record::{value_into_record, Record},
    value_serializer::serialize_value,
};

/// Output of formatting a single record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedRow {
    /// Header line, only present if a header was requested and none was written yet
    pub header: Option<String>,
    /// The data line, including the row separator
    pub data: String,
}

impl FormattedRow {
    /// Lines to append to the destination, in order
    pub fn into_lines(self) -> Vec<Vec<u8>> {
        self.header
            .into_iter()
            .chain(std::iter::once(self.data))
            .map(String::into_bytes)
            .collect()
    }
}

/// Stateless formatter turning [`Record`]s into delimited rows
#[derive(Debug, Clone)]
pub struct RowFormatter {
    fields: Vec<FieldReference>,
    config: FormatConfig,
}

impl RowFormatter {
    /// Build a formatter for the given field references
    ///
    /// Fails if no field is given, a field reference is malformed, the option combination
    /// is not supported, or the number of explicit header labels differs from the number
    /// of fields.
    pub fn configure<I, S>(fields: I, config: FormatConfig) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields = fields
            .into_iter()
            .map(|f| FieldReference::parse(f.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        if fields.is_empty() {
            return Err(ConfigError::EmptyFieldList);
        }
        config.validate()?;
        if let Some(labels) = &config.header_labels {
            if labels.len() != fields.len() {
                return Err(ConfigError::HeaderLabelCount {
                    fields: fields.len(),
                    labels: labels.len(),
                });
            }
        }
        tracing::debug!(
            fields = fields.len(),
            quote_policy = ?config.quote_policy,
            headers = config.headers_requested(),
            "configured row formatter"
        );
        Ok(Self { fields, config })
    }

    /// Configured field references, in column order
    pub fn fields(&self) -> &[FieldReference] {
        &self.fields
    }

    /// Active formatting options
    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    /// The header line: explicit labels if configured, the field references otherwise
    pub fn header_line(&self) -> String {
        match &self.config.header_labels {
            Some(labels) => self.config.encode_line(labels),
            None => self
                .config
                .encode_line(self.fields.iter().map(FieldReference::as_str)),
        }
    }

    /// Unquoted cell values of `record`, one per configured field
    pub fn cells<'r>(&self, record: &'r Record) -> Result<Vec<Cow<'r, str>>, FormatError> {
        self.fields
            .iter()
            .map(|field| serialize_value(field.resolve(record), self.config.spreadsheet_safe))
            .collect()
    }

    /// The data line for `record`, including the row separator
    pub fn data_line(&self, record: &Record) -> Result<String, FormatError> {
        Ok(self.config.encode_line(self.cells(record)?))
    }

    /// Format `record`, adding the header line if requested and not yet written
    pub fn format(
        &self,
        record: &Record,
        header_already_written: bool,
    ) -> Result<FormattedRow, FormatError> {
        let header = (!header_already_written && self.config.headers_requested())
            .then(|| self.header_line());
        Ok(FormattedRow {
            header,
            data: self.data_line(record)?,
        })
    }

    /// Byte strings to append to the destination for `record` (header first, if any)
    pub fn format_record(
        &self,
        record: &Record,
        header_already_written: bool,
    ) -> Result<Vec<Vec<u8>>, FormatError> {
        Ok(self.format(record, header_already_written)?.into_lines())
    }

    /// Format any serializable value that serializes to a JSON object
    pub fn format_serialize<T: Serialize + ?Sized>(
        &self,
        value: &T,
        header_already_written: bool,
    ) -> Result<FormattedRow, FormatError> {
        let record = value_into_record(serde_json::to_value(value)?)?;
        self.format(&record, header_already_written)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::core::format_config::QuotePolicy;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn formatter(fields: &[&str]) -> RowFormatter {
        RowFormatter::configure(fields, FormatConfig::default()).unwrap()
    }

    #[test]
    fn empty_field_list_is_rejected() {
        let err =
            RowFormatter::configure(Vec::<String>::new(), FormatConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyFieldList));
    }

    #[test]
    fn malformed_reference_is_rejected() {
        let err = RowFormatter::configure(["foo", "[bar"], FormatConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFieldReference(_)));
    }

    #[test]
    fn header_label_count_must_match() {
        let config = FormatConfig {
            header_labels: Some(vec!["Only".into()]),
            ..FormatConfig::default()
        };
        let err = RowFormatter::configure(["a", "b"], config).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::HeaderLabelCount {
                fields: 2,
                labels: 1
            }
        ));
    }

    #[test]
    fn missing_fields_keep_their_column() {
        let f = formatter(&["foo", "missing", "baz"]);
        let line = f
            .data_line(&record(json!({"foo": "bar", "baz": "quux"})))
            .unwrap();
        assert_eq!(line, "bar,,quux\n");

        let all_missing = f.data_line(&record(json!({}))).unwrap();
        assert_eq!(all_missing, ",,\n");
    }

    #[test]
    fn nested_and_composite_fields() {
        let f = formatter(&["[foo][one]", "foo", "[foo][missing]"]);
        let line = f.data_line(&record(json!({"foo": {"one": "two"}}))).unwrap();
        assert_eq!(line, "two,\"{\"\"one\"\":\"\"two\"\"}\",\n");
    }

    #[test]
    fn header_is_only_emitted_when_requested_and_not_written() {
        let event = record(json!({"foo": "bar", "baz": "quux"}));

        let plain = formatter(&["foo", "baz"]);
        assert_eq!(plain.format(&event, false).unwrap().header, None);

        let with_headers = RowFormatter::configure(
            ["foo", "baz"],
            FormatConfig {
                write_headers: true,
                ..FormatConfig::default()
            },
        )
        .unwrap();
        assert_eq!(
            with_headers.format_record(&event, false).unwrap(),
            vec![b"foo,baz\n".to_vec(), b"bar,quux\n".to_vec()]
        );
        assert_eq!(
            with_headers.format_record(&event, true).unwrap(),
            vec![b"bar,quux\n".to_vec()]
        );
    }

    #[test]
    fn explicit_labels_imply_header_and_are_quoted() {
        let f = RowFormatter::configure(
            ["foo", "baz"],
            FormatConfig {
                header_labels: Some(vec!["Foo, the first".into(), "Baz".into()]),
                quote_policy: QuotePolicy::Minimal,
                ..FormatConfig::default()
            },
        )
        .unwrap();
        assert!(!f.config().write_headers);
        assert_eq!(f.header_line(), "\"Foo, the first\",Baz\n");
        let row = f.format(&record(json!({"foo": 1, "baz": 2})), false).unwrap();
        assert_eq!(row.header.as_deref(), Some("\"Foo, the first\",Baz\n"));
        assert_eq!(row.data, "1,2\n");
    }

    #[test]
    fn header_cells_are_not_formula_escaped() {
        let f = RowFormatter::configure(
            ["=cmd"],
            FormatConfig {
                write_headers: true,
                ..FormatConfig::default()
            },
        )
        .unwrap();
        assert_eq!(f.header_line(), "=cmd\n");
    }

    #[test]
    fn spreadsheet_safety_applies_before_quoting() {
        let safe = formatter(&["f", "g"]);
        let event = record(json!({"f": "=1+1", "g": "-2,3"}));
        assert_eq!(safe.data_line(&event).unwrap(), "'=1+1,\"'-2,3\"\n");

        let unsafe_formatter = RowFormatter::configure(
            ["f", "g"],
            FormatConfig {
                spreadsheet_safe: false,
                ..FormatConfig::default()
            },
        )
        .unwrap();
        assert_eq!(
            unsafe_formatter.data_line(&event).unwrap(),
            "=1+1,\"-2,3\"\n"
        );
    }

    #[test]
    fn formats_serializable_values() {
        #[derive(Serialize)]
        struct Access<'a> {
            user: &'a str,
            status: u16,
        }
        let f = formatter(&["status", "user"]);
        let row = f
            .format_serialize(&Access { user: "ann", status: 404 }, true)
            .unwrap();
        assert_eq!(row.data, "404,ann\n");

        let mut map = BTreeMap::new();
        map.insert("user", "bob");
        assert_eq!(f.format_serialize(&map, true).unwrap().data, ",bob\n");
    }

    #[test]
    fn non_record_values_are_rejected() {
        let f = formatter(&["a"]);
        assert!(matches!(
            f.format_serialize(&vec![1, 2], false),
            Err(FormatError::NotARecord { found: "an array" })
        ));
        // Maps with non-string keys cannot become a JSON object
        let mut map = BTreeMap::new();
        map.insert(vec![1u8], "x");
        assert!(matches!(
            f.format_serialize(&map, false),
            Err(FormatError::Serialize(_))
        ));
    }

    #[test]
    fn formatter_is_shareable_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RowFormatter>();
    }
}
