//! Output configuration
//!
//! A [`CsvOutputConfig`] bundles everything needed to write records to one CSV file. It is
//! usually loaded from a JSON document:
//!
//! ```json
//! {
//!   "path": "/var/log/export/requests.csv",
//!   "fields": ["@timestamp", "[http][status]", "message"],
//!   "csv_options": { "col_sep": ";", "write_headers": true },
//!   "header_check": "cached"
//! }
//! ```

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    core::{error::ConfigError, format_config::FormatConfig, row_formatter::RowFormatter},
    sink::{
        destination::FileDestination,
        destination_writer::{DestinationWriter, HeaderCheck},
    },
};

/// Configuration of a CSV file output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CsvOutputConfig {
    /// File rows are appended to
    pub path: PathBuf,
    /// Field references, in column order
    pub fields: Vec<String>,
    /// Formatting options
    #[serde(default, alias = "csv_options")]
    pub format: FormatConfig,
    /// How to find out whether the header still has to be written
    #[serde(default)]
    pub header_check: HeaderCheck,
}

impl CsvOutputConfig {
    /// Configuration with default formatting options
    pub fn new<I, S>(path: impl Into<PathBuf>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            format: FormatConfig::default(),
            header_check: HeaderCheck::default(),
        }
    }

    /// Parse a configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Validate the configuration and build the [`RowFormatter`]
    pub fn build_formatter(&self) -> Result<RowFormatter, ConfigError> {
        RowFormatter::configure(&self.fields, self.format.clone())
    }

    /// Validate the configuration and create a writer for [`CsvOutputConfig::path`]
    ///
    /// The file is not opened before the first record is written.
    pub fn open_writer(&self) -> Result<DestinationWriter<FileDestination>, ConfigError> {
        let formatter = Arc::new(self.build_formatter()?);
        Ok(
            DestinationWriter::new(formatter, FileDestination::new(&self.path))
                .with_header_check(self.header_check),
        )
    }
}
