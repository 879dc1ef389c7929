//! Formatting options for delimited output

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;

/// When cells are wrapped in quote characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuotePolicy {
    /// Quote every cell
    #[serde(alias = "quote_all")]
    All,
    /// Quote only cells containing the column separator, the row separator, the quote
    /// character or a line break
    #[default]
    #[serde(alias = "quote_minimal")]
    Minimal,
    /// Never quote, cells are written verbatim
    #[serde(alias = "quote_none")]
    None,
}

/// Immutable set of options controlling how rows are rendered
///
/// All options have defaults, so a configuration document only needs to list what differs:
///
/// ```
/// use event_csv::{FormatConfig, QuotePolicy};
///
/// let config: FormatConfig = serde_json::from_str(r#"{"col_sep": "\t", "row_sep": "\r\n"}"#).unwrap();
/// assert_eq!(config.column_separator, "\t");
/// assert_eq!(config.row_separator, "\r\n");
/// assert_eq!(config.quote_policy, QuotePolicy::Minimal);
/// assert!(config.spreadsheet_safe);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct FormatConfig {
    /// Text between two cells (default: `,`)
    #[serde(alias = "col_sep")]
    pub column_separator: String,
    /// Text terminating every row, including the header row (default: `\n`)
    #[serde(alias = "row_sep")]
    pub row_separator: String,
    /// Character used to quote cells; doubled when it occurs inside a quoted cell
    #[serde(alias = "quote_char")]
    pub quote: char,
    /// When to quote cells
    pub quote_policy: QuotePolicy,
    /// Write a header row (the field references) to new or empty destinations
    pub write_headers: bool,
    /// Explicit header labels, one per field; implies writing a header
    #[serde(alias = "headers")]
    pub header_labels: Option<Vec<String>>,
    /// Neutralize spreadsheet formulas by prefixing string values starting with `=`, `+`, `-`
    /// or `@` with an apostrophe
    pub spreadsheet_safe: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            column_separator: ",".to_string(),
            row_separator: "\n".to_string(),
            quote: '"',
            quote_policy: QuotePolicy::default(),
            write_headers: false,
            header_labels: None,
            spreadsheet_safe: true,
        }
    }
}

impl FormatConfig {
    /// `true` if a header row should be written to new or empty destinations
    pub fn headers_requested(&self) -> bool {
        self.write_headers || self.header_labels.is_some()
    }

    /// Check the option combination independently of any field list
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.column_separator.is_empty() {
            return Err(ConfigError::EmptySeparator {
                option: "column_separator",
            });
        }
        if self.row_separator.is_empty() {
            return Err(ConfigError::EmptySeparator {
                option: "row_separator",
            });
        }
        if self.column_separator == self.row_separator {
            return Err(ConfigError::SeparatorsCollide {
                separator: self.column_separator.clone(),
            });
        }
        if self.column_separator.contains(self.quote) {
            return Err(ConfigError::QuoteInSeparator {
                quote: self.quote,
                option: "column separator",
            });
        }
        if self.row_separator.contains(self.quote) {
            return Err(ConfigError::QuoteInSeparator {
                quote: self.quote,
                option: "row separator",
            });
        }
        Ok(())
    }

    /// `true` if `cell` must be quoted under [`QuotePolicy::Minimal`]
    ///
    /// Any character of a separator counts, not only the whole separator: with `||` a cell
    /// ending in `|` would otherwise merge with the following separator.
    pub fn needs_quotes(&self, cell: &str) -> bool {
        cell.chars().any(|c| {
            c == '\r'
                || c == '\n'
                || c == self.quote
                || self.column_separator.contains(c)
                || self.row_separator.contains(c)
        })
    }

    /// Append a single cell to `line`, quoting it according to the [`QuotePolicy`]
    pub fn push_cell(&self, line: &mut String, cell: &str) {
        let quoted = match self.quote_policy {
            QuotePolicy::All => true,
            QuotePolicy::Minimal => self.needs_quotes(cell),
            QuotePolicy::None => false,
        };
        if !quoted {
            line.push_str(cell);
            return;
        }
        line.push(self.quote);
        for c in cell.chars() {
            if c == self.quote {
                line.push(self.quote);
            }
            line.push(c);
        }
        line.push(self.quote);
    }

    /// Render `cells` as one complete line, terminated by the row separator
    pub fn encode_line<I, S>(&self, cells: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut line = String::new();
        for (i, cell) in cells.into_iter().enumerate() {
            if i > 0 {
                line.push_str(&self.column_separator);
            }
            self.push_cell(&mut line, cell.as_ref());
        }
        line.push_str(&self.row_separator);
        line
    }
}
