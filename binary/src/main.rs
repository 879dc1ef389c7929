//! `event-csv`: append newline-delimited JSON records to a CSV file

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::PathBuf,
};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use event_csv::{parse_record, CsvOutputConfig, Destination, DestinationWriter, QuotePolicy};
use tracing_subscriber::EnvFilter;

/// Write structured JSON records as CSV rows
#[derive(Parser, Debug)]
#[command(name = "event-csv", version, about, long_about = None)]
struct Cli {
    /// JSON configuration file (see --print-schema); flags below override its values
    #[arg(long, short, env = "EVENT_CSV_CONFIG")]
    config: Option<PathBuf>,

    /// CSV file rows are appended to
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Field reference for the next column (e.g. `foo` or `[nested][bar]`); repeat per column
    #[arg(long = "field", short = 'f', visible_alias = "fields")]
    fields: Vec<String>,

    /// Column separator; `\t`, `\r` and `\n` escapes are understood
    #[arg(long)]
    col_sep: Option<String>,

    /// Row separator; `\t`, `\r` and `\n` escapes are understood
    #[arg(long)]
    row_sep: Option<String>,

    /// Quoting policy
    #[arg(long, value_enum)]
    quote_policy: Option<QuotePolicyArg>,

    /// Write the field references as header row to new or empty files
    #[arg(long)]
    write_headers: bool,

    /// Explicit header labels, comma separated
    #[arg(long, value_delimiter = ',')]
    headers: Option<Vec<String>>,

    /// Do not escape values that spreadsheet applications would evaluate as formulas
    #[arg(long)]
    no_spreadsheet_safe: bool,

    /// Input file with one JSON record per line (default: stdin)
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// Print the JSON schema of the configuration file and exit
    #[arg(long)]
    print_schema: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum QuotePolicyArg {
    /// Quote cells containing separators, quotes or line breaks
    Minimal,
    /// Quote every cell
    All,
    /// Never quote
    None,
}

impl From<QuotePolicyArg> for QuotePolicy {
    fn from(arg: QuotePolicyArg) -> Self {
        match arg {
            QuotePolicyArg::Minimal => QuotePolicy::Minimal,
            QuotePolicyArg::All => QuotePolicy::All,
            QuotePolicyArg::None => QuotePolicy::None,
        }
    }
}

/// Replace the escapes `\t`, `\r`, `\n` and `\\` typed on a command line
fn unescape_separator(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

impl Cli {
    fn output_config(&self) -> anyhow::Result<CsvOutputConfig> {
        let mut config = match &self.config {
            Some(path) => CsvOutputConfig::from_json_path(path)
                .with_context(|| format!("loading configuration {}", path.display()))?,
            None => {
                let Some(output) = &self.output else {
                    bail!("either --config or --output is required");
                };
                CsvOutputConfig::new(output, Vec::<String>::new())
            }
        };
        if let Some(output) = &self.output {
            config.path = output.clone();
        }
        if !self.fields.is_empty() {
            config.fields = self.fields.clone();
        }
        if let Some(sep) = &self.col_sep {
            config.format.column_separator = unescape_separator(sep);
        }
        if let Some(sep) = &self.row_sep {
            config.format.row_separator = unescape_separator(sep);
        }
        if let Some(policy) = self.quote_policy {
            config.format.quote_policy = policy.into();
        }
        if self.write_headers {
            config.format.write_headers = true;
        }
        if let Some(labels) = &self.headers {
            config.format.header_labels = Some(labels.clone());
        }
        if self.no_spreadsheet_safe {
            config.format.spreadsheet_safe = false;
        }
        Ok(config)
    }
}

/// Append every JSON record line of `input`; returns the number of skipped lines
///
/// Lines that are not UTF-8, not JSON or not an object are logged and skipped. Blank lines
/// are ignored.
fn append_lines<R: BufRead, D: Destination>(
    input: R,
    writer: &mut DestinationWriter<D>,
) -> anyhow::Result<usize> {
    let mut skipped = 0usize;
    for (i, line) in input.split(b'\n').enumerate() {
        let mut line = line.context("reading input")?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        let line = match String::from_utf8(line) {
            Ok(line) => line,
            Err(e) => {
                skipped += 1;
                tracing::warn!(line = i + 1, error = %e, "skipping input line");
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match parse_record(&line) {
            Ok(record) => writer
                .write_record(&record)
                .with_context(|| format!("writing record from input line {}", i + 1))?,
            Err(e) => {
                skipped += 1;
                tracing::warn!(line = i + 1, error = %e, "skipping input line");
            }
        }
    }
    Ok(skipped)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.print_schema {
        let schema = schemars::schema_for!(CsvOutputConfig);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    let config = cli.output_config()?;
    let mut writer = config
        .open_writer()
        .context("invalid output configuration")?;
    tracing::info!(
        path = %config.path.display(),
        fields = config.fields.len(),
        "writing csv"
    );

    let input: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening input {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let skipped = append_lines(input, &mut writer)?;
    writer.flush()?;

    tracing::info!(
        rows = writer.rows_written(),
        skipped,
        path = %config.path.display(),
        "done"
    );
    Ok(())
}
