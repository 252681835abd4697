//! Output module.
//!
//! The result sink streams open ports while the scan runs; the formatters
//! print the final summary as plain text, JSON, or CSV.

mod csv_format;
mod json_format;
mod plain;
mod sink;

pub use csv_format::write_csv;
pub use json_format::write_json;
pub use plain::{
    print_error, print_warning, scan_header, write_info, write_scan_header, write_summary,
};
pub use sink::{format_record, open_log, RecordSink, ResultSink};

use crate::cli::OutputFormat;
use crate::scanner::ScanSummary;
use std::io::{self, Write};

/// Write the scan summary to `out` in the requested format.
pub fn write_summary_as<W: Write>(
    out: W,
    summary: &ScanSummary,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Plain => write_summary(out, summary),
        OutputFormat::Json => write_json(out, summary),
        OutputFormat::Csv => write_csv(out, summary),
    }
}
