//! CSV output formatting.

use crate::scanner::ScanSummary;
use std::io::{self, Write};

/// Write the summary as a header row plus one data row.
pub fn write_csv<W: Write>(out: W, summary: &ScanSummary) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.serialize(summary)?;
    wtr.flush()?;
    Ok(())
}

