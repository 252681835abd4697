//! Plain text output formatting.

use crate::config::ScanConfig;
use crate::scanner::ScanSummary;
use console::style;
use std::io::{self, Write};

/// Write the end-of-scan timing statistics.
pub fn write_summary<W: Write>(mut out: W, summary: &ScanSummary) -> io::Result<()> {
    writeln!(out, "Scan complete.")?;
    writeln!(
        out,
        "Open ports: {} of {} scanned",
        summary.open_ports, summary.ports_scanned
    )?;
    if summary.abandoned_ports > 0 {
        writeln!(out, "Abandoned ports: {}", summary.abandoned_ports)?;
    }
    writeln!(out, "Total scan time: {:.2} seconds", summary.duration_secs())?;
    writeln!(out, "Ports per second: {:.2}", summary.ports_per_second)?;
    Ok(())
}

/// The line announcing a scan before it starts.
pub fn scan_header(config: &ScanConfig) -> String {
    let range = config.range();
    format!(
        "Scanning {} (ports {}-{}) with {} threads, mode={}, timeout={} ms...",
        config.target(),
        range.start(),
        range.end(),
        config.workers(),
        config.mode(),
        config.timeout().as_millis()
    )
}

/// Write the scan header before scanning begins.
pub fn write_scan_header<W: Write>(mut out: W, config: &ScanConfig) -> io::Result<()> {
    writeln!(out, "{}", style(scan_header(config)).cyan())
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Write an info message.
pub fn write_info<W: Write>(mut out: W, msg: &str) -> io::Result<()> {
    writeln!(out, "{} {}", style("ℹ").blue().bold(), msg)
}
