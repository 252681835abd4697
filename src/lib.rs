//! # portpool - A Multithreaded TCP Port Scanner
//!
//! portpool determines which ports of an IPv4 host accept a TCP connection,
//! optionally reading the first bytes each service sends, by probing many
//! ports in parallel on a fixed pool of OS threads.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use portpool::config::{ScanConfig, ScanMode};
//! use portpool::output::ResultSink;
//! use portpool::scanner::run_scan;
//! use portpool::types::{Port, PortRange};
//! use std::net::Ipv4Addr;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let range = PortRange::new(Port::new(1).unwrap(), Port::new(1023).unwrap())?;
//! let config = ScanConfig::new(Ipv4Addr::new(192, 168, 1, 1), range)
//!     .with_workers(200)
//!     .with_mode(ScanMode::Full)
//!     .with_timeout(Duration::from_millis(300));
//!
//! let sink = ResultSink::new(std::io::stdout(), Vec::new(), false);
//! let summary = run_scan(&config, &sink)?;
//! println!("{} open ports", summary.open_ports);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - `Port` and `PortRange` newtypes
//! - [`config`] - the immutable `ScanConfig` and user settings
//! - [`scanner`] - work queue, probe, worker pool, and `run_scan`
//! - [`output`] - the result sink and summary formatters
//! - [`banner`] - escaping of raw banner bytes
//! - [`services`] - well-known port labels
//! - [`cli`] - command-line front end
//! - [`error`] - error types

pub mod banner;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use config::{ScanConfig, ScanMode};
pub use error::{CliError, ScanError};
pub use output::{RecordSink, ResultSink};
pub use scanner::{run_scan, ProbeOutcome, ScanSummary};
pub use types::{Port, PortRange};
