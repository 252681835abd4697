//! Command-line interface for portpool.
//!
//! Uses `clap` derive macros for declarative argument parsing. All
//! validation happens here, before the scanning engine is invoked.

use crate::config::{AppSettings, ScanConfig, ScanMode, MAX_WORKERS};
use crate::error::{CliError, CliResult, ScanError};
use crate::output::{self, ResultSink};
use crate::scanner::{self, ScanSummary};
use crate::types::{Port, PortRange};
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// A multithreaded TCP connect port scanner with banner grabbing.
#[derive(Parser, Debug)]
#[command(name = "portpool")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A multithreaded TCP port scanner", long_about = None)]
pub struct Args {
    /// Target IPv4 address
    #[arg(value_name = "IP")]
    pub target: Ipv4Addr,

    /// First port to scan [default: 1]
    #[arg(value_name = "START", requires = "end")]
    pub start: Option<Port>,

    /// Last port to scan [default: 1023]
    #[arg(value_name = "END")]
    pub end: Option<Port>,

    /// Number of worker threads, clamped to 1-5000 [default: 50]
    #[arg(value_name = "THREADS")]
    pub threads: Option<usize>,

    /// Connect only, skip banner grabbing
    #[arg(long, overrides_with = "full")]
    pub fast: bool,

    /// Connect and grab a banner from each open port
    #[arg(long, overrides_with = "fast")]
    pub full: bool,

    /// Timeout in milliseconds for connect and for the banner read [default: 200]
    #[arg(short = 't', long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// File receiving a copy of every open-port record [default: scan_results.txt]
    #[arg(short = 'o', long = "output-file", value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Append to the output file instead of truncating it
    #[arg(long)]
    pub append: bool,

    /// Format of the final summary
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,

    /// Verbose diagnostics on stderr
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only report errors on stderr, and skip the scan header
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to a settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Output format for the final summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl Args {
    /// Load settings from `--config`, or from the default location.
    pub fn settings(&self) -> CliResult<AppSettings> {
        let settings = match &self.config {
            Some(path) => AppSettings::load_from(path)?,
            None => AppSettings::load()?,
        };
        Ok(settings)
    }

    /// Scan mode from the flags, falling back to the settings default.
    pub fn mode(&self, settings: &AppSettings) -> ScanMode {
        if self.fast {
            ScanMode::Fast
        } else if self.full {
            ScanMode::Full
        } else {
            settings.default_mode
        }
    }

    /// Build the immutable scan configuration.
    pub fn scan_config(&self, settings: &AppSettings) -> CliResult<ScanConfig> {
        let range = match (self.start, self.end) {
            (Some(start), Some(end)) => PortRange::new(start, end)?,
            (None, None) => PortRange::default(),
            _ => {
                return Err(CliError::Other(
                    "START and END must be given together".to_string(),
                ))
            }
        };

        let threads = self.threads.unwrap_or(settings.default_workers);
        let timeout_ms = self.timeout.unwrap_or(settings.default_timeout_ms);

        Ok(ScanConfig::new(self.target, range)
            .with_workers(threads)
            .with_mode(self.mode(settings))
            .with_timeout(Duration::from_millis(timeout_ms))
            .with_max_banner_len(settings.max_banner_len))
    }

    pub fn output_file(&self, settings: &AppSettings) -> PathBuf {
        self.output_file
            .clone()
            .unwrap_or_else(|| settings.output_file.clone())
    }

    pub fn append(&self, settings: &AppSettings) -> bool {
        self.append || settings.append
    }

    /// Whether colour is wanted at all; the terminal check happens per channel.
    pub fn color(&self, settings: &AppSettings) -> bool {
        !self.no_color && settings.color
    }
}

/// Run a scan as described by the command line, on stdout and stderr.
pub fn execute(args: &Args) -> CliResult<ScanSummary> {
    execute_with(args, io::stdout(), io::stderr())
}

/// Run a scan, writing the header and summary to `out`.
///
/// Everything that can fail for configuration or resource reasons (settings,
/// ranges, the output file) is checked before any worker starts. Open-port
/// records share `out` in plain mode; for JSON and CSV they go to `diag` so
/// that `out` carries nothing but the summary.
pub fn execute_with<O, D>(args: &Args, mut out: O, mut diag: D) -> CliResult<ScanSummary>
where
    O: Write + Send,
    D: Write + Send,
{
    let settings = args.settings()?;
    let config = args.scan_config(&settings)?;
    debug!(?config, "resolved scan configuration");

    if args.threads.is_some_and(|t| t == 0 || t > MAX_WORKERS) {
        output::print_warning(&format!(
            "thread count clamped to {}",
            config.workers()
        ));
    }

    let path = args.output_file(&settings);
    let log = output::open_log(&path, args.append(&settings)).map_err(|source| {
        CliError::OutputFile {
            path: path.clone(),
            source,
        }
    })?;

    let plain = args.format == OutputFormat::Plain;
    let color = args.color(&settings)
        && if plain {
            console::colors_enabled()
        } else {
            console::colors_enabled_stderr()
        };

    if !args.quiet && plain {
        output::write_scan_header(&mut out, &config).map_err(ScanError::Io)?;
    }

    let summary = {
        let interactive: Box<dyn Write + Send + '_> = if plain {
            Box::new(&mut out)
        } else {
            Box::new(&mut diag)
        };
        let sink = ResultSink::new(interactive, log, color);

        let summary = scanner::run_scan(&config, &sink)?;
        sink.finish().map_err(|source| CliError::OutputFile {
            path: path.clone(),
            source,
        })?;
        summary
    };

    output::write_summary_as(&mut out, &summary, args.format).map_err(ScanError::Io)?;

    if !args.quiet && plain {
        output::write_info(&mut out, &format!("Results written to {}", path.display()))
            .map_err(ScanError::Io)?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::net::TcpListener;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("portpool").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["192.168.1.1"]);
        let config = args.scan_config(&AppSettings::default()).unwrap();

        assert_eq!(config.target(), Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(config.range(), PortRange::default());
        assert_eq!(config.workers(), 50);
        assert_eq!(config.mode(), ScanMode::Full);
        assert_eq!(config.timeout(), Duration::from_millis(200));
    }

    #[test]
    fn test_positional_range_and_threads() {
        let args = parse(&["10.0.0.5", "20", "25", "8", "--fast", "--timeout", "500"]);
        let config = args.scan_config(&AppSettings::default()).unwrap();

        assert_eq!(config.range().to_string(), "20-25");
        assert_eq!(config.workers(), 8);
        assert_eq!(config.mode(), ScanMode::Fast);
        assert_eq!(config.timeout(), Duration::from_millis(500));
    }

    #[test]
    fn test_threads_and_timeout_clamped() {
        let args = parse(&["10.0.0.5", "1", "10", "99999", "--timeout", "0"]);
        let config = args.scan_config(&AppSettings::default()).unwrap();

        assert_eq!(config.workers(), 5000);
        assert_eq!(config.timeout(), Duration::from_millis(1));
    }

    #[test]
    fn test_last_mode_flag_wins() {
        let settings = AppSettings::default();
        assert_eq!(parse(&["1.2.3.4", "--fast", "--full"]).mode(&settings), ScanMode::Full);
        assert_eq!(parse(&["1.2.3.4", "--full", "--fast"]).mode(&settings), ScanMode::Fast);
    }

    #[test]
    fn test_settings_supply_defaults() {
        let settings = AppSettings {
            default_workers: 300,
            default_mode: ScanMode::Fast,
            output_file: PathBuf::from("custom.log"),
            append: true,
            ..AppSettings::default()
        };
        let args = parse(&["1.2.3.4"]);
        let config = args.scan_config(&settings).unwrap();

        assert_eq!(config.workers(), 300);
        assert_eq!(config.mode(), ScanMode::Fast);
        assert_eq!(args.output_file(&settings), PathBuf::from("custom.log"));
        assert!(args.append(&settings));

        let args = parse(&["1.2.3.4", "-o", "other.log", "--full"]);
        assert_eq!(args.output_file(&settings), PathBuf::from("other.log"));
        assert_eq!(args.mode(&settings), ScanMode::Full);
    }

    #[test]
    fn test_invalid_arguments_rejected() {
        let try_parse = |argv: &[&str]| {
            Args::try_parse_from(std::iter::once("portpool").chain(argv.iter().copied()))
        };

        assert!(try_parse(&["999.1.1.1"]).is_err());
        assert!(try_parse(&["::1"]).is_err());
        assert!(try_parse(&["1.2.3.4", "0", "10"]).is_err());
        assert!(try_parse(&["1.2.3.4", "10", "70000"]).is_err());
        assert!(try_parse(&["1.2.3.4", "80"]).is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let args = parse(&["1.2.3.4", "82", "79"]);
        let err = args.scan_config(&AppSettings::default()).unwrap_err();
        assert!(matches!(err, CliError::Port(_)));
    }

    /// Scan a single listening loopback port with the given summary format.
    fn scan_listener(format: &str) -> (ScanSummary, Vec<u8>, String, String) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port().to_string();

        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("scan_results.txt");
        let settings = dir.path().join("settings.json");
        std::fs::write(&settings, "{}").unwrap();

        let args = parse(&[
            "127.0.0.1",
            port.as_str(),
            port.as_str(),
            "2",
            "--fast",
            "--no-color",
            "--format",
            format,
            "-o",
            log.to_str().unwrap(),
            "--config",
            settings.to_str().unwrap(),
        ]);

        let mut out = Vec::new();
        let mut diag = Vec::new();
        let summary = execute_with(&args, &mut out, &mut diag).unwrap();
        drop(listener);

        let logged = std::fs::read_to_string(&log).unwrap();
        (summary, out, String::from_utf8(diag).unwrap(), logged)
    }

    #[test]
    fn test_json_stdout_is_only_the_summary() {
        let (summary, out, diag, logged) = scan_listener("json");
        assert_eq!(summary.open_ports, 1);

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["open_ports"], 1);
        assert_eq!(value["ports_scanned"], 1);

        assert_eq!(logged.lines().count(), 1);
        assert_eq!(diag, logged);
    }

    #[test]
    fn test_csv_stdout_is_only_the_summary() {
        let (_, out, diag, logged) = scan_listener("csv");

        let mut reader = csv::Reader::from_reader(out.as_slice());
        let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "127.0.0.1");
        assert_eq!(diag, logged);
    }

    #[test]
    fn test_plain_output_streams_records_before_summary() {
        let (_, out, diag, logged) = scan_listener("plain");
        let out = String::from_utf8(out).unwrap();

        assert!(diag.is_empty());
        let record = out.find(logged.trim_end()).unwrap();
        let summary = out.find("Scan complete.").unwrap();
        assert!(record < summary);
        assert!(out.contains("Scanning 127.0.0.1 (ports "));
    }
}
