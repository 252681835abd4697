//! Configuration for portpool.
//!
//! `ScanConfig` is the immutable per-run configuration; `AppSettings`
//! holds user defaults loaded from an XDG-compliant settings file.

mod scan;
mod settings;

pub use scan::{
    ScanConfig, ScanMode, DEFAULT_MAX_BANNER_LEN, DEFAULT_TIMEOUT_MS, DEFAULT_WORKERS,
    MAX_BANNER_LEN, MAX_WORKERS, MIN_WORKERS,
};
pub use settings::{AppSettings, Paths, DEFAULT_OUTPUT_FILE};
