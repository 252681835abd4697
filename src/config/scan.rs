//! Immutable scan configuration.
//!
//! A `ScanConfig` is built once before the pool starts and then shared by
//! reference with every worker, the probe, and the result sink.

use crate::types::PortRange;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::time::Duration;

/// Lower bound on the number of workers.
pub const MIN_WORKERS: usize = 1;
/// Upper bound on the number of workers, which also bounds concurrent sockets.
pub const MAX_WORKERS: usize = 5000;
/// Default number of workers.
pub const DEFAULT_WORKERS: usize = 50;
/// Default per-operation timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 200;
/// Default maximum number of banner bytes captured per open port.
pub const DEFAULT_MAX_BANNER_LEN: usize = 512;
/// Largest banner buffer a probe will allocate.
pub const MAX_BANNER_LEN: usize = 64 * 1024;

/// How much work a probe does after a successful connect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Connect only.
    Fast,
    /// Connect, then read a banner.
    #[default]
    Full,
}

impl ScanMode {
    /// Whether a banner read follows a successful connect.
    pub fn grabs_banner(self) -> bool {
        matches!(self, Self::Full)
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fast => write!(f, "fast"),
            Self::Full => write!(f, "full"),
        }
    }
}

impl FromStr for ScanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "full" => Ok(Self::Full),
            _ => Err(format!("unknown scan mode: {}", s)),
        }
    }
}

/// Configuration for a scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    target: Ipv4Addr,
    range: PortRange,
    workers: usize,
    mode: ScanMode,
    timeout: Duration,
    max_banner_len: usize,
}

impl ScanConfig {
    /// Create a configuration with default workers, mode, and timeout.
    pub fn new(target: Ipv4Addr, range: PortRange) -> Self {
        Self {
            target,
            range,
            workers: DEFAULT_WORKERS,
            mode: ScanMode::default(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_banner_len: DEFAULT_MAX_BANNER_LEN,
        }
    }

    /// Set the worker count, clamped to `[MIN_WORKERS, MAX_WORKERS]`.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.clamp(MIN_WORKERS, MAX_WORKERS);
        self
    }

    /// Set the scan mode.
    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the per-operation timeout. Anything below one millisecond becomes one millisecond.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout.max(Duration::from_millis(1));
        self
    }

    /// Set the banner size limit, clamped to `[1, MAX_BANNER_LEN]`.
    pub fn with_max_banner_len(mut self, len: usize) -> Self {
        self.max_banner_len = len.clamp(1, MAX_BANNER_LEN);
        self
    }

    pub fn target(&self) -> Ipv4Addr {
        self.target
    }

    pub fn range(&self) -> PortRange {
        self.range
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Timeout applied separately to connect and to the banner read.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_banner_len(&self) -> usize {
        self.max_banner_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Port;

    fn localhost_config() -> ScanConfig {
        let range = PortRange::new(Port::new(1).unwrap(), Port::new(1023).unwrap()).unwrap();
        ScanConfig::new(Ipv4Addr::LOCALHOST, range)
    }

    #[test]
    fn test_defaults() {
        let config = localhost_config();
        assert_eq!(config.workers(), 50);
        assert_eq!(config.mode(), ScanMode::Full);
        assert_eq!(config.timeout(), Duration::from_millis(200));
        assert_eq!(config.max_banner_len(), 512);
    }

    #[test]
    fn test_worker_clamping() {
        assert_eq!(localhost_config().with_workers(0).workers(), 1);
        assert_eq!(localhost_config().with_workers(10_000).workers(), 5000);
        assert_eq!(localhost_config().with_workers(250).workers(), 250);
    }

    #[test]
    fn test_timeout_floor() {
        let config = localhost_config().with_timeout(Duration::ZERO);
        assert_eq!(config.timeout(), Duration::from_millis(1));
    }

    #[test]
    fn test_banner_len_clamping() {
        assert_eq!(localhost_config().with_max_banner_len(0).max_banner_len(), 1);
        assert_eq!(
            localhost_config().with_max_banner_len(usize::MAX).max_banner_len(),
            MAX_BANNER_LEN
        );
        assert_eq!(localhost_config().with_max_banner_len(2048).max_banner_len(), 2048);
    }

    #[test]
    fn test_scan_mode_parsing() {
        assert_eq!("fast".parse::<ScanMode>().unwrap(), ScanMode::Fast);
        assert_eq!("FULL".parse::<ScanMode>().unwrap(), ScanMode::Full);
        assert!("stealth".parse::<ScanMode>().is_err());
        assert!(!ScanMode::Fast.grabs_banner());
        assert!(ScanMode::Full.grabs_banner());
    }
}
