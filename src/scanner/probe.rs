//! TCP connect probe.
//!
//! Performs one blocking connect per port using the operating system's
//! socket API, optionally followed by a single bounded banner read. There
//! are no retries: a transient failure and a closed port look the same.

use crate::config::{ScanConfig, ScanMode, MAX_BANNER_LEN};
use crate::error::{ScanError, ScanResult};
use crate::services::service_name;
use crate::types::Port;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::io::Read;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tracing::trace;

/// Outcome of probing a single port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Connection refused, timed out, or otherwise failed.
    Closed { port: Port },
    /// Connected, but no banner was read (fast mode, timeout, or EOF).
    OpenNoData {
        port: Port,
        service: Option<&'static str>,
    },
    /// Connected and captured up to the banner limit in raw bytes.
    OpenWithBanner {
        port: Port,
        banner: Vec<u8>,
        service: Option<&'static str>,
    },
}

impl ProbeOutcome {
    /// The probed port.
    pub fn port(&self) -> Port {
        match self {
            Self::Closed { port }
            | Self::OpenNoData { port, .. }
            | Self::OpenWithBanner { port, .. } => *port,
        }
    }

    /// Check if the port accepted the connection.
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed { .. })
    }

    /// Service label for open ports, if the port is well known.
    pub fn service(&self) -> Option<&'static str> {
        match self {
            Self::Closed { .. } => None,
            Self::OpenNoData { service, .. } | Self::OpenWithBanner { service, .. } => *service,
        }
    }

    /// Raw banner bytes, if any were captured.
    pub fn banner(&self) -> Option<&[u8]> {
        match self {
            Self::OpenWithBanner { banner, .. } => Some(banner),
            _ => None,
        }
    }
}

/// Something that can probe one port of a fixed target.
///
/// The worker pool is generic over this so it can be driven without a
/// network in tests.
pub trait Prober: Sync {
    /// Probe a single port.
    ///
    /// `Err` means the attempt was abandoned before a connection could be
    /// tried (for example, no socket could be created).
    fn probe(&self, port: Port) -> ScanResult<ProbeOutcome>;
}

/// Prober backed by real TCP connects.
#[derive(Debug, Clone)]
pub struct TcpProber {
    target: Ipv4Addr,
    mode: ScanMode,
    timeout: Duration,
    max_banner_len: usize,
}

impl TcpProber {
    /// Create a prober for the target, mode, timeout, and banner limit of `config`.
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            target: config.target(),
            mode: config.mode(),
            timeout: config.timeout(),
            max_banner_len: config.max_banner_len(),
        }
    }
}

impl Prober for TcpProber {
    fn probe(&self, port: Port) -> ScanResult<ProbeOutcome> {
        probe(
            self.target,
            port,
            self.mode,
            self.timeout,
            self.max_banner_len,
        )
    }
}

/// Probe `target:port` once.
///
/// `timeout` applies to the connect and, in full mode, separately to the
/// banner read, so a full probe can take up to twice `timeout`. At most
/// `max_banner_len` bytes of banner are kept. The socket is closed when this
/// function returns, on every path.
pub fn probe(
    target: Ipv4Addr,
    port: Port,
    mode: ScanMode,
    timeout: Duration,
    max_banner_len: usize,
) -> ScanResult<ProbeOutcome> {
    let addr = SocketAddr::from((target, port.as_u16()));
    let socket = open_socket(timeout)?;

    if let Err(e) = attempt_connect(&socket, addr, timeout) {
        trace!(%port, error = %e, "port closed");
        return Ok(ProbeOutcome::Closed { port });
    }

    let service = service_name(port.as_u16());

    if !mode.grabs_banner() {
        return Ok(ProbeOutcome::OpenNoData { port, service });
    }

    match read_banner(&socket, max_banner_len) {
        Some(banner) => Ok(ProbeOutcome::OpenWithBanner {
            port,
            banner,
            service,
        }),
        None => Ok(ProbeOutcome::OpenNoData { port, service }),
    }
}

/// Create an IPv4 stream socket with read and write timeouts set.
fn open_socket(timeout: Duration) -> ScanResult<Socket> {
    let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))
        .map_err(ScanError::SocketCreate)?;
    socket
        .set_read_timeout(Some(timeout))
        .map_err(ScanError::SocketCreate)?;
    socket
        .set_write_timeout(Some(timeout))
        .map_err(ScanError::SocketCreate)?;
    Ok(socket)
}

fn attempt_connect(socket: &Socket, addr: SocketAddr, timeout: Duration) -> ScanResult<()> {
    socket
        .connect_timeout(&SockAddr::from(addr), timeout)
        .map_err(ScanError::Connect)
}

/// Single read of at most `limit` bytes (capped at `MAX_BANNER_LEN`). Zero
/// bytes, a timeout, or an error all mean no banner.
fn read_banner(mut socket: &Socket, limit: usize) -> Option<Vec<u8>> {
    let mut buffer = vec![0u8; limit.clamp(1, MAX_BANNER_LEN)];
    match socket.read(&mut buffer) {
        Ok(n) if n > 0 => {
            buffer.truncate(n);
            Some(buffer)
        }
        Ok(_) => None,
        Err(e) => {
            trace!(error = %e, "no banner");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::TcpListener;
    use std::thread;

    const TIMEOUT: Duration = Duration::from_millis(200);

    fn port(n: u16) -> Port {
        Port::new(n).unwrap()
    }

    /// A loopback port with nothing listening on it.
    fn closed_port() -> Port {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let n = listener.local_addr().unwrap().port();
        drop(listener);
        port(n)
    }

    /// A listener that writes `greeting` to the first `accepts` clients.
    fn greeting_listener(greeting: &'static [u8], accepts: usize) -> Port {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let n = listener.local_addr().unwrap().port();
        thread::spawn(move || {
            for stream in listener.incoming().take(accepts) {
                if let Ok(mut stream) = stream {
                    let _ = stream.write_all(greeting);
                }
            }
        });
        port(n)
    }

    #[test]
    fn test_closed_port_is_closed_every_time() {
        let p = closed_port();
        for _ in 0..2 {
            let outcome = probe(Ipv4Addr::LOCALHOST, p, ScanMode::Full, TIMEOUT, 512).unwrap();
            assert_eq!(outcome, ProbeOutcome::Closed { port: p });
            assert!(!outcome.is_open());
            assert_eq!(outcome.service(), None);
        }
    }

    #[test]
    fn test_silent_service_is_open_without_data() {
        // Connections complete in the backlog without ever being accepted.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let p = port(listener.local_addr().unwrap().port());

        for _ in 0..2 {
            let outcome = probe(Ipv4Addr::LOCALHOST, p, ScanMode::Full, TIMEOUT, 512).unwrap();
            assert!(matches!(outcome, ProbeOutcome::OpenNoData { .. }));
        }
        drop(listener);
    }

    #[test]
    fn test_full_mode_captures_banner() {
        let p = greeting_listener(b"hi\n", 1);
        let outcome = probe(Ipv4Addr::LOCALHOST, p, ScanMode::Full, TIMEOUT, 512).unwrap();
        assert_eq!(outcome.port(), p);
        assert_eq!(outcome.banner(), Some(&b"hi\n"[..]));
    }

    #[test]
    fn test_fast_mode_skips_banner() {
        let p = greeting_listener(b"hi\n", 1);
        let outcome = probe(Ipv4Addr::LOCALHOST, p, ScanMode::Fast, TIMEOUT, 512).unwrap();
        assert!(matches!(outcome, ProbeOutcome::OpenNoData { .. }));
        assert_eq!(outcome.banner(), None);
    }

    #[test]
    fn test_banner_truncated_to_limit() {
        let p = greeting_listener(b"0123456789abcdef", 1);
        let outcome = probe(Ipv4Addr::LOCALHOST, p, ScanMode::Full, TIMEOUT, 4).unwrap();
        assert_eq!(outcome.banner(), Some(&b"0123"[..]));
    }

    #[test]
    fn test_oversized_banner_limit_is_capped() {
        let p = greeting_listener(b"SSH-2.0-test\r\n", 1);
        let outcome = probe(Ipv4Addr::LOCALHOST, p, ScanMode::Full, TIMEOUT, usize::MAX).unwrap();
        assert_eq!(outcome.banner(), Some(&b"SSH-2.0-test\r\n"[..]));
    }

    #[test]
    fn test_tcp_prober_uses_config() {
        let p = greeting_listener(b"220 ready\r\n", 1);
        let range = crate::types::PortRange::single(p);
        let config = ScanConfig::new(Ipv4Addr::LOCALHOST, range).with_mode(ScanMode::Full);
        let prober = TcpProber::new(&config);

        let outcome = prober.probe(p).unwrap();
        assert!(outcome.is_open());
        assert!(outcome.banner().is_some());
    }
}
