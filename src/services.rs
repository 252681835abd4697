//! Service labels for well-known port numbers.
//!
//! Purely informational: labels are attached to open-port records and
//! never influence scanning.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Static map of well-known ports to service labels.
static PORT_SERVICES: LazyLock<HashMap<u16, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    m.insert(20, "FTP");
    m.insert(21, "FTP");
    m.insert(22, "SSH");
    m.insert(23, "Telnet");
    m.insert(25, "SMTP");
    m.insert(53, "DNS");
    m.insert(80, "HTTP");
    m.insert(110, "POP3");
    m.insert(111, "RPCbind");
    m.insert(135, "MSRPC");
    m.insert(139, "NetBIOS");
    m.insert(143, "IMAP");
    m.insert(389, "LDAP");
    m.insert(443, "HTTPS");
    m.insert(445, "SMB");
    m.insert(465, "SMTPS");
    m.insert(587, "Submission");
    m.insert(636, "LDAPS");
    m.insert(993, "IMAPS");
    m.insert(995, "POP3S");
    m.insert(1433, "MSSQL");
    m.insert(1521, "Oracle");
    m.insert(2049, "NFS");
    m.insert(3306, "MySQL");
    m.insert(3389, "RDP");
    m.insert(5432, "PostgreSQL");
    m.insert(5900, "VNC");
    m.insert(6379, "Redis");
    m.insert(8080, "HTTP-Proxy");
    m.insert(8443, "HTTPS-Alt");
    m.insert(27017, "MongoDB");

    m
});

/// Look up the service label for a port.
///
/// Returns `None` if the port is not in the table; callers omit the label
/// entirely rather than printing a placeholder.
pub fn service_name(port: u16) -> Option<&'static str> {
    PORT_SERVICES.get(&port).copied()
}
