//! Banner rendering.
//!
//! Banners are raw bytes read from an untrusted peer. They are kept as bytes
//! in probe outcomes and only turned into text here, with anything that is
//! not printable ASCII escaped so it can't corrupt a terminal or a log line.

use std::fmt::Write;

/// Render raw banner bytes as a single escaped line.
///
/// Trailing ASCII whitespace (typically the service's line terminator) is
/// dropped. Printable ASCII is kept as-is; `\r`, `\n`, `\t`, and `\\` use
/// their usual escapes and every other byte becomes `\xNN`.
pub fn escape_banner(data: &[u8]) -> String {
    let data = data.trim_ascii_end();
    let mut out = String::with_capacity(data.len());

    for &b in data {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\r' => out.push_str("\\r"),
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            b' ' => out.push(' '),
            b if b.is_ascii_graphic() => out.push(b as char),
            b => {
                let _ = write!(out, "\\x{:02x}", b);
            }
        }
    }

    out
}
