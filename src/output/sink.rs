//! Result sink for open-port records.
//!
//! Every open port produces one line on the interactive channel (stdout in
//! the binary) and one line on the durable log. Both writes for a record
//! happen under a single lock and the log is flushed before the lock is
//! released, so records from different workers never interleave.

use crate::banner::escape_banner;
use crate::scanner::ProbeOutcome;
use console::Style;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

/// Destination for probe outcomes produced by workers.
pub trait RecordSink: Sync {
    /// Record one outcome from `worker_id`. Closed ports produce no output.
    fn record(&self, outcome: &ProbeOutcome, worker_id: usize) -> io::Result<()>;
}

struct Channels<I, L> {
    interactive: I,
    log: L,
    recorded: usize,
}

/// Writes open-port records to an interactive channel and a durable log.
pub struct ResultSink<I, L> {
    channels: Mutex<Channels<I, L>>,
    color: bool,
}

impl<I: Write, L: Write> ResultSink<I, L> {
    /// Create a sink over the two channels. `color` only affects the
    /// interactive channel.
    pub fn new(interactive: I, log: L, color: bool) -> Self {
        Self {
            channels: Mutex::new(Channels {
                interactive,
                log,
                recorded: 0,
            }),
            color,
        }
    }

    /// Number of records fully written to the durable log.
    pub fn recorded(&self) -> usize {
        self.lock().recorded
    }

    /// Flush both channels and hand them back.
    pub fn finish(self) -> io::Result<(I, L)> {
        let mut channels = self
            .channels
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        channels.interactive.flush()?;
        channels.log.flush()?;
        Ok((channels.interactive, channels.log))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Channels<I, L>> {
        // A panic mid-record leaves at worst a partial line behind; keep going.
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<I: Write + Send, L: Write + Send> RecordSink for ResultSink<I, L> {
    fn record(&self, outcome: &ProbeOutcome, worker_id: usize) -> io::Result<()> {
        let Some(line) = format_record(outcome, worker_id) else {
            return Ok(());
        };

        let mut channels = self.lock();

        let shown = if self.color {
            let (head, tail) = line.split_at(head_len(&line));
            let green = Style::new().green().force_styling(true);
            writeln!(channels.interactive, "{}{}", green.apply_to(head), tail)
        } else {
            writeln!(channels.interactive, "{}", line)
        };
        let shown = shown.and_then(|()| channels.interactive.flush());

        let logged = writeln!(channels.log, "{}", line).and_then(|()| channels.log.flush());
        if logged.is_ok() {
            channels.recorded += 1;
        }

        shown.and(logged)
    }
}

const OPEN_MARKER: &str = " OPEN";

/// Format the plain-text line for an outcome, without colour codes.
///
/// Returns `None` for closed ports.
pub fn format_record(outcome: &ProbeOutcome, worker_id: usize) -> Option<String> {
    outcome.is_open().then(|| {
        format!(
            "[Worker {}] Port {}{}{}",
            worker_id,
            outcome.port(),
            OPEN_MARKER,
            record_tail(outcome)
        )
    })
}

/// Length of the `[Worker <id>] Port <port> OPEN` prefix of a record.
fn head_len(line: &str) -> usize {
    line.find(OPEN_MARKER)
        .map_or(line.len(), |at| at + OPEN_MARKER.len())
}

/// The optional ` - banner: ...` and ` (service)` parts of a record.
fn record_tail(outcome: &ProbeOutcome) -> String {
    let mut tail = String::new();

    if let Some(banner) = outcome.banner().map(escape_banner) {
        if !banner.is_empty() {
            tail.push_str(" - banner: ");
            tail.push_str(&banner);
        }
    }

    if let Some(service) = outcome.service().filter(|s| !s.is_empty()) {
        tail.push_str(" (");
        tail.push_str(service);
        tail.push(')');
    }

    tail
}

/// Open the durable log file, truncating it unless `append` is set.
pub fn open_log(path: &Path, append: bool) -> io::Result<BufWriter<File>> {
    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    Ok(BufWriter::new(options.open(path)?))
}
