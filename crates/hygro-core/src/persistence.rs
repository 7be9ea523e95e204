//! Append-only CSV log: line formatting and the persistence worker.
//!
//! One file per application run, named after the start timestamp, with a
//! header line written at creation. The worker runs on its own execution
//! context and is fed through the one-slot hand-off so a slow medium can
//! never block sampling.

use core::fmt::Write as _;
use core::sync::atomic::Ordering;

use heapless::String;
use log::{debug, error};

use crate::controller::{AppShared, LogCommand};
use crate::measurement::{DateTime, Measurement};

/// Header line written once when a log file is created.
pub const LOG_HEADER: &str = "Timestamp,Temperature (C),Humidity (%)\n";

/// Narrow collaborator interface for the storage medium.
pub trait LogSink {
    type Error: core::fmt::Debug;

    /// Append one already-formatted line to the current log file.
    fn append(&mut self, line: &str) -> Result<(), Self::Error>;
}

/// Format one log line: `YYYY-MM-DD HH:MM:SS,<temp:1dp>,<hum:0dp>\n`.
pub fn format_entry(m: &Measurement) -> String<64> {
    let mut line = String::new();
    let ts = m.timestamp;
    // A well-formed entry is at most ~30 bytes, so the write cannot fail.
    let _ = write!(
        line,
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02},{:.1},{:.0}\n",
        ts.year, ts.month, ts.day, ts.hour, ts.minute, ts.second, m.temperature, m.humidity
    );
    line
}

/// File name embedding the run's start timestamp:
/// `data_log_YYYYMMDD_HHMMSS.csv`.
pub fn log_file_name(start: &DateTime) -> String<32> {
    let mut name = String::new();
    let _ = write!(
        name,
        "data_log_{:04}{:02}{:02}_{:02}{:02}{:02}.csv",
        start.year, start.month, start.day, start.hour, start.minute, start.second
    );
    name
}

/// 8.3-constrained variant for FAT volumes: `MMDDHHMM.CSV`.
pub fn short_log_file_name(start: &DateTime) -> String<12> {
    let mut name = String::new();
    let _ = write!(
        name,
        "{:02}{:02}{:02}{:02}.CSV",
        start.month, start.day, start.hour, start.minute
    );
    name
}

/// Persistence worker loop.
///
/// Blocks on the hand-off signal, appends exactly one line per recorded
/// measurement, and exits once shutdown is signalled (or the running flag is
/// observed cleared on wake). A failed append is logged and dropped; the
/// measurement already reached the ring and the display.
pub async fn run_logger<S: LogSink>(shared: &AppShared, sink: &mut S) {
    loop {
        let command = shared.log_handoff.wait().await;
        if !shared.running.load(Ordering::Acquire) {
            break;
        }
        match command {
            LogCommand::Record(m) => {
                let line = format_entry(&m);
                match sink.append(&line) {
                    Ok(()) => debug!("measurement appended to log"),
                    Err(e) => error!("failed to append measurement to log: {e:?}"),
                }
            }
            LogCommand::Shutdown => break,
        }
    }
    shared.worker_done.signal(());
}
