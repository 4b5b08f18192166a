#![forbid(unsafe_code)]

//! NDJSON snapshot recorder.
//!
//! Writes one JSON object per line. The first line is a header
//! `{"type":"header","version":1,"timestamp":<unix secs>}`, followed by
//! `snapshot` records (one per [`Snapshot`], with `time` in seconds since the
//! recorder was created) and `status` records for every run state change.
//!
//! The recorder is a [`Presenter`], so it can sit directly behind the
//! controller or be fanned out to from another presenter. Presenter
//! callbacks cannot fail; the first I/O error is kept, later records are
//! dropped, and the error is returned from [`SnapshotRecorder::finish`].

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::{info, trace, warn};

use crate::controller::{Highlight, Presenter, RunState, Snapshot};
use crate::step::Step;

/// Format version written in the header line.
pub const RECORD_VERSION: u32 = 1;

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Record<'a> {
    Header {
        version: u32,
        timestamp: u64,
    },
    Snapshot {
        time: f64,
        seq: u64,
        step: &'a Option<Step>,
        array: &'a [u32],
        highlights: &'a [Highlight],
    },
    Status {
        time: f64,
        state: RunState,
    },
}

/// Records snapshots and status changes as NDJSON.
#[derive(Debug)]
pub struct SnapshotRecorder<W: Write> {
    output: W,
    start: Instant,
    records: u64,
    error: Option<io::Error>,
    path: Option<PathBuf>,
}

impl SnapshotRecorder<BufWriter<File>> {
    /// Create a recorder writing to a new file at `path`.
    pub fn create(path: &Path) -> io::Result<Self> {
        let writer = BufWriter::new(File::create(path)?);
        let recorder = Self::build(writer, unix_timestamp()?, Some(path.to_path_buf()))?;
        info!(path = ?path, "snapshot recording started");
        Ok(recorder)
    }
}

impl<W: Write> SnapshotRecorder<W> {
    /// Create a recorder writing to `output`.
    ///
    /// `timestamp` is seconds since the UNIX epoch, used in the header.
    pub fn with_writer(output: W, timestamp: u64) -> io::Result<Self> {
        let recorder = Self::build(output, timestamp, None)?;
        info!(timestamp, "snapshot recording started");
        Ok(recorder)
    }

    /// Records written so far, header excluded.
    #[must_use]
    pub const fn record_count(&self) -> u64 {
        self.records
    }

    /// Flush and return the inner writer, or the first error encountered.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.output.flush()?;
        info!(
            path = ?self.path,
            records = self.records,
            duration_secs = self.start.elapsed().as_secs_f64(),
            "snapshot recording complete"
        );
        Ok(self.output)
    }

    fn build(mut output: W, timestamp: u64, path: Option<PathBuf>) -> io::Result<Self> {
        write_record(
            &mut output,
            &Record::Header {
                version: RECORD_VERSION,
                timestamp,
            },
        )?;
        Ok(Self {
            output,
            start: Instant::now(),
            records: 0,
            error: None,
            path,
        })
    }

    fn record(&mut self, record: &Record<'_>) {
        if self.error.is_some() {
            return;
        }
        match write_record(&mut self.output, record) {
            Ok(()) => {
                self.records += 1;
                trace!(records = self.records, "record written");
            }
            Err(err) => {
                warn!(error = %err, "snapshot recording failed; dropping further records");
                self.error = Some(err);
            }
        }
    }
}

impl<W: Write> Presenter for SnapshotRecorder<W> {
    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        let time = self.start.elapsed().as_secs_f64();
        self.record(&Record::Snapshot {
            time,
            seq: snapshot.seq,
            step: &snapshot.step,
            array: &snapshot.array,
            highlights: &snapshot.highlights,
        });
    }

    fn on_status_change(&mut self, state: RunState) {
        let time = self.start.elapsed().as_secs_f64();
        self.record(&Record::Status { time, state });
    }
}

fn write_record<W: Write>(output: &mut W, record: &Record<'_>) -> io::Result<()> {
    serde_json::to_writer(&mut *output, record).map_err(io::Error::other)?;
    output.write_all(b"\n")
}

fn unix_timestamp() -> io::Result<u64> {
    let since_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| io::Error::other("system time before unix epoch"))?;
    Ok(since_epoch.as_secs())
}
