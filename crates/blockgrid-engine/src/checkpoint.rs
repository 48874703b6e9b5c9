//! Best-effort stream of full-grid snapshots.
//!
//! A [`Checkpoint`] appends one frame per call: every row of the grid,
//! each cell encoded with [`Cell::encode_le`], with no header or
//! separator. The first frame is the initial grid, so a run of `n`
//! iterations produces `n + 1` frames.
//!
//! A write failure never aborts the computation. The sink logs a
//! warning, drops the writer, and turns every later
//! [`append`](Checkpoint::append) into a no-op. The outcome is reported
//! by [`close`](Checkpoint::close).

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use blockgrid_core::Cell;
use tracing::warn;

use crate::kernel::RowSource;

/// Summary of a checkpoint stream after [`Checkpoint::close`].
#[derive(Debug)]
pub struct CheckpointReport {
    /// Frames fully written before the stream closed or failed.
    pub frames_written: usize,
    /// Payload bytes handed to the writer.
    pub bytes_written: u64,
    /// `Some(n)` if the sink was disabled after `n` complete frames.
    pub disabled_after: Option<usize>,
    /// The error that disabled the sink.
    pub error: Option<io::Error>,
}

impl CheckpointReport {
    /// Whether every append (and the final flush) succeeded.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Append-only snapshot writer.
pub struct Checkpoint<W: Write> {
    sink: Option<W>,
    scratch: Vec<u8>,
    frames: usize,
    bytes: u64,
    error: Option<io::Error>,
}

impl Checkpoint<BufWriter<File>> {
    /// Create (or truncate) the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> Checkpoint<W> {
    /// Wrap an arbitrary writer.
    pub fn new(sink: W) -> Self {
        Self {
            sink: Some(sink),
            scratch: Vec::new(),
            frames: 0,
            bytes: 0,
            error: None,
        }
    }

    /// Whether appends still reach the writer.
    pub fn is_active(&self) -> bool {
        self.sink.is_some()
    }

    /// Frames written so far.
    pub fn frames_written(&self) -> usize {
        self.frames
    }

    /// Append rows `0..rows` of `src` as one frame.
    ///
    /// Returns `false` if the sink is (or just became) disabled.
    pub fn append<T, S>(&mut self, src: &S, rows: usize) -> bool
    where
        T: Cell,
        S: RowSource<T> + ?Sized,
    {
        let Some(sink) = self.sink.as_mut() else {
            return false;
        };
        match write_frame(sink, &mut self.scratch, &mut self.bytes, src, rows) {
            Ok(()) => {
                self.frames += 1;
                true
            }
            Err(e) => {
                self.disable(e);
                false
            }
        }
    }

    /// Flush the writer and report.
    pub fn close(mut self) -> CheckpointReport {
        if let Some(mut sink) = self.sink.take() {
            if let Err(e) = sink.flush() {
                self.error = Some(e);
                warn!(
                    frames_written = self.frames,
                    "checkpoint flush failed; trailing frames may be incomplete"
                );
            }
        }
        CheckpointReport {
            frames_written: self.frames,
            bytes_written: self.bytes,
            disabled_after: self.error.as_ref().map(|_| self.frames),
            error: self.error,
        }
    }

    fn disable(&mut self, e: io::Error) {
        warn!(
            frames_written = self.frames,
            error = %e,
            "checkpoint write failed; disabling checkpoint output"
        );
        self.sink = None;
        self.error = Some(e);
    }
}

fn write_frame<T, S, W>(
    sink: &mut W,
    scratch: &mut Vec<u8>,
    written: &mut u64,
    src: &S,
    rows: usize,
) -> io::Result<()>
where
    T: Cell,
    S: RowSource<T> + ?Sized,
    W: Write,
{
    for r in 0..rows {
        scratch.clear();
        for &cell in src.row(r) {
            cell.encode_le(scratch);
        }
        sink.write_all(scratch)?;
        *written += scratch.len() as u64;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockgrid_core::Grid;

    /// Accepts `limit` bytes, then fails every write.
    struct Capped {
        buf: Vec<u8>,
        limit: usize,
    }

    impl Write for Capped {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            if self.buf.len() + data.len() > self.limit {
                return Err(io::Error::new(io::ErrorKind::StorageFull, "disk full"));
            }
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn grid() -> Grid<f64> {
        Grid::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap()
    }

    #[test]
    fn frames_are_headerless_row_major() {
        let mut buf = Vec::new();
        let mut cp = Checkpoint::new(&mut buf);
        assert!(cp.append(&grid(), 2));
        assert!(cp.append(&grid(), 2));
        let report = cp.close();
        assert!(report.is_complete());
        assert_eq!(report.frames_written, 2);
        assert_eq!(report.bytes_written, 64);
        assert_eq!(report.disabled_after, None);

        assert_eq!(buf.len(), 64);
        assert_eq!(&buf[0..8], &1.0f64.to_le_bytes());
        assert_eq!(&buf[24..32], &4.0f64.to_le_bytes());
        assert_eq!(&buf[32..40], &1.0f64.to_le_bytes());
    }

    #[test]
    fn failure_disables_later_appends() {
        let mut cp = Checkpoint::new(Capped {
            buf: Vec::new(),
            limit: 40,
        });
        assert!(cp.append(&grid(), 2));
        assert!(!cp.append(&grid(), 2));
        assert!(!cp.is_active());
        assert!(!cp.append(&grid(), 2));

        let report = cp.close();
        assert_eq!(report.frames_written, 1);
        assert_eq!(report.bytes_written, 32);
        assert_eq!(report.disabled_after, Some(1));
        assert_eq!(
            report.error.map(|e| e.kind()),
            Some(io::ErrorKind::StorageFull)
        );
    }

    #[test]
    fn open_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all.raw");
        let mut cp = Checkpoint::open(&path).unwrap();
        cp.append(&grid(), 2);
        assert!(cp.close().is_complete());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 32);
    }

    #[test]
    fn open_reports_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Checkpoint::open(dir.path().join("missing").join("x.raw")).is_err());
    }
}
