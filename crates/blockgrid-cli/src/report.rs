//! Human-readable summaries printed at the end of a run.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Separator line around report blocks.
pub const RULE: &str = "------------------------------------------------------------------";

/// Overall, other and compute time for one program run.
///
/// `compute` is the sweep time (the slowest worker for a parallel run);
/// `other` is everything else: I/O, setup, checkpointing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingReport {
    /// Wall time from start of `main` to the end of the run.
    pub overall: Duration,
    /// Time spent in the sweeps.
    pub compute: Duration,
}

impl TimingReport {
    /// `overall - compute`, saturating at zero.
    pub fn other(&self) -> Duration {
        self.overall.saturating_sub(self.compute)
    }
}

impl fmt::Display for TimingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "[Overall Time] = {:.6} sec", self.overall.as_secs_f64())?;
        writeln!(f, "[Other Time] = {:.6} sec", self.other().as_secs_f64())?;
        writeln!(f, "[Compute Time] = {:.6} sec", self.compute.as_secs_f64())?;
        writeln!(f, "{RULE}")
    }
}

/// Size of a file on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileSize {
    /// The file.
    pub path: PathBuf,
    /// Length in bytes.
    pub bytes: u64,
}

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let gb = self.bytes as f64 / (1024.0 * 1024.0 * 1024.0);
        write!(
            f,
            "[{}] size = {}(B) = {:.6}(GB)",
            self.path.display(),
            self.bytes,
            gb
        )
    }
}

/// Stat `path`.
pub fn file_size(path: impl AsRef<Path>) -> io::Result<FileSize> {
    let path = path.as_ref();
    Ok(FileSize {
        path: path.to_path_buf(),
        bytes: std::fs::metadata(path)?.len(),
    })
}
