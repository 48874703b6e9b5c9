//! Barrier-synchronized worker pool for iterative grid kernels.
//!
//! A run splits the rows of a [`Grid`](blockgrid_core::Grid) into one
//! contiguous block per worker and repeats, for a fixed number of steps:
//!
//! 1. every worker applies the [`RowKernel`] to its own block;
//! 2. all workers meet at a barrier;
//! 3. worker 0 performs the serial step (buffer swap or pivot publish,
//!    optional [`Checkpoint`] frame, optional debug dump);
//! 4. all workers meet at a second barrier.
//!
//! For deterministic kernels the result is bit-identical to a serial
//! sweep regardless of the worker count.
//!
//! Failures never leave threads blocked: a kernel error, a broken
//! barrier or a worker panic aborts the [`PhaseBarrier`], and the
//! [`Coordinator`] reports the run as [`RunStatus::Interrupted`] or
//! returns a [`RunError`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod barrier;
mod buffer;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod kernel;
pub mod metrics;
pub mod pool;
pub mod worker;

pub use barrier::{BarrierError, BarrierWaitResult, PhaseBarrier};
pub use checkpoint::{Checkpoint, CheckpointReport};
pub use config::{ConfigError, RunConfig};
pub use error::RunError;
pub use kernel::{BlockMut, Buffering, KernelError, KernelLayout, RowKernel, RowSource};
pub use metrics::{RunMetrics, RunOutput, RunStatus, WorkerReport};
pub use pool::{Coordinator, OsThreads, ThreadLauncher};
pub use worker::{FailureCause, Phase, WorkerFailure, WorkerOutcome, DUMP_TARGET};
