//! The per-thread step loop.
//!
//! Every worker runs the same loop over its own row block:
//!
//! ```text
//! for step in 0..iterations:
//!     Computing         kernel over own block
//!     AwaitingBarrier1  all blocks written
//!     Coordinating      worker 0 only: swap / publish pivot, checkpoint, dump
//!     AwaitingBarrier2  serial step visible to everyone
//! Done
//! ```
//!
//! Any failure (kernel error, broken barrier, panic) records the first
//! cause in the shared run state, raises the cancellation flag and aborts the
//! barrier so that no peer blocks forever.

use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use blockgrid_core::{Cell, RowRange};
use thiserror::Error;
use tracing::{debug, trace};

use crate::barrier::{BarrierError, PhaseBarrier};
use crate::buffer::SharedGrid;
use crate::checkpoint::Checkpoint;
use crate::kernel::{KernelError, RowKernel};
use crate::metrics::WorkerReport;

/// `tracing` target for per-step grid dumps.
pub const DUMP_TARGET: &str = "blockgrid::dump";

/// Position of a worker within a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Spawned, loop not entered yet.
    Idle,
    /// Running the kernel.
    Computing,
    /// Waiting for every block to be written.
    AwaitingBarrier1,
    /// Worker 0 only: the serial step between the barriers.
    Coordinating,
    /// Waiting for the serial step to finish.
    AwaitingBarrier2,
    /// Loop exited.
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Idle => "idle",
            Phase::Computing => "computing",
            Phase::AwaitingBarrier1 => "awaiting the first barrier",
            Phase::Coordinating => "coordinating",
            Phase::AwaitingBarrier2 => "awaiting the second barrier",
            Phase::Done => "done",
        })
    }
}

/// How a worker's loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// Every requested step completed.
    Completed,
    /// The loop exited early at `step` while in `phase`.
    Cancelled {
        /// Step in progress.
        step: usize,
        /// Phase in progress.
        phase: Phase,
    },
}

/// What went wrong.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FailureCause {
    /// A barrier wait failed.
    #[error(transparent)]
    Barrier(#[from] BarrierError),
    /// The kernel returned an error.
    #[error(transparent)]
    Kernel(#[from] KernelError),
    /// The worker thread panicked.
    #[error("worker panicked")]
    Panicked,
}

/// The first failure of a run.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("worker {worker} failed at step {step} while {phase}: {cause}")]
pub struct WorkerFailure {
    /// Worker that failed.
    pub worker: usize,
    /// Step in progress.
    pub step: usize,
    /// Phase in progress.
    pub phase: Phase,
    /// Cause.
    pub cause: FailureCause,
}

// ── Shared run state ────────────────────────────────────────────

/// State shared by every worker of one run.
pub(crate) struct RunShared {
    pub(crate) barrier: PhaseBarrier,
    cancelled: AtomicBool,
    failure: Mutex<Option<WorkerFailure>>,
    pub(crate) iterations: usize,
    pub(crate) debug_dump: bool,
}

impl RunShared {
    pub(crate) fn new(workers: usize, iterations: usize, debug_dump: bool) -> Self {
        Self {
            barrier: PhaseBarrier::new(workers),
            cancelled: AtomicBool::new(false),
            failure: Mutex::new(None),
            iterations,
            debug_dump,
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Record `failure` if it is the first, then cancel.
    pub(crate) fn fail(&self, failure: WorkerFailure) {
        {
            let mut slot = self.failure.lock().unwrap_or_else(PoisonError::into_inner);
            if slot.is_none() {
                *slot = Some(failure);
            }
        }
        self.cancel();
    }

    /// Raise the flag and release every barrier waiter.
    pub(crate) fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.barrier.abort();
    }

    pub(crate) fn take_failure(&self) -> Option<WorkerFailure> {
        self.failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// Tracks the current step and phase; cancels the run if dropped
/// during a panic.
struct Progress<'a> {
    shared: &'a RunShared,
    worker: usize,
    step: usize,
    phase: Phase,
}

impl Progress<'_> {
    fn enter(&mut self, step: usize, phase: Phase) {
        self.step = step;
        self.phase = phase;
        trace!(worker = self.worker, step, %phase, "phase");
    }

    fn fail(&self, cause: FailureCause) -> WorkerOutcome {
        debug!(worker = self.worker, step = self.step, phase = %self.phase, %cause, "worker cancelling run");
        self.shared.fail(WorkerFailure {
            worker: self.worker,
            step: self.step,
            phase: self.phase,
            cause,
        });
        self.cancelled()
    }

    fn cancelled(&self) -> WorkerOutcome {
        WorkerOutcome::Cancelled {
            step: self.step,
            phase: self.phase,
        }
    }
}

impl Drop for Progress<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.shared.fail(WorkerFailure {
                worker: self.worker,
                step: self.step,
                phase: self.phase,
                cause: FailureCause::Panicked,
            });
        }
    }
}

// ── Worker ──────────────────────────────────────────────────────

/// One worker thread's state.
pub(crate) struct Worker<'a, T, K: ?Sized, W: Write> {
    id: usize,
    rows: RowRange,
    grid: &'a SharedGrid<T>,
    kernel: &'a K,
    shared: &'a RunShared,
    checkpoint: Option<Checkpoint<W>>,
}

impl<'a, T, K, W> Worker<'a, T, K, W>
where
    T: Cell,
    K: RowKernel<T> + ?Sized,
    W: Write,
{
    pub(crate) fn new(
        id: usize,
        rows: RowRange,
        grid: &'a SharedGrid<T>,
        kernel: &'a K,
        shared: &'a RunShared,
        checkpoint: Option<Checkpoint<W>>,
    ) -> Self {
        Self {
            id,
            rows,
            grid,
            kernel,
            shared,
            checkpoint,
        }
    }

    fn is_leader(&self) -> bool {
        self.id == 0
    }

    /// Run the loop. Returns the report and, for worker 0, the
    /// checkpoint sink so the coordinator can close it.
    pub(crate) fn run(mut self) -> (WorkerReport, Option<Checkpoint<W>>) {
        let mut progress = Progress {
            shared: self.shared,
            worker: self.id,
            step: 0,
            phase: Phase::Idle,
        };
        debug!(worker = self.id, start = self.rows.start, count = self.rows.count, "worker started");

        let mut compute = Duration::ZERO;
        let mut completed = 0;
        let outcome = 'steps: {
            for step in 0..self.shared.iterations {
                progress.enter(step, Phase::Computing);
                if self.shared.is_cancelled() {
                    break 'steps progress.cancelled();
                }
                let start = Instant::now();
                let result = self.grid.sweep(self.id, step, self.kernel);
                compute += start.elapsed();
                if let Err(e) = result {
                    break 'steps progress.fail(e.into());
                }

                progress.enter(step, Phase::AwaitingBarrier1);
                if let Err(e) = self.shared.barrier.wait() {
                    break 'steps progress.fail(e.into());
                }

                if self.is_leader() {
                    progress.enter(step, Phase::Coordinating);
                    self.coordinate(step);
                }

                progress.enter(step, Phase::AwaitingBarrier2);
                if let Err(e) = self.shared.barrier.wait() {
                    break 'steps progress.fail(e.into());
                }
                completed += 1;
            }
            WorkerOutcome::Completed
        };
        progress.enter(completed, Phase::Done);

        let report = WorkerReport {
            id: self.id,
            rows: self.rows,
            compute,
            iterations_completed: completed,
            outcome,
        };
        (report, self.checkpoint.take())
    }

    /// The serial step, run by worker 0 between the barriers.
    fn coordinate(&mut self, step: usize) {
        self.grid.advance(step);
        let want_checkpoint = self.checkpoint.as_ref().is_some_and(Checkpoint::is_active);
        if !want_checkpoint && !self.shared.debug_dump {
            return;
        }

        let current = self.grid.current();
        if let Some(checkpoint) = self.checkpoint.as_mut() {
            checkpoint.append(&current, self.grid.rows());
        }
        if self.shared.debug_dump {
            debug!(target: DUMP_TARGET, step, "grid after step {step}:\n{current}");
        }
    }
}
