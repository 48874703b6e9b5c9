//! Timing and outcome of a run.

use std::time::Duration;

use blockgrid_core::{Grid, RowRange};

use crate::checkpoint::CheckpointReport;
use crate::error::RunError;
use crate::worker::{WorkerFailure, WorkerOutcome};

/// What one worker did, collected at join.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerReport {
    /// Worker id.
    pub id: usize,
    /// Rows the worker owned.
    pub rows: RowRange,
    /// Wall-clock time spent inside the kernel.
    pub compute: Duration,
    /// Steps that passed both barriers.
    pub iterations_completed: usize,
    /// How the loop ended.
    pub outcome: WorkerOutcome,
}

/// Timing for one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunMetrics {
    /// Per-worker reports in id order.
    pub workers: Vec<WorkerReport>,
    /// Steps requested.
    pub iterations_requested: usize,
    /// Steps every worker completed.
    pub iterations_completed: usize,
    /// Critical-path compute time: the maximum over workers.
    pub compute: Duration,
    /// Wall time from validation to the last join.
    pub wall: Duration,
}

impl RunMetrics {
    pub(crate) fn from_reports(workers: Vec<WorkerReport>, requested: usize, wall: Duration) -> Self {
        let compute = workers.iter().map(|w| w.compute).max().unwrap_or_default();
        let iterations_completed = workers
            .iter()
            .map(|w| w.iterations_completed)
            .min()
            .unwrap_or(0);
        Self {
            workers,
            iterations_requested: requested,
            iterations_completed,
            compute,
            wall,
        }
    }

    /// Wall time not spent on the critical compute path.
    pub fn other(&self) -> Duration {
        self.wall.saturating_sub(self.compute)
    }

    /// Sum of all workers' compute time.
    pub fn busy_total(&self) -> Duration {
        self.workers.iter().map(|w| w.compute).sum()
    }
}

/// Whether a run finished every step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// All requested steps completed.
    Completed,
    /// A worker failed and the run was cancelled.
    Interrupted {
        /// Steps every worker completed before the failure.
        completed: usize,
        /// The first failure recorded.
        failure: WorkerFailure,
    },
}

/// Result of [`Coordinator::run`](crate::Coordinator::run).
#[derive(Debug)]
pub struct RunOutput<T> {
    /// Final grid. Partial if the run was interrupted.
    pub grid: Grid<T>,
    /// Timing.
    pub metrics: RunMetrics,
    /// Completion status.
    pub status: RunStatus,
    /// Checkpoint outcome, if one was attached.
    pub checkpoint: Option<CheckpointReport>,
}

impl<T> RunOutput<T> {
    /// Whether every requested step completed.
    pub fn is_complete(&self) -> bool {
        self.status == RunStatus::Completed
    }

    /// Turn an interrupted run into [`RunError::Interrupted`].
    pub fn require_complete(self) -> Result<Self, RunError> {
        match self.status {
            RunStatus::Completed => Ok(self),
            RunStatus::Interrupted { completed, failure } => Err(RunError::Interrupted {
                completed,
                requested: self.metrics.iterations_requested,
                failure,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: usize, ms: u64, done: usize) -> WorkerReport {
        WorkerReport {
            id,
            rows: RowRange::new(id, 1),
            compute: Duration::from_millis(ms),
            iterations_completed: done,
            outcome: WorkerOutcome::Completed,
        }
    }

    #[test]
    fn compute_is_critical_path() {
        let m = RunMetrics::from_reports(
            vec![report(0, 10, 4), report(1, 30, 4), report(2, 20, 4)],
            4,
            Duration::from_millis(50),
        );
        assert_eq!(m.compute, Duration::from_millis(30));
        assert_eq!(m.busy_total(), Duration::from_millis(60));
        assert_eq!(m.other(), Duration::from_millis(20));
        assert_eq!(m.iterations_completed, 4);
    }

    #[test]
    fn completed_is_the_slowest_worker() {
        let m = RunMetrics::from_reports(
            vec![report(0, 1, 3), report(1, 1, 2)],
            5,
            Duration::ZERO,
        );
        assert_eq!(m.iterations_completed, 2);
        assert_eq!(m.other(), Duration::ZERO);
    }
}
