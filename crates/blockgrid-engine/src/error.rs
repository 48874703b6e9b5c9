//! Errors returned by [`Coordinator`](crate::Coordinator).

use std::io;

use blockgrid_core::GridError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::worker::WorkerFailure;

/// Why a run produced no usable result.
#[derive(Debug, Error)]
pub enum RunError {
    /// The configuration was rejected before spawning.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The OS refused to start every worker. The workers that did start
    /// were released and joined.
    #[error("spawned only {spawned} of {requested} workers")]
    Spawn {
        /// Workers requested.
        requested: usize,
        /// Workers started (and joined) before the failure.
        spawned: usize,
        /// The spawn error.
        #[source]
        source: io::Error,
    },
    /// One or more workers panicked. Their ids, in order.
    #[error("worker thread(s) {workers:?} panicked")]
    WorkerPanicked {
        /// Ids of the workers whose join failed.
        workers: Vec<usize>,
    },
    /// The run was cancelled; see
    /// [`RunOutput::require_complete`](crate::RunOutput::require_complete).
    #[error("run interrupted after {completed} of {requested} steps: {failure}")]
    Interrupted {
        /// Steps every worker completed.
        completed: usize,
        /// Steps requested.
        requested: usize,
        /// The first recorded failure.
        failure: WorkerFailure,
    },
    /// The grid could not be reassembled.
    #[error(transparent)]
    Grid(#[from] GridError),
}
