//! Run configuration and pre-spawn validation.

use std::num::NonZeroUsize;
use std::thread;

use blockgrid_core::{partition_interior, Cell, Grid, PartitionError, RowRange};
use thiserror::Error;

use crate::kernel::{Buffering, KernelLayout};

/// Errors detected before any worker is spawned.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `workers` is zero.
    #[error("worker count must be at least 1")]
    NoWorkers,
    /// More workers than rows available for partitioning.
    #[error("{workers} workers requested but only {eligible} rows can be partitioned")]
    TooManyWorkers {
        /// Requested worker count.
        workers: usize,
        /// Rows outside the halo.
        eligible: usize,
    },
    /// The kernel needs a square grid.
    #[error("kernel requires a square grid, got {rows}x{cols}")]
    NotSquare {
        /// Grid rows.
        rows: usize,
        /// Grid columns.
        cols: usize,
    },
    /// The halo leaves no rows to update.
    #[error("grid of {rows} rows has no rows inside a halo of {halo}")]
    NoInterior {
        /// Grid rows.
        rows: usize,
        /// Halo width.
        halo: usize,
    },
    /// An in-place pivot kernel was asked for more steps than it has
    /// pivot rows.
    #[error("{iterations} pivot steps requested for a grid of {rows} rows")]
    TooManySteps {
        /// Requested iterations.
        iterations: usize,
        /// Grid rows (one pivot per row).
        rows: usize,
    },
    /// Partitioning failed.
    #[error(transparent)]
    Partition(#[from] PartitionError),
}

/// Parameters of one engine run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// Number of worker threads.
    pub workers: usize,
    /// Number of steps to run. Zero returns the input unchanged.
    pub iterations: usize,
    /// Emit the whole grid through `tracing::debug!` after every step.
    pub debug_dump: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            workers: thread::available_parallelism().map_or(1, NonZeroUsize::get),
            iterations: 1,
            debug_dump: false,
        }
    }
}

impl RunConfig {
    /// `workers` threads running `iterations` steps, without dumps.
    pub fn new(workers: usize, iterations: usize) -> Self {
        Self {
            workers,
            iterations,
            debug_dump: false,
        }
    }

    /// Enable or disable per-step grid dumps.
    pub fn with_debug_dump(mut self, enabled: bool) -> Self {
        self.debug_dump = enabled;
        self
    }

    /// Check the configuration against a grid shape and kernel layout.
    pub fn validate<T: Cell>(&self, grid: &Grid<T>, layout: &KernelLayout) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        let (rows, cols) = (grid.rows(), grid.cols());
        if layout.square && rows != cols {
            return Err(ConfigError::NotSquare { rows, cols });
        }
        let eligible = layout
            .eligible_rows(rows)
            .ok_or(ConfigError::NoInterior {
                rows,
                halo: layout.halo,
            })?;
        if self.workers > eligible {
            return Err(ConfigError::TooManyWorkers {
                workers: self.workers,
                eligible,
            });
        }
        if layout.buffering == Buffering::InPlacePivot && self.iterations > rows {
            return Err(ConfigError::TooManySteps {
                iterations: self.iterations,
                rows,
            });
        }
        Ok(())
    }

    /// Validate, then compute every worker's row block in id order.
    pub fn plan<T: Cell>(
        &self,
        grid: &Grid<T>,
        layout: &KernelLayout,
    ) -> Result<Vec<RowRange>, ConfigError> {
        self.validate(grid, layout)?;
        (0..self.workers)
            .map(|id| partition_interior(id, self.workers, grid.rows(), layout.halo))
            .collect::<Result<_, _>>()
            .map_err(ConfigError::from)
    }
}
