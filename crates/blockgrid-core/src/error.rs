//! Error types shared across the blockgrid workspace.

use thiserror::Error;

/// Errors from constructing or reshaping a [`Grid`](crate::Grid).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// `rows` or `cols` is zero.
    #[error("grid dimensions must be non-zero (got {rows}x{cols})")]
    EmptyDimension {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },
    /// The flat buffer length does not equal `rows * cols`.
    #[error("buffer of {len} cells cannot form a {rows}x{cols} grid")]
    ShapeMismatch {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
        /// Actual buffer length.
        len: usize,
    },
    /// `rows * cols` overflows `usize`.
    #[error("grid dimensions {rows}x{cols} overflow the address space")]
    TooLarge {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },
}

/// Errors from the row [`partition`](crate::partition()) functions.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PartitionError {
    /// Zero workers were requested.
    #[error("worker count must be at least 1")]
    NoWorkers,
    /// More workers than rows: at least one row per worker is required.
    #[error("{workers} workers exceed the {rows} blockable rows")]
    TooManyWorkers {
        /// Requested worker count.
        workers: usize,
        /// Rows available for partitioning.
        rows: usize,
    },
    /// The worker id is not in `0..workers`.
    #[error("worker id {id} is out of range for {workers} workers")]
    WorkerOutOfRange {
        /// The offending id.
        id: usize,
        /// Worker count.
        workers: usize,
    },
    /// The grid has no rows left once the fixed halo rows are removed.
    #[error("grid of {rows} rows has no interior rows inside a halo of {halo}")]
    NoInterior {
        /// Total grid rows.
        rows: usize,
        /// Fixed rows at each edge.
        halo: usize,
    },
}
