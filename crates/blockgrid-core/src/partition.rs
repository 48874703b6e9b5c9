//! Balanced block decomposition of grid rows across workers.
//!
//! Worker `id` of `p` owns rows `block_low(id)..=block_high(id)` where
//!
//! ```text
//! block_low(id)  = id * n / p
//! block_high(id) = block_low(id + 1) - 1
//! ```
//!
//! Integer division spreads the remainder so that block sizes differ by
//! at most one, and every row in `0..n` belongs to exactly one block.

use std::ops::Range;

use crate::error::PartitionError;

/// A contiguous, half-open range of grid rows `[start, start + count)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RowRange {
    /// First row of the range.
    pub start: usize,
    /// Number of rows in the range.
    pub count: usize,
}

impl RowRange {
    /// Create a range of `count` rows starting at `start`.
    pub const fn new(start: usize, count: usize) -> Self {
        Self { start, count }
    }

    /// One past the last row.
    pub const fn end(&self) -> usize {
        self.start + self.count
    }

    /// Whether the range holds no rows.
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether `row` lies inside the range.
    pub const fn contains(&self, row: usize) -> bool {
        row >= self.start && row < self.end()
    }

    /// The rows as a `Range<usize>`, for iteration.
    pub const fn rows(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Shift the range down by `offset` rows.
    pub const fn offset(self, offset: usize) -> Self {
        Self {
            start: self.start + offset,
            count: self.count,
        }
    }
}

/// First row owned by worker `id` of `workers` over `rows` rows.
pub const fn block_low(id: usize, workers: usize, rows: usize) -> usize {
    id * rows / workers
}

/// Last row (inclusive) owned by worker `id` of `workers` over `rows` rows.
///
/// Underflows when the block is empty, which [`partition`] rules out by
/// requiring `workers <= rows`.
pub const fn block_high(id: usize, workers: usize, rows: usize) -> usize {
    block_low(id + 1, workers, rows) - 1
}

/// Number of rows owned by worker `id` of `workers` over `rows` rows.
pub const fn block_size(id: usize, workers: usize, rows: usize) -> usize {
    block_high(id, workers, rows) - block_low(id, workers, rows) + 1
}

/// Row range owned by worker `id` when `rows` rows are split across
/// `workers` workers.
///
/// Fails if `workers == 0`, `id >= workers`, or `workers > rows`.
pub fn partition(id: usize, workers: usize, rows: usize) -> Result<RowRange, PartitionError> {
    if workers == 0 {
        return Err(PartitionError::NoWorkers);
    }
    if workers > rows {
        return Err(PartitionError::TooManyWorkers { workers, rows });
    }
    if id >= workers {
        return Err(PartitionError::WorkerOutOfRange { id, workers });
    }
    Ok(RowRange::new(
        block_low(id, workers, rows),
        block_size(id, workers, rows),
    ))
}

/// Every worker's range in id order.
pub fn partition_all(workers: usize, rows: usize) -> Result<Vec<RowRange>, PartitionError> {
    (0..workers.max(1))
        .map(|id| partition(id, workers, rows))
        .collect()
}

/// Range of worker `id` over the interior of a grid with `grid_rows`
/// rows, skipping `halo` fixed rows at the top and at the bottom.
///
/// For the 9-point stencil `halo == 1`: the interior `1..=grid_rows - 2`
/// is partitioned and each result is offset by one.
pub fn partition_interior(
    id: usize,
    workers: usize,
    grid_rows: usize,
    halo: usize,
) -> Result<RowRange, PartitionError> {
    let interior = grid_rows
        .checked_sub(2 * halo)
        .filter(|&n| n > 0)
        .ok_or(PartitionError::NoInterior {
            rows: grid_rows,
            halo,
        })?;
    partition(id, workers, interior).map(|r| r.offset(halo))
}
