//! The row-update kernel seam.
//!
//! A [`RowKernel`] is the only piece of domain logic the engine runs. Each
//! call updates one worker's block of rows for one step: it reads from a
//! [`RowSource`] and writes into a [`BlockMut`] that only exposes the rows
//! the calling worker owns.

use blockgrid_core::{Cell, Grid, RowRange};
use thiserror::Error;

/// How a kernel's reads and writes relate across steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Buffering {
    /// Step `t` reads the front buffer and writes the back buffer; the two
    /// swap roles after every step.
    DoubleBuffered,
    /// Step `t` updates a single buffer in place and may read only row
    /// `t` of the other workers' state (the pivot row), published by
    /// worker 0 between steps.
    InPlacePivot,
}

/// Static shape requirements declared by a kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KernelLayout {
    /// Buffering discipline.
    pub buffering: Buffering,
    /// Fixed rows at the top and at the bottom that are never written
    /// and are excluded from partitioning.
    pub halo: usize,
    /// Whether the grid must have `rows == cols`.
    pub square: bool,
}

impl KernelLayout {
    /// Rows available for partitioning in a grid with `rows` rows, or
    /// `None` if the halo leaves nothing.
    pub fn eligible_rows(&self, rows: usize) -> Option<usize> {
        rows.checked_sub(2 * self.halo).filter(|&n| n > 0)
    }
}

/// Read access to grid rows by absolute row index.
pub trait RowSource<T> {
    /// Row length.
    fn cols(&self) -> usize;

    /// Borrow row `row`.
    ///
    /// # Panics
    ///
    /// Panics if the row is not visible through this source.
    fn row(&self, row: usize) -> &[T];
}

impl<T: Cell> RowSource<T> for Grid<T> {
    fn cols(&self) -> usize {
        Grid::cols(self)
    }

    fn row(&self, row: usize) -> &[T] {
        Grid::row(self, row)
    }
}

/// Mutable view over one worker's contiguous block of rows.
///
/// Rows are addressed by their absolute index in the grid, so kernels do
/// not need to translate coordinates.
pub struct BlockMut<'a, T> {
    range: RowRange,
    cols: usize,
    cells: &'a mut [T],
}

impl<'a, T> BlockMut<'a, T> {
    /// Wrap `cells`, which must hold exactly `range.count * cols` values.
    ///
    /// # Panics
    ///
    /// Panics if the slice length does not match.
    pub fn new(range: RowRange, cols: usize, cells: &'a mut [T]) -> Self {
        assert_eq!(
            cells.len(),
            range.count * cols,
            "block of {} rows x {cols} cols needs {} cells",
            range.count,
            range.count * cols
        );
        Self { range, cols, cells }
    }

    /// Rows owned by this block.
    pub fn range(&self) -> RowRange {
        self.range
    }

    /// Row length.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Borrow row `row` (absolute index).
    ///
    /// # Panics
    ///
    /// Panics if `row` is outside [`range`](Self::range).
    pub fn row(&self, row: usize) -> &[T] {
        let off = self.offset(row);
        &self.cells[off..off + self.cols]
    }

    /// Mutably borrow row `row` (absolute index).
    ///
    /// # Panics
    ///
    /// Panics if `row` is outside [`range`](Self::range).
    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        let off = self.offset(row);
        &mut self.cells[off..off + self.cols]
    }

    /// All cells of the block, row-major.
    pub fn as_slice(&self) -> &[T] {
        self.cells
    }

    fn offset(&self, row: usize) -> usize {
        assert!(
            self.range.contains(row),
            "row {row} outside block {:?}",
            self.range
        );
        (row - self.range.start) * self.cols
    }
}

/// Errors a kernel may report from [`RowKernel::update`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum KernelError {
    /// An intermediate value did not fit the cell type.
    #[error("arithmetic overflow at row {row}, column {col}")]
    Overflow {
        /// Row of the offending cell.
        row: usize,
        /// Column of the offending cell.
        col: usize,
    },
    /// Any other kernel-specific failure.
    #[error("kernel failed: {reason}")]
    Failed {
        /// Human-readable description.
        reason: String,
    },
}

/// A stateless per-block update applied once per step.
///
/// Implementations must only depend on `src`, the current contents of
/// `dest`, and `step`; the engine relies on this to make parallel runs
/// bit-identical to a serial sweep.
pub trait RowKernel<T>: Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Shape requirements and buffering discipline.
    fn layout(&self) -> KernelLayout;

    /// Update every row of `dest` for step `step`.
    ///
    /// For [`Buffering::DoubleBuffered`] kernels `src` exposes the whole
    /// previous buffer. For [`Buffering::InPlacePivot`] kernels `src`
    /// exposes only row `step`.
    fn update(
        &self,
        src: &dyn RowSource<T>,
        dest: &mut BlockMut<'_, T>,
        step: usize,
    ) -> Result<(), KernelError>;
}
