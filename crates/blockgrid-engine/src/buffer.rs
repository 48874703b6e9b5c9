//! Coordinator-owned grid storage shared by the worker pool.
//!
//! The grid is split into row segments, each behind its own `RwLock`:
//! an optional top halo, one segment per worker block, and an optional
//! bottom halo. During a step a worker holds the write lock of its own
//! segment only, so no two workers can ever write the same row.
//!
//! Two storage disciplines exist, selected by the kernel's
//! [`Buffering`]:
//!
//! - **Ping-pong**: two full buffers. Step `t` reads every segment of
//!   the front buffer and writes the worker's segment of the back
//!   buffer. Worker 0 flips `front` between the two barriers.
//! - **In place**: a single buffer plus a snapshot of the current pivot
//!   row. Step `t` reads only the snapshot of row `t`. Worker 0 copies
//!   row `t + 1` into the snapshot between the two barriers.
//!
//! Locks are never held across a barrier wait, so they are uncontended
//! except when worker 0 reads the whole buffer for a checkpoint.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use blockgrid_core::{Cell, Grid, GridError, RowRange};
use smallvec::SmallVec;

use crate::kernel::{BlockMut, Buffering, KernelError, KernelLayout, RowKernel, RowSource};

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

// ── Segmented buffer ────────────────────────────────────────────

struct Segment<T> {
    range: RowRange,
    cells: RwLock<Vec<T>>,
}

struct SegmentedBuffer<T> {
    rows: usize,
    cols: usize,
    segments: Vec<Segment<T>>,
}

impl<T: Cell> SegmentedBuffer<T> {
    fn split(grid: &Grid<T>, ranges: &[RowRange]) -> Self {
        let segments = ranges
            .iter()
            .map(|&range| Segment {
                range,
                cells: RwLock::new(grid.block(range).to_vec()),
            })
            .collect();
        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            segments,
        }
    }

    fn read(&self) -> GridReader<'_, T> {
        GridReader {
            rows: self.rows,
            cols: self.cols,
            segments: self
                .segments
                .iter()
                .map(|s| (s.range, read_lock(&s.cells)))
                .collect(),
        }
    }

    fn block_mut(&self, segment: usize) -> (RowRange, RwLockWriteGuard<'_, Vec<T>>) {
        let seg = &self.segments[segment];
        (seg.range, write_lock(&seg.cells))
    }

    fn copy_row(&self, row: usize, out: &mut Vec<T>) {
        let idx = self.segments.partition_point(|s| s.range.end() <= row);
        let seg = &self.segments[idx];
        let cells = read_lock(&seg.cells);
        let off = (row - seg.range.start) * self.cols;
        out.clear();
        out.extend_from_slice(&cells[off..off + self.cols]);
    }

    fn into_grid(self) -> Result<Grid<T>, GridError> {
        let mut data = Vec::with_capacity(self.rows * self.cols);
        for seg in self.segments {
            data.extend(seg.cells.into_inner().unwrap_or_else(PoisonError::into_inner));
        }
        Grid::from_vec(self.rows, self.cols, data)
    }
}

// ── Readers ─────────────────────────────────────────────────────

/// Read guards over every segment of one buffer.
///
/// Implements [`RowSource`] over absolute row indices and
/// [`Display`](fmt::Display) with the same layout as [`Grid`].
pub(crate) struct GridReader<'a, T> {
    rows: usize,
    cols: usize,
    segments: SmallVec<[(RowRange, RwLockReadGuard<'a, Vec<T>>); 8]>,
}

#[cfg(test)]
impl<T: Cell> GridReader<'_, T> {
    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Copy the buffer into an owned grid.
    pub fn to_grid(&self) -> Result<Grid<T>, GridError> {
        let mut data = Vec::with_capacity(self.rows * self.cols);
        for (_, cells) in &self.segments {
            data.extend_from_slice(cells);
        }
        Grid::from_vec(self.rows, self.cols, data)
    }
}

impl<T: Cell> RowSource<T> for GridReader<'_, T> {
    fn cols(&self) -> usize {
        self.cols
    }

    fn row(&self, row: usize) -> &[T] {
        let idx = self.segments.partition_point(|(range, _)| range.end() <= row);
        let (range, cells) = &self.segments[idx];
        let off = (row - range.start) * self.cols;
        &cells[off..off + self.cols]
    }
}

impl<T: Cell> fmt::Display for GridReader<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            for cell in self.row(r) {
                cell.fmt_cell(f)?;
                f.write_str("\t")?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

/// Snapshot of the row every in-place worker reads during one step.
pub(crate) struct PivotRow<T> {
    index: usize,
    cells: Vec<T>,
}

impl<T: Cell> RowSource<T> for PivotRow<T> {
    fn cols(&self) -> usize {
        self.cells.len()
    }

    fn row(&self, row: usize) -> &[T] {
        assert_eq!(
            row, self.index,
            "in-place step may only read the published pivot row"
        );
        &self.cells
    }
}

// ── Shared grid ─────────────────────────────────────────────────

enum Storage<T> {
    PingPong {
        buffers: [SegmentedBuffer<T>; 2],
        front: AtomicUsize,
    },
    InPlace {
        buffer: SegmentedBuffer<T>,
        pivot: RwLock<PivotRow<T>>,
    },
}

/// The grid pair for one run.
pub(crate) struct SharedGrid<T> {
    rows: usize,
    cols: usize,
    first_block: usize,
    storage: Storage<T>,
}

// Compile-time assertion: borrowed by every worker thread.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<SharedGrid<f64>>();
    assert::<SharedGrid<i32>>();
};

impl<T: Cell> SharedGrid<T> {
    /// Split `grid` into halo and worker segments.
    ///
    /// `blocks` must tile the rows between the halos in order.
    pub(crate) fn new(grid: Grid<T>, layout: KernelLayout, blocks: &[RowRange]) -> Self {
        let rows = grid.rows();
        let halo = layout.halo;
        let mut ranges = Vec::with_capacity(blocks.len() + 2);
        if halo > 0 {
            ranges.push(RowRange::new(0, halo));
        }
        ranges.extend_from_slice(blocks);
        if halo > 0 {
            ranges.push(RowRange::new(rows - halo, halo));
        }

        let storage = match layout.buffering {
            Buffering::DoubleBuffered => Storage::PingPong {
                buffers: [
                    SegmentedBuffer::split(&grid, &ranges),
                    SegmentedBuffer::split(&grid, &ranges),
                ],
                front: AtomicUsize::new(0),
            },
            Buffering::InPlacePivot => Storage::InPlace {
                pivot: RwLock::new(PivotRow {
                    index: 0,
                    cells: grid.row(0).to_vec(),
                }),
                buffer: SegmentedBuffer::split(&grid, &ranges),
            },
        };

        Self {
            rows,
            cols: grid.cols(),
            first_block: usize::from(halo > 0),
            storage,
        }
    }

    pub(crate) fn rows(&self) -> usize {
        self.rows
    }

    /// Run `kernel` for step `step` over worker `worker`'s block.
    pub(crate) fn sweep<K>(&self, worker: usize, step: usize, kernel: &K) -> Result<(), KernelError>
    where
        K: RowKernel<T> + ?Sized,
    {
        let segment = self.first_block + worker;
        match &self.storage {
            Storage::PingPong { buffers, front } => {
                let f = front.load(Ordering::Acquire);
                let src = buffers[f].read();
                let (range, mut cells) = buffers[1 - f].block_mut(segment);
                let mut dest = BlockMut::new(range, self.cols, &mut cells);
                kernel.update(&src, &mut dest, step)
            }
            Storage::InPlace { buffer, pivot } => {
                let pivot = read_lock(pivot);
                let (range, mut cells) = buffer.block_mut(segment);
                let mut dest = BlockMut::new(range, self.cols, &mut cells);
                kernel.update(&*pivot, &mut dest, step)
            }
        }
    }

    /// Serial step between the barriers: flip buffers or publish the
    /// next pivot row.
    pub(crate) fn advance(&self, step: usize) {
        match &self.storage {
            Storage::PingPong { front, .. } => {
                front.fetch_xor(1, Ordering::AcqRel);
            }
            Storage::InPlace { buffer, pivot } => {
                let next = step + 1;
                if next < self.rows {
                    let mut pivot = write_lock(pivot);
                    buffer.copy_row(next, &mut pivot.cells);
                    pivot.index = next;
                }
            }
        }
    }

    /// Read guards over the buffer holding the latest state.
    pub(crate) fn current(&self) -> GridReader<'_, T> {
        match &self.storage {
            Storage::PingPong { buffers, front } => buffers[front.load(Ordering::Acquire)].read(),
            Storage::InPlace { buffer, .. } => buffer.read(),
        }
    }

    /// Consume the pair and return the latest state.
    pub(crate) fn into_grid(self) -> Result<Grid<T>, GridError> {
        match self.storage {
            Storage::PingPong { buffers, front } => {
                let [a, b] = buffers;
                if front.into_inner() == 0 {
                    a.into_grid()
                } else {
                    b.into_grid()
                }
            }
            Storage::InPlace { buffer, .. } => buffer.into_grid(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Copies the row above into each owned row.
    struct ShiftDown;

    impl RowKernel<i32> for ShiftDown {
        fn name(&self) -> &str {
            "shift-down"
        }

        fn layout(&self) -> KernelLayout {
            KernelLayout {
                buffering: Buffering::DoubleBuffered,
                halo: 1,
                square: false,
            }
        }

        fn update(
            &self,
            src: &dyn RowSource<i32>,
            dest: &mut BlockMut<'_, i32>,
            _step: usize,
        ) -> Result<(), KernelError> {
            for r in dest.range().rows() {
                dest.row_mut(r).copy_from_slice(src.row(r - 1));
            }
            Ok(())
        }
    }

    /// Adds the pivot row to every owned row.
    struct AddPivot;

    impl RowKernel<i32> for AddPivot {
        fn name(&self) -> &str {
            "add-pivot"
        }

        fn layout(&self) -> KernelLayout {
            KernelLayout {
                buffering: Buffering::InPlacePivot,
                halo: 0,
                square: true,
            }
        }

        fn update(
            &self,
            src: &dyn RowSource<i32>,
            dest: &mut BlockMut<'_, i32>,
            step: usize,
        ) -> Result<(), KernelError> {
            let pivot = src.row(step).to_vec();
            for r in dest.range().rows() {
                for (c, p) in dest.row_mut(r).iter_mut().zip(&pivot) {
                    *c += p;
                }
            }
            Ok(())
        }
    }

    fn rows_grid(rows: usize, cols: usize) -> Grid<i32> {
        let data = (0..rows * cols).map(|i| (i / cols) as i32).collect();
        Grid::from_vec(rows, cols, data).unwrap()
    }

    #[test]
    fn reader_spans_every_segment() {
        let grid = rows_grid(5, 2);
        let blocks = [RowRange::new(1, 1), RowRange::new(2, 2)];
        let shared = SharedGrid::new(grid.clone(), ShiftDown.layout(), &blocks);
        let reader = shared.current();
        for r in 0..5 {
            assert_eq!(reader.row(r), grid.row(r));
        }
        assert_eq!(reader.rows(), 5);
        assert_eq!(reader.to_grid().unwrap(), grid);
        assert_eq!(reader.to_string(), grid.to_string());
    }

    #[test]
    fn ping_pong_writes_back_and_swaps() {
        let grid = rows_grid(5, 2);
        let blocks = [RowRange::new(1, 2), RowRange::new(3, 1)];
        let shared = SharedGrid::new(grid, ShiftDown.layout(), &blocks);

        shared.sweep(0, 0, &ShiftDown).unwrap();
        shared.sweep(1, 0, &ShiftDown).unwrap();
        // Front is untouched until the swap.
        assert_eq!(shared.current().row(3), &[3, 3]);
        shared.advance(0);

        let out = shared.into_grid().unwrap();
        let rows: Vec<i32> = out.iter_rows().map(|r| r[0]).collect();
        assert_eq!(rows, vec![0, 0, 1, 2, 4]);
    }

    #[test]
    fn in_place_publishes_next_pivot() {
        let grid = rows_grid(3, 3);
        let blocks = [RowRange::new(0, 2), RowRange::new(2, 1)];
        let shared = SharedGrid::new(grid, AddPivot.layout(), &blocks);

        // Step 0: add row 0 (all zeros).
        shared.sweep(0, 0, &AddPivot).unwrap();
        shared.sweep(1, 0, &AddPivot).unwrap();
        shared.advance(0);
        // Step 1: add row 1 (all ones).
        shared.sweep(0, 1, &AddPivot).unwrap();
        shared.sweep(1, 1, &AddPivot).unwrap();
        shared.advance(1);

        let out = shared.into_grid().unwrap();
        assert_eq!(out.row(0), &[1, 1, 1]);
        assert_eq!(out.row(1), &[2, 2, 2]);
        assert_eq!(out.row(2), &[3, 3, 3]);
    }

    #[test]
    fn advance_past_last_pivot_is_a_no_op() {
        let grid = rows_grid(2, 2);
        let blocks = [RowRange::new(0, 2)];
        let shared = SharedGrid::new(grid.clone(), AddPivot.layout(), &blocks);
        shared.advance(1);
        assert_eq!(shared.into_grid().unwrap(), grid);
    }

    #[test]
    #[should_panic(expected = "pivot row")]
    fn pivot_rejects_other_rows() {
        let pivot = PivotRow {
            index: 2,
            cells: vec![1i32, 2],
        };
        let _ = pivot.row(1);
    }
}
