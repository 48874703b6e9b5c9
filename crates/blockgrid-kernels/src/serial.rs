//! Single-threaded reference sweeps.
//!
//! These use the same row functions as the engine kernels but none of
//! the engine machinery, so they serve both as the serial programs and
//! as the baseline that parallel runs are compared against.

use blockgrid_core::Grid;
use blockgrid_engine::KernelError;

use crate::floyd::relax_row;
use crate::stencil::average_row;

/// Run all `n` pivot steps of shortest-path relaxation in place.
pub fn shortest_paths(grid: &mut Grid<i32>) -> Result<(), KernelError> {
    let n = grid.rows();
    shortest_paths_steps(grid, n)
}

/// Run the first `steps` pivot steps (clamped to the row count).
pub fn shortest_paths_steps(grid: &mut Grid<i32>, steps: usize) -> Result<(), KernelError> {
    let steps = steps.min(grid.rows());
    let mut pivot = Vec::with_capacity(grid.cols());
    for k in 0..steps {
        pivot.clear();
        pivot.extend_from_slice(grid.row(k));
        for i in 0..grid.rows() {
            relax_row(i, grid.row_mut(i), &pivot, k)?;
        }
    }
    Ok(())
}

/// Run `iterations` stencil sweeps, calling `on_step(t, &grid)` after
/// each one, and return the final grid.
pub fn stencil<F>(grid: Grid<f64>, iterations: usize, mut on_step: F) -> Grid<f64>
where
    F: FnMut(usize, &Grid<f64>),
{
    let rows = grid.rows();
    let mut front = grid;
    let mut back = front.clone();
    for t in 0..iterations {
        for i in 1..rows.saturating_sub(1) {
            average_row(
                back.row_mut(i),
                front.row(i - 1),
                front.row(i),
                front.row(i + 1),
            );
        }
        std::mem::swap(&mut front, &mut back);
        on_step(t, &front);
    }
    front
}
