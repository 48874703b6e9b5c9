//! All-pairs shortest paths by pairwise relaxation over a pivot row.
//!
//! The grid is an `n × n` adjacency matrix of `i32` weights where
//! [`NO_EDGE`] marks a missing edge and `0` marks a node's distance to
//! itself. Step `k` relaxes every entry through intermediate node `k`:
//!
//! ```text
//! skip if d[i][j] == 0, d[i][k] == NO_EDGE or d[k][j] == NO_EDGE
//! d[i][j] = d[i][j] > 0 ? min(d[i][j], d[i][k] + d[k][j])
//!                       : d[i][k] + d[k][j]
//! ```
//!
//! After `n` steps every entry holds the shortest path length, or
//! [`NO_EDGE`] if the target is unreachable.

use blockgrid_engine::{BlockMut, Buffering, KernelError, KernelLayout, RowKernel, RowSource};

/// Weight marking "no edge" / "unreachable".
pub const NO_EDGE: i32 = -1;

/// Relax `row` (row `i` of the matrix) through pivot `k`.
///
/// `pivot` is row `k` as it was at the start of the step. Fails with
/// [`KernelError::Overflow`] if a path sum does not fit in `i32`.
pub fn relax_row(i: usize, row: &mut [i32], pivot: &[i32], k: usize) -> Result<(), KernelError> {
    for j in 0..row.len() {
        let (d_ij, d_ik, d_kj) = (row[j], row[k], pivot[j]);
        if d_ij == 0 || d_ik == NO_EDGE || d_kj == NO_EDGE {
            continue;
        }
        let through = d_ik
            .checked_add(d_kj)
            .ok_or(KernelError::Overflow { row: i, col: j })?;
        row[j] = if d_ij > 0 { d_ij.min(through) } else { through };
    }
    Ok(())
}

/// The shortest-path kernel: in place, one pivot per step, square grid.
#[derive(Clone, Copy, Debug, Default)]
pub struct PairwiseRelaxation;

impl PairwiseRelaxation {
    /// Layout declared to the engine.
    pub const LAYOUT: KernelLayout = KernelLayout {
        buffering: Buffering::InPlacePivot,
        halo: 0,
        square: true,
    };
}

impl RowKernel<i32> for PairwiseRelaxation {
    fn name(&self) -> &str {
        "pairwise-relaxation"
    }

    fn layout(&self) -> KernelLayout {
        Self::LAYOUT
    }

    fn update(
        &self,
        src: &dyn RowSource<i32>,
        dest: &mut BlockMut<'_, i32>,
        step: usize,
    ) -> Result<(), KernelError> {
        let pivot = src.row(step);
        for i in dest.range().rows() {
            relax_row(i, dest.row_mut(i), pivot, step)?;
        }
        Ok(())
    }
}
