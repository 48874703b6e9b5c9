//! 9-point averaging stencil over a grid with fixed edges.
//!
//! Every interior cell becomes the mean of itself and its eight
//! neighbours in the previous state. The first and last rows and columns
//! are never written, so they act as fixed boundary values.

use blockgrid_engine::{BlockMut, Buffering, KernelError, KernelLayout, RowKernel, RowSource};

/// Average the interior columns of one row into `dest`.
///
/// Columns `0` and `len - 1` of `dest` are left untouched. The sum order
/// is fixed (NW, N, NE, E, SE, S, SW, W, centre) so that every sweep,
/// serial or parallel, rounds identically.
pub fn average_row(dest: &mut [f64], above: &[f64], here: &[f64], below: &[f64]) {
    let cols = dest.len();
    for j in 1..cols.saturating_sub(1) {
        dest[j] = (above[j - 1]
            + above[j]
            + above[j + 1]
            + here[j + 1]
            + below[j + 1]
            + below[j]
            + below[j - 1]
            + here[j - 1]
            + here[j])
            / 9.0;
    }
}

/// The 9-point stencil kernel: double buffered, one fixed row each side.
#[derive(Clone, Copy, Debug, Default)]
pub struct NinePointStencil;

impl NinePointStencil {
    /// Layout declared to the engine.
    pub const LAYOUT: KernelLayout = KernelLayout {
        buffering: Buffering::DoubleBuffered,
        halo: 1,
        square: false,
    };
}

impl RowKernel<f64> for NinePointStencil {
    fn name(&self) -> &str {
        "nine-point-stencil"
    }

    fn layout(&self) -> KernelLayout {
        Self::LAYOUT
    }

    fn update(
        &self,
        src: &dyn RowSource<f64>,
        dest: &mut BlockMut<'_, f64>,
        _step: usize,
    ) -> Result<(), KernelError> {
        for i in dest.range().rows() {
            average_row(dest.row_mut(i), src.row(i - 1), src.row(i), src.row(i + 1));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_fixed() {
        let mut dest = vec![7.0, 7.0, 7.0, 7.0];
        average_row(&mut dest, &[9.0; 4], &[9.0; 4], &[9.0; 4]);
        assert_eq!(dest, vec![7.0, 9.0, 9.0, 7.0]);
    }

    #[test]
    fn mean_of_nine() {
        let above = [1.0, 2.0, 3.0];
        let here = [4.0, 5.0, 6.0];
        let below = [7.0, 8.0, 9.0];
        let mut dest = [0.0; 3];
        average_row(&mut dest, &above, &here, &below);
        assert_eq!(dest[1], 5.0);
    }

    #[test]
    fn side_columns_feed_neighbours() {
        let row = [1.0, 0.0, 0.0, 0.0, 1.0];
        let mut dest = row;
        average_row(&mut dest, &row, &row, &row);
        assert_eq!(dest[1], 3.0 / 9.0);
        assert_eq!(dest[2], 0.0);
        assert_eq!(dest[3], 3.0 / 9.0);
    }

    #[test]
    fn narrow_rows_have_no_interior() {
        let mut dest = [2.0, 2.0];
        average_row(&mut dest, &[0.0; 2], &[0.0; 2], &[0.0; 2]);
        assert_eq!(dest, [2.0, 2.0]);
        let mut one = [2.0];
        average_row(&mut one, &[0.0], &[0.0], &[0.0]);
        assert_eq!(one, [2.0]);
    }
}
