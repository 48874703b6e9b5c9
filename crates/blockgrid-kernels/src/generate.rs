//! Input generators for both kernels.

use blockgrid_core::{Grid, GridError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::floyd::NO_EDGE;

/// Seed used by [`random_graph`] callers that do not pick one.
pub const DEFAULT_SEED: u64 = 1;

/// Errors from the generators.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GenerateError {
    /// The edge probability is outside `[0, 1]`.
    #[error("edge probability {0} is not in [0, 1]")]
    Probability(f64),
    /// Weight bounds are not `1 <= lo <= hi`.
    #[error("weight bounds [{lo}, {hi}] must satisfy 1 <= lo <= hi")]
    Weights {
        /// Lower bound.
        lo: i32,
        /// Upper bound.
        hi: i32,
    },
    /// The stencil grid needs at least three rows and columns.
    #[error("stencil grid must be at least 3x3, got {rows}x{cols}")]
    TooSmall {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
    },
    /// Grid construction failed.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// An `n × n` random adjacency matrix.
///
/// The diagonal is `0`. Each other entry is an edge with probability
/// `p`, weighted uniformly in `lo..=hi`, and [`NO_EDGE`] otherwise. The
/// same `(n, p, lo, hi, seed)` always yields the same graph.
pub fn random_graph(n: usize, p: f64, lo: i32, hi: i32, seed: u64) -> Result<Grid<i32>, GenerateError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(GenerateError::Probability(p));
    }
    if lo < 1 || lo > hi {
        return Err(GenerateError::Weights { lo, hi });
    }

    let mut grid = Grid::filled(n, n, NO_EDGE)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for i in 0..n {
        let row = grid.row_mut(i);
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = if i == j {
                0
            } else if rng.random::<f64>() > p {
                NO_EDGE
            } else {
                rng.random_range(lo..=hi)
            };
        }
    }
    Ok(grid)
}

/// The six-node reference graph.
///
/// Its shortest-path matrix is known by hand, which makes it the
/// standard fixture for checking both the serial and parallel sweeps.
pub fn reference_graph() -> Result<Grid<i32>, GenerateError> {
    const N: i32 = NO_EDGE;
    #[rustfmt::skip]
    let cells = vec![
        0, 2, 5, N, N, N,
        N, 0, 7, 1, N, 8,
        N, N, 0, 4, N, N,
        N, N, N, 0, 3, N,
        N, N, 2, N, 0, 3,
        N, 5, N, 2, 4, 0,
    ];
    Ok(Grid::from_vec(6, 6, cells)?)
}

/// Stencil starting grid: first and last columns `1.0`, everything
/// else `0.0`.
pub fn stencil_initial(rows: usize, cols: usize) -> Result<Grid<f64>, GenerateError> {
    if rows < 3 || cols < 3 {
        return Err(GenerateError::TooSmall { rows, cols });
    }
    let mut grid = Grid::filled(rows, cols, 0.0)?;
    for i in 0..rows {
        let row = grid.row_mut(i);
        row[0] = 1.0;
        row[cols - 1] = 1.0;
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn same_seed_same_graph() {
        let a = random_graph(20, 0.4, 1, 9, 7).unwrap();
        let b = random_graph(20, 0.4, 1, 9, 7).unwrap();
        assert_eq!(a, b);
        let c = random_graph(20, 0.4, 1, 9, 8).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn probability_extremes() {
        let none = random_graph(5, 0.0, 1, 1, DEFAULT_SEED).unwrap();
        let all = random_graph(5, 1.0, 3, 3, DEFAULT_SEED).unwrap();
        for i in 0..5 {
            for j in 0..5 {
                let expect_none = if i == j { 0 } else { NO_EDGE };
                let expect_all = if i == j { 0 } else { 3 };
                assert_eq!(none.get(i, j), Some(expect_none));
                assert_eq!(all.get(i, j), Some(expect_all));
            }
        }
    }

    #[test]
    fn invalid_parameters_rejected() {
        assert_eq!(
            random_graph(4, 1.5, 1, 2, 1),
            Err(GenerateError::Probability(1.5))
        );
        assert_eq!(
            random_graph(4, 0.5, 0, 2, 1),
            Err(GenerateError::Weights { lo: 0, hi: 2 })
        );
        assert_eq!(
            random_graph(4, 0.5, 5, 2, 1),
            Err(GenerateError::Weights { lo: 5, hi: 2 })
        );
        assert!(matches!(
            random_graph(0, 0.5, 1, 2, 1),
            Err(GenerateError::Grid(GridError::EmptyDimension { .. }))
        ));
    }

    #[test]
    fn reference_graph_shape() {
        let g = reference_graph().unwrap();
        assert_eq!((g.rows(), g.cols()), (6, 6));
        assert_eq!(g.row(1), &[NO_EDGE, 0, 7, 1, NO_EDGE, 8]);
    }

    #[test]
    fn stencil_initial_sides() {
        let g = stencil_initial(3, 4).unwrap();
        for row in g.iter_rows() {
            assert_eq!(row, &[1.0, 0.0, 0.0, 1.0]);
        }
        assert_eq!(
            stencil_initial(2, 5),
            Err(GenerateError::TooSmall { rows: 2, cols: 5 })
        );
    }

    proptest! {
        #[test]
        fn weights_stay_in_bounds(n in 1usize..24, p in 0.0f64..=1.0, lo in 1i32..50, span in 0i32..50, seed: u64) {
            let hi = lo + span;
            let g = random_graph(n, p, lo, hi, seed).unwrap();
            for i in 0..n {
                for j in 0..n {
                    let w = g.get(i, j).unwrap();
                    if i == j {
                        prop_assert_eq!(w, 0);
                    } else {
                        prop_assert!(w == NO_EDGE || (lo..=hi).contains(&w));
                    }
                }
            }
        }
    }
}
