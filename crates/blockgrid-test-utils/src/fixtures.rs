//! Grids with known answers.

use blockgrid_core::Grid;
use blockgrid_kernels::{reference_graph, stencil_initial, NO_EDGE};

/// The six-node reference graph.
pub fn six_node_graph() -> Grid<i32> {
    reference_graph().unwrap()
}

/// Shortest paths of [`six_node_graph`], worked out by hand.
pub fn six_node_shortest_paths() -> Grid<i32> {
    const N: i32 = NO_EDGE;
    #[rustfmt::skip]
    let cells = vec![
        0, 2, 5, 3, 6, 9,
        N, 0, 6, 1, 4, 7,
        N, 15, 0, 4, 7, 10,
        N, 11, 5, 0, 3, 6,
        N, 8, 2, 5, 0, 3,
        N, 5, 6, 2, 4, 0,
    ];
    Grid::from_vec(6, 6, cells).unwrap()
}

/// First and last columns `1.0`, rest `0.0`.
pub fn side_column_grid(rows: usize, cols: usize) -> Grid<f64> {
    stencil_initial(rows, cols).unwrap()
}

/// Left column `1.0`, right column `0.0`, top and bottom rows fixed to
/// the linear profile `1 - j / (cols - 1)`, interior `0.0`.
///
/// The stencil's fixed point is the linear profile in every row.
pub fn linear_profile(rows: usize, cols: usize) -> (Grid<f64>, Grid<f64>) {
    let profile: Vec<f64> = (0..cols)
        .map(|j| 1.0 - j as f64 / (cols - 1) as f64)
        .collect();

    let mut start = Grid::filled(rows, cols, 0.0).unwrap();
    for i in 0..rows {
        let row = start.row_mut(i);
        if i == 0 || i == rows - 1 {
            row.copy_from_slice(&profile);
        } else {
            row[0] = 1.0;
            row[cols - 1] = 0.0;
        }
    }

    let mut fixed_point = Grid::filled(rows, cols, 0.0).unwrap();
    for i in 0..rows {
        fixed_point.row_mut(i).copy_from_slice(&profile);
    }
    (start, fixed_point)
}

/// Textbook shortest paths with the `-1` / `0` conventions, written
/// independently of the engine's row function.
pub fn naive_floyd(grid: &Grid<i32>) -> Grid<i32> {
    let n = grid.rows();
    let mut d = grid.clone();
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                let (ij, ik, kj) = (
                    d.get(i, j).unwrap(),
                    d.get(i, k).unwrap(),
                    d.get(k, j).unwrap(),
                );
                if ij == 0 || ik == NO_EDGE || kj == NO_EDGE {
                    continue;
                }
                let through = ik + kj;
                if ij == NO_EDGE || through < ij {
                    d.set(i, j, through);
                }
            }
        }
    }
    d
}

/// Straightforward Jacobi sweeps of the 9-point mean.
pub fn naive_stencil(grid: &Grid<f64>, iterations: usize) -> Grid<f64> {
    let (rows, cols) = (grid.rows(), grid.cols());
    let mut cur = grid.clone();
    for _ in 0..iterations {
        let prev = cur.clone();
        for i in 1..rows - 1 {
            for j in 1..cols - 1 {
                let at = |r: usize, c: usize| prev.get(r, c).unwrap();
                let sum = at(i - 1, j - 1)
                    + at(i - 1, j)
                    + at(i - 1, j + 1)
                    + at(i, j + 1)
                    + at(i + 1, j + 1)
                    + at(i + 1, j)
                    + at(i + 1, j - 1)
                    + at(i, j - 1)
                    + at(i, j);
                cur.set(i, j, sum / 9.0);
            }
        }
    }
    cur
}
