//! Benchmark profiles for the blockgrid engine.
//!
//! - [`graph_profile`]: seeded random graph for the shortest-path sweeps
//! - [`stencil_profile`]: side-column starting grid for the stencil
//! - [`worker_counts`]: worker counts to sweep, capped by the machine

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use blockgrid_core::Grid;
use blockgrid_kernels::{random_graph, stencil_initial};

/// Edge probability used by [`graph_profile`].
pub const GRAPH_DENSITY: f64 = 0.3;

/// Random `n`-node graph with weights in `1..=100`.
///
/// # Panics
///
/// Panics if `n == 0`.
pub fn graph_profile(n: usize, seed: u64) -> Grid<i32> {
    random_graph(n, GRAPH_DENSITY, 1, 100, seed).expect("benchmark graph parameters are valid")
}

/// Stencil starting grid of `rows × cols`.
///
/// # Panics
///
/// Panics if either dimension is below 3.
pub fn stencil_profile(rows: usize, cols: usize) -> Grid<f64> {
    stencil_initial(rows, cols).expect("benchmark grid is at least 3x3")
}

/// Powers of two up to the available parallelism, always including 1.
pub fn worker_counts() -> Vec<usize> {
    let max = std::thread::available_parallelism().map_or(1, |n| n.get());
    std::iter::successors(Some(1usize), |w| Some(w * 2))
        .take_while(|&w| w <= max)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_have_requested_shape() {
        let g = graph_profile(16, 3);
        assert_eq!((g.rows(), g.cols()), (16, 16));
        let s = stencil_profile(5, 7);
        assert_eq!((s.rows(), s.cols()), (5, 7));
    }

    #[test]
    fn worker_counts_start_at_one() {
        let counts = worker_counts();
        assert_eq!(counts[0], 1);
        assert!(counts.windows(2).all(|w| w[1] == w[0] * 2));
    }
}
