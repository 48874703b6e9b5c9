//! Blockgrid: a blocked, barrier-synchronized iterative matrix engine.
//!
//! This is the facade crate that re-exports the public API of the
//! sub-crates. A run splits the rows of a [`Grid`](types::Grid) into one
//! contiguous block per worker thread; every step each worker updates its
//! own block, all workers meet at a barrier, worker 0 performs the serial
//! part of the step, and everyone meets again before the next step.
//!
//! # Quick start
//!
//! ```rust
//! use blockgrid::prelude::*;
//!
//! let graph = reference_graph().unwrap();
//! let n = graph.rows();
//! let out = Coordinator::new()
//!     .run(graph, &RunConfig::new(3, n), &PairwiseRelaxation)
//!     .unwrap()
//!     .require_complete()
//!     .unwrap();
//! assert_eq!(out.grid.get(0, 5), Some(9));
//!
//! let start = stencil_initial(6, 5).unwrap();
//! let out = Coordinator::new()
//!     .run(start, &RunConfig::new(2, 1), &NinePointStencil)
//!     .unwrap();
//! assert_eq!(out.grid.get(2, 1), Some(3.0 / 9.0));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `blockgrid-core` | `Grid`, `Cell`, row partitioning |
//! | [`engine`] | `blockgrid-engine` | Coordinator, workers, barrier, checkpoint sink |
//! | [`kernels`] | `blockgrid-kernels` | Shortest-path and stencil kernels, generators, serial sweeps |
//! | [`io`] | `blockgrid-io` | Graph, 2-D grid and stacked file formats |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Grid storage, cell types and the row partitioner (`blockgrid-core`).
pub use blockgrid_core as types;

/// The worker pool and its supporting pieces (`blockgrid-engine`).
///
/// [`engine::Coordinator`] runs a [`engine::RowKernel`] over a grid;
/// [`engine::Checkpoint`] records every step to a stacked stream.
pub use blockgrid_engine as engine;

/// Concrete kernels and reference implementations (`blockgrid-kernels`).
pub use blockgrid_kernels as kernels;

/// Binary file formats (`blockgrid-io`).
pub use blockgrid_io as io;

/// Common imports for typical blockgrid usage.
///
/// ```rust
/// use blockgrid::prelude::*;
/// ```
pub mod prelude {
    // Core
    pub use blockgrid_core::{partition, Cell, Grid, GridError, PartitionError, RowRange};

    // Engine
    pub use blockgrid_engine::{
        Checkpoint, CheckpointReport, ConfigError, Coordinator, RowKernel, RunConfig, RunError,
        RunMetrics, RunOutput, RunStatus,
    };

    // Kernels
    pub use blockgrid_kernels::{
        random_graph, reference_graph, stencil_initial, NinePointStencil, PairwiseRelaxation,
        NO_EDGE,
    };

    // I/O
    pub use blockgrid_io::{read_graph, read_grid2d, write_graph, write_grid2d, MatrixIoError};
}
