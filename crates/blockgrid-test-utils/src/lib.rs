//! Test utilities for blockgrid development.
//!
//! - [`fixtures`]: reference grids with known answers and naive
//!   reference implementations.
//! - [`faults`]: launchers, writers and kernels that fail on demand.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod faults;
pub mod fixtures;

pub use faults::{CountingLauncher, FailAtWorker, FailingKernel, FailingWriter, PanickingKernel};
pub use fixtures::{
    linear_profile, naive_floyd, naive_stencil, side_column_grid, six_node_graph,
    six_node_shortest_paths,
};
