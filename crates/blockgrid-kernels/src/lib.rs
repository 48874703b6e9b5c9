//! Kernels for the blockgrid engine.
//!
//! - [`PairwiseRelaxation`]: all-pairs shortest paths over an `i32`
//!   adjacency matrix, one pivot row per step, updated in place.
//! - [`NinePointStencil`]: 9-point averaging over an `f64` grid with
//!   fixed edges, double buffered.
//!
//! [`serial`] holds single-threaded sweeps built on the same row
//! functions, and [`generate`] builds the inputs the command-line tools
//! write to disk.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod floyd;
pub mod generate;
pub mod serial;
pub mod stencil;

pub use floyd::{relax_row, PairwiseRelaxation, NO_EDGE};
pub use generate::{random_graph, reference_graph, stencil_initial, GenerateError, DEFAULT_SEED};
pub use stencil::{average_row, NinePointStencil};
