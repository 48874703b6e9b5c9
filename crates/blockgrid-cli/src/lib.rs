//! Command-line front ends for the blockgrid engine.
//!
//! Each binary under `src/bin/` is a thin `main` around one command type
//! defined here: parse arguments with [`parse_args`], install logging with
//! [`init_tracing`], then call the command's `run` with stdout. Keeping
//! the commands in the library lets the integration tests drive them
//! in-process.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod args;
pub mod graph;
pub mod grid;
pub mod logging;
pub mod report;

pub use args::{parse_args, positive, probability, try_args_from, UsageExit};
pub use graph::{Floyds, MakeGraph, MakeGraphFixture, PrintGraph, PthFloyds};
pub use grid::{Make2d, Print2d, PthStencil2d, Stencil2d};
pub use logging::{debug_level_filter, init_tracing};
pub use report::{file_size, FileSize, TimingReport, RULE};
