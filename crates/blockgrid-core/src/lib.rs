//! Core types for the blockgrid workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! dense row-major [`Grid`], the [`Cell`] trait implemented by the two
//! numeric element types, the balanced block [`partition`](mod@partition) functions that
//! assign rows to workers, and the error types shared by every crate.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod error;
pub mod grid;
pub mod partition;

pub use cell::Cell;
pub use error::{GridError, PartitionError};
pub use grid::Grid;
pub use partition::{
    block_high, block_low, block_size, partition, partition_all, partition_interior, RowRange,
};
