//! Binary file formats for the blockgrid tools.
//!
//! Three formats share one little-endian cell encoding:
//!
//! - **graph files**: a square `i32` adjacency matrix with an `n` header,
//!   with `-1` marking a missing edge;
//! - **2-D grid files**: an `f64` grid with a `rows, cols` header;
//! - **stacked files**: headerless frames appended by the engine's
//!   checkpoint sink, read back with [`StackedReader`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod files;
pub mod stacked;

pub use codec::{
    decode_frame, decode_graph, decode_grid2d, encode_frame, encode_graph, encode_grid2d,
};
pub use error::MatrixIoError;
pub use files::{open_stacked, read_graph, read_grid2d, write_graph, write_grid2d};
pub use stacked::{FrameIter, StackedReader};
