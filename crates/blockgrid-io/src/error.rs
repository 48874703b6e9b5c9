//! Error type for the file formats.

use std::io;

use blockgrid_core::GridError;
use thiserror::Error;

/// Errors from encoding or decoding a matrix file.
#[derive(Debug, Error)]
pub enum MatrixIoError {
    /// An underlying read or write failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// A header dimension is zero or negative.
    #[error("invalid {what} in header: {value}")]
    InvalidDimension {
        /// Which dimension (`"node count"`, `"rows"`, `"cols"`).
        what: &'static str,
        /// The value found.
        value: i32,
    },
    /// A dimension does not fit the 32-bit header field.
    #[error("{what} = {value} does not fit a 32-bit header")]
    DimensionOverflow {
        /// Which dimension.
        what: &'static str,
        /// The value.
        value: usize,
    },
    /// The stream ended in the middle of a header or payload.
    #[error("file truncated while reading {what}")]
    Truncated {
        /// What was being read.
        what: &'static str,
    },
    /// A graph file must hold a square matrix.
    #[error("graph must be square, got {rows}x{cols}")]
    NotSquare {
        /// Rows.
        rows: usize,
        /// Columns.
        cols: usize,
    },
    /// The decoded cells do not form a valid grid.
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl MatrixIoError {
    /// Map `UnexpectedEof` to [`MatrixIoError::Truncated`].
    pub(crate) fn eof_as_truncated(e: io::Error, what: &'static str) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Self::Truncated { what }
        } else {
            Self::Io(e)
        }
    }
}
