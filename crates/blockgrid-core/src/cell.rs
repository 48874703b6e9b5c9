//! Element types stored in a [`Grid`](crate::Grid).
//!
//! A [`Cell`] is a plain numeric value with a fixed-width little-endian
//! encoding. The encoding is shared by the matrix files and by the
//! stacked checkpoint stream, so both stay byte-compatible.

use std::fmt;

/// A grid element: `Copy`, thread-safe, and encodable as fixed-width
/// little-endian bytes.
pub trait Cell: Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Encoded width in bytes.
    const WIDTH: usize;

    /// Append the little-endian encoding of `self` to `out`.
    fn encode_le(self, out: &mut Vec<u8>);

    /// Decode a value from exactly [`WIDTH`](Cell::WIDTH) little-endian bytes.
    ///
    /// # Panics
    ///
    /// Panics if `bytes.len() != Self::WIDTH`.
    fn decode_le(bytes: &[u8]) -> Self;

    /// Format the value for tab-separated human-readable output.
    fn fmt_cell(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl Cell for i32 {
    const WIDTH: usize = 4;

    fn encode_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn decode_le(bytes: &[u8]) -> Self {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(bytes);
        i32::from_le_bytes(buf)
    }

    fn fmt_cell(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl Cell for f64 {
    const WIDTH: usize = 8;

    fn encode_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn decode_le(bytes: &[u8]) -> Self {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        f64::from_le_bytes(buf)
    }

    fn fmt_cell(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:.2}")
    }
}
