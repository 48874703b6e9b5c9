//! Binary encode/decode for the matrix formats.
//!
//! All values are little-endian with no padding:
//!
//! ```text
//! graph file    i32 n, then n*n i32 weights, row-major
//! 2-D grid      i32 rows, i32 cols, then rows*cols f64 values
//! frame         rows*cols cells, no header (stacked checkpoint element)
//! ```

use std::io::{Read, Write};

use blockgrid_core::{Cell, Grid};

use crate::error::MatrixIoError;

// ── Primitive writers ───────────────────────────────────────────

/// Write a little-endian i32.
pub fn write_i32_le(w: &mut dyn Write, v: i32) -> Result<(), MatrixIoError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian f64.
pub fn write_f64_le(w: &mut dyn Write, v: f64) -> Result<(), MatrixIoError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a dimension as a positive i32.
pub fn write_dimension(w: &mut dyn Write, what: &'static str, v: usize) -> Result<(), MatrixIoError> {
    let v32 = i32::try_from(v).map_err(|_| MatrixIoError::DimensionOverflow { what, value: v })?;
    write_i32_le(w, v32)
}

// ── Primitive readers ───────────────────────────────────────────

/// Read a little-endian i32.
pub fn read_i32_le(r: &mut dyn Read) -> Result<i32, MatrixIoError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

/// Read a little-endian f64.
pub fn read_f64_le(r: &mut dyn Read) -> Result<f64, MatrixIoError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

/// Read a header dimension, rejecting truncation and non-positive values.
pub fn read_dimension(r: &mut dyn Read, what: &'static str) -> Result<usize, MatrixIoError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)
        .map_err(|e| MatrixIoError::eof_as_truncated(e, what))?;
    let value = i32::from_le_bytes(buf);
    if value <= 0 {
        return Err(MatrixIoError::InvalidDimension { what, value });
    }
    Ok(value as usize)
}

// ── Frames ──────────────────────────────────────────────────────

/// Write every cell of `grid`, row-major, with no header.
pub fn encode_frame<T: Cell>(w: &mut dyn Write, grid: &Grid<T>) -> Result<(), MatrixIoError> {
    let mut buf = Vec::with_capacity(grid.cols() * T::WIDTH);
    for row in grid.iter_rows() {
        buf.clear();
        for &cell in row {
            cell.encode_le(&mut buf);
        }
        w.write_all(&buf)?;
    }
    Ok(())
}

/// Read one headerless `rows × cols` frame.
///
/// Returns `Ok(None)` on a clean end of stream (no bytes at all) and
/// [`MatrixIoError::Truncated`] if the stream ends inside the frame.
pub fn decode_frame<T: Cell>(
    r: &mut dyn Read,
    rows: usize,
    cols: usize,
) -> Result<Option<Grid<T>>, MatrixIoError> {
    let row_bytes = cols * T::WIDTH;
    let mut buf = vec![0u8; row_bytes];

    // The first row is read by hand to tell clean EOF from truncation.
    let mut filled = 0;
    while filled < row_bytes {
        match r.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => return Err(MatrixIoError::Truncated { what: "frame" }),
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(MatrixIoError::Io(e)),
        }
    }

    let mut data = Vec::with_capacity(cols);
    push_cells(&mut data, &buf);
    for _ in 1..rows {
        r.read_exact(&mut buf)
            .map_err(|e| MatrixIoError::eof_as_truncated(e, "frame"))?;
        push_cells(&mut data, &buf);
    }
    Ok(Some(Grid::from_vec(rows, cols, data)?))
}

/// Read exactly `rows × cols` cells; a short stream is an error.
fn decode_payload<T: Cell>(
    r: &mut dyn Read,
    rows: usize,
    cols: usize,
    what: &'static str,
) -> Result<Grid<T>, MatrixIoError> {
    let mut buf = vec![0u8; cols * T::WIDTH];
    // Grow row by row so a corrupt header cannot force a huge allocation
    // before truncation is detected.
    let mut data = Vec::with_capacity(cols);
    for _ in 0..rows {
        r.read_exact(&mut buf)
            .map_err(|e| MatrixIoError::eof_as_truncated(e, what))?;
        push_cells(&mut data, &buf);
    }
    Ok(Grid::from_vec(rows, cols, data)?)
}

fn push_cells<T: Cell>(data: &mut Vec<T>, bytes: &[u8]) {
    data.extend(bytes.chunks_exact(T::WIDTH).map(T::decode_le));
}

// ── Graph file ──────────────────────────────────────────────────

/// Encode an adjacency matrix: `n`, then `n*n` weights.
pub fn encode_graph(w: &mut dyn Write, grid: &Grid<i32>) -> Result<(), MatrixIoError> {
    if !grid.is_square() {
        return Err(MatrixIoError::NotSquare {
            rows: grid.rows(),
            cols: grid.cols(),
        });
    }
    write_dimension(w, "node count", grid.rows())?;
    encode_frame(w, grid)
}

/// Decode an adjacency matrix.
pub fn decode_graph(r: &mut dyn Read) -> Result<Grid<i32>, MatrixIoError> {
    let n = read_dimension(r, "node count")?;
    decode_payload(r, n, n, "graph weights")
}

// ── 2-D grid file ───────────────────────────────────────────────

/// Encode a 2-D grid: `rows`, `cols`, then the values.
pub fn encode_grid2d(w: &mut dyn Write, grid: &Grid<f64>) -> Result<(), MatrixIoError> {
    write_dimension(w, "rows", grid.rows())?;
    write_dimension(w, "cols", grid.cols())?;
    encode_frame(w, grid)
}

/// Decode a 2-D grid.
pub fn decode_grid2d(r: &mut dyn Read) -> Result<Grid<f64>, MatrixIoError> {
    let rows = read_dimension(r, "rows")?;
    let cols = read_dimension(r, "cols")?;
    decode_payload(r, rows, cols, "grid values")
}
