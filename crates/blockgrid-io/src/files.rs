//! Path-level helpers that wrap the codec in buffered file handles.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use blockgrid_core::{Cell, Grid};
use tracing::debug;

use crate::codec::{decode_graph, decode_grid2d, encode_graph, encode_grid2d};
use crate::error::MatrixIoError;
use crate::stacked::StackedReader;

/// Load an adjacency-matrix graph file.
pub fn read_graph(path: impl AsRef<Path>) -> Result<Grid<i32>, MatrixIoError> {
    let path = path.as_ref();
    let mut r = BufReader::new(File::open(path)?);
    let grid = decode_graph(&mut r)?;
    debug!(path = %path.display(), n = grid.rows(), "read graph");
    Ok(grid)
}

/// Write an adjacency-matrix graph file, replacing any existing file.
pub fn write_graph(path: impl AsRef<Path>, grid: &Grid<i32>) -> Result<(), MatrixIoError> {
    let path = path.as_ref();
    let mut w = BufWriter::new(File::create(path)?);
    encode_graph(&mut w, grid)?;
    w.flush()?;
    debug!(path = %path.display(), n = grid.rows(), "wrote graph");
    Ok(())
}

/// Load a 2-D grid file.
pub fn read_grid2d(path: impl AsRef<Path>) -> Result<Grid<f64>, MatrixIoError> {
    let path = path.as_ref();
    let mut r = BufReader::new(File::open(path)?);
    let grid = decode_grid2d(&mut r)?;
    debug!(path = %path.display(), rows = grid.rows(), cols = grid.cols(), "read grid");
    Ok(grid)
}

/// Write a 2-D grid file, replacing any existing file.
pub fn write_grid2d(path: impl AsRef<Path>, grid: &Grid<f64>) -> Result<(), MatrixIoError> {
    let path = path.as_ref();
    let mut w = BufWriter::new(File::create(path)?);
    encode_grid2d(&mut w, grid)?;
    w.flush()?;
    debug!(path = %path.display(), rows = grid.rows(), cols = grid.cols(), "wrote grid");
    Ok(())
}

/// Open a stacked checkpoint file of `rows × cols` frames.
pub fn open_stacked<T: Cell>(
    path: impl AsRef<Path>,
    rows: usize,
    cols: usize,
) -> Result<StackedReader<BufReader<File>, T>, MatrixIoError> {
    let file = File::open(path.as_ref())?;
    Ok(StackedReader::new(BufReader::new(file), rows, cols))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("g.bin");
        let g = Grid::from_rows(&[vec![0, 4, -1], vec![-1, 0, 2], vec![1, -1, 0]]).unwrap();
        write_graph(&path, &g).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 4 + 9 * 4);
        assert_eq!(read_graph(&path).unwrap(), g);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_grid2d(dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, MatrixIoError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
    }

    #[test]
    fn write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.bin");
        write_grid2d(&path, &Grid::filled(4, 4, 2.0).unwrap()).unwrap();
        let small = Grid::filled(3, 3, 1.0).unwrap();
        write_grid2d(&path, &small).unwrap();
        assert_eq!(read_grid2d(&path).unwrap(), small);
    }
}
