//! Dense row-major grid storage.

use std::fmt;

use crate::cell::Cell;
use crate::error::GridError;
use crate::partition::RowRange;

/// A dense `rows × cols` matrix stored row-major in one `Vec`.
///
/// Dimensions are fixed at construction; there is no way to resize a
/// grid in place.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Cell> Grid<T> {
    /// A grid with every cell set to `fill`.
    pub fn filled(rows: usize, cols: usize, fill: T) -> Result<Self, GridError> {
        let len = checked_len(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            data: vec![fill; len],
        })
    }

    /// Wrap an existing row-major buffer.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, GridError> {
        let len = checked_len(rows, cols)?;
        if data.len() != len {
            return Err(GridError::ShapeMismatch {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a grid from a list of equally long rows.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self, GridError> {
        let cols = rows.first().map_or(0, Vec::len);
        let data: Vec<T> = rows.iter().flatten().copied().collect();
        if rows.iter().any(|r| r.len() != cols) {
            return Err(GridError::ShapeMismatch {
                rows: rows.len(),
                cols,
                len: data.len(),
            });
        }
        Self::from_vec(rows.len(), cols, data)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the grid is square.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Total cell count.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`: zero-sized grids cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Cell at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Overwrite the cell at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        assert!(
            row < self.rows && col < self.cols,
            "cell ({row}, {col}) outside {}x{} grid",
            self.rows,
            self.cols
        );
        self.data[row * self.cols + col] = value;
    }

    /// Borrow one row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()`.
    pub fn row(&self, row: usize) -> &[T] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Mutably borrow one row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()`.
    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Borrow a contiguous block of rows as one flat slice.
    pub fn block(&self, range: RowRange) -> &[T] {
        &self.data[range.start * self.cols..range.end() * self.cols]
    }

    /// Iterate over rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.data.chunks_exact(self.cols)
    }

    /// The whole buffer, row-major.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The whole buffer, row-major, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the grid and return its row-major buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

fn checked_len(rows: usize, cols: usize) -> Result<usize, GridError> {
    if rows == 0 || cols == 0 {
        return Err(GridError::EmptyDimension { rows, cols });
    }
    rows.checked_mul(cols)
        .ok_or(GridError::TooLarge { rows, cols })
}

/// Tab-separated rows, one line per row, using [`Cell::fmt_cell`].
impl<T: Cell> fmt::Display for Grid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            for cell in row {
                cell.fmt_cell(f)?;
                f.write_str("\t")?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
