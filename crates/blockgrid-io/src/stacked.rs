//! Reader for stacked checkpoint files.
//!
//! A stacked file is a plain concatenation of headerless `rows × cols`
//! frames: the initial grid followed by one frame per completed step.
//! The dimensions are not stored, so the caller supplies them.

use std::io::Read;
use std::marker::PhantomData;

use blockgrid_core::{Cell, Grid};

use crate::codec::decode_frame;
use crate::error::MatrixIoError;

/// Streaming reader over a stacked frame file.
pub struct StackedReader<R: Read, T: Cell = f64> {
    reader: R,
    rows: usize,
    cols: usize,
    frames_read: usize,
    _cell: PhantomData<T>,
}

impl<R: Read, T: Cell> StackedReader<R, T> {
    /// Wrap `reader`; every frame is `rows × cols` cells of `T`.
    pub fn new(reader: R, rows: usize, cols: usize) -> Self {
        Self {
            reader,
            rows,
            cols,
            frames_read: 0,
            _cell: PhantomData,
        }
    }

    /// Frame dimensions as `(rows, cols)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Size of one frame in bytes.
    pub fn frame_bytes(&self) -> usize {
        self.rows * self.cols * T::WIDTH
    }

    /// Number of frames successfully read so far.
    pub fn frames_read(&self) -> usize {
        self.frames_read
    }

    /// Read the next frame.
    ///
    /// Returns `Ok(None)` at a clean end of stream and
    /// [`MatrixIoError::Truncated`] if the stream ends inside a frame.
    pub fn next_frame(&mut self) -> Result<Option<Grid<T>>, MatrixIoError> {
        let frame = decode_frame(&mut self.reader, self.rows, self.cols)?;
        if frame.is_some() {
            self.frames_read += 1;
        }
        Ok(frame)
    }

    /// Iterate over the remaining frames.
    pub fn frames(&mut self) -> FrameIter<'_, R, T> {
        FrameIter {
            reader: self,
            done: false,
        }
    }
}

/// Iterator over the frames of a [`StackedReader`].
///
/// Yields `Result<Grid<T>, MatrixIoError>` and stops after the first
/// error or the end of the stream.
pub struct FrameIter<'a, R: Read, T: Cell> {
    reader: &'a mut StackedReader<R, T>,
    done: bool,
}

impl<R: Read, T: Cell> Iterator for FrameIter<'_, R, T> {
    type Item = Result<Grid<T>, MatrixIoError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.next_frame() {
            Ok(Some(frame)) => Some(Ok(frame)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
