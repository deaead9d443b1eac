//! Numeric tables
//!
//! Algorithms read their inputs through the [`NumericTable`] trait and never
//! copy or free them. [`DenseTable`] owns its storage; [`TableView`] borrows
//! a caller's buffer, which is how the binding layer hands in foreign memory.

use crate::error::{Error, Result};
use crate::numeric::Numeric;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Storage order of a dense table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Layout {
    #[default]
    RowMajor,
    ColumnMajor,
}

impl Layout {
    #[inline]
    fn index(self, row: usize, column: usize, n_rows: usize, n_columns: usize) -> usize {
        match self {
            Layout::RowMajor => row * n_columns + column,
            Layout::ColumnMajor => column * n_rows + row,
        }
    }
}

/// Read-only two-dimensional numeric data
pub trait NumericTable<T: Numeric>: Send + Sync {
    fn n_rows(&self) -> usize;

    fn n_columns(&self) -> usize;

    /// Value at (row, column)
    ///
    /// # Panics
    /// Panics if the position is out of bounds.
    fn get(&self, row: usize, column: usize) -> T;

    fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    /// Copy one row into `out`, replacing its content
    fn read_row(&self, row: usize, out: &mut Vec<T>) {
        out.clear();
        out.extend((0..self.n_columns()).map(|c| self.get(row, c)));
    }

    /// Copy a block of rows into `out` in row-major order
    fn read_rows(&self, rows: Range<usize>, out: &mut Vec<T>) {
        out.clear();
        out.reserve(rows.len() * self.n_columns());
        for r in rows {
            out.extend((0..self.n_columns()).map(|c| self.get(r, c)));
        }
    }

    /// Copy part of one column into `out`, replacing its content
    fn read_column(&self, column: usize, rows: Range<usize>, out: &mut Vec<T>) {
        out.clear();
        out.extend(rows.map(|r| self.get(r, column)));
    }
}

fn check_shape(len: usize, n_rows: usize, n_columns: usize) -> Result<()> {
    let expected = n_rows
        .checked_mul(n_columns)
        .ok_or_else(|| Error::Memory(format!("{n_rows} x {n_columns} table overflows usize")))?;
    if len != expected {
        return Err(Error::size_mismatch(expected, len, "table buffer length"));
    }
    Ok(())
}

/// Owned dense table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseTable<T> {
    n_rows: usize,
    n_columns: usize,
    layout: Layout,
    data: Vec<T>,
}

impl<T: Numeric> DenseTable<T> {
    /// Build from row-major data
    pub fn from_rows(n_columns: usize, data: Vec<T>) -> Result<Self> {
        let n_rows = if n_columns == 0 { 0 } else { data.len() / n_columns };
        check_shape(data.len(), n_rows, n_columns)?;
        Ok(Self {
            n_rows,
            n_columns,
            layout: Layout::RowMajor,
            data,
        })
    }

    /// Build from column-major data
    pub fn from_columns(n_rows: usize, data: Vec<T>) -> Result<Self> {
        let n_columns = if n_rows == 0 { 0 } else { data.len() / n_rows };
        check_shape(data.len(), n_rows, n_columns)?;
        Ok(Self {
            n_rows,
            n_columns,
            layout: Layout::ColumnMajor,
            data,
        })
    }

    /// Build a single-column table
    pub fn column_vector(data: Vec<T>) -> Self {
        Self {
            n_rows: data.len(),
            n_columns: 1,
            layout: Layout::RowMajor,
            data,
        }
    }

    /// Zero-filled row-major table
    pub fn zeros(n_rows: usize, n_columns: usize) -> Self {
        Self {
            n_rows,
            n_columns,
            layout: Layout::RowMajor,
            data: vec![T::zero(); n_rows * n_columns],
        }
    }

    /// Row-major table filled by `f(row, column)`
    pub fn from_fn(n_rows: usize, n_columns: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(n_rows * n_columns);
        for r in 0..n_rows {
            for c in 0..n_columns {
                data.push(f(r, c));
            }
        }
        Self {
            n_rows,
            n_columns,
            layout: Layout::RowMajor,
            data,
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Contiguous row, available for row-major tables
    pub fn row(&self, row: usize) -> Option<&[T]> {
        match self.layout {
            Layout::RowMajor if row < self.n_rows => {
                Some(&self.data[row * self.n_columns..(row + 1) * self.n_columns])
            }
            _ => None,
        }
    }

    /// Contiguous column, available for column-major tables
    pub fn column(&self, column: usize) -> Option<&[T]> {
        match self.layout {
            Layout::ColumnMajor if column < self.n_columns => {
                Some(&self.data[column * self.n_rows..(column + 1) * self.n_rows])
            }
            _ => None,
        }
    }

    /// Copy a block of rows into a new row-major table
    pub fn row_block(&self, rows: Range<usize>) -> Self {
        let mut data = Vec::new();
        self.read_rows(rows.clone(), &mut data);
        Self {
            n_rows: rows.len(),
            n_columns: self.n_columns,
            layout: Layout::RowMajor,
            data,
        }
    }

    /// Borrow as a view
    pub fn view(&self) -> TableView<'_, T> {
        TableView {
            data: &self.data,
            n_rows: self.n_rows,
            n_columns: self.n_columns,
            layout: self.layout,
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Numeric> NumericTable<T> for DenseTable<T> {
    fn n_rows(&self) -> usize {
        self.n_rows
    }

    fn n_columns(&self) -> usize {
        self.n_columns
    }

    #[inline]
    fn get(&self, row: usize, column: usize) -> T {
        assert!(row < self.n_rows && column < self.n_columns);
        self.data[self.layout.index(row, column, self.n_rows, self.n_columns)]
    }

    fn read_rows(&self, rows: Range<usize>, out: &mut Vec<T>) {
        match self.layout {
            Layout::RowMajor => {
                out.clear();
                out.extend_from_slice(&self.data[rows.start * self.n_columns..rows.end * self.n_columns]);
            }
            Layout::ColumnMajor => {
                out.clear();
                for r in rows {
                    out.extend((0..self.n_columns).map(|c| self.get(r, c)));
                }
            }
        }
    }

    fn read_column(&self, column: usize, rows: Range<usize>, out: &mut Vec<T>) {
        out.clear();
        match self.layout {
            Layout::ColumnMajor => {
                let base = column * self.n_rows;
                out.extend_from_slice(&self.data[base + rows.start..base + rows.end]);
            }
            Layout::RowMajor => out.extend(rows.map(|r| self.data[r * self.n_columns + column])),
        }
    }
}

/// Borrowed dense table over a caller-owned buffer
#[derive(Debug, Clone, Copy)]
pub struct TableView<'a, T> {
    data: &'a [T],
    n_rows: usize,
    n_columns: usize,
    layout: Layout,
}

impl<'a, T: Numeric> TableView<'a, T> {
    pub fn new(data: &'a [T], n_rows: usize, n_columns: usize, layout: Layout) -> Result<Self> {
        check_shape(data.len(), n_rows, n_columns)?;
        Ok(Self {
            data,
            n_rows,
            n_columns,
            layout,
        })
    }

    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }
}

impl<T: Numeric> NumericTable<T> for TableView<'_, T> {
    fn n_rows(&self) -> usize {
        self.n_rows
    }

    fn n_columns(&self) -> usize {
        self.n_columns
    }

    #[inline]
    fn get(&self, row: usize, column: usize) -> T {
        assert!(row < self.n_rows && column < self.n_columns);
        self.data[self.layout.index(row, column, self.n_rows, self.n_columns)]
    }
}
