use crate::prelude::{Dimensions, MatrixError, MatrixResult};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// Dense, row-major integer matrix whose shape is fixed at construction.
///
/// Both dimensions are at least one; there is no way to build an empty or
/// jagged matrix, and no method mutates a matrix after it exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i64>>", into = "Vec<Vec<i64>>")]
pub struct Matrix {
    dims: Dimensions,
    cells: Array2<i64>,
}

impl Matrix {
    /// Builds a matrix from declared dimensions and row-major cells.
    pub fn from_vec(rows: usize, cols: usize, cells: Vec<i64>) -> MatrixResult<Self> {
        let dims = Dimensions::new(rows, cols)?;
        Self::with_dims(dims, cells)
    }

    pub fn with_dims(dims: Dimensions, cells: Vec<i64>) -> MatrixResult<Self> {
        let expected = dims.cell_count();
        let actual = cells.len();
        let count_error = MatrixError::ElementCount {
            rows: dims.rows(),
            cols: dims.cols(),
            expected,
            actual,
        };
        if actual != expected {
            return Err(count_error);
        }
        let cells = Array2::from_shape_vec((dims.rows(), dims.cols()), cells)
            .map_err(|_| count_error)?;
        Ok(Self { dims, cells })
    }

    /// Builds a matrix from nested rows, rejecting empty and jagged input.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> MatrixResult<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        let dims = Dimensions::new(rows.len(), cols)?;

        let mut cells = Vec::with_capacity(dims.cell_count());
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(MatrixError::JaggedRow {
                    row: index,
                    expected: cols,
                    actual: row.len(),
                });
            }
            cells.extend(row);
        }
        Self::with_dims(dims, cells)
    }

    pub fn identity(size: usize) -> MatrixResult<Self> {
        let dims = Dimensions::new(size, size)?;
        let cells = Array2::from_shape_fn((size, size), |(row, col)| i64::from(row == col));
        Ok(Self { dims, cells })
    }

    pub fn rows(&self) -> usize {
        self.dims.rows()
    }

    pub fn cols(&self) -> usize {
        self.dims.cols()
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn get(&self, row: usize, col: usize) -> Option<i64> {
        self.cells.get((row, col)).copied()
    }

    pub fn to_rows(&self) -> Vec<Vec<i64>> {
        self.cells.outer_iter().map(|row| row.to_vec()).collect()
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = i64;

    fn index(&self, index: (usize, usize)) -> &i64 {
        &self.cells[index]
    }
}

impl TryFrom<Vec<Vec<i64>>> for Matrix {
    type Error = MatrixError;

    fn try_from(rows: Vec<Vec<i64>>) -> MatrixResult<Self> {
        Self::from_rows(rows)
    }
}

impl From<Matrix> for Vec<Vec<i64>> {
    fn from(matrix: Matrix) -> Self {
        matrix.to_rows()
    }
}

/// Tab-separated cells, one row per line, no trailing newline.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.cells.outer_iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            let line = row
                .iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join("\t");
            f.write_str(&line)?;
        }
        Ok(())
    }
}
