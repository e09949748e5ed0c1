use serde::{Deserialize, Serialize};

/// Common error type for matrix construction and multiplication.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error(
        "matrix multiplication not possible: columns of first matrix ({left_cols}) \
         must equal rows of second matrix ({right_rows})"
    )]
    DimensionMismatch { left_cols: usize, right_rows: usize },
    #[error("empty matrix: dimensions {rows}x{cols} must both be positive")]
    EmptyMatrix { rows: usize, cols: usize },
    #[error("expected {expected} elements for a {rows}x{cols} matrix, got {actual}")]
    ElementCount {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },
    #[error("jagged rows: row {row} has {actual} elements, expected {expected}")]
    JaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("integer overflow computing product cell ({row}, {col})")]
    Overflow { row: usize, col: usize },
    #[error("matrix dimensions {rows}x{cols} exceed addressable size")]
    TooLarge { rows: usize, cols: usize },
}

pub type MatrixResult<T> = Result<T, MatrixError>;

/// Shape of a matrix. Only obtainable through [`Dimensions::new`], so both
/// sides are positive and the cell buffer is addressable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDimensions", into = "RawDimensions")]
pub struct Dimensions {
    rows: usize,
    cols: usize,
}

#[derive(Serialize, Deserialize)]
struct RawDimensions {
    rows: usize,
    cols: usize,
}

impl Dimensions {
    pub fn new(rows: usize, cols: usize) -> MatrixResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(MatrixError::EmptyMatrix { rows, cols });
        }
        let bytes = rows
            .checked_mul(cols)
            .and_then(|cells| cells.checked_mul(std::mem::size_of::<i64>()));
        match bytes {
            Some(bytes) if bytes <= isize::MAX as usize => Ok(Self { rows, cols }),
            _ => Err(MatrixError::TooLarge { rows, cols }),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells; cannot overflow for a validated shape.
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_conformable_with(&self, rhs: &Dimensions) -> bool {
        self.cols == rhs.rows
    }

    pub fn check_conformable(&self, rhs: &Dimensions) -> MatrixResult<()> {
        if self.is_conformable_with(rhs) {
            Ok(())
        } else {
            Err(MatrixError::DimensionMismatch {
                left_cols: self.cols,
                right_rows: rhs.rows,
            })
        }
    }

    /// Shape of `self * rhs`.
    pub fn product_with(&self, rhs: &Dimensions) -> MatrixResult<Dimensions> {
        self.check_conformable(rhs)?;
        Dimensions::new(self.rows, rhs.cols)
    }
}

impl TryFrom<RawDimensions> for Dimensions {
    type Error = MatrixError;

    fn try_from(raw: RawDimensions) -> MatrixResult<Self> {
        Self::new(raw.rows, raw.cols)
    }
}

impl From<Dimensions> for RawDimensions {
    fn from(dims: Dimensions) -> Self {
        Self {
            rows: dims.rows,
            cols: dims.cols,
        }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}
