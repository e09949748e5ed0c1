//! Whitespace-token reader for console-style input.
//!
//! Tokens may be spread over any number of lines; blank lines are skipped.

use crate::math::matrix::Matrix;
use crate::prelude::{Dimensions, MatrixError};
use std::collections::VecDeque;
use std::io::BufRead;

/// Upper bound on cells reserved before any element has been read.
const MAX_PREALLOCATED_CELLS: usize = 4096;

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("unexpected end of input while reading {expected}")]
    UnexpectedEof { expected: String },
    #[error("invalid integer {token:?} for {expected}")]
    InvalidInteger { token: String, expected: String },
    #[error("{label} must be a positive integer, got {value}")]
    NonPositiveDimension { label: String, value: i64 },
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

pub struct TokenReader<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> TokenReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    /// Next whitespace-separated token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<String>, ParseError> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
        Ok(self.pending.pop_front())
    }

    pub fn next_i64(&mut self, expected: &str) -> Result<i64, ParseError> {
        let token = self
            .next_token()?
            .ok_or_else(|| ParseError::UnexpectedEof {
                expected: expected.to_owned(),
            })?;
        token.parse().map_err(|_| ParseError::InvalidInteger {
            token,
            expected: expected.to_owned(),
        })
    }

    pub fn next_dimension(&mut self, label: &str) -> Result<usize, ParseError> {
        let value = self.next_i64(label)?;
        if value <= 0 {
            return Err(ParseError::NonPositiveDimension {
                label: label.to_owned(),
                value,
            });
        }
        usize::try_from(value).map_err(|_| ParseError::InvalidInteger {
            token: value.to_string(),
            expected: label.to_owned(),
        })
    }

    /// Reads `rows * cols` integers in row-major order.
    ///
    /// The buffer grows with the input, so a large declared shape followed by
    /// short input fails with `UnexpectedEof` instead of reserving memory.
    pub fn read_matrix(&mut self, dims: Dimensions, name: &str) -> Result<Matrix, ParseError> {
        let mut cells = Vec::with_capacity(dims.cell_count().min(MAX_PREALLOCATED_CELLS));
        for row in 0..dims.rows() {
            for col in 0..dims.cols() {
                let label = format!("{} element ({}, {})", name, row, col);
                cells.push(self.next_i64(&label)?);
            }
        }
        Ok(Matrix::with_dims(dims, cells)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(text: &str) -> TokenReader<Cursor<Vec<u8>>> {
        TokenReader::new(Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn tokens_span_lines_and_skip_blanks() {
        let mut tokens = reader("1 2\n\n   3\n4\t5");
        let values: Vec<i64> = (0..5).map(|_| tokens.next_i64("value").unwrap()).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
        assert!(tokens.next_token().unwrap().is_none());
    }

    #[test]
    fn non_numeric_token_is_rejected() {
        let mut tokens = reader("12 abc");
        assert_eq!(tokens.next_i64("rows").unwrap(), 12);
        match tokens.next_i64("cols") {
            Err(ParseError::InvalidInteger { token, expected }) => {
                assert_eq!(token, "abc");
                assert_eq!(expected, "cols");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn end_of_input_is_reported() {
        let mut tokens = reader("  \n");
        assert!(matches!(
            tokens.next_i64("rows"),
            Err(ParseError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn dimensions_must_be_positive() {
        let mut tokens = reader("0 -3 4");
        assert!(matches!(
            tokens.next_dimension("rows"),
            Err(ParseError::NonPositiveDimension { value: 0, .. })
        ));
        assert!(matches!(
            tokens.next_dimension("cols"),
            Err(ParseError::NonPositiveDimension { value: -3, .. })
        ));
        assert_eq!(tokens.next_dimension("rows").unwrap(), 4);
    }

    #[test]
    fn read_matrix_consumes_declared_cells() {
        let mut tokens = reader("1 2 3\n4 5 6\n7");
        let dims = Dimensions::new(2, 3).unwrap();
        let m = tokens.read_matrix(dims, "first matrix").unwrap();
        assert_eq!(m.to_rows(), vec![vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(tokens.next_i64("leftover").unwrap(), 7);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn huge_declared_shape_fails_on_short_input() {
        let mut tokens = reader("1 2");
        let dims = Dimensions::new(1 << 20, 1 << 20).unwrap();
        match tokens.read_matrix(dims, "first matrix") {
            Err(ParseError::UnexpectedEof { expected }) => {
                assert_eq!(expected, "first matrix element (0, 2)");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn unaddressable_shape_is_rejected_before_reading() {
        let mut tokens = reader("2147483648 2147483648 1 2");
        let rows = tokens.next_dimension("rows").unwrap();
        let cols = tokens.next_dimension("cols").unwrap();
        assert!(matches!(
            Dimensions::new(rows, cols),
            Err(MatrixError::TooLarge { .. })
        ));
    }

    #[test]
    fn short_matrix_names_missing_cell() {
        let mut tokens = reader("1 2 3");
        let dims = Dimensions::new(2, 2).unwrap();
        match tokens.read_matrix(dims, "second matrix") {
            Err(ParseError::UnexpectedEof { expected }) => {
                assert_eq!(expected, "second matrix element (1, 1)");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
