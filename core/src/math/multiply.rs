use crate::math::matrix::Matrix;
use crate::prelude::{Dimensions, MatrixError, MatrixResult};
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::{MetricsRecorder, MetricsSnapshot};
use log::{debug, warn};

/// Multiplies `lhs` by `rhs` with the direct triple loop.
///
/// Fails with [`MatrixError::DimensionMismatch`] before touching any cell when
/// `lhs.cols() != rhs.rows()`, and with [`MatrixError::Overflow`] when a
/// product cell does not fit in an `i64`. No partial product is returned.
pub fn multiply(lhs: &Matrix, rhs: &Matrix) -> MatrixResult<Matrix> {
    let shape = lhs.dims().product_with(&rhs.dims())?;
    let inner = lhs.cols();

    let mut cells = Vec::with_capacity(shape.cell_count());
    for row in 0..shape.rows() {
        for col in 0..shape.cols() {
            let mut acc: i64 = 0;
            for k in 0..inner {
                acc = lhs[(row, k)]
                    .checked_mul(rhs[(k, col)])
                    .and_then(|term| acc.checked_add(term))
                    .ok_or(MatrixError::Overflow { row, col })?;
            }
            cells.push(acc);
        }
    }

    Matrix::with_dims(shape, cells)
}

/// Stateless multiplier that records what it did.
pub struct MatrixMultiplier {
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl MatrixMultiplier {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new(),
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn multiply(&self, lhs: &Matrix, rhs: &Matrix) -> MatrixResult<Matrix> {
        debug!("multiplying {} by {}", lhs.dims(), rhs.dims());
        match multiply(lhs, rhs) {
            Ok(product) => {
                self.metrics.record_multiplied();
                self.logger
                    .record(&format!("MatrixMultiplier produced {}", product.dims()));
                Ok(product)
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    /// Checks shapes ahead of reading any cells, counting a refusal the same
    /// way `multiply` would.
    pub fn check_conformable(&self, left: &Dimensions, right: &Dimensions) -> MatrixResult<()> {
        left.check_conformable(right).map_err(|err| self.reject(err))
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn reject(&self, err: MatrixError) -> MatrixError {
        self.metrics.record_rejected(&err);
        warn!("MatrixMultiplier rejected operands: {}", err);
        err
    }
}

impl Default for MatrixMultiplier {
    fn default() -> Self {
        Self::new()
    }
}
