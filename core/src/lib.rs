//! Core data model and multiplication routine for the matmul console.
//!
//! Matrices are validated at construction, so the multiply itself only has
//! to check conformability. Parsing lives in [`input`] and never touches the
//! arithmetic.

pub mod input;
pub mod math;
pub mod prelude;
pub mod telemetry;

pub use math::{multiply, Matrix, MatrixMultiplier};
pub use prelude::{Dimensions, MatrixError, MatrixResult};
