pub mod matrix;
pub mod multiply;

pub use matrix::Matrix;
pub use multiply::{multiply, MatrixMultiplier};
