pub mod tokens;

pub use tokens::{ParseError, TokenReader};
