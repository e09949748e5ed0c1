use crate::session::config::SessionConfig;
use crate::session::render::write_product;
use anyhow::Context;
use matmulcore::input::TokenReader;
use matmulcore::telemetry::MetricsSnapshot;
use matmulcore::{Dimensions, Matrix, MatrixMultiplier};
use std::io::{BufRead, Write};

/// Drives one multiplication: read operands, multiply, render.
pub struct Runner {
    config: SessionConfig,
    multiplier: MatrixMultiplier,
}

impl Runner {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            multiplier: MatrixMultiplier::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Interactive flow: four dimensions, then both matrices' elements.
    ///
    /// A non-conformable pair is rejected right after the dimensions are
    /// read, before any element is consumed.
    pub fn run<R: BufRead, W: Write>(&self, input: R, output: &mut W) -> anyhow::Result<Matrix> {
        let mut tokens = TokenReader::new(input);

        let r1 = self.ask_dimension(&mut tokens, output, "rows", "first")?;
        let c1 = self.ask_dimension(&mut tokens, output, "columns", "first")?;
        let r2 = self.ask_dimension(&mut tokens, output, "rows", "second")?;
        let c2 = self.ask_dimension(&mut tokens, output, "columns", "second")?;

        let left = Dimensions::new(r1, c1)?;
        let right = Dimensions::new(r2, c2)?;
        self.multiplier.check_conformable(&left, &right)?;

        self.prompt(output, "Enter elements of first matrix:\n")?;
        let lhs = tokens
            .read_matrix(left, "first matrix")
            .context("reading first matrix")?;
        self.prompt(output, "Enter elements of second matrix:\n")?;
        let rhs = tokens
            .read_matrix(right, "second matrix")
            .context("reading second matrix")?;

        self.run_pair(&lhs, &rhs, output)
    }

    /// Multiplies operands that were built elsewhere and renders the product.
    pub fn run_pair<W: Write>(
        &self,
        lhs: &Matrix,
        rhs: &Matrix,
        output: &mut W,
    ) -> anyhow::Result<Matrix> {
        let product = self.multiplier.multiply(lhs, rhs)?;
        write_product(output, &product, self.config.format, self.config.prompts)
            .context("writing product")?;
        Ok(product)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.multiplier.snapshot()
    }

    fn ask_dimension<R: BufRead, W: Write>(
        &self,
        tokens: &mut TokenReader<R>,
        output: &mut W,
        side: &str,
        which: &str,
    ) -> anyhow::Result<usize> {
        self.prompt(
            output,
            &format!("Enter number of {} for {} matrix: ", side, which),
        )?;
        let value = tokens.next_dimension(&format!("{} of {} matrix", side, which))?;
        Ok(value)
    }

    fn prompt<W: Write>(&self, output: &mut W, text: &str) -> anyhow::Result<()> {
        if self.config.prompts {
            output.write_all(text.as_bytes())?;
            output.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::config::OutputFormat;
    use matmulcore::input::ParseError;
    use matmulcore::MatrixError;
    use std::io::Cursor;

    fn run(config: SessionConfig, input: &str) -> (anyhow::Result<Matrix>, String) {
        let runner = Runner::new(config);
        let mut out = Vec::new();
        let result = runner.run(Cursor::new(input.as_bytes().to_vec()), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn runner_prompts_and_prints_product() {
        let (result, out) = run(SessionConfig::default(), "2 2\n2 2\n1 2\n3 4\n5 6\n7 8\n");
        assert_eq!(result.unwrap().to_rows(), vec![vec![19, 22], vec![43, 50]]);
        assert_eq!(
            out,
            "Enter number of rows for first matrix: \
             Enter number of columns for first matrix: \
             Enter number of rows for second matrix: \
             Enter number of columns for second matrix: \
             Enter elements of first matrix:\n\
             Enter elements of second matrix:\n\
             Product of the matrices:\n\
             19\t22\n43\t50\n"
        );
    }

    #[test]
    fn runner_without_prompts_prints_only_rows() {
        let config = SessionConfig::from_args(false, OutputFormat::Text);
        let (result, out) = run(config, "1 3 3 1 1 2 3 4 5 6");
        assert_eq!(result.unwrap()[(0, 0)], 32);
        assert_eq!(out, "32\n");
    }

    #[test]
    fn mismatch_stops_before_reading_elements() {
        let runner = Runner::new(SessionConfig::from_args(false, OutputFormat::Text));
        let mut out = Vec::new();
        let result = runner.run(Cursor::new(b"2 3 2 2 not numbers at all".to_vec()), &mut out);
        let err = result.unwrap_err();
        assert_eq!(
            err.downcast_ref::<MatrixError>(),
            Some(&MatrixError::DimensionMismatch {
                left_cols: 3,
                right_rows: 2
            })
        );
        assert!(out.is_empty());
        assert_eq!(runner.snapshot().mismatched, 1);
        assert_eq!(runner.snapshot().multiplied, 0);
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let config = SessionConfig::from_args(false, OutputFormat::Text);
        let (result, _) = run(config, "0 2 2 2");
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ParseError>(),
            Some(ParseError::NonPositiveDimension { value: 0, .. })
        ));
    }

    #[test]
    fn oversized_dimensions_are_an_error() {
        let config = SessionConfig::from_args(false, OutputFormat::Text);
        let (result, out) = run(config, "2147483648 2147483648 2147483648 2147483648 1 2");
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MatrixError>(),
            Some(MatrixError::TooLarge { .. })
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn truncated_elements_report_context() {
        let config = SessionConfig::from_args(false, OutputFormat::Text);
        let (result, _) = run(config, "1 1 1 1 5");
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.starts_with("reading second matrix"));
        assert!(message.contains("unexpected end of input"));
    }

    #[test]
    fn run_pair_counts_outcomes() {
        let runner = Runner::new(SessionConfig::from_args(false, OutputFormat::Json));
        let a = Matrix::from_rows(vec![vec![1, 2]]).unwrap();
        let b = Matrix::from_rows(vec![vec![3], vec![4]]).unwrap();
        let mut out = Vec::new();
        runner.run_pair(&a, &b, &mut out).unwrap();
        assert!(runner.run_pair(&a, &a, &mut out).is_err());
        let snapshot = runner.snapshot();
        assert_eq!((snapshot.multiplied, snapshot.failed()), (1, 1));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"rows\":1,\"cols\":1,\"data\":[[11]]}\n"
        );
    }
}
