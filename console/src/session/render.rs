use crate::session::config::OutputFormat;
use matmulcore::Matrix;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct ProductRecord<'a> {
    rows: usize,
    cols: usize,
    data: &'a Matrix,
}

/// Writes the product in the requested format. The text heading is only
/// printed alongside prompts.
pub fn write_product<W: Write>(
    writer: &mut W,
    product: &Matrix,
    format: OutputFormat,
    heading: bool,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            if heading {
                writeln!(writer, "Product of the matrices:")?;
            }
            writeln!(writer, "{}", product)?;
        }
        OutputFormat::Json => {
            let record = ProductRecord {
                rows: product.rows(),
                cols: product.cols(),
                data: product,
            };
            serde_json::to_writer(&mut *writer, &record)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
