use anyhow::{bail, Context};
use matmulcore::{Dimensions, Matrix};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for generating random operands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub max_value: i64,
    /// Largest operand, in cells, the generator agrees to build.
    pub max_cells: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_value: 9,
            max_cells: 1_000_000,
        }
    }
}

impl GeneratorConfig {
    fn bound(&self) -> i64 {
        self.max_value.saturating_abs()
    }
}

fn build_matrix(
    dims: Dimensions,
    config: &GeneratorConfig,
    rng: &mut StdRng,
) -> anyhow::Result<Matrix> {
    if dims.cell_count() > config.max_cells {
        bail!(
            "refusing to generate a {} matrix: more than {} cells",
            dims,
            config.max_cells
        );
    }
    let bound = config.bound();
    let cells = (0..dims.cell_count())
        .map(|_| rng.gen_range(-bound..=bound))
        .collect();
    Matrix::with_dims(dims, cells).with_context(|| format!("building random {} matrix", dims))
}

/// Builds both operands from one seeded stream; the shapes need not conform.
pub fn generate_pair(
    left: Dimensions,
    right: Dimensions,
    config: &GeneratorConfig,
) -> anyhow::Result<(Matrix, Matrix)> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let lhs = build_matrix(left, config, &mut rng)?;
    let rhs = build_matrix(right, config, &mut rng)?;
    Ok((lhs, rhs))
}
