use crate::generator::random::GeneratorConfig;
use anyhow::Context;
use clap::ValueEnum;
use matmulcore::Matrix;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Session settings, loaded from YAML or assembled from flags.
///
/// When both `left` and `right` are present the session multiplies them
/// directly instead of reading operands from input.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub prompts: bool,
    pub format: OutputFormat,
    pub left: Option<Matrix>,
    pub right: Option<Matrix>,
    pub generator: GeneratorConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prompts: true,
            format: OutputFormat::Text,
            left: None,
            right: None,
            generator: GeneratorConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading session config {}", path_ref.display()))?;
        let config: SessionConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing session config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(prompts: bool, format: OutputFormat) -> Self {
        Self {
            prompts,
            format,
            ..Default::default()
        }
    }

    /// Operands supplied inline, if the config carries both.
    pub fn operands(&self) -> Option<(&Matrix, &Matrix)> {
        self.left.as_ref().zip(self.right.as_ref())
    }
}
