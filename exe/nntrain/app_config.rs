use std::{error::Error, path::Path};

use nntrain::model::{Activation, Dims, DivergencePolicy, RandomMode, TrainParams};
use serde::Deserialize;

/// Settings of a training run. Also defines the config file format (every field can be omitted).
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
  pub epochs: Option<usize>,
  pub learning_rate: Option<f32>,
  pub hidden_nodes: Option<usize>,
  pub activation: Option<Activation>,
  pub seed: Option<u64>,
  /// Reproduce the biased legacy arithmetic for weight init and shuffling
  pub legacy_rng: Option<bool>,
  pub divergence: Option<DivergencePolicy>,
  /// Where to write the JSON report
  pub report: Option<std::path::PathBuf>,
}

pub const DEFAULT_SEED: u64 = 1;

impl AppConfig {
  pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
    let content = std::fs::read_to_string(path)
      .map_err(|e| format!("Failed to read config {:?}: {}", path, e))?;
    Ok(serde_yaml::from_str(&content)?)
  }

  // merge configs where the second overwrites the first
  pub fn merge(self, other: Self) -> Self {
    Self {
      epochs: other.epochs.or(self.epochs),
      learning_rate: other.learning_rate.or(self.learning_rate),
      hidden_nodes: other.hidden_nodes.or(self.hidden_nodes),
      activation: other.activation.or(self.activation),
      seed: other.seed.or(self.seed),
      legacy_rng: other.legacy_rng.or(self.legacy_rng),
      divergence: other.divergence.or(self.divergence),
      report: other.report.or(self.report),
    }
  }

  pub fn seed(&self) -> u64 {
    self.seed.unwrap_or(DEFAULT_SEED)
  }

  /// Fixture presets for the chosen activation, overridden by whatever is set.
  /// `num_inputs` and `num_outputs` come from the dataset at hand.
  pub fn train_params(&self, num_inputs: usize, num_outputs: usize) -> nntrain::Result<TrainParams> {
    let activation = self.activation.unwrap_or_default();
    let preset = TrainParams::fixture(activation);
    let params = TrainParams {
      dims: Dims::new(
        num_inputs,
        self.hidden_nodes.unwrap_or(preset.dims.num_hidden_nodes),
        num_outputs,
      )?,
      epochs: self.epochs.unwrap_or(preset.epochs),
      learning_rate: self.learning_rate.unwrap_or(preset.learning_rate),
      activation,
      random_mode: if self.legacy_rng.unwrap_or(false) {
        RandomMode::Legacy
      } else {
        RandomMode::Unbiased
      },
      divergence: self.divergence.unwrap_or_default(),
    };
    params.validate()?;
    Ok(params)
  }
}
