use serde::{Deserialize, Serialize};

use super::Activation;
use crate::error::{Result, TrainError};
use crate::model::RandomMode;

/// Layer sizes of the network. All three are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dims {
  pub num_inputs: usize,
  pub num_hidden_nodes: usize,
  pub num_outputs: usize,
}

impl Dims {
  pub fn new(num_inputs: usize, num_hidden_nodes: usize, num_outputs: usize) -> Result<Self> {
    let dims = Self {
      num_inputs,
      num_hidden_nodes,
      num_outputs,
    };
    dims.validate()?;
    Ok(dims)
  }

  /// The 2-5-1 shape of the benchmark fixture.
  pub fn fixture() -> Self {
    Self {
      num_inputs: 2,
      num_hidden_nodes: 5,
      num_outputs: 1,
    }
  }

  pub fn validate(&self) -> Result<()> {
    for (name, value) in [
      ("numInputs", self.num_inputs),
      ("numHiddenNodes", self.num_hidden_nodes),
      ("numOutputs", self.num_outputs),
    ] {
      if value == 0 {
        return Err(TrainError::invalid(name, value));
      }
    }
    Ok(())
  }

  /// Checks input and label lengths of the sample at position `index`.
  pub fn check_sample(&self, index: usize, sample: &Sample) -> Result<()> {
    if sample.inputs.len() != self.num_inputs {
      return Err(TrainError::ShapeMismatch {
        sample: index,
        field: "input",
        expected: self.num_inputs,
        found: sample.inputs.len(),
      });
    }
    if sample.label.len() != self.num_outputs {
      return Err(TrainError::ShapeMismatch {
        sample: index,
        field: "label",
        expected: self.num_outputs,
        found: sample.label.len(),
      });
    }
    Ok(())
  }

  pub fn check_samples(&self, samples: &[Sample]) -> Result<()> {
    samples
      .iter()
      .enumerate()
      .try_for_each(|(i, s)| self.check_sample(i, s))
  }
}

/// One training example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
  pub inputs: Vec<f32>,
  pub label: Vec<f32>,
}

impl Sample {
  pub fn new(inputs: &[f32], label: &[f32]) -> Self {
    Self {
      inputs: inputs.to_vec(),
      label: label.to_vec(),
    }
  }
}

/// What to do when an update leaves a NaN or infinity in the weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DivergencePolicy {
  /// Keep training on the corrupted weights, like the fixture does.
  #[default]
  Ignore,
  /// Log once and keep going.
  Warn,
  /// Abort with `NumericDivergence`.
  FailFast,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainParams {
  pub dims: Dims,
  pub epochs: usize,
  pub learning_rate: f32,
  pub activation: Activation,
  pub random_mode: RandomMode,
  pub divergence: DivergencePolicy,
}

impl TrainParams {
  /// Presets of the benchmark fixtures: 2-5-1, 1000 epochs,
  /// lr 0.3 with Swish and lr 0.1 with leaky ReLU.
  pub fn fixture(activation: Activation) -> Self {
    let learning_rate = match activation {
      Activation::Swish => 0.3,
      Activation::LeakyRelu => 0.1,
    };
    Self {
      dims: Dims::fixture(),
      epochs: 1000,
      learning_rate,
      activation,
      random_mode: RandomMode::default(),
      divergence: DivergencePolicy::default(),
    }
  }

  pub fn validate(&self) -> Result<()> {
    self.dims.validate()?;
    if self.epochs == 0 {
      return Err(TrainError::invalid("epochs", self.epochs));
    }
    if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
      return Err(TrainError::invalid("learning rate", self.learning_rate));
    }
    Ok(())
  }
}

/// Layer outputs of one forward pass. Recomputed for every sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationState {
  pub hidden_layer: Vec<f32>,
  pub output_layer: Vec<f32>,
}

/// Error signals of one backward pass, already scaled by the activation derivative.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaState {
  pub delta_output: Vec<f32>,
  pub delta_hidden: Vec<f32>,
}
