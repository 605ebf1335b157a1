use serde::Serialize;

use super::{Dims, Matrix, RandomMode, RandomSource, RAND_MAX};
use crate::error::{Result, TrainError};

/// All trainable parameters of the 2-layer network.
/// `hidden_weights` is `num_inputs x num_hidden_nodes`, `output_weights` is
/// `num_hidden_nodes x num_outputs`. Shapes never change after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightStore {
  pub(crate) hidden_weights: Matrix,
  pub(crate) hidden_bias: Vec<f32>,
  pub(crate) output_weights: Matrix,
  pub(crate) output_bias: Vec<f32>,
}

fn draw_weight<R: RandomSource + ?Sized>(rng: &mut R, mode: RandomMode) -> f32 {
  match mode {
    RandomMode::Unbiased => rng.next_random(),
    RandomMode::Legacy => rng.next_rand_max() as f32 / RAND_MAX as f32,
  }
}

impl WeightStore {
  /// Allocates every array and fills it with raw uniform draws, no scaling or centering.
  /// Draw order: hidden weights row by row, then per hidden node its bias followed by its
  /// outgoing weights, then the output biases.
  pub fn initialize<R: RandomSource + ?Sized>(
    dims: Dims,
    rng: &mut R,
    mode: RandomMode,
  ) -> Result<Self> {
    dims.validate()?;
    let hidden_weights = Matrix::from_fn(dims.num_inputs, dims.num_hidden_nodes, |_, _| {
      draw_weight(&mut *rng, mode)
    });
    let mut hidden_bias = Vec::with_capacity(dims.num_hidden_nodes);
    let mut output_weights = Matrix::zeros(dims.num_hidden_nodes, dims.num_outputs);
    for i in 0..dims.num_hidden_nodes {
      hidden_bias.push(draw_weight(rng, mode));
      for j in 0..dims.num_outputs {
        output_weights[(i, j)] = draw_weight(rng, mode);
      }
    }
    let output_bias = (0..dims.num_outputs)
      .map(|_| draw_weight(&mut *rng, mode))
      .collect();
    Ok(Self {
      hidden_weights,
      hidden_bias,
      output_weights,
      output_bias,
    })
  }

  /// Builds a store from explicit parameters, checking that the shapes agree.
  pub fn from_parts(
    hidden_weights: Matrix,
    hidden_bias: Vec<f32>,
    output_weights: Matrix,
    output_bias: Vec<f32>,
  ) -> Result<Self> {
    let dims = Dims::new(
      hidden_weights.rows(),
      hidden_weights.cols(),
      output_weights.cols(),
    )?;
    let checks = [
      ("hiddenBias", hidden_bias.len(), dims.num_hidden_nodes),
      ("outputWeights rows", output_weights.rows(), dims.num_hidden_nodes),
      ("outputBias", output_bias.len(), dims.num_outputs),
    ];
    for (name, found, expected) in checks {
      if found != expected {
        return Err(TrainError::invalid(
          name,
          format!("{} (expected {})", found, expected),
        ));
      }
    }
    Ok(Self {
      hidden_weights,
      hidden_bias,
      output_weights,
      output_bias,
    })
  }

  pub fn dims(&self) -> Dims {
    Dims {
      num_inputs: self.hidden_weights.rows(),
      num_hidden_nodes: self.hidden_weights.cols(),
      num_outputs: self.output_weights.cols(),
    }
  }

  pub fn hidden_weights(&self) -> &Matrix {
    &self.hidden_weights
  }

  pub fn hidden_bias(&self) -> &[f32] {
    &self.hidden_bias
  }

  pub fn output_weights(&self) -> &Matrix {
    &self.output_weights
  }

  pub fn output_bias(&self) -> &[f32] {
    &self.output_bias
  }

  pub fn is_finite(&self) -> bool {
    self.hidden_weights.is_finite()
      && self.output_weights.is_finite()
      && self.hidden_bias.iter().all(|b| b.is_finite())
      && self.output_bias.iter().all(|b| b.is_finite())
  }

  /// True when every array has the shape `dims` prescribes.
  pub fn has_shape(&self, dims: Dims) -> bool {
    self.hidden_weights.shape() == (dims.num_inputs, dims.num_hidden_nodes)
      && self.hidden_bias.len() == dims.num_hidden_nodes
      && self.output_weights.shape() == (dims.num_hidden_nodes, dims.num_outputs)
      && self.output_bias.len() == dims.num_outputs
  }
}
