use super::{Activation, ActivationState, Sample, WeightStore};

/// Propagates one sample through both layers. Pure: reads the weights and nothing else.
///
/// The sample must already match `weights.dims()`; callers check this once per run.
pub fn forward(sample: &Sample, weights: &WeightStore, activation: Activation) -> ActivationState {
  let dims = weights.dims();
  debug_assert_eq!(sample.inputs.len(), dims.num_inputs);

  let hidden_layer: Vec<f32> = (0..dims.num_hidden_nodes)
    .map(|j| {
      let pre = sample
        .inputs
        .iter()
        .enumerate()
        .fold(weights.hidden_bias[j], |acc, (k, x)| {
          acc + x * weights.hidden_weights[(k, j)]
        });
      activation.forward(pre)
    })
    .collect();

  let output_layer = (0..dims.num_outputs)
    .map(|j| {
      let pre = hidden_layer
        .iter()
        .enumerate()
        .fold(weights.output_bias[j], |acc, (k, h)| {
          acc + h * weights.output_weights[(k, j)]
        });
      activation.forward(pre)
    })
    .collect();

  ActivationState {
    hidden_layer,
    output_layer,
  }
}

#[cfg(test)]
mod tests {
  use proptest::prelude::*;

  use super::*;
  use crate::model::{Dims, Matrix, RandomMode, SeededRandom};

  #[test]
  fn hand_computed_leaky_relu_pass() {
    let weights = WeightStore::from_parts(
      Matrix::from_rows(2, 2, vec![1.0, -1.0, 0.5, 0.5]).unwrap(),
      vec![0.0, -1.0],
      Matrix::from_rows(2, 1, vec![2.0, 3.0]).unwrap(),
      vec![0.25],
    )
    .unwrap();
    let sample = Sample::new(&[1.0, 2.0], &[0.0]);
    let state = forward(&sample, &weights, Activation::LeakyRelu);
    // hidden pre: [0 + 1 + 1, -1 - 1 + 1] = [2, -1]
    assert_eq!(state.hidden_layer, vec![2.0, -0.1]);
    // output pre: 0.25 + 4 - 0.3
    assert!((state.output_layer[0] - 3.95).abs() < 1e-6);
  }

  proptest! {
    #[test]
    fn forward_is_pure(seed in any::<u64>(), a in -5.0f32..5.0, b in -5.0f32..5.0, swish in any::<bool>()) {
      let activation = if swish { Activation::Swish } else { Activation::LeakyRelu };
      let mut rng = SeededRandom::new(seed);
      let weights = WeightStore::initialize(Dims::fixture(), &mut rng, RandomMode::Unbiased).unwrap();
      let before = weights.clone();
      let sample = Sample::new(&[a, b], &[0.0]);
      let first = forward(&sample, &weights, activation);
      let second = forward(&sample, &weights, activation);
      prop_assert_eq!(&first, &second);
      prop_assert_eq!(&weights, &before);
      prop_assert_eq!(first.hidden_layer.len(), 5);
      prop_assert_eq!(first.output_layer.len(), 1);
    }
  }
}
