use super::{ActivationState, DeltaState, Sample, WeightStore};

/// Online gradient step for one sample. The only code that writes the weights during training.
pub fn apply(
  weights: &mut WeightStore,
  sample: &Sample,
  state: &ActivationState,
  deltas: &DeltaState,
  learning_rate: f32,
) {
  let dims = weights.dims();

  for j in 0..dims.num_outputs {
    let delta = deltas.delta_output[j];
    weights.output_bias[j] += delta * learning_rate;
    for k in 0..dims.num_hidden_nodes {
      weights.output_weights[(k, j)] += state.hidden_layer[k] * delta * learning_rate;
    }
  }

  for j in 0..dims.num_hidden_nodes {
    let delta = deltas.delta_hidden[j];
    weights.hidden_bias[j] += delta * learning_rate;
    for k in 0..dims.num_inputs {
      weights.hidden_weights[(k, j)] += sample.inputs[k] * delta * learning_rate;
    }
  }
}
