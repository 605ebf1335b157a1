use super::{Activation, ActivationState, DeltaState, Sample, WeightStore};

/// Error deltas for one sample, output layer first, then pushed back through
/// the (not yet updated) output weights.
pub fn backward(
  sample: &Sample,
  state: &ActivationState,
  weights: &WeightStore,
  activation: Activation,
) -> DeltaState {
  let delta_output: Vec<f32> = sample
    .label
    .iter()
    .zip(&state.output_layer)
    .map(|(label, out)| (label - out) * activation.backward(*out))
    .collect();

  let delta_hidden = state
    .hidden_layer
    .iter()
    .enumerate()
    .map(|(j, hidden)| {
      let error = delta_output
        .iter()
        .enumerate()
        .fold(0.0, |acc, (k, d)| acc + d * weights.output_weights[(j, k)]);
      error * activation.backward(*hidden)
    })
    .collect();

  DeltaState {
    delta_output,
    delta_hidden,
  }
}
