use super::{forward, Activation, Sample, WeightStore};
use crate::error::Result;

/// Output layer for every sample, index-aligned with `samples`. Never writes the weights.
pub fn predict(
  samples: &[Sample],
  weights: &WeightStore,
  activation: Activation,
) -> Result<Vec<Vec<f32>>> {
  let dims = weights.dims();
  samples
    .iter()
    .enumerate()
    .map(|(i, sample)| {
      dims.check_sample(i, sample)?;
      Ok(forward(sample, weights, activation).output_layer)
    })
    .collect()
}

/// Mean of the squared output errors over all samples and outputs.
pub fn mean_squared_error(
  samples: &[Sample],
  weights: &WeightStore,
  activation: Activation,
) -> Result<f32> {
  let predictions = predict(samples, weights, activation)?;
  let (sum, count) = samples
    .iter()
    .zip(&predictions)
    .flat_map(|(s, p)| s.label.iter().zip(p))
    .fold((0.0f32, 0usize), |(sum, count), (l, p)| {
      (sum + (l - p) * (l - p), count + 1)
    });
  Ok(if count == 0 { 0.0 } else { sum / count as f32 })
}
