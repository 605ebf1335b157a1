use std::path::Path;

use super::{Dims, Sample};
use crate::error::{Result, TrainError};

/// Inputs `[0,0] [0,1] [1,0] [1,1]` with labels `0 1 1 0`.
pub fn xor_dataset() -> Vec<Sample> {
  [([0.0f32, 0.0], 0.0f32), ([0.0, 1.0], 1.0), ([1.0, 0.0], 1.0), ([1.0, 1.0], 0.0)]
    .into_iter()
    .map(|(inputs, label)| Sample::new(&inputs, &[label]))
    .collect()
}

/// Rebuilds samples from flat arrays: `inputs_raw` holds `num_inputs` values per sample,
/// `labels_raw` holds the labels of all samples back to back.
pub fn from_raw(num_inputs: usize, inputs_raw: &[f32], labels_raw: &[f32]) -> Result<Vec<Sample>> {
  if num_inputs == 0 {
    return Err(TrainError::invalid("numInputs", num_inputs));
  }
  if inputs_raw.is_empty() {
    return Err(TrainError::EmptyDataset);
  }
  let count = inputs_raw.len() / num_inputs;
  if inputs_raw.len() % num_inputs != 0 {
    return Err(TrainError::ShapeMismatch {
      sample: count,
      field: "input",
      expected: num_inputs,
      found: inputs_raw.len() % num_inputs,
    });
  }
  if labels_raw.len() % count != 0 || labels_raw.is_empty() {
    return Err(TrainError::ShapeMismatch {
      sample: 0,
      field: "label",
      expected: count,
      found: labels_raw.len(),
    });
  }
  let num_outputs = labels_raw.len() / count;
  Ok(
    inputs_raw
      .chunks(num_inputs)
      .zip(labels_raw.chunks(num_outputs))
      .map(|(inputs, label)| Sample::new(inputs, label))
      .collect(),
  )
}

/// One sample per line: `num_inputs` inputs then `num_outputs` labels, whitespace separated.
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_dataset(content: &str, dims: Dims) -> Result<Vec<Sample>> {
  let width = dims.num_inputs + dims.num_outputs;
  let mut samples = Vec::new();
  for (line_no, line) in content.lines().enumerate() {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
      continue;
    }
    let values: Vec<f32> = line
      .split_whitespace()
      .map(|val| {
        val.parse::<f32>().map_err(|e| TrainError::Parse {
          line: line_no + 1,
          message: format!("'{}': {}", val, e),
        })
      })
      .collect::<Result<_>>()?;
    if values.len() < dims.num_inputs {
      return Err(TrainError::ShapeMismatch {
        sample: samples.len(),
        field: "input",
        expected: dims.num_inputs,
        found: values.len(),
      });
    }
    if values.len() != width {
      return Err(TrainError::ShapeMismatch {
        sample: samples.len(),
        field: "label",
        expected: dims.num_outputs,
        found: values.len() - dims.num_inputs,
      });
    }
    let (inputs, label) = values.split_at(dims.num_inputs);
    samples.push(Sample::new(inputs, label));
  }
  if samples.is_empty() {
    return Err(TrainError::EmptyDataset);
  }
  Ok(samples)
}

pub fn read_dataset(path: &Path, dims: Dims) -> Result<Vec<Sample>> {
  let content = std::fs::read_to_string(path).map_err(|source| TrainError::Io {
    path: path.to_path_buf(),
    source,
  })?;
  parse_dataset(&content, dims)
}
