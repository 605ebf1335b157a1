use itertools::Itertools;
use serde::Serialize;

use crate::model::{Activation, Sample};

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
  pub inputs: Vec<f32>,
  pub output: Vec<f32>,
  pub expected: Vec<f32>,
}

/// Predictions of a finished run next to the labels they were trained against.
/// Written as JSON with `--report`; weights themselves are never stored.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
  pub activation: Activation,
  pub epochs: usize,
  pub learning_rate: f32,
  pub iterations: usize,
  pub mse: f32,
  pub diverged: bool,
  pub entries: Vec<ReportEntry>,
}

impl Report {
  pub fn entries_from(samples: &[Sample], predictions: Vec<Vec<f32>>) -> Vec<ReportEntry> {
    samples
      .iter()
      .zip(predictions)
      .map(|(sample, output)| ReportEntry {
        inputs: sample.inputs.clone(),
        output,
        expected: sample.label.clone(),
      })
      .collect()
  }

  /// One block per sample: inputs, network output, expected output.
  pub fn render(&self) -> String {
    let mut out: String = self
      .entries
      .iter()
      .map(|entry| {
        format!(
          "Input {}\nOutput {}\nExpected output {}\n\n",
          entry.inputs.iter().join(" "),
          entry.output.iter().join(" "),
          entry.expected.iter().join(" "),
        )
      })
      .collect();
    out.push_str(&format!(
      "MSE {:.6}{}\n",
      self.mse,
      if self.diverged { " (diverged)" } else { "" }
    ));
    out
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_one_block_per_sample() {
    let samples = vec![Sample::new(&[0.0, 1.0], &[1.0]), Sample::new(&[1.0, 1.0], &[0.0])];
    let report = Report {
      activation: Activation::Swish,
      epochs: 1,
      learning_rate: 0.3,
      iterations: 2,
      mse: 0.125,
      diverged: false,
      entries: Report::entries_from(&samples, vec![vec![0.5], vec![0.25]]),
    };
    let text = report.render();
    assert!(text.starts_with("Input 0 1\nOutput 0.5\nExpected output 1\n\n"));
    assert!(text.contains("Input 1 1\nOutput 0.25\nExpected output 0\n"));
    assert!(text.ends_with("MSE 0.125000\n"));
    assert_eq!(text.matches("Expected output").count(), 2);
  }

  #[test]
  fn serializes_activation_name() {
    let report = Report {
      activation: Activation::LeakyRelu,
      epochs: 1,
      learning_rate: 0.1,
      iterations: 0,
      mse: 0.0,
      diverged: true,
      entries: vec![],
    };
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"activation\":\"leaky-relu\""));
    assert!(json.contains("\"diverged\":true"));
  }
}
