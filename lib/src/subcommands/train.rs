use std::path::{Path, PathBuf};

use tracing::info;

use super::Report;
use crate::{
  error::Result,
  model::{
    mean_squared_error, predict, read_dataset, train_with_outcome, xor_dataset, Lcg48,
    RandomMode, RandomSource, Sample, SeededRandom, TrainParams,
  },
  utils::serialize_to_file,
};

/// Trains on a dataset, evaluates the result on the same samples and reports it.
pub struct Train {
  samples: Vec<Sample>,
  params: TrainParams,
  seed: u64,
  report_path: Option<PathBuf>,
}

impl Train {
  pub fn new(samples: Vec<Sample>, params: TrainParams, seed: u64) -> Self {
    Self {
      samples,
      params,
      seed,
      report_path: None,
    }
  }

  pub fn from_file(dataset_path: &Path, params: TrainParams, seed: u64) -> Result<Self> {
    let samples = read_dataset(dataset_path, params.dims)?;
    Ok(Self::new(samples, params, seed))
  }

  /// The benchmark fixture: XOR set with the preset parameters.
  pub fn xor(params: TrainParams, seed: u64) -> Self {
    Self::new(xor_dataset(), params, seed)
  }

  pub fn with_report(mut self, path: Option<PathBuf>) -> Self {
    self.report_path = path;
    self
  }

  fn random_source(&self) -> Box<dyn RandomSource> {
    match self.params.random_mode {
      RandomMode::Unbiased => Box::new(SeededRandom::new(self.seed)),
      RandomMode::Legacy => Box::new(Lcg48::new(self.seed)),
    }
  }

  #[tracing::instrument(level = "info", name = "train", skip_all, fields(seed = self.seed))]
  pub fn run(self) -> Result<Report> {
    let mut rng = self.random_source();
    let outcome = train_with_outcome(&self.samples, &self.params, rng.as_mut())?;
    let predictions = predict(&self.samples, &outcome.weights, self.params.activation)?;
    let mse = mean_squared_error(&self.samples, &outcome.weights, self.params.activation)?;
    info!(mse, loss_avg = outcome.loss_avg, "evaluated");

    let report = Report {
      activation: self.params.activation,
      epochs: self.params.epochs,
      learning_rate: self.params.learning_rate,
      iterations: outcome.iterations,
      mse,
      diverged: outcome.diverged,
      entries: Report::entries_from(&self.samples, predictions),
    };
    if let Some(path) = &self.report_path {
      serialize_to_file(path, &report)?;
      info!("report written to {}", path.display());
    }
    Ok(report)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::Activation;
  use crate::utils;

  #[test]
  fn xor_fixture_runs_in_both_modes() {
    let _scope = utils::init_logging_tests();
    for mode in [RandomMode::Unbiased, RandomMode::Legacy] {
      let params = TrainParams {
        epochs: 50,
        random_mode: mode,
        ..TrainParams::fixture(Activation::Swish)
      };
      let report = Train::xor(params, 11).run().unwrap();
      assert_eq!(report.entries.len(), 4);
      assert_eq!(report.iterations, 200);
      assert!(report.mse.is_finite());
    }
  }

  #[test]
  fn legacy_run_is_reproducible() {
    let params = TrainParams {
      epochs: 100,
      random_mode: RandomMode::Legacy,
      ..TrainParams::fixture(Activation::LeakyRelu)
    };
    let a = Train::xor(params.clone(), 3).run().unwrap();
    let b = Train::xor(params, 3).run().unwrap();
    let outputs = |r: &Report| r.entries.iter().map(|e| e.output[0].to_bits()).collect::<Vec<_>>();
    assert_eq!(outputs(&a), outputs(&b));
  }

  #[test]
  fn writes_report_file() {
    let path = std::env::temp_dir().join(format!("nntrain-report-{}.json", std::process::id()));
    let params = TrainParams {
      epochs: 10,
      ..TrainParams::fixture(Activation::Swish)
    };
    Train::xor(params, 1).with_report(Some(path.clone())).run().unwrap();
    let json: serde_json::Value =
      serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["entries"].as_array().map(|a| a.len()), Some(4));
    assert_eq!(json["activation"], "swish");
    std::fs::remove_file(&path).unwrap();
  }

  #[test]
  fn dataset_file_is_loaded() {
    let path = std::env::temp_dir().join(format!("nntrain-data-{}.txt", std::process::id()));
    std::fs::write(&path, "0 0 0\n0 1 1\n1 0 1\n1 1 0\n").unwrap();
    let params = TrainParams {
      epochs: 5,
      ..TrainParams::fixture(Activation::Swish)
    };
    let report = Train::from_file(&path, params, 2).unwrap().run().unwrap();
    assert_eq!(report.entries[3].expected, vec![0.0]);
    std::fs::remove_file(&path).unwrap();
  }
}
