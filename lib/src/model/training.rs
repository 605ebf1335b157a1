use tracing::{debug, info, warn};

use super::{
  apply, backward, forward, DivergencePolicy, RandomSource, Sample, TrainParams, TrainingOrder,
  WeightStore,
};
use crate::error::{Result, TrainError};

/// Where a training run currently is. No convergence test exists: the loop always
/// runs the configured number of epochs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingState {
  /// Weights drawn, no epoch run yet.
  Initializing,
  /// Epoch `n` (0-based) has completed.
  Epoch(usize),
  ExhaustedEpochs,
}

/// Result of a finished run.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
  pub weights: WeightStore,
  pub final_state: TrainingState,
  pub iterations: usize,
  /// Bias-corrected running average of the per-sample squared error.
  pub loss_avg: f32,
  /// Some update produced a non-finite weight.
  pub diverged: bool,
}

/// Owns the weights for the whole run and drives epochs x shuffled samples x
/// (forward, backward, update). Nothing else can touch the weights until the loop is consumed.
pub struct TrainingLoop<'a, R: RandomSource + ?Sized> {
  samples: &'a [Sample],
  params: TrainParams,
  rng: &'a mut R,
  weights: WeightStore,
  order: TrainingOrder,
  state: TrainingState,
  loss_avg: ExponentialAverage,
  iterations: usize,
  diverged: bool,
}

impl<'a, R: RandomSource + ?Sized> TrainingLoop<'a, R> {
  /// Validates parameters and every sample, then draws the initial weights.
  pub fn new(samples: &'a [Sample], params: TrainParams, rng: &'a mut R) -> Result<Self> {
    params.validate()?;
    if samples.is_empty() {
      return Err(TrainError::EmptyDataset);
    }
    params.dims.check_samples(samples)?;
    let weights = WeightStore::initialize(params.dims, &mut *rng, params.random_mode)?;
    Ok(Self {
      samples,
      order: TrainingOrder::new(samples.len()),
      params,
      rng,
      weights,
      state: TrainingState::Initializing,
      loss_avg: ExponentialAverage::new(1.0),
      iterations: 0,
      diverged: false,
    })
  }

  pub fn state(&self) -> TrainingState {
    self.state
  }

  pub fn weights(&self) -> &WeightStore {
    &self.weights
  }

  fn next_epoch(&self) -> Option<usize> {
    match self.state {
      TrainingState::Initializing => Some(0),
      TrainingState::Epoch(n) if n + 1 < self.params.epochs => Some(n + 1),
      TrainingState::Epoch(_) | TrainingState::ExhaustedEpochs => None,
    }
  }

  /// Runs one full epoch: reshuffle, then one online update per sample.
  /// Returns the new state; after the last epoch this is `ExhaustedEpochs`.
  pub fn step_epoch(&mut self) -> Result<TrainingState> {
    let epoch = match self.next_epoch() {
      Some(epoch) => epoch,
      None => {
        self.state = TrainingState::ExhaustedEpochs;
        return Ok(self.state);
      }
    };

    self.order.shuffle(&mut *self.rng, self.params.random_mode);
    let activation = self.params.activation;
    for &i in self.order.as_slice() {
      let sample = &self.samples[i];
      let state = forward(sample, &self.weights, activation);
      let deltas = backward(sample, &state, &self.weights, activation);
      apply(
        &mut self.weights,
        sample,
        &state,
        &deltas,
        self.params.learning_rate,
      );

      let loss = sample
        .label
        .iter()
        .zip(&state.output_layer)
        .map(|(l, o)| (l - o) * (l - o))
        .sum::<f32>()
        / sample.label.len() as f32;
      self.loss_avg.update(loss);
      self.iterations += 1;

      if self.params.divergence != DivergencePolicy::Ignore && !self.weights.is_finite() {
        match self.params.divergence {
          DivergencePolicy::FailFast => {
            return Err(TrainError::NumericDivergence { epoch, sample: i });
          }
          _ if !self.diverged => {
            warn!(epoch, sample = i, "weights became non-finite, continuing");
          }
          _ => {}
        }
        self.diverged = true;
      }
    }

    debug!(epoch, loss = self.loss_avg.value, "epoch done");
    self.state = if epoch + 1 == self.params.epochs {
      TrainingState::ExhaustedEpochs
    } else {
      TrainingState::Epoch(epoch)
    };
    Ok(self.state)
  }

  /// Runs every remaining epoch and hands the weights back.
  pub fn run(mut self) -> Result<TrainingOutcome> {
    let start = std::time::Instant::now();
    while self.step_epoch()? != TrainingState::ExhaustedEpochs {}

    if self.iterations > 0 {
      info!("Finished in {} iterations", self.iterations);
      info!(
        "Took {:.2}s, {:.2}µs / iter",
        start.elapsed().as_secs_f32(),
        start.elapsed().as_micros() / self.iterations as u128
      );
    }

    let diverged = self.diverged || !self.weights.is_finite();
    Ok(TrainingOutcome {
      weights: self.weights,
      final_state: self.state,
      iterations: self.iterations,
      loss_avg: self.loss_avg.value,
      diverged,
    })
  }
}

/// Trains a fresh network and returns the final weights.
pub fn train<R: RandomSource + ?Sized>(
  samples: &[Sample],
  params: &TrainParams,
  rng: &mut R,
) -> Result<WeightStore> {
  train_with_outcome(samples, params, rng).map(|outcome| outcome.weights)
}

#[tracing::instrument(level = "info", skip_all, fields(
  samples = samples.len(),
  epochs = params.epochs,
  lr = params.learning_rate,
  activation = %params.activation,
))]
pub fn train_with_outcome<R: RandomSource + ?Sized>(
  samples: &[Sample],
  params: &TrainParams,
  rng: &mut R,
) -> Result<TrainingOutcome> {
  info!(dims = ?params.dims, "training");
  TrainingLoop::new(samples, params.clone(), rng)?.run()
}

pub struct ExponentialAverage {
  beta: f32,
  moment: f32,
  pub value: f32,
  t: i32,
}

impl ExponentialAverage {
  pub fn new(initial: f32) -> Self {
    ExponentialAverage {
      beta: 0.999,
      moment: 0.,
      value: initial,
      t: 0,
    }
  }

  pub fn update(&mut self, value: f32) {
    self.t += 1;
    self.moment = self.beta * self.moment + (1. - self.beta) * value;
    // bias correction
    self.value = self.moment / (1. - f32::powi(self.beta, self.t));
  }
}

#[cfg(test)]
mod tests {
  use proptest::prelude::*;

  use super::*;
  use crate::model::{
    mean_squared_error, xor_dataset, Activation, Dims, Lcg48, RandomMode, SeededRandom,
  };

  fn short_params(epochs: usize) -> TrainParams {
    TrainParams {
      epochs,
      ..TrainParams::fixture(Activation::Swish)
    }
  }

  #[test]
  fn state_machine_walks_through_epochs() {
    let samples = xor_dataset();
    let mut rng = SeededRandom::new(3);
    let mut lp = TrainingLoop::new(&samples, short_params(3), &mut rng).unwrap();
    assert_eq!(lp.state(), TrainingState::Initializing);
    assert_eq!(lp.step_epoch().unwrap(), TrainingState::Epoch(0));
    assert_eq!(lp.step_epoch().unwrap(), TrainingState::Epoch(1));
    assert_eq!(lp.step_epoch().unwrap(), TrainingState::ExhaustedEpochs);
    assert_eq!(lp.step_epoch().unwrap(), TrainingState::ExhaustedEpochs);
    let outcome = lp.run().unwrap();
    assert_eq!(outcome.iterations, 12);
    assert_eq!(outcome.final_state, TrainingState::ExhaustedEpochs);
  }

  #[test]
  fn single_epoch_run() {
    let samples = xor_dataset();
    let mut rng = SeededRandom::new(3);
    let outcome = train_with_outcome(&samples, &short_params(1), &mut rng).unwrap();
    assert_eq!(outcome.iterations, 4);
    assert_eq!(outcome.final_state, TrainingState::ExhaustedEpochs);
  }

  #[test]
  fn shape_mismatch_aborts_before_training() {
    let mut samples = xor_dataset();
    samples[2].inputs.push(1.0);
    let mut rng = SeededRandom::new(0);
    match train(&samples, &short_params(5), &mut rng) {
      Err(TrainError::ShapeMismatch { sample: 2, .. }) => {}
      other => panic!("expected ShapeMismatch, got {:?}", other),
    }
  }

  #[test]
  fn empty_dataset_and_zero_epochs_fail() {
    let mut rng = SeededRandom::new(0);
    assert!(matches!(
      train(&[], &short_params(5), &mut rng),
      Err(TrainError::EmptyDataset)
    ));
    assert!(matches!(
      train(&xor_dataset(), &short_params(0), &mut rng),
      Err(TrainError::InvalidDimension { .. })
    ));
  }

  #[test]
  fn identical_seeds_give_bit_identical_weights() {
    let samples = xor_dataset();
    for activation in [Activation::Swish, Activation::LeakyRelu] {
      let params = TrainParams {
        epochs: 200,
        ..TrainParams::fixture(activation)
      };
      let a = train(&samples, &params, &mut SeededRandom::new(99)).unwrap();
      let b = train(&samples, &params, &mut SeededRandom::new(99)).unwrap();
      let bits = |w: &WeightStore| {
        w.hidden_weights()
          .as_slice()
          .iter()
          .chain(w.hidden_bias())
          .chain(w.output_weights().as_slice())
          .chain(w.output_bias())
          .map(|x| x.to_bits())
          .collect::<Vec<_>>()
      };
      assert_eq!(bits(&a), bits(&b));
    }
  }

  #[test]
  fn trajectories_match_epoch_by_epoch() {
    let samples = xor_dataset();
    let params = short_params(20);
    let mut rng_a = Lcg48::new(5);
    let mut rng_b = Lcg48::new(5);
    let mut a = TrainingLoop::new(&samples, params.clone(), &mut rng_a).unwrap();
    let mut b = TrainingLoop::new(&samples, params, &mut rng_b).unwrap();
    loop {
      let sa = a.step_epoch().unwrap();
      let sb = b.step_epoch().unwrap();
      assert_eq!(sa, sb);
      assert_eq!(a.weights(), b.weights());
      if sa == TrainingState::ExhaustedEpochs {
        break;
      }
    }
  }

  #[test]
  fn training_reduces_xor_error() {
    let samples = xor_dataset();
    let params = TrainParams::fixture(Activation::Swish);
    let initial = WeightStore::initialize(params.dims, &mut Lcg48::new(1), params.random_mode).unwrap();
    let trained = train(&samples, &params, &mut Lcg48::new(1)).unwrap();
    let before = mean_squared_error(&samples, &initial, params.activation).unwrap();
    let after = mean_squared_error(&samples, &trained, params.activation).unwrap();
    assert!(after < before, "mse {} -> {}", before, after);
  }

  fn exploding_params(divergence: DivergencePolicy) -> TrainParams {
    TrainParams {
      epochs: 50,
      learning_rate: 1e30,
      divergence,
      ..TrainParams::fixture(Activation::LeakyRelu)
    }
  }

  #[test]
  fn divergence_policies() {
    let samples = xor_dataset();

    let ignored = train_with_outcome(&samples, &exploding_params(DivergencePolicy::Ignore), &mut SeededRandom::new(4)).unwrap();
    assert!(ignored.diverged);
    assert!(!ignored.weights.is_finite());
    assert_eq!(ignored.iterations, 200);

    let warned = train_with_outcome(&samples, &exploding_params(DivergencePolicy::Warn), &mut SeededRandom::new(4)).unwrap();
    assert!(warned.diverged);
    assert_eq!(warned.iterations, 200);

    match train(&samples, &exploding_params(DivergencePolicy::FailFast), &mut SeededRandom::new(4)) {
      Err(TrainError::NumericDivergence { epoch, .. }) => assert!(epoch < 50),
      other => panic!("expected NumericDivergence, got {:?}", other),
    }
  }

  #[test]
  fn exponential_average_bias_correction() {
    let mut avg = ExponentialAverage::new(1.0);
    avg.update(0.5);
    assert!((avg.value - 0.5).abs() < 1e-4);
    avg.update(0.5);
    assert!((avg.value - 0.5).abs() < 1e-4);
  }

  proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]
    #[test]
    fn shapes_survive_training(
      inputs in 1usize..4,
      hidden in 1usize..7,
      outputs in 1usize..3,
      seed in any::<u64>(),
      legacy in any::<bool>(),
    ) {
      let dims = Dims::new(inputs, hidden, outputs).unwrap();
      let samples: Vec<Sample> = (0..5)
        .map(|i| Sample::new(&vec![i as f32 / 5.0; inputs], &vec![(i % 2) as f32; outputs]))
        .collect();
      let params = TrainParams {
        dims,
        epochs: 3,
        random_mode: if legacy { RandomMode::Legacy } else { RandomMode::Unbiased },
        ..TrainParams::fixture(Activation::Swish)
      };
      let mut rng = SeededRandom::new(seed);
      let mut lp = TrainingLoop::new(&samples, params, &mut rng).unwrap();
      prop_assert!(lp.weights().has_shape(dims));
      while lp.step_epoch().unwrap() != TrainingState::ExhaustedEpochs {
        prop_assert!(lp.weights().has_shape(dims));
      }
      prop_assert!(lp.weights().has_shape(dims));
    }
  }
}
