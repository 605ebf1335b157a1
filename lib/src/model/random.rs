use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Largest value of the C-style integer draw.
pub const RAND_MAX: u32 = 32767;

/// Source of uniform floats in [0,1). Used by weight initialization and by the shuffler.
/// Deterministic whenever the implementation is seeded.
pub trait RandomSource {
  fn next_random(&mut self) -> f32;

  /// Integer draw in [0, RAND_MAX].
  fn next_rand_max(&mut self) -> u32 {
    ((self.next_random() * (RAND_MAX + 1) as f32) as u32).min(RAND_MAX)
  }
}

/// Which arithmetic turns random draws into weights and shuffle indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RandomMode {
  /// `next_random()` for weights, `i + floor(u * (n - i))` for swaps.
  #[default]
  Unbiased,
  /// `rand() / 32767.0` for weights (may reach 1.0) and the scaled integer division
  /// `i + trunc(rand() / (32767.0 / (n - i) + 1))` for swaps. Slightly biased.
  Legacy,
}

/// `StdRng` behind the `RandomSource` capability.
#[derive(Debug, Clone)]
pub struct SeededRandom {
  rng: StdRng,
}

impl SeededRandom {
  pub fn new(seed: u64) -> Self {
    Self {
      rng: StdRng::seed_from_u64(seed),
    }
  }
}

impl RandomSource for SeededRandom {
  fn next_random(&mut self) -> f32 {
    self.rng.gen::<f32>()
  }
}

/// 48-bit linear congruential generator producing 15-bit `rand()` values, the
/// generator the legacy arithmetic was tuned against.
#[derive(Debug, Clone)]
pub struct Lcg48 {
  state: u64,
}

impl Lcg48 {
  const MULTIPLIER: u64 = 0x5_DEEC_E66D;
  const INCREMENT: u64 = 0xB;
  const MASK: u64 = (1 << 48) - 1;

  pub fn new(seed: u64) -> Self {
    Self {
      state: (seed ^ Self::MULTIPLIER) & Self::MASK,
    }
  }

  fn next_bits(&mut self, bits: u32) -> u32 {
    self.state = self
      .state
      .wrapping_mul(Self::MULTIPLIER)
      .wrapping_add(Self::INCREMENT)
      & Self::MASK;
    (self.state >> (48 - bits)) as u32
  }
}

impl RandomSource for Lcg48 {
  fn next_random(&mut self) -> f32 {
    self.next_rand_max() as f32 / (RAND_MAX + 1) as f32
  }

  fn next_rand_max(&mut self) -> u32 {
    self.next_bits(15)
  }
}

/// Replays a fixed list of draws, wrapping around at the end. Handy for hand-computed tests.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
  values: Vec<f32>,
  next: usize,
}

impl SequenceRandom {
  /// `values` must be non-empty and inside [0,1).
  pub fn new(values: Vec<f32>) -> Self {
    assert!(!values.is_empty(), "SequenceRandom needs at least one value");
    Self { values, next: 0 }
  }
}

impl RandomSource for SequenceRandom {
  fn next_random(&mut self) -> f32 {
    let value = self.values[self.next % self.values.len()];
    self.next += 1;
    value
  }
}
