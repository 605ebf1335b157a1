use super::{RandomMode, RandomSource, RAND_MAX};

/// Visiting order of the samples within one epoch. Always a permutation of `0..n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingOrder {
  order: Vec<usize>,
}

impl TrainingOrder {
  /// Identity order `0..n`.
  pub fn new(n: usize) -> Self {
    Self {
      order: (0..n).collect(),
    }
  }

  pub fn as_slice(&self) -> &[usize] {
    &self.order
  }

  pub fn len(&self) -> usize {
    self.order.len()
  }

  pub fn is_empty(&self) -> bool {
    self.order.is_empty()
  }

  /// In-place Fisher-Yates pass: for each `i < n - 1` swap position `i` with a draw `j` in `[i, n)`.
  pub fn shuffle<R: RandomSource + ?Sized>(&mut self, rng: &mut R, mode: RandomMode) {
    shuffle(self.order.as_mut_slice(), rng, mode)
  }
}

pub fn shuffle<T, R: RandomSource + ?Sized>(items: &mut [T], rng: &mut R, mode: RandomMode) {
  let n = items.len();
  for i in 0..n.saturating_sub(1) {
    let remaining = n - i;
    let offset = match mode {
      RandomMode::Unbiased => ((rng.next_random() * remaining as f32) as usize).min(remaining - 1),
      RandomMode::Legacy => {
        let r = rng.next_rand_max() as f32;
        (r / (RAND_MAX as f32 / remaining as f32 + 1.0)) as usize
      }
    };
    items.swap(i, i + offset);
  }
}
