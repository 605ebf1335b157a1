use std::ops::{Index, IndexMut};

use serde::Serialize;

/// Dense row-major matrix with a shape fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matrix {
  rows: usize,
  cols: usize,
  data: Vec<f32>,
}

impl Matrix {
  pub fn zeros(rows: usize, cols: usize) -> Self {
    Self {
      rows,
      cols,
      data: vec![0.0; rows * cols],
    }
  }

  /// Fills the matrix row by row from `fill`.
  pub fn from_fn(rows: usize, cols: usize, mut fill: impl FnMut(usize, usize) -> f32) -> Self {
    let mut data = Vec::with_capacity(rows * cols);
    for r in 0..rows {
      for c in 0..cols {
        data.push(fill(r, c));
      }
    }
    Self { rows, cols, data }
  }

  /// Returns `None` unless `data.len() == rows * cols`.
  pub fn from_rows(rows: usize, cols: usize, data: Vec<f32>) -> Option<Self> {
    (data.len() == rows * cols).then_some(Self { rows, cols, data })
  }

  pub fn rows(&self) -> usize {
    self.rows
  }

  pub fn cols(&self) -> usize {
    self.cols
  }

  pub fn shape(&self) -> (usize, usize) {
    (self.rows, self.cols)
  }

  pub fn row(&self, r: usize) -> &[f32] {
    &self.data[r * self.cols..(r + 1) * self.cols]
  }

  pub fn as_slice(&self) -> &[f32] {
    &self.data
  }

  pub fn is_finite(&self) -> bool {
    self.data.iter().all(|w| w.is_finite())
  }
}

impl Index<(usize, usize)> for Matrix {
  type Output = f32;

  fn index(&self, (r, c): (usize, usize)) -> &f32 {
    debug_assert!(r < self.rows && c < self.cols);
    &self.data[r * self.cols + c]
  }
}

impl IndexMut<(usize, usize)> for Matrix {
  fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut f32 {
    debug_assert!(r < self.rows && c < self.cols);
    &mut self.data[r * self.cols + c]
  }
}
