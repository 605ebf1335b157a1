use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Slope of the leaky ReLU for non-positive pre-activations.
pub const FORWARD_LEAK: f32 = 0.1;
/// Factor the leaky ReLU backward pass applies to the error of non-positive outputs.
/// Differs from `FORWARD_LEAK`; both values are kept as the fixture has them.
pub const BACKWARD_LEAK: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Activation {
  #[default]
  Swish,
  LeakyRelu,
}

impl Activation {
  pub fn forward(self, a: f32) -> f32 {
    match self {
      Activation::Swish => a / (1.0 + (-a).exp()),
      Activation::LeakyRelu => {
        if a * FORWARD_LEAK < a {
          a
        } else {
          FORWARD_LEAK * a
        }
      }
    }
  }

  /// Derivative factor evaluated on the activation output `y`.
  /// The Swish factor `(1 - y) / (1 + e^-y) + y` is an approximation, not the exact derivative.
  pub fn backward(self, y: f32) -> f32 {
    match self {
      Activation::Swish => (1.0 - y) / (1.0 + (-y).exp()) + y,
      Activation::LeakyRelu => {
        if y > 0.0 {
          1.0
        } else {
          BACKWARD_LEAK
        }
      }
    }
  }
}

impl fmt::Display for Activation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Activation::Swish => "swish",
      Activation::LeakyRelu => "leaky-relu",
    })
  }
}

impl FromStr for Activation {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "swish" => Ok(Activation::Swish),
      "leaky-relu" | "lrelu" | "leakyrelu" => Ok(Activation::LeakyRelu),
      other => Err(format!(
        "unknown activation '{}', expected swish or leaky-relu",
        other
      )),
    }
  }
}
