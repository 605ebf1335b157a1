use std::{fmt, io, path::PathBuf};

pub type Result<T> = std::result::Result<T, TrainError>;

/// Everything that can abort a training or evaluation run.
/// None of these are recoverable mid-run: the whole invocation fails.
#[derive(Debug)]
pub enum TrainError {
  /// A layer size, the epoch count or the learning rate is not usable.
  InvalidDimension { name: &'static str, value: String },
  /// A sample disagrees with the configured network shape.
  ShapeMismatch {
    sample: usize,
    field: &'static str,
    expected: usize,
    found: usize,
  },
  /// Some weight became NaN or infinite after the update for `sample` in `epoch`.
  NumericDivergence { epoch: usize, sample: usize },
  EmptyDataset,
  Parse { line: usize, message: String },
  Io { path: PathBuf, source: io::Error },
}

impl TrainError {
  pub(crate) fn invalid(name: &'static str, value: impl ToString) -> Self {
    TrainError::InvalidDimension {
      name,
      value: value.to_string(),
    }
  }
}

impl fmt::Display for TrainError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TrainError::InvalidDimension { name, value } => {
        write!(f, "invalid {}: {} (must be positive)", name, value)
      }
      TrainError::ShapeMismatch {
        sample,
        field,
        expected,
        found,
      } => write!(
        f,
        "sample {} has {} {} values, expected {}",
        sample, found, field, expected
      ),
      TrainError::NumericDivergence { epoch, sample } => write!(
        f,
        "weights became non-finite in epoch {} after sample {}",
        epoch, sample
      ),
      TrainError::EmptyDataset => write!(f, "dataset contains no samples"),
      TrainError::Parse { line, message } => write!(f, "line {}: {}", line, message),
      TrainError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
    }
  }
}

impl std::error::Error for TrainError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      TrainError::Io { source, .. } => Some(source),
      _ => None,
    }
  }
}
