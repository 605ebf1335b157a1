pub mod error;
pub mod model;
pub mod subcommands;
pub mod utils;

pub use error::{Result, TrainError};
pub use model::{predict, train, train_with_outcome, Activation, Dims, Sample, TrainParams, WeightStore};
