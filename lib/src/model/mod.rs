pub mod activation;
pub mod backward;
pub mod dataset;
pub mod evaluate;
pub mod forward;
pub mod matrix;
pub mod random;
pub mod shuffle;
pub mod training;
pub mod types;
pub mod update;
pub mod weights;

pub use activation::*;
pub use backward::backward;
pub use dataset::*;
pub use evaluate::*;
pub use forward::forward;
pub use matrix::*;
pub use random::*;
pub use shuffle::TrainingOrder;
pub use training::*;
pub use types::*;
pub use update::apply;
pub use weights::*;
