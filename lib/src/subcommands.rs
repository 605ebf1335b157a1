pub use report::*;
pub use train::*;

pub mod report;
pub mod train;
