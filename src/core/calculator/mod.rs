pub mod aggregator;
pub mod classifier;
pub mod completion;
pub mod resolver;
