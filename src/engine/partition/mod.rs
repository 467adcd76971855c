pub mod partitioner;
pub mod strategy;
pub mod types;

pub use partitioner::Partitioner;
pub use strategy::{EvenCountStrategy, GreedySizeStrategy, PartitionStrategy, StrategyKind};
pub use types::{Block, Part, Partitioning};
