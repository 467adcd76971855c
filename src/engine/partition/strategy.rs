use serde::{Deserialize, Serialize};

use super::partitioner::Partitioner;
use super::types::{Block, Part, Partitioning};
use crate::engine::errors::MergeError;
use crate::engine::inventory::InputFile;

/// Strategy for grouping ordered input files into parts and blocks.
pub trait PartitionStrategy {
    fn partition(&self, files: &[InputFile]) -> Partitioning;
}

/// Size-driven greedy packing (see [`Partitioner`]).
#[derive(Debug, Clone)]
pub struct GreedySizeStrategy {
    empty: Partitioner,
}

impl GreedySizeStrategy {
    pub fn new(target_part_size: u64, max_block_length: usize) -> Result<Self, MergeError> {
        Ok(Self {
            empty: Partitioner::new(target_part_size, max_block_length)?,
        })
    }
}

impl PartitionStrategy for GreedySizeStrategy {
    fn partition(&self, files: &[InputFile]) -> Partitioning {
        let mut partitioner = self.empty.clone();
        partitioner.add_all(files.iter().cloned());
        partitioner.get_partitioning()
    }
}

/// Count-driven split: the number of parts is `floor(total / target)` (at
/// least one) and every part gets the same number of files, except the last.
#[derive(Debug, Clone, Copy)]
pub struct EvenCountStrategy {
    target_part_size: u64,
    max_block_length: usize,
}

impl EvenCountStrategy {
    pub fn new(target_part_size: u64, max_block_length: usize) -> Result<Self, MergeError> {
        if target_part_size == 0 || max_block_length == 0 {
            return Err(MergeError::InvalidConfig(
                "target part size and files per merge must be positive".to_string(),
            ));
        }
        Ok(Self {
            target_part_size,
            max_block_length,
        })
    }
}

impl PartitionStrategy for EvenCountStrategy {
    fn partition(&self, files: &[InputFile]) -> Partitioning {
        if files.is_empty() {
            return Partitioning::default();
        }

        let total: u64 = files.iter().map(|f| f.size).sum();
        let n_parts = ((total / self.target_part_size) as usize).clamp(1, files.len());
        let files_per_part = files.len().div_ceil(n_parts);

        let mut parts: Vec<Part> = Vec::new();
        for (i, file) in files.iter().enumerate() {
            let pos_in_part = i % files_per_part;
            if pos_in_part == 0 {
                parts.push(Part::new(parts.len()));
            }
            let Some(part) = parts.last_mut() else {
                continue;
            };
            if pos_in_part % self.max_block_length == 0 {
                part.blocks.push(Block::new(part.part_index, part.blocks.len()));
            }
            if let Some(block) = part.blocks.last_mut() {
                block.files.push(file.clone());
            }
        }

        Partitioning { parts }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    Greedy,
    Even,
}

impl StrategyKind {
    pub fn build(
        self,
        target_part_size: u64,
        max_block_length: usize,
    ) -> Result<Box<dyn PartitionStrategy>, MergeError> {
        Ok(match self {
            StrategyKind::Greedy => {
                Box::new(GreedySizeStrategy::new(target_part_size, max_block_length)?)
            }
            StrategyKind::Even => {
                Box::new(EvenCountStrategy::new(target_part_size, max_block_length)?)
            }
        })
    }
}
