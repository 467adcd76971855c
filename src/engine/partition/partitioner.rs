use tracing::debug;

use super::types::{Block, Part, Partitioning};
use crate::engine::errors::MergeError;
use crate::engine::inventory::InputFile;

/// Streaming greedy packer. Files are fed in scan order; each one either
/// extends the current part or starts the next, whichever leaves the part
/// size closer to the target.
#[derive(Debug, Clone)]
pub struct Partitioner {
    target_part_size: u64,
    max_block_length: usize,
    parts: Vec<Part>,
    current_part_size: u64,
}

impl Partitioner {
    pub fn new(target_part_size: u64, max_block_length: usize) -> Result<Self, MergeError> {
        if target_part_size == 0 {
            return Err(MergeError::InvalidConfig(
                "target part size must be positive".to_string(),
            ));
        }
        if max_block_length == 0 {
            return Err(MergeError::InvalidConfig(
                "maximal number of files per merge must be positive".to_string(),
            ));
        }

        Ok(Self {
            target_part_size,
            max_block_length,
            parts: vec![Part::new(0)],
            current_part_size: 0,
        })
    }

    pub fn add(&mut self, file: InputFile) {
        let new_part_size = self.current_part_size.saturating_add(file.size);

        if new_part_size <= self.target_part_size {
            self.push_file(file);
            return;
        }

        let overshoot = new_part_size - self.target_part_size;
        let undershoot = self.target_part_size - self.current_part_size.min(self.target_part_size);

        if overshoot < undershoot {
            self.push_file(file);
            self.close_part();
        } else {
            self.close_part();
            self.push_file(file);
        }
    }

    pub fn add_all(&mut self, files: impl IntoIterator<Item = InputFile>) {
        for file in files {
            self.add(file);
        }
    }

    /// Running size of the part currently being filled.
    pub fn current_part_size(&self) -> u64 {
        self.current_part_size
    }

    pub fn get_partitioning(mut self) -> Partitioning {
        self.parts.retain(|p| !p.is_empty());
        debug!(
            target: "partition::greedy",
            parts = self.parts.len(),
            blocks = self.parts.iter().map(|p| p.blocks.len()).sum::<usize>(),
            "Partitioning complete"
        );
        Partitioning { parts: self.parts }
    }

    fn push_file(&mut self, file: InputFile) {
        self.current_part_size = self.current_part_size.saturating_add(file.size);

        let max_block_length = self.max_block_length;
        let part = self.current_part_mut();
        let needs_block = part
            .blocks
            .last()
            .is_none_or(|b| b.len() >= max_block_length);
        if needs_block {
            let block_index = part.blocks.len();
            part.blocks.push(Block::new(part.part_index, block_index));
        }

        if let Some(block) = part.blocks.last_mut() {
            block.files.push(file);
        }
    }

    fn close_part(&mut self) {
        if self.current_part_mut().is_empty() {
            return;
        }
        let next_index = self.parts.len();
        self.parts.push(Part::new(next_index));
        self.current_part_size = 0;
    }

    fn current_part_mut(&mut self) -> &mut Part {
        if self.parts.is_empty() {
            self.parts.push(Part::new(0));
        }
        let last = self.parts.len() - 1;
        &mut self.parts[last]
    }
}
