use std::path::{Path, PathBuf};

use super::output_naming::OutputNaming;
use crate::engine::partition::Partitioning;

/// A single merge invocation: `inputs` are combined into `output`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeJob {
    /// Human-readable id used in logs and errors, e.g. `part1/block2`
    pub label: String,
    pub output: PathBuf,
    pub inputs: Vec<PathBuf>,
}

/// First pass: one job per block, merging its source files.
pub fn block_jobs(
    partitioning: &Partitioning,
    naming: &OutputNaming,
    work_dir: &Path,
) -> Vec<MergeJob> {
    partitioning
        .blocks()
        .map(|block| MergeJob {
            label: format!("part{}/block{}", block.part_index + 1, block.block_index + 1),
            output: work_dir.join(naming.block_file(block.part_index, block.block_index)),
            inputs: block.files.iter().map(|f| f.path.clone()).collect(),
        })
        .collect()
}

/// Second pass: one job per part, merging the outputs of its blocks in order.
pub fn part_jobs(
    partitioning: &Partitioning,
    naming: &OutputNaming,
    work_dir: &Path,
) -> Vec<MergeJob> {
    let part_count = partitioning.part_count();
    partitioning
        .parts
        .iter()
        .map(|part| MergeJob {
            label: format!("part{}", part.part_index + 1),
            output: work_dir.join(naming.part_file(part.part_index, part_count)),
            inputs: part
                .blocks
                .iter()
                .map(|b| work_dir.join(naming.block_file(b.part_index, b.block_index)))
                .collect(),
        })
        .collect()
}
