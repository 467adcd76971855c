pub mod executor;
pub mod job;
pub mod output_naming;
pub mod tool;

pub use executor::MergeExecutor;
pub use job::{MergeJob, block_jobs, part_jobs};
pub use output_naming::OutputNaming;
pub use tool::{CommandMergeTool, ConcatMergeTool, MergeTool, tool_from_config};
