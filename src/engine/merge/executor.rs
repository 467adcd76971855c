use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::job::MergeJob;
use super::tool::{MergeTool, copy_single};
use crate::engine::errors::MergeError;

/// Runs merge jobs on a bounded pool of worker threads.
pub struct MergeExecutor {
    pool: ThreadPool,
    tool: Arc<dyn MergeTool>,
}

impl MergeExecutor {
    pub fn new(num_threads: usize, tool: Arc<dyn MergeTool>) -> Result<Self, MergeError> {
        if num_threads == 0 {
            return Err(MergeError::InvalidConfig(
                "number of threads must be positive".to_string(),
            ));
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("merge-worker-{}", i))
            .build()
            .map_err(|e| MergeError::ThreadPool(e.to_string()))?;

        Ok(Self { pool, tool })
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Executes all jobs of one pass and returns once every job has finished.
    /// The first failure is returned; jobs already running are allowed to end.
    pub fn run_pass(&self, pass: &str, jobs: &[MergeJob]) -> Result<(), MergeError> {
        let started = Instant::now();
        info!(
            target: "merge::executor",
            pass,
            jobs = jobs.len(),
            threads = self.num_threads(),
            "Starting merge pass"
        );

        self.pool
            .install(|| jobs.par_iter().try_for_each(|job| self.run_job(job)))?;

        info!(
            target: "merge::executor",
            pass,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Merge pass complete"
        );
        Ok(())
    }

    pub fn run_job(&self, job: &MergeJob) -> Result<(), MergeError> {
        for input in &job.inputs {
            if !input.is_file() {
                return Err(MergeError::MissingInput {
                    label: job.label.clone(),
                    path: input.clone(),
                });
            }
        }

        match job.inputs.as_slice() {
            [] => Err(MergeError::InvalidConfig(format!(
                "merge job {} has no inputs",
                job.label
            ))),
            [single] => {
                let bytes = copy_single(&job.label, &job.output, single)?;
                debug!(target: "merge::executor", job = %job.label, bytes, "Copied single input");
                Ok(())
            }
            inputs => {
                self.tool.merge(&job.label, &job.output, inputs)?;
                debug!(
                    target: "merge::executor",
                    job = %job.label,
                    tool = self.tool.name(),
                    inputs = inputs.len(),
                    "Merged inputs"
                );
                Ok(())
            }
        }
    }
}
