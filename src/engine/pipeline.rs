use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::engine::errors::MergeError;
use crate::engine::inventory::{NamingScheme, scan_directory};
use crate::engine::merge::{
    MergeExecutor, MergeJob, MergeTool, OutputNaming, block_jobs, part_jobs,
};
use crate::engine::partition::StrategyKind;
use crate::engine::validate::{EntryCounter, Validator};
use crate::shared::config::MergeConfig;

const WORK_DIR_PREFIX: &str = ".part-merge-";

/// Parameters of one merge run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input_dir: PathBuf,
    pub mask: String,
    pub out_dir: PathBuf,
    /// Target part size in bytes
    pub target_part_size: u64,
    pub max_block_length: usize,
    pub num_threads: usize,
    pub tree_name: String,
    pub keep_tmp_files: bool,
    pub strategy: StrategyKind,
    pub naming: NamingScheme,
}

impl RunOptions {
    pub fn from_config(cfg: &MergeConfig) -> Self {
        Self {
            input_dir: PathBuf::from(&cfg.input_dir),
            mask: cfg.mask.clone(),
            out_dir: PathBuf::from(&cfg.out_dir),
            target_part_size: cfg.target_size_bytes(),
            max_block_length: cfg.max_files_to_merge,
            num_threads: cfg.num_threads,
            tree_name: cfg.tree_name.clone(),
            keep_tmp_files: cfg.keep_tmp_files,
            strategy: cfg.strategy,
            naming: cfg.naming,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Final files, in part order
    pub outputs: Vec<PathBuf>,
    pub total_entries: u64,
    pub input_count: usize,
    pub part_count: usize,
    pub block_count: usize,
    /// Work directory left on disk when temporary files are kept
    pub kept_work_dir: Option<PathBuf>,
}

/// Scans, partitions, merges in two passes, publishes and validates.
///
/// On failure the work directory and whatever the failing job produced are
/// left in place; nothing already present in `out_dir` is overwritten.
pub fn run(
    options: &RunOptions,
    tool: Arc<dyn MergeTool>,
    counter: Arc<dyn EntryCounter>,
) -> Result<MergeReport, MergeError> {
    let naming = options.naming.convention();
    let files = scan_directory(&options.input_dir, &options.mask, naming.as_ref())?;
    let output_naming = OutputNaming::from_first_file(&files, naming.as_ref())?;

    let strategy = options
        .strategy
        .build(options.target_part_size, options.max_block_length)?;
    let partitioning = strategy.partition(&files);
    let part_count = partitioning.part_count();
    info!(
        target: "pipeline::run",
        files = files.len(),
        parts = part_count,
        blocks = partitioning.block_count(),
        strategy = ?options.strategy,
        "Planned merge"
    );
    for part in &partitioning.parts {
        debug!(
            target: "pipeline::run",
            part = part.part_index + 1,
            files = part.file_count(),
            blocks = part.blocks.len(),
            bytes = part.size(),
            "Part layout"
        );
    }

    fs::create_dir_all(&options.out_dir).map_err(|e| {
        MergeError::io(format!("Failed to create {}", options.out_dir.display()), e)
    })?;

    let final_names: Vec<String> = (0..part_count)
        .map(|i| output_naming.part_file(i, part_count))
        .collect();
    check_collisions(&options.out_dir, &final_names)?;

    let executor = MergeExecutor::new(options.num_threads, tool)?;

    let work_dir = tempfile::Builder::new()
        .prefix(WORK_DIR_PREFIX)
        .tempdir_in(&options.out_dir)
        .map_err(|e| MergeError::io("Failed to create temporary work directory", e))?
        .keep();
    info!(target: "pipeline::run", work_dir = %work_dir.display(), "Starting merging");

    let blocks = block_jobs(&partitioning, &output_naming, &work_dir);
    executor.run_pass("block", &blocks)?;

    let parts = part_jobs(&partitioning, &output_naming, &work_dir);
    executor.run_pass("part", &parts)?;

    if !options.keep_tmp_files {
        remove_outputs(&blocks)?;
    }

    let outputs = publish(&parts, &options.out_dir)?;

    let kept_work_dir = if options.keep_tmp_files {
        Some(work_dir)
    } else {
        fs::remove_dir_all(&work_dir).map_err(|e| {
            MergeError::io(format!("Failed to remove {}", work_dir.display()), e)
        })?;
        None
    };

    let inputs: Vec<PathBuf> = files.iter().map(|f| f.path.clone()).collect();
    let validator = Validator::new(counter, options.tree_name.clone());
    let total_entries = validator.validate(&inputs, &outputs)?;

    Ok(MergeReport {
        outputs,
        total_entries,
        input_count: files.len(),
        part_count,
        block_count: blocks.len(),
        kept_work_dir,
    })
}

/// Fails if any final output name is already taken in `out_dir`.
pub fn check_collisions(out_dir: &Path, names: &[String]) -> Result<(), MergeError> {
    for name in names {
        let path = out_dir.join(name);
        if path.symlink_metadata().is_ok() {
            return Err(MergeError::Collision { path });
        }
    }
    Ok(())
}

fn remove_outputs(jobs: &[MergeJob]) -> Result<(), MergeError> {
    for job in jobs {
        fs::remove_file(&job.output).map_err(|e| {
            MergeError::io(format!("Failed to remove {}", job.output.display()), e)
        })?;
    }
    Ok(())
}

/// Moves part outputs from the work directory into `out_dir` without ever
/// replacing an existing file.
fn publish(parts: &[MergeJob], out_dir: &Path) -> Result<Vec<PathBuf>, MergeError> {
    let mut published = Vec::with_capacity(parts.len());
    for job in parts {
        let Some(name) = job.output.file_name() else {
            return Err(MergeError::InvalidConfig(format!(
                "output of {} has no file name",
                job.label
            )));
        };
        let dest = out_dir.join(name);
        move_no_clobber(&job.output, &dest)?;
        info!(target: "pipeline::publish", output = %dest.display(), "Published part");
        published.push(dest);
    }
    Ok(published)
}

fn move_no_clobber(src: &Path, dest: &Path) -> Result<(), MergeError> {
    match fs::hard_link(src, dest) {
        Ok(()) => fs::remove_file(src)
            .map_err(|e| MergeError::io(format!("Failed to remove {}", src.display()), e)),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(MergeError::Collision {
            path: dest.to_path_buf(),
        }),
        Err(e) => {
            warn!(
                target: "pipeline::publish",
                error = %e,
                "Hard link unavailable, falling back to rename"
            );
            if dest.symlink_metadata().is_ok() {
                return Err(MergeError::Collision {
                    path: dest.to_path_buf(),
                });
            }
            fs::rename(src, dest).map_err(|e| {
                MergeError::io(
                    format!("Failed to move {} to {}", src.display(), dest.display()),
                    e,
                )
            })
        }
    }
}
