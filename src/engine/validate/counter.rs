use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;

use crate::engine::errors::MergeError;
use crate::shared::config::{CounterConfig, CounterKind};

pub const FILE_PLACEHOLDER: &str = "{file}";
pub const COLLECTION_PLACEHOLDER: &str = "{collection}";

/// Reads the number of entries of a named record collection in a file.
pub trait EntryCounter: Send + Sync {
    fn count(&self, path: &Path, collection: &str) -> Result<u64, MergeError>;
}

/// Delegates counting to an external program that prints the count on stdout.
#[derive(Debug, Clone)]
pub struct CommandEntryCounter {
    program: String,
    args: Vec<String>,
}

impl CommandEntryCounter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn expand_args(&self, path: &Path, collection: &str) -> Vec<String> {
        let file = path.to_string_lossy();
        self.args
            .iter()
            .map(|a| {
                a.replace(FILE_PLACEHOLDER, &file)
                    .replace(COLLECTION_PLACEHOLDER, collection)
            })
            .collect()
    }
}

impl EntryCounter for CommandEntryCounter {
    fn count(&self, path: &Path, collection: &str) -> Result<u64, MergeError> {
        let counter_error = |reason: String| MergeError::Counter {
            path: path.to_path_buf(),
            reason,
        };

        let output = Command::new(&self.program)
            .args(self.expand_args(path, collection))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| counter_error(format!("failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(counter_error(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .trim()
            .parse::<u64>()
            .map_err(|_| counter_error(format!("unexpected counter output {:?}", stdout.trim())))
    }
}

/// Counter for the tagged text format: one record per line, written as
/// `<collection>\t<payload>`. Only lines tagged with the requested
/// collection are counted.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaggedLineCounter;

impl EntryCounter for TaggedLineCounter {
    fn count(&self, path: &Path, collection: &str) -> Result<u64, MergeError> {
        let file = File::open(path).map_err(|e| MergeError::Counter {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut total = 0u64;
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| MergeError::Counter {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            let tag = line.split('\t').next().unwrap_or_default();
            if !line.is_empty() && tag == collection {
                total += 1;
            }
        }
        Ok(total)
    }
}

pub fn counter_from_config(cfg: &CounterConfig) -> Arc<dyn EntryCounter> {
    match cfg.kind {
        CounterKind::Command => Arc::new(CommandEntryCounter::new(
            cfg.program.clone(),
            cfg.args.clone(),
        )),
        CounterKind::TaggedLines => Arc::new(TaggedLineCounter),
    }
}
