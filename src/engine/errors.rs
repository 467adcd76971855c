use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;
use tracing::{debug, error};

/// Errors that can abort a merge run.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("File name \"{file}\" does not follow the expected naming convention")]
    NamingConvention { file: String },

    #[error("Invalid file mask \"{mask}\": {reason}")]
    InvalidMask { mask: String, reason: String },

    #[error("No input files found in {}", dir.display())]
    NoInputFiles { dir: PathBuf },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Input file {} of job {label} is missing or unreadable", path.display())]
    MissingInput { label: String, path: PathBuf },

    #[error("Failed to start merge tool \"{program}\": {source}")]
    MergeToolSpawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Merge tool \"{program}\" failed for job {label} ({status})")]
    MergeTool {
        label: String,
        program: String,
        status: ExitStatus,
    },

    #[error("Output file {} already exists", path.display())]
    Collision { path: PathBuf },

    #[error("Failed to count entries in {}: {reason}", path.display())]
    Counter { path: PathBuf, reason: String },

    #[error("Entry total of \"{collection}\" does not fit in 64 bits")]
    CountOverflow { collection: String },

    #[error("Entry count mismatch: {input_total} in inputs, {output_total} in outputs")]
    DataLoss { input_total: u64, output_total: u64 },

    #[error("Worker pool error: {0}")]
    ThreadPool(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl MergeError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        MergeError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn log_error(&self) {
        match self {
            MergeError::NamingConvention { file } => {
                error!(file = %file, "Naming convention violated");
            }
            MergeError::InvalidMask { mask, reason } => {
                error!(mask = %mask, "Invalid mask: {}", reason);
            }
            MergeError::NoInputFiles { dir } => {
                error!(dir = %dir.display(), "No input files");
            }
            MergeError::InvalidConfig(e) => {
                error!("Invalid configuration: {}", e);
            }
            MergeError::MissingInput { label, path } => {
                error!(job = %label, path = %path.display(), "Missing input file");
            }
            MergeError::MergeToolSpawn { program, source } => {
                error!(program = %program, "Failed to start merge tool: {}", source);
                debug!("Spawn error details: {:?}", source);
            }
            MergeError::MergeTool {
                label,
                program,
                status,
            } => {
                error!(job = %label, program = %program, %status, "Merge tool failed");
            }
            MergeError::Collision { path } => {
                error!(path = %path.display(), "Refusing to overwrite existing output");
            }
            MergeError::Counter { path, reason } => {
                error!(path = %path.display(), "Entry counting failed: {}", reason);
            }
            MergeError::CountOverflow { collection } => {
                error!(collection = %collection, "Entry total overflowed");
            }
            MergeError::DataLoss {
                input_total,
                output_total,
            } => {
                error!(input_total, output_total, "Entry counts differ after merging");
            }
            MergeError::ThreadPool(e) => {
                error!("Worker pool error: {}", e);
            }
            MergeError::Io { context, source } => {
                error!("{}: {}", context, source);
                debug!("I/O error details: {:?}", source);
            }
        }
    }
}
