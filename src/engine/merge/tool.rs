use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::engine::errors::MergeError;
use crate::shared::config::{ToolConfig, ToolKind};

pub const OUTPUT_PLACEHOLDER: &str = "{output}";
pub const INPUTS_PLACEHOLDER: &str = "{inputs}";

/// Combines several files of one format into a single file.
pub trait MergeTool: Send + Sync {
    fn merge(&self, label: &str, output: &Path, inputs: &[PathBuf]) -> Result<(), MergeError>;

    fn name(&self) -> &str;
}

/// Runs an external program once per job.
///
/// Arguments are a template: `{output}` is substituted anywhere inside an
/// argument, and an argument that is exactly `{inputs}` expands to every
/// input path in order.
#[derive(Debug, Clone)]
pub struct CommandMergeTool {
    program: String,
    args: Vec<String>,
    capture_output: bool,
}

impl CommandMergeTool {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            capture_output: false,
        }
    }

    /// ROOT's `hadd` in quiet mode.
    pub fn hadd() -> Self {
        Self::new(
            "hadd",
            vec![
                "-v0".to_string(),
                OUTPUT_PLACEHOLDER.to_string(),
                INPUTS_PLACEHOLDER.to_string(),
            ],
        )
    }

    pub fn with_capture_output(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }

    pub fn expand_args(&self, output: &Path, inputs: &[PathBuf]) -> Vec<OsString> {
        let output_str = output.to_string_lossy();
        let mut expanded = Vec::with_capacity(self.args.len() + inputs.len());
        for arg in &self.args {
            if arg == INPUTS_PLACEHOLDER {
                expanded.extend(inputs.iter().map(|p| p.as_os_str().to_os_string()));
            } else if arg == OUTPUT_PLACEHOLDER {
                expanded.push(output.as_os_str().to_os_string());
            } else {
                expanded.push(OsString::from(arg.replace(OUTPUT_PLACEHOLDER, &output_str)));
            }
        }
        expanded
    }
}

impl MergeTool for CommandMergeTool {
    fn merge(&self, label: &str, output: &Path, inputs: &[PathBuf]) -> Result<(), MergeError> {
        let args = self.expand_args(output, inputs);
        debug!(
            target: "merge::tool",
            job = %label,
            program = %self.program,
            inputs = inputs.len(),
            output = %output.display(),
            "Invoking merge tool"
        );

        let stderr = if self.capture_output {
            Stdio::piped()
        } else {
            Stdio::null()
        };

        let result = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(stderr)
            .output()
            .map_err(|source| MergeError::MergeToolSpawn {
                program: self.program.clone(),
                source,
            })?;

        if self.capture_output && !result.stderr.is_empty() {
            debug!(
                target: "merge::tool",
                job = %label,
                stderr = %String::from_utf8_lossy(&result.stderr).trim_end(),
                "Merge tool stderr"
            );
        }

        if !result.status.success() {
            return Err(MergeError::MergeTool {
                label: label.to_string(),
                program: self.program.clone(),
                status: result.status,
            });
        }

        Ok(())
    }

    fn name(&self) -> &str {
        &self.program
    }
}

/// Byte-wise concatenation in input order. Suitable for formats where
/// records are self-delimiting (line-oriented text, NDJSON, ...).
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcatMergeTool;

impl MergeTool for ConcatMergeTool {
    fn merge(&self, label: &str, output: &Path, inputs: &[PathBuf]) -> Result<(), MergeError> {
        let out = File::create(output).map_err(|e| {
            MergeError::io(format!("Failed to create {}", output.display()), e)
        })?;
        let mut writer = BufWriter::new(out);

        for input in inputs {
            let mut reader = File::open(input).map_err(|_| MergeError::MissingInput {
                label: label.to_string(),
                path: input.clone(),
            })?;
            let copied = io::copy(&mut reader, &mut writer).map_err(|e| {
                MergeError::io(format!("Failed to append {}", input.display()), e)
            })?;
            trace!(
                target: "merge::tool",
                job = %label,
                input = %input.display(),
                bytes = copied,
                "Appended input"
            );
        }

        writer
            .flush()
            .map_err(|e| MergeError::io(format!("Failed to flush {}", output.display()), e))?;
        Ok(())
    }

    fn name(&self) -> &str {
        "concat"
    }
}

/// Copies a lone input verbatim; merging one file is a copy.
pub fn copy_single(label: &str, output: &Path, input: &Path) -> Result<u64, MergeError> {
    fs::copy(input, output).map_err(|e| {
        if input.exists() {
            MergeError::io(
                format!("Failed to copy {} to {}", input.display(), output.display()),
                e,
            )
        } else {
            MergeError::MissingInput {
                label: label.to_string(),
                path: input.to_path_buf(),
            }
        }
    })
}

pub fn tool_from_config(cfg: &ToolConfig) -> Arc<dyn MergeTool> {
    match cfg.kind {
        ToolKind::Command => Arc::new(
            CommandMergeTool::new(cfg.program.clone(), cfg.args.clone())
                .with_capture_output(cfg.capture_output),
        ),
        ToolKind::Concat => Arc::new(ConcatMergeTool),
    }
}
