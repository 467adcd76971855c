use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::input_file::InputFile;
use super::naming::NamingConvention;
use crate::engine::errors::MergeError;

pub const DEFAULT_MASK: &str = r".*\.root";

/// Compiles a file mask. The mask must match the whole file name and may not
/// reach outside the scanned directory.
pub fn compile_mask(mask: &str) -> Result<Regex, MergeError> {
    if mask.contains('/') {
        return Err(MergeError::InvalidMask {
            mask: mask.to_string(),
            reason: "the mask must not contain a slash".to_string(),
        });
    }

    Regex::new(&format!("^(?:{})$", mask)).map_err(|e| MergeError::InvalidMask {
        mask: mask.to_string(),
        reason: e.to_string(),
    })
}

/// Lists regular files in `dir` whose names match `mask`, ordered by
/// sequence index. Fails on the first matching file with a malformed name.
pub fn scan_directory(
    dir: &Path,
    mask: &str,
    naming: &dyn NamingConvention,
) -> Result<Vec<InputFile>, MergeError> {
    let mask_re = compile_mask(mask)?;

    let entries = fs::read_dir(dir)
        .map_err(|e| MergeError::io(format!("Failed to read directory {}", dir.display()), e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| MergeError::io(format!("Failed to list {}", dir.display()), e))?;
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                let lossy = raw.to_string_lossy().into_owned();
                if mask_re.is_match(&lossy) {
                    return Err(MergeError::NamingConvention { file: lossy });
                }
                continue;
            }
        };

        if !mask_re.is_match(&name) {
            continue;
        }

        let path = entry.path();
        let metadata = fs::metadata(&path)
            .map_err(|e| MergeError::io(format!("Failed to stat {}", path.display()), e))?;
        if !metadata.is_file() {
            debug!(target: "inventory::scan", name = %name, "Skipping non-regular entry");
            continue;
        }

        let sequence_index = naming.parse_index(&name)?;
        files.push(InputFile::new(name, path, sequence_index, metadata.len()));
    }

    if files.is_empty() {
        return Err(MergeError::NoInputFiles {
            dir: dir.to_path_buf(),
        });
    }

    files.sort_by(|a, b| {
        a.sequence_index
            .cmp(&b.sequence_index)
            .then_with(|| a.name.cmp(&b.name))
    });

    info!(
        target: "inventory::scan",
        dir = %dir.display(),
        count = files.len(),
        total_bytes = files.iter().map(|f| f.size).sum::<u64>(),
        "Collected input files"
    );

    Ok(files)
}
