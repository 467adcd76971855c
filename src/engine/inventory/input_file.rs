use std::path::{Path, PathBuf};

/// One source file queued for merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// Bare file name (no directory component)
    pub name: String,
    /// Full path used to read the file
    pub path: PathBuf,
    /// Ordering key parsed from the file name
    pub sequence_index: u64,
    /// Size in bytes at scan time
    pub size: u64,
}

impl InputFile {
    pub fn new(name: impl Into<String>, path: PathBuf, sequence_index: u64, size: u64) -> Self {
        Self {
            name: name.into(),
            path,
            sequence_index,
            size,
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
