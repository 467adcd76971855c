use std::path::PathBuf;

use crate::engine::inventory::InputFile;

/// Builds in-memory `InputFile` sequences for partitioning tests.
pub struct InputFileFactory {
    base: String,
    extension: String,
    first_index: u64,
    sizes: Vec<u64>,
}

impl InputFileFactory {
    pub fn new() -> Self {
        Self {
            base: "sample".to_string(),
            extension: "root".to_string(),
            first_index: 1,
            sizes: Vec::new(),
        }
    }

    pub fn with_base(mut self, base: &str) -> Self {
        self.base = base.to_string();
        self
    }

    pub fn with_first_index(mut self, index: u64) -> Self {
        self.first_index = index;
        self
    }

    pub fn with_sizes(mut self, sizes: &[u64]) -> Self {
        self.sizes = sizes.to_vec();
        self
    }

    pub fn with_uniform(mut self, count: usize, size: u64) -> Self {
        self.sizes = vec![size; count];
        self
    }

    pub fn create(self) -> Vec<InputFile> {
        self.sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| {
                let index = self.first_index + i as u64;
                let name = format!("{}_{}.{}", self.base, index, self.extension);
                InputFile::new(name.clone(), PathBuf::from(name), index, size)
            })
            .collect()
    }
}
