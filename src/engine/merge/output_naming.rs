use crate::engine::errors::MergeError;
use crate::engine::inventory::{InputFile, NamingConvention};

/// Derives intermediate and final file names from the first source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNaming {
    pub base: String,
    pub extension: Option<String>,
}

impl OutputNaming {
    pub fn new(base: impl Into<String>, extension: Option<String>) -> Self {
        Self {
            base: base.into(),
            extension,
        }
    }

    pub fn from_first_file(
        files: &[InputFile],
        naming: &dyn NamingConvention,
    ) -> Result<Self, MergeError> {
        let first = files.first().ok_or_else(|| {
            MergeError::InvalidConfig("cannot derive output names without input files".into())
        })?;
        Ok(Self::new(
            naming.base_name(&first.name)?,
            naming.extension(&first.name),
        ))
    }

    /// `<base>.part<P>.block<B>.<ext>`, 1-based indices.
    pub fn block_file(&self, part_index: usize, block_index: usize) -> String {
        self.with_extension(format!(
            "{}.part{}.block{}",
            self.base,
            part_index + 1,
            block_index + 1
        ))
    }

    /// `<base>.part<P>.<ext>`, or `<base>.<ext>` when there is a single part.
    pub fn part_file(&self, part_index: usize, part_count: usize) -> String {
        if part_count > 1 {
            self.with_extension(format!("{}.part{}", self.base, part_index + 1))
        } else {
            self.with_extension(self.base.clone())
        }
    }

    fn with_extension(&self, stem: String) -> String {
        match &self.extension {
            Some(ext) => format!("{}.{}", stem, ext),
            None => stem,
        }
    }
}
