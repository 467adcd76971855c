use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::engine::errors::MergeError;

/// Maps a file name to its position in the merge order.
pub trait NamingConvention: Send + Sync {
    /// Sequence index used to order source files.
    fn parse_index(&self, file_name: &str) -> Result<u64, MergeError>;

    /// Common prefix shared by all files of a task; used to name outputs.
    fn base_name(&self, file_name: &str) -> Result<String, MergeError>;

    /// Extension without the leading dot.
    fn extension(&self, file_name: &str) -> Option<String> {
        file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_string())
            .filter(|ext| !ext.is_empty())
    }
}

static INDEX_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+)_(\d+)\.([^./]+)$").expect("static regex"));

static CRAB_JOB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*)_(\d+)_\d+_[a-zA-Z0-9]{3}\.root$").expect("static regex"));

fn captures<'a>(re: &Regex, file_name: &'a str) -> Result<regex::Captures<'a>, MergeError> {
    re.captures(file_name)
        .ok_or_else(|| MergeError::NamingConvention {
            file: file_name.to_string(),
        })
}

fn parse_digits(digits: &str, file_name: &str) -> Result<u64, MergeError> {
    digits.parse::<u64>().map_err(|_| MergeError::NamingConvention {
        file: file_name.to_string(),
    })
}

/// `<base>_<digits>.<ext>`, e.g. `sample_12.root`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexSuffixNaming;

impl NamingConvention for IndexSuffixNaming {
    fn parse_index(&self, file_name: &str) -> Result<u64, MergeError> {
        let caps = captures(&INDEX_SUFFIX_RE, file_name)?;
        parse_digits(&caps[2], file_name)
    }

    fn base_name(&self, file_name: &str) -> Result<String, MergeError> {
        let caps = captures(&INDEX_SUFFIX_RE, file_name)?;
        Ok(caps[1].to_string())
    }
}

/// Job outputs of a CRAB task: `<base>_<job>_<retry>_<tag>.root`.
/// The job number is the sequence index.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrabJobNaming;

impl NamingConvention for CrabJobNaming {
    fn parse_index(&self, file_name: &str) -> Result<u64, MergeError> {
        let caps = captures(&CRAB_JOB_RE, file_name)?;
        parse_digits(&caps[2], file_name)
    }

    fn base_name(&self, file_name: &str) -> Result<String, MergeError> {
        let caps = captures(&CRAB_JOB_RE, file_name)?;
        Ok(caps[1].to_string())
    }
}

/// Naming scheme as selected in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum NamingScheme {
    #[default]
    IndexSuffix,
    CrabJob,
}

impl NamingScheme {
    pub fn convention(self) -> Box<dyn NamingConvention> {
        match self {
            NamingScheme::IndexSuffix => Box::new(IndexSuffixNaming),
            NamingScheme::CrabJob => Box::new(CrabJobNaming),
        }
    }
}
