use serde::{Deserialize, Serialize};
use std::env;

use crate::engine::errors::MergeError;
use crate::engine::inventory::{DEFAULT_MASK, NamingScheme};
use crate::engine::partition::StrategyKind;

pub const CONFIG_ENV_VAR: &str = "PART_MERGE_CONFIG";
pub const ENV_PREFIX: &str = "PART_MERGE";
const DEFAULT_CONFIG_NAME: &str = "part_merge";

const BYTES_PER_GIB: f64 = (1u64 << 30) as f64;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub merge: MergeConfig,
    pub tool: ToolConfig,
    pub counter: CounterConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Regular expression selecting input files by name
    pub mask: String,
    /// Target size of one output part, GiB
    pub target_size_gib: f64,
    pub input_dir: String,
    pub out_dir: String,
    pub num_threads: usize,
    /// Maximal number of inputs handed to the merge tool at once
    pub max_files_to_merge: usize,
    /// Collection whose entries are counted for validation
    pub tree_name: String,
    pub keep_tmp_files: bool,
    pub strategy: StrategyKind,
    pub naming: NamingScheme,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            mask: DEFAULT_MASK.to_string(),
            target_size_gib: 2.0,
            input_dir: ".".to_string(),
            out_dir: "merged".to_string(),
            num_threads: 5,
            max_files_to_merge: 256,
            tree_name: "eventContent/BasicInfo".to_string(),
            keep_tmp_files: false,
            strategy: StrategyKind::default(),
            naming: NamingScheme::default(),
        }
    }
}

impl MergeConfig {
    pub fn target_size_bytes(&self) -> u64 {
        (self.target_size_gib * BYTES_PER_GIB).round() as u64
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Command,
    Concat,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolConfig {
    pub kind: ToolKind,
    pub program: String,
    /// `{output}` and `{inputs}` are expanded per job
    pub args: Vec<String>,
    /// Log the tool's stderr at debug level instead of discarding it
    pub capture_output: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            kind: ToolKind::Command,
            program: "hadd".to_string(),
            args: vec![
                "-v0".to_string(),
                "{output}".to_string(),
                "{inputs}".to_string(),
            ],
            capture_output: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterKind {
    #[default]
    Command,
    TaggedLines,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CounterConfig {
    pub kind: CounterKind,
    pub program: String,
    /// `{file}` and `{collection}` are expanded per file
    pub args: Vec<String>,
}

const PYROOT_ENTRIES: &str = "import sys, ROOT; \
f = ROOT.TFile.Open(sys.argv[1]); \
print(int(f.Get(sys.argv[2]).GetEntries()))";

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            kind: CounterKind::Command,
            program: "python3".to_string(),
            args: vec![
                "-c".to_string(),
                PYROOT_ENTRIES.to_string(),
                "{file}".to_string(),
                "{collection}".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Daily-rolling log file directory; no file logging when unset
    pub log_dir: Option<String>,
    pub stdout_level: String,
    pub file_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            stdout_level: "info".to_string(),
            file_level: "debug".to_string(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), MergeError> {
        let m = &self.merge;
        if !(m.target_size_gib.is_finite() && m.target_size_gib > 0.0) {
            return Err(MergeError::InvalidConfig(format!(
                "target size must be a positive number of GiB, got {}",
                m.target_size_gib
            )));
        }
        if m.target_size_bytes() == 0 {
            return Err(MergeError::InvalidConfig(
                "target size is smaller than one byte".to_string(),
            ));
        }
        if m.num_threads == 0 {
            return Err(MergeError::InvalidConfig(
                "number of threads must be positive".to_string(),
            ));
        }
        if m.max_files_to_merge == 0 {
            return Err(MergeError::InvalidConfig(
                "maximal number of files to merge must be positive".to_string(),
            ));
        }
        if self.tool.kind == ToolKind::Command && self.tool.program.is_empty() {
            return Err(MergeError::InvalidConfig(
                "merge tool program is empty".to_string(),
            ));
        }
        if self.counter.kind == CounterKind::Command && self.counter.program.is_empty() {
            return Err(MergeError::InvalidConfig(
                "entry counter program is empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Loads settings from defaults, an optional TOML file and `PART_MERGE__*`
/// environment variables, in increasing priority. An explicitly named file
/// must exist; the default one may be absent.
pub fn load_settings(config_path: Option<&str>) -> Result<Settings, config::ConfigError> {
    let (path, required) = match config_path {
        Some(p) => (p.to_string(), true),
        None => match env::var(CONFIG_ENV_VAR) {
            Ok(p) => (p, true),
            Err(_) => (DEFAULT_CONFIG_NAME.to_string(), false),
        },
    };

    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(&path).required(required))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
