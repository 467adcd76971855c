pub mod model;

pub use model::{
    CounterConfig, CounterKind, LoggingConfig, MergeConfig, Settings, ToolConfig, ToolKind,
    load_settings,
};
