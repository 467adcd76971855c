pub mod input_file;
pub mod naming;
pub mod scanner;

pub use input_file::InputFile;
pub use naming::{CrabJobNaming, IndexSuffixNaming, NamingConvention, NamingScheme};
pub use scanner::{DEFAULT_MASK, compile_mask, scan_directory};

#[cfg(test)]
mod scanner_test;
