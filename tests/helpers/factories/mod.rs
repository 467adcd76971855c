pub mod fixture_dir_factory;
pub mod input_file_factory;

pub use fixture_dir_factory::{FixtureDir, FixtureDirFactory, tagged_lines};
pub use input_file_factory::InputFileFactory;

#[cfg(test)]
mod input_file_factory_test;
