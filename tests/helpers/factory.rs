pub use super::factories::{FixtureDirFactory, InputFileFactory};

pub struct Factory;

impl Factory {
    pub fn input_files() -> InputFileFactory {
        InputFileFactory::new()
    }

    pub fn fixture_dir() -> FixtureDirFactory {
        FixtureDirFactory::new()
    }
}
