pub mod config;
pub mod size;
