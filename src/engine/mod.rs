pub mod errors;
pub mod inventory;
pub mod merge;
pub mod partition;
pub mod pipeline;
pub mod validate;

pub use errors::*;
