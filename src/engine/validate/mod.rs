pub mod counter;
pub mod validator;

pub use counter::{CommandEntryCounter, EntryCounter, TaggedLineCounter, counter_from_config};
pub use validator::Validator;
