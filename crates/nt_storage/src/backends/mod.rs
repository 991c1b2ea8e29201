pub mod json_file;
pub mod memory;

pub use json_file::{JsonFileConfig, JsonFileStorage};
pub use memory::MemoryStorage;
