pub mod document;
pub mod json_file;
pub mod memory;
pub mod registry;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use registry::JsonFileRegistry;
