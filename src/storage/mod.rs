//! Storage implementations for the registration collection

pub mod in_memory;
pub mod json_file;

pub use in_memory::InMemoryCollection;
pub use json_file::{JsonFileStore, RetryPolicy};
