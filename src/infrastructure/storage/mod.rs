//! Storage implementations that do not need a database

mod memory;

pub use memory::InMemoryStorage;
