//! Database repository implementations
//!
//! The user and car repositories are both implemented on [`SeaOrmStorage`],
//! which also serves as the Storage Port and, inside a transaction, as the
//! unit of work.

mod car_repository;
mod storage;
mod user_repository;

pub use storage::SeaOrmStorage;
