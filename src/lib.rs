//! # Car Registry
//!
//! Registry of users and the cars they own, served over a REST API.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Users, cars, errors and the storage port
//! - **application**: User and car services running inside units of work
//! - **infrastructure**: SeaORM and in-memory storage adapters, password hashing
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: Process lifecycle (startup, graceful shutdown)

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export storage types for easy access
pub use infrastructure::{init_database, DatabaseConfig, InMemoryStorage, SeaOrmStorage};

// Re-export API router
pub use interfaces::http::{create_api_router, ApiContext};

pub use application::{CarService, UserService};
