//! User management: email/login uniqueness and the user ↔ car association

pub mod service;

pub use service::UserService;
