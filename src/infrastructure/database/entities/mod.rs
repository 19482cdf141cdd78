//! Database entities module

pub mod car;
pub mod user;

pub use car::Entity as Car;
pub use user::Entity as User;
