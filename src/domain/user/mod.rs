//! User aggregate
//!
//! Contains the User entity, its input DTOs, and repository interface.

pub mod model;
pub mod repository;

mod dto_get;
mod dto_save;

pub use model::User;

pub use dto_get::GetUsersDto;
pub use dto_save::SaveUserDto;

pub use repository::UserRepository;
