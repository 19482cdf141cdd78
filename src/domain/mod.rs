pub mod car;
pub mod repositories;
pub mod user;

// Re-export commonly used types
pub use car::{Car, CarRepository, EmbeddedCarDto, GetCarsDto, SaveCarDto};
pub use repositories::{DomainResult, Storage, UnitOfWork};
pub use user::{GetUsersDto, SaveUserDto, User, UserRepository};

pub use crate::shared::errors::{DomainError, FieldViolation};
