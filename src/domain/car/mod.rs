//! Car aggregate
//!
//! Contains the Car entity, its input DTOs, and repository interface.

pub mod model;
pub mod repository;

mod dto_get;
mod dto_save;

pub use model::Car;

pub use dto_get::GetCarsDto;
pub use dto_save::{EmbeddedCarDto, SaveCarDto};

pub use repository::CarRepository;
