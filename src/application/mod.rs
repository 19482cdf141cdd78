//! Application services
//!
//! Stateless orchestration over the storage port. Every operation that writes
//! more than once runs inside a single unit of work.

pub mod cars;
pub mod unit_of_work;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;

pub use cars::CarService;
pub use unit_of_work::complete;
pub use users::UserService;
