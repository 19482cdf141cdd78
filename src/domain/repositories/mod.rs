//! Storage port for the domain layer
//!
//! Contains:
//! - `Storage`: the persistence boundary the services depend on
//! - `UnitOfWork`: a group of repository calls that commit or roll back together
//! - `DomainResult`: standard result type for domain operations

use async_trait::async_trait;

use super::car::CarRepository;
use super::user::UserRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// An open atomic unit over the storage.
///
/// Every read and write issued through it observes the unit's own changes and
/// none of them become visible to others until [`UnitOfWork::commit`].
/// Dropping a unit without committing discards its changes.
#[async_trait]
pub trait UnitOfWork: UserRepository + CarRepository {
    async fn commit(self: Box<Self>) -> DomainResult<()>;
    async fn rollback(self: Box<Self>) -> DomainResult<()>;
}

/// The persistence boundary for users and cars.
///
/// Repository calls made directly on a `Storage` run on their own and are
/// meant for single-statement reads. Anything that writes goes through
/// [`Storage::begin`].
///
/// ```ignore
/// let uow = storage.begin().await?;
/// let car = uow.find_car_by_id(id).await?;
/// uow.commit().await?;
/// ```
#[async_trait]
pub trait Storage: UserRepository + CarRepository {
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>>;
}
