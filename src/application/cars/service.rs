//! Car service: application-layer orchestration
//!
//! Owns the license-plate uniqueness rule. `save_car` is also used by the user
//! service to persist cars embedded in a user payload.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::application::complete;
use crate::domain::{
    Car, CarRepository, DomainError, DomainResult, GetCarsDto, SaveCarDto, Storage, UnitOfWork,
};
use crate::shared::{PageRequest, PaginatedResult};

/// Persist `car` after checking that no other car holds its license plate.
///
/// A car matching itself (same id) is not a collision, so an update may keep
/// its own plate.
pub async fn save_car<R>(repo: &R, car: Car) -> DomainResult<Car>
where
    R: CarRepository + ?Sized,
{
    if let Some(holder) = repo.find_car_by_license_plate(&car.license_plate).await? {
        if car.is_other_than(&holder) {
            return Err(DomainError::DuplicateLicensePlate(car.license_plate));
        }
    }
    repo.save_car(car).await
}

pub struct CarService {
    storage: Arc<dyn Storage>,
}

impl CarService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    // ── Commands ────────────────────────────────────────────────

    /// Register a new, ownerless car.
    pub async fn create(&self, dto: SaveCarDto) -> DomainResult<Car> {
        dto.validate()?;

        let uow = self.storage.begin().await?;
        let result = save_car(uow.as_ref(), Car::new(dto)).await;
        let car = complete(uow, result).await?;

        metrics::counter!("cars_created_total").increment(1);
        info!(car_id = ?car.id, license_plate = %car.license_plate, "Car created");
        Ok(car)
    }

    /// Replace every attribute of car `id` with the payload; the id never changes.
    pub async fn update(&self, id: Uuid, dto: SaveCarDto) -> DomainResult<Car> {
        dto.validate()?;

        let uow = self.storage.begin().await?;
        let result = update_in(uow.as_ref(), id, dto).await;
        let car = complete(uow, result).await?;

        info!(car_id = %id, license_plate = %car.license_plate, "Car updated");
        Ok(car)
    }

    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.storage.delete_car_by_id(id).await?;

        metrics::counter!("cars_deleted_total").increment(1);
        info!(car_id = %id, "Car deleted");
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Car>> {
        self.storage.find_car_by_id(id).await
    }

    pub async fn search(&self, dto: GetCarsDto) -> DomainResult<PaginatedResult<Car>> {
        let page = PageRequest::new(dto.page, dto.page_size);
        self.storage
            .search_cars_by_model(dto.model.as_deref(), page)
            .await
    }
}

async fn update_in(uow: &dyn UnitOfWork, id: Uuid, dto: SaveCarDto) -> DomainResult<Car> {
    let mut car = uow
        .find_car_by_id(id)
        .await?
        .ok_or_else(|| DomainError::car_not_found(id))?;
    car.merge(dto);
    save_car(uow, car).await
}
