use async_trait::async_trait;
use uuid::Uuid;

use super::Car;
use crate::domain::DomainResult;
use crate::shared::{PageRequest, PaginatedResult};

#[async_trait]
pub trait CarRepository: Send + Sync {
    async fn find_car_by_id(&self, id: Uuid) -> DomainResult<Option<Car>>;
    async fn find_car_by_license_plate(&self, plate: &str) -> DomainResult<Option<Car>>;
    /// The car `car_id`, but only while it is owned by `user_id`.
    async fn find_car_by_owner_and_id(&self, user_id: Uuid, car_id: Uuid)
        -> DomainResult<Option<Car>>;
    async fn find_cars_by_owner(&self, user_id: Uuid) -> DomainResult<Vec<Car>>;

    /// Insert when `car.id` is `None`, otherwise update the stored row.
    async fn save_car(&self, car: Car) -> DomainResult<Car>;
    async fn delete_car_by_id(&self, id: Uuid) -> DomainResult<()>;

    /// Substring match on the model, case-insensitive for ASCII letters only.
    async fn search_cars_by_model(
        &self,
        model: Option<&str>,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<Car>>;
}
