use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::storage::{contains_ignore_case, db_err, parse_id, SeaOrmStorage};
use crate::domain::{Car, CarRepository, DomainError, DomainResult};
use crate::infrastructure::database::entities::car;
use crate::shared::{normalize_filter, PageRequest, PaginatedResult};

// ── Conversion helpers ──────────────────────────────────────────

fn car_model_to_domain(model: car::Model) -> DomainResult<Car> {
    Ok(Car {
        id: Some(parse_id(&model.id)?),
        year: model.year,
        license_plate: model.license_plate,
        model: model.model,
        color: model.color,
        user_id: model.user_id.as_deref().map(parse_id).transpose()?,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn car_to_active_model(id: Uuid, car: Car) -> car::ActiveModel {
    car::ActiveModel {
        id: Set(id.to_string()),
        year: Set(car.year),
        license_plate: Set(car.license_plate),
        model: Set(car.model),
        color: Set(car.color),
        user_id: Set(car.user_id.map(|u| u.to_string())),
        created_at: Set(car.created_at),
        updated_at: Set(car.updated_at),
    }
}

fn into_domain(models: Vec<car::Model>) -> DomainResult<Vec<Car>> {
    models.into_iter().map(car_model_to_domain).collect()
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl<C> CarRepository for SeaOrmStorage<C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_car_by_id(&self, id: Uuid) -> DomainResult<Option<Car>> {
        car::Entity::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .map_err(db_err)?
            .map(car_model_to_domain)
            .transpose()
    }

    async fn find_car_by_license_plate(&self, plate: &str) -> DomainResult<Option<Car>> {
        car::Entity::find()
            .filter(car::Column::LicensePlate.eq(plate))
            .one(&self.conn)
            .await
            .map_err(db_err)?
            .map(car_model_to_domain)
            .transpose()
    }

    async fn find_car_by_owner_and_id(
        &self,
        user_id: Uuid,
        car_id: Uuid,
    ) -> DomainResult<Option<Car>> {
        car::Entity::find_by_id(car_id.to_string())
            .filter(car::Column::UserId.eq(user_id.to_string()))
            .one(&self.conn)
            .await
            .map_err(db_err)?
            .map(car_model_to_domain)
            .transpose()
    }

    async fn find_cars_by_owner(&self, user_id: Uuid) -> DomainResult<Vec<Car>> {
        let models = car::Entity::find()
            .filter(car::Column::UserId.eq(user_id.to_string()))
            .order_by_asc(car::Column::LicensePlate)
            .all(&self.conn)
            .await
            .map_err(db_err)?;

        into_domain(models)
    }

    async fn save_car(&self, car: Car) -> DomainResult<Car> {
        let model = match car.id {
            None => car_to_active_model(Uuid::new_v4(), car)
                .insert(&self.conn)
                .await
                .map_err(db_err)?,
            Some(id) => car_to_active_model(id, car)
                .update(&self.conn)
                .await
                .map_err(|e| match e {
                    DbErr::RecordNotUpdated => DomainError::car_not_found(id),
                    other => db_err(other),
                })?,
        };

        car_model_to_domain(model)
    }

    async fn delete_car_by_id(&self, id: Uuid) -> DomainResult<()> {
        let result = car::Entity::delete_by_id(id.to_string())
            .exec(&self.conn)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::car_not_found(id));
        }
        Ok(())
    }

    async fn search_cars_by_model(
        &self,
        model: Option<&str>,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<Car>> {
        let mut query = car::Entity::find();

        if let Some(needle) = normalize_filter(model) {
            query = query.filter(contains_ignore_case(car::Column::Model, &needle));
        }

        let query = query
            .order_by_asc(car::Column::Model)
            .order_by_asc(car::Column::Id);

        // Count total
        let total = query.clone().count(&self.conn).await.map_err(db_err)?;

        // Paginate
        let models = query
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.conn)
            .await
            .map_err(db_err)?;

        Ok(PaginatedResult::new(into_domain(models)?, total, page))
    }
}
