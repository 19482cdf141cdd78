use std::sync::Arc;

use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;

use crate::domain::{EmbeddedCarDto, SaveCarDto, SaveUserDto, Storage};
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::database::repositories::SeaOrmStorage;
use crate::infrastructure::storage::InMemoryStorage;

pub fn memory_storage() -> Arc<dyn Storage> {
    Arc::new(InMemoryStorage::new())
}

/// A migrated in-memory SQLite database behind a single pooled connection.
pub async fn sqlite_storage() -> Arc<dyn Storage> {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    Arc::new(SeaOrmStorage::new(db))
}

pub fn car_dto(plate: &str, year: i32) -> SaveCarDto {
    SaveCarDto {
        year,
        license_plate: plate.to_string(),
        model: "Gol".to_string(),
        color: "Red".to_string(),
    }
}

pub fn user_dto(email: &str, login: &str) -> SaveUserDto {
    SaveUserDto {
        first_name: "Alice".to_string(),
        last_name: "Liddell".to_string(),
        email: email.to_string(),
        login: login.to_string(),
        password: "h3ll0".to_string(),
        birthday: None,
        phone: None,
        cars: vec![],
    }
}

pub fn with_cars(mut dto: SaveUserDto, plates: &[&str]) -> SaveUserDto {
    dto.cars = plates
        .iter()
        .map(|plate| EmbeddedCarDto::new(car_dto(plate, 2020)))
        .collect();
    dto
}
