//! Car domain entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::SaveCarDto;

/// A registered car, optionally owned by one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Car {
    /// Assigned by storage on first persist
    pub id: Option<Uuid>,
    pub year: i32,
    pub license_plate: String,
    pub model: String,
    pub color: String,
    /// Owning user, if any
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Car {
    /// Build an unpersisted, ownerless car from a payload.
    pub fn new(dto: SaveCarDto) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            year: dto.year,
            license_plate: dto.license_plate,
            model: dto.model,
            color: dto.color,
            user_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Overwrite every attribute carried by `dto`.
    ///
    /// `id`, `created_at` and the owner reference are not part of the payload
    /// and therefore survive the merge.
    pub fn merge(&mut self, dto: SaveCarDto) {
        self.year = dto.year;
        self.license_plate = dto.license_plate;
        self.model = dto.model;
        self.color = dto.color;
        self.updated_at = Utc::now();
    }

    pub fn attach_to(&mut self, user_id: Uuid) {
        self.user_id = Some(user_id);
        self.updated_at = Utc::now();
    }

    pub fn detach(&mut self) {
        self.user_id = None;
        self.updated_at = Utc::now();
    }

    /// Whether `other` is a different car than this one.
    ///
    /// An unpersisted car is different from every stored car.
    pub fn is_other_than(&self, other: &Car) -> bool {
        self.is_new() || self.id != other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(plate: &str, year: i32) -> SaveCarDto {
        SaveCarDto {
            year,
            license_plate: plate.to_string(),
            model: "Gol".to_string(),
            color: "Red".to_string(),
        }
    }

    #[test]
    fn new_car_has_no_id_and_no_owner() {
        let car = Car::new(dto("ABC123", 2020));
        assert!(car.is_new());
        assert_eq!(car.user_id, None);
    }

    #[test]
    fn merge_keeps_identity_and_owner() {
        let id = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let mut car = Car::new(dto("ABC123", 2020));
        car.id = Some(id);
        car.attach_to(owner);
        let created_at = car.created_at;

        car.merge(dto("XYZ999", 2022));

        assert_eq!(car.id, Some(id));
        assert_eq!(car.user_id, Some(owner));
        assert_eq!(car.created_at, created_at);
        assert_eq!(car.license_plate, "XYZ999");
        assert_eq!(car.year, 2022);
    }

    #[test]
    fn unpersisted_car_differs_from_everything() {
        let mut stored = Car::new(dto("ABC123", 2020));
        stored.id = Some(Uuid::new_v4());

        let fresh = Car::new(dto("ABC123", 2021));
        assert!(fresh.is_other_than(&stored));
        assert!(!stored.is_other_than(&stored.clone()));
    }
}
