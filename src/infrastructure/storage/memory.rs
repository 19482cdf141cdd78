//! In-memory storage implementation
//!
//! Committed tables live behind an async mutex. A unit of work takes that
//! lock for its whole lifetime and works on a staged copy, which replaces the
//! committed tables on commit and is thrown away otherwise. Units are
//! therefore serialized, and a task holding one must not call the storage
//! directly.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    Car, CarRepository, DomainError, DomainResult, Storage, UnitOfWork, User, UserRepository,
};
use crate::shared::{normalize_filter, PageRequest, PaginatedResult};

#[derive(Debug, Clone, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    cars: HashMap<Uuid, Car>,
}

impl Tables {
    // ── Users ───────────────────────────────────────────────────

    fn user_by_id(&self, id: Uuid) -> Option<User> {
        self.users.get(&id).cloned()
    }

    fn user_where(&self, pred: impl Fn(&User) -> bool) -> Option<User> {
        self.users.values().find(|&u| pred(u)).cloned()
    }

    fn save_user(&mut self, mut user: User) -> DomainResult<User> {
        let id = match user.id {
            Some(id) if !self.users.contains_key(&id) => {
                return Err(DomainError::user_not_found(id));
            }
            Some(id) => id,
            None => Uuid::new_v4(),
        };

        let clash = |u: &&User| u.id != Some(id);
        if self.users.values().filter(clash).any(|u| u.email == user.email) {
            return Err(unique_violation("users.email"));
        }
        if self.users.values().filter(clash).any(|u| u.login == user.login) {
            return Err(unique_violation("users.login"));
        }

        user.id = Some(id);
        self.users.insert(id, user.clone());
        Ok(user)
    }

    fn delete_user(&mut self, id: Uuid) -> DomainResult<()> {
        if self.users.remove(&id).is_none() {
            return Err(DomainError::user_not_found(id));
        }
        // ON DELETE SET NULL
        for car in self.cars.values_mut() {
            if car.user_id == Some(id) {
                car.user_id = None;
            }
        }
        Ok(())
    }

    fn search_users(&self, first_name: Option<&str>, page: PageRequest) -> PaginatedResult<User> {
        let needle = normalize_filter(first_name);
        let mut rows: Vec<&User> = self
            .users
            .values()
            .filter(|u| matches_filter(&u.first_name, needle.as_deref()))
            .collect();
        rows.sort_by(|a, b| a.first_name.cmp(&b.first_name).then(a.id.cmp(&b.id)));
        paginate(rows, page)
    }

    // ── Cars ────────────────────────────────────────────────────

    fn car_by_id(&self, id: Uuid) -> Option<Car> {
        self.cars.get(&id).cloned()
    }

    fn car_where(&self, pred: impl Fn(&Car) -> bool) -> Option<Car> {
        self.cars.values().find(|&c| pred(c)).cloned()
    }

    fn cars_of(&self, user_id: Uuid) -> Vec<Car> {
        let mut cars: Vec<Car> = self
            .cars
            .values()
            .filter(|c| c.user_id == Some(user_id))
            .cloned()
            .collect();
        cars.sort_by(|a, b| a.license_plate.cmp(&b.license_plate));
        cars
    }

    fn save_car(&mut self, mut car: Car) -> DomainResult<Car> {
        let id = match car.id {
            Some(id) if !self.cars.contains_key(&id) => {
                return Err(DomainError::car_not_found(id));
            }
            Some(id) => id,
            None => Uuid::new_v4(),
        };

        if self
            .cars
            .values()
            .any(|c| c.id != Some(id) && c.license_plate == car.license_plate)
        {
            return Err(unique_violation("cars.license_plate"));
        }

        car.id = Some(id);
        self.cars.insert(id, car.clone());
        Ok(car)
    }

    fn delete_car(&mut self, id: Uuid) -> DomainResult<()> {
        self.cars
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::car_not_found(id))
    }

    fn search_cars(&self, model: Option<&str>, page: PageRequest) -> PaginatedResult<Car> {
        let needle = normalize_filter(model);
        let mut rows: Vec<&Car> = self
            .cars
            .values()
            .filter(|c| matches_filter(&c.model, needle.as_deref()))
            .collect();
        rows.sort_by(|a, b| a.model.cmp(&b.model).then(a.id.cmp(&b.id)));
        paginate(rows, page)
    }
}

fn unique_violation(column: &str) -> DomainError {
    DomainError::Storage(format!("UNIQUE constraint failed: {}", column))
}

fn matches_filter(value: &str, needle: Option<&str>) -> bool {
    needle.map_or(true, |n| value.to_ascii_lowercase().contains(n))
}

fn paginate<T: Clone>(rows: Vec<&T>, page: PageRequest) -> PaginatedResult<T> {
    let total = rows.len() as u64;
    let items = rows
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .cloned()
        .collect();
    PaginatedResult::new(items, total, page)
}

/// In-memory storage for development and testing
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    async fn with_tables<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
        let mut tables = self.tables.lock().await;
        f(&mut tables)
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        let committed = self.tables.clone().lock_owned().await;
        let staged = StdMutex::new(committed.clone());
        debug!("In-memory unit of work opened");
        Ok(Box::new(MemoryUnitOfWork { committed, staged }))
    }
}

/// A unit of work over [`InMemoryStorage`].
pub struct MemoryUnitOfWork {
    committed: OwnedMutexGuard<Tables>,
    staged: StdMutex<Tables>,
}

impl MemoryUnitOfWork {
    async fn with_tables<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
        let mut tables = self.staged.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut tables)
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let MemoryUnitOfWork {
            mut committed,
            staged,
        } = *self;
        *committed = staged.into_inner().unwrap_or_else(PoisonError::into_inner);
        debug!("In-memory unit of work committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        debug!("In-memory unit of work rolled back");
        Ok(())
    }
}

macro_rules! impl_repositories {
    ($ty:ty) => {
        #[async_trait]
        impl UserRepository for $ty {
            async fn find_user_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
                Ok(self.with_tables(|t| t.user_by_id(id)).await)
            }

            async fn find_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
                Ok(self.with_tables(|t| t.user_where(|u| u.email == email)).await)
            }

            async fn find_user_by_login(&self, login: &str) -> DomainResult<Option<User>> {
                Ok(self.with_tables(|t| t.user_where(|u| u.login == login)).await)
            }

            async fn save_user(&self, user: User) -> DomainResult<User> {
                self.with_tables(|t| t.save_user(user)).await
            }

            async fn delete_user_by_id(&self, id: Uuid) -> DomainResult<()> {
                self.with_tables(|t| t.delete_user(id)).await
            }

            async fn search_users_by_first_name(
                &self,
                first_name: Option<&str>,
                page: PageRequest,
            ) -> DomainResult<PaginatedResult<User>> {
                Ok(self.with_tables(|t| t.search_users(first_name, page)).await)
            }
        }

        #[async_trait]
        impl CarRepository for $ty {
            async fn find_car_by_id(&self, id: Uuid) -> DomainResult<Option<Car>> {
                Ok(self.with_tables(|t| t.car_by_id(id)).await)
            }

            async fn find_car_by_license_plate(&self, plate: &str) -> DomainResult<Option<Car>> {
                Ok(self
                    .with_tables(|t| t.car_where(|c| c.license_plate == plate))
                    .await)
            }

            async fn find_car_by_owner_and_id(
                &self,
                user_id: Uuid,
                car_id: Uuid,
            ) -> DomainResult<Option<Car>> {
                Ok(self
                    .with_tables(|t| {
                        t.car_where(|c| c.id == Some(car_id) && c.user_id == Some(user_id))
                    })
                    .await)
            }

            async fn find_cars_by_owner(&self, user_id: Uuid) -> DomainResult<Vec<Car>> {
                Ok(self.with_tables(|t| t.cars_of(user_id)).await)
            }

            async fn save_car(&self, car: Car) -> DomainResult<Car> {
                self.with_tables(|t| t.save_car(car)).await
            }

            async fn delete_car_by_id(&self, id: Uuid) -> DomainResult<()> {
                self.with_tables(|t| t.delete_car(id)).await
            }

            async fn search_cars_by_model(
                &self,
                model: Option<&str>,
                page: PageRequest,
            ) -> DomainResult<PaginatedResult<Car>> {
                Ok(self.with_tables(|t| t.search_cars(model, page)).await)
            }
        }
    };
}

impl_repositories!(InMemoryStorage);
impl_repositories!(MemoryUnitOfWork);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SaveCarDto;

    fn car(plate: &str) -> Car {
        Car::new(SaveCarDto {
            year: 2020,
            license_plate: plate.into(),
            model: "Gol".into(),
            color: "Red".into(),
        })
    }

    #[tokio::test]
    async fn commit_publishes_staged_changes() {
        let storage = InMemoryStorage::new();

        let uow = storage.begin().await.unwrap();
        let saved = uow.save_car(car("ABC123")).await.unwrap();
        assert_eq!(
            uow.find_car_by_license_plate("ABC123").await.unwrap(),
            Some(saved.clone())
        );
        uow.commit().await.unwrap();

        assert_eq!(storage.find_car_by_id(saved.id.unwrap()).await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn rollback_and_drop_discard_staged_changes() {
        let storage = InMemoryStorage::new();

        let uow = storage.begin().await.unwrap();
        uow.save_car(car("ROLL01")).await.unwrap();
        uow.rollback().await.unwrap();

        let uow = storage.begin().await.unwrap();
        uow.save_car(car("DROP01")).await.unwrap();
        drop(uow);

        let all = storage
            .search_cars_by_model(None, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(all.total, 0);
    }

    #[tokio::test]
    async fn model_search_folds_ascii_case_only() {
        let storage = InMemoryStorage::new();
        let mut elan = car("E1");
        elan.model = "Élan".into();
        storage.save_car(elan).await.unwrap();

        let upper = storage
            .search_cars_by_model(Some("ÉLAN"), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(upper.total, 1);

        let lower = storage
            .search_cars_by_model(Some("élan"), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(lower.total, 0);
    }

    #[tokio::test]
    async fn page_far_past_the_end_is_empty() {
        let storage = InMemoryStorage::new();
        storage.save_car(car("A1")).await.unwrap();

        let page = storage
            .search_cars_by_model(None, PageRequest::new(Some(u64::MAX), Some(20)))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn plate_uniqueness_is_enforced() {
        let storage = InMemoryStorage::new();
        storage.save_car(car("ABC123")).await.unwrap();

        let err = storage.save_car(car("ABC123")).await.unwrap_err();
        assert!(matches!(err, DomainError::Storage(ref m) if m.contains("license_plate")));
    }

    #[tokio::test]
    async fn saving_unknown_id_is_not_found() {
        let storage = InMemoryStorage::new();
        let mut ghost = car("GHOST1");
        ghost.id = Some(Uuid::new_v4());

        let err = storage.save_car(ghost).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Car", .. }));
    }

    #[tokio::test]
    async fn owner_lookup_requires_matching_owner() {
        let storage = InMemoryStorage::new();
        let owner = Uuid::new_v4();
        let mut owned = car("OWN001");
        owned.attach_to(owner);
        let owned = storage.save_car(owned).await.unwrap();
        let car_id = owned.id.unwrap();

        assert!(storage
            .find_car_by_owner_and_id(owner, car_id)
            .await
            .unwrap()
            .is_some());
        assert!(storage
            .find_car_by_owner_and_id(Uuid::new_v4(), car_id)
            .await
            .unwrap()
            .is_none());
        assert_eq!(storage.find_cars_by_owner(owner).await.unwrap(), vec![owned]);
    }

    #[tokio::test]
    async fn units_of_work_are_serialized() {
        let storage = InMemoryStorage::new();
        let first = storage.begin().await.unwrap();

        let contender = {
            let storage = storage.clone();
            tokio::spawn(async move {
                let uow = storage.begin().await.unwrap();
                let found = uow.find_car_by_license_plate("FIRST1").await.unwrap();
                uow.rollback().await.unwrap();
                found
            })
        };

        tokio::task::yield_now().await;
        first.save_car(car("FIRST1")).await.unwrap();
        first.commit().await.unwrap();

        assert!(contender.await.unwrap().is_some());
    }
}
