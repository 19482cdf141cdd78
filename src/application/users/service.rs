//! User service: application-layer orchestration
//!
//! All user-related business rules live here: email/login uniqueness, saving a
//! user together with the new cars embedded in its payload, and attaching or
//! releasing cars. HTTP handlers are thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::application::cars::save_car;
use crate::application::complete;
use crate::domain::{
    Car, CarRepository, DomainError, DomainResult, EmbeddedCarDto, GetUsersDto,
    SaveUserDto, Storage, UnitOfWork, User, UserRepository,
};
use crate::infrastructure::crypto::password::hash_password;
use crate::shared::{flatten_violations, PageRequest, PaginatedResult};

/// Orchestrates user persistence and the user ↔ car association.
pub struct UserService {
    storage: Arc<dyn Storage>,
    password_cost: u32,
}

impl UserService {
    pub fn new(storage: Arc<dyn Storage>, password_cost: u32) -> Self {
        Self {
            storage,
            password_cost,
        }
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Create a user and every new car embedded in its payload, all or nothing.
    pub async fn create(&self, dto: SaveUserDto) -> DomainResult<User> {
        validate_user(&dto)?;
        let user = User::new(&dto, self.hash(&dto.password)?);

        let uow = self.storage.begin().await?;
        let result = save_with_cars(uow.as_ref(), user, &dto.cars).await;
        let user = complete(uow, result).await?;

        metrics::counter!("users_created_total").increment(1);
        info!(user_id = ?user.id, login = %user.login, "User created");
        Ok(user)
    }

    /// Replace the profile of user `id` and attach any new embedded cars.
    ///
    /// Cars already owned by the user stay attached even when the payload
    /// omits them; use [`UserService::disassociate_car`] to release one.
    pub async fn update(&self, id: Uuid, dto: SaveUserDto) -> DomainResult<User> {
        validate_user(&dto)?;
        let password_hash = self.hash(&dto.password)?;

        let uow = self.storage.begin().await?;
        let result = update_in(uow.as_ref(), id, &dto, password_hash).await;
        let user = complete(uow, result).await?;

        info!(user_id = %id, "User updated");
        Ok(user)
    }

    /// Release every car owned by user `id`, then delete the user. Cars survive.
    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let uow = self.storage.begin().await?;
        let result = delete_in(uow.as_ref(), id).await;
        let released = complete(uow, result).await?;

        metrics::counter!("users_deleted_total").increment(1);
        info!(user_id = %id, released_cars = released, "User deleted");
        Ok(())
    }

    /// Clear the owner of car `car_id` if, and only if, it belongs to `user_id`.
    ///
    /// An unmatched pair is not an error: nothing changes and the call succeeds.
    pub async fn disassociate_car(&self, user_id: Uuid, car_id: Uuid) -> DomainResult<()> {
        let uow = self.storage.begin().await?;
        let result = disassociate_in(uow.as_ref(), user_id, car_id).await;
        let released = complete(uow, result).await?;

        if released {
            metrics::counter!("cars_disassociated_total").increment(1);
            info!(%user_id, %car_id, "Car disassociated from user");
        } else {
            debug!(%user_id, %car_id, "No car owned by user with this id; nothing to disassociate");
        }
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        self.storage.find_user_by_id(id).await
    }

    /// Cars currently owned by user `id`.
    pub async fn cars_of(&self, id: Uuid) -> DomainResult<Vec<Car>> {
        if self.storage.find_user_by_id(id).await?.is_none() {
            return Err(DomainError::user_not_found(id));
        }
        self.storage.find_cars_by_owner(id).await
    }

    pub async fn search(&self, dto: GetUsersDto) -> DomainResult<PaginatedResult<User>> {
        let page = PageRequest::new(dto.page, dto.page_size);
        self.storage
            .search_users_by_first_name(dto.first_name.as_deref(), page)
            .await
    }

    fn hash(&self, password: &str) -> DomainResult<String> {
        hash_password(password, self.password_cost)
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))
    }
}

// ── Unit-of-work steps ──────────────────────────────────────────

async fn update_in(
    uow: &dyn UnitOfWork,
    id: Uuid,
    dto: &SaveUserDto,
    password_hash: String,
) -> DomainResult<User> {
    let mut user = uow
        .find_user_by_id(id)
        .await?
        .ok_or_else(|| DomainError::user_not_found(id))?;
    user.merge(dto, password_hash);
    save_with_cars(uow, user, &dto.cars).await
}

async fn delete_in(uow: &dyn UnitOfWork, id: Uuid) -> DomainResult<usize> {
    if uow.find_user_by_id(id).await?.is_none() {
        return Err(DomainError::user_not_found(id));
    }

    let cars = uow.find_cars_by_owner(id).await?;
    let released = cars.len();
    for mut car in cars {
        car.detach();
        uow.save_car(car).await?;
    }

    uow.delete_user_by_id(id).await?;
    Ok(released)
}

async fn disassociate_in(uow: &dyn UnitOfWork, user_id: Uuid, car_id: Uuid) -> DomainResult<bool> {
    match uow.find_car_by_owner_and_id(user_id, car_id).await? {
        Some(mut car) => {
            car.detach();
            uow.save_car(car).await?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Check uniqueness, persist `user`, then create and attach its new cars.
async fn save_with_cars<R>(repo: &R, user: User, cars: &[EmbeddedCarDto]) -> DomainResult<User>
where
    R: UserRepository + CarRepository + ?Sized,
{
    ensure_unique_email(repo, &user).await?;
    ensure_unique_login(repo, &user).await?;

    let saved = repo.save_user(user).await?;
    let owner_id = saved
        .id
        .ok_or_else(|| DomainError::Storage("saved user came back without an id".into()))?;

    for embedded in cars {
        if let Some(car_id) = embedded.id {
            debug!(user_id = %owner_id, %car_id, "Embedded car already exists; left untouched");
            continue;
        }
        let mut car = Car::new(embedded.car.clone());
        car.attach_to(owner_id);
        save_car(repo, car).await?;
    }

    Ok(saved)
}

async fn ensure_unique_email<R>(repo: &R, user: &User) -> DomainResult<()>
where
    R: UserRepository + ?Sized,
{
    match repo.find_user_by_email(&user.email).await? {
        Some(holder) if user.is_other_than(&holder) => {
            Err(DomainError::DuplicateEmail(user.email.clone()))
        }
        _ => Ok(()),
    }
}

async fn ensure_unique_login<R>(repo: &R, user: &User) -> DomainResult<()>
where
    R: UserRepository + ?Sized,
{
    match repo.find_user_by_login(&user.login).await? {
        Some(holder) if user.is_other_than(&holder) => {
            Err(DomainError::DuplicateLogin(user.login.clone()))
        }
        _ => Ok(()),
    }
}

/// Structural checks on the profile and on every new embedded car.
fn validate_user(dto: &SaveUserDto) -> DomainResult<()> {
    let mut violations = match dto.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => flatten_violations(&errors),
    };

    for (index, embedded) in dto.cars.iter().enumerate() {
        if embedded.id.is_some() {
            continue;
        }
        if let Err(errors) = embedded.car.validate() {
            let prefix = format!("cars[{}]", index);
            violations.extend(
                flatten_violations(&errors)
                    .into_iter()
                    .map(|v| v.nested(&prefix)),
            );
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation(violations))
    }
}
