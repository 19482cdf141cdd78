//! User DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{EmbeddedCarDto, GetUsersDto, SaveCarDto, SaveUserDto, User};

/// User API representation. The password hash is never exposed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub login: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            login: u.login,
            birthday: u.birthday,
            phone: u.phone,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// A car inside a user payload.
///
/// Entries without `id` are created and attached to the user; entries with an
/// `id` refer to existing cars and are left as they are.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EmbeddedCarRequest {
    pub id: Option<Uuid>,
    pub year: i32,
    pub license_plate: String,
    pub model: String,
    pub color: String,
}

impl From<EmbeddedCarRequest> for EmbeddedCarDto {
    fn from(r: EmbeddedCarRequest) -> Self {
        Self {
            id: r.id,
            car: SaveCarDto {
                year: r.year,
                license_plate: r.license_plate,
                model: r.model,
                color: r.color,
            },
        }
    }
}

/// Create / replace user request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UserRequest {
    #[schema(example = "Alice")]
    pub first_name: String,
    #[schema(example = "Liddell")]
    pub last_name: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "alice")]
    pub login: String,
    pub password: String,
    pub birthday: Option<NaiveDate>,
    pub phone: Option<String>,
    #[serde(default)]
    pub cars: Vec<EmbeddedCarRequest>,
}

impl From<UserRequest> for SaveUserDto {
    fn from(r: UserRequest) -> Self {
        Self {
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            login: r.login,
            password: r.password,
            birthday: r.birthday,
            phone: r.phone,
            cars: r.cars.into_iter().map(EmbeddedCarDto::from).collect(),
        }
    }
}

/// List users query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUsersParams {
    /// Case-insensitive substring of the first name
    pub first_name: Option<String>,
    /// Page number, starting at 1
    pub page: Option<u64>,
    /// Items per page (1-100, default 20)
    pub page_size: Option<u64>,
}

impl From<ListUsersParams> for GetUsersDto {
    fn from(p: ListUsersParams) -> Self {
        Self {
            first_name: p.first_name,
            page: p.page,
            page_size: p.page_size,
        }
    }
}
