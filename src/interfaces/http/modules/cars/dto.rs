//! Car DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{Car, GetCarsDto, SaveCarDto};

/// Car API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CarDto {
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

impl From<Car> for CarDto {
    fn from(c: Car) -> Self {
        Self {
            id: c.id,
            year: c.year,
            license_plate: c.license_plate,
            model: c.model,
            color: c.color,
            user_id: c.user_id,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Create / replace car request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CarRequest {
    #[schema(example = 2020)]
    pub year: i32,
    #[schema(example = "ABC1D23")]
    pub license_plate: String,
    #[schema(example = "Gol")]
    pub model: String,
    #[schema(example = "Red")]
    pub color: String,
}

impl From<CarRequest> for SaveCarDto {
    fn from(r: CarRequest) -> Self {
        Self {
            year: r.year,
            license_plate: r.license_plate,
            model: r.model,
            color: r.color,
        }
    }
}

/// List cars query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListCarsParams {
    /// Case-insensitive substring of the model name
    pub model: Option<String>,
    /// Page number, starting at 1
    pub page: Option<u64>,
    /// Items per page (1-100, default 20)
    pub page_size: Option<u64>,
}

impl From<ListCarsParams> for GetCarsDto {
    fn from(p: ListCarsParams) -> Self {
        Self {
            model: p.model,
            page: p.page,
            page_size: p.page_size,
        }
    }
}
