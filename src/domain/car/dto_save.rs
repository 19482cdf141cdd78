use uuid::Uuid;
use validator::Validate;

/// Car attributes accepted on create and update. Carries no id.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct SaveCarDto {
    #[validate(range(min = 1, message = "year must be at least 1"))]
    pub year: i32,
    #[validate(length(min = 1, message = "license plate is required"))]
    pub license_plate: String,
    #[validate(length(min = 1, message = "model is required"))]
    pub model: String,
    #[validate(length(min = 1, message = "color is required"))]
    pub color: String,
}

/// A car embedded in a user payload.
///
/// Entries without an id are new cars to be created and attached to the user;
/// entries with an id refer to cars that already exist and are left as they are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedCarDto {
    pub id: Option<Uuid>,
    pub car: SaveCarDto,
}

impl EmbeddedCarDto {
    pub fn new(car: SaveCarDto) -> Self {
        Self { id: None, car }
    }
}
