use chrono::NaiveDate;
use validator::Validate;

use crate::domain::car::EmbeddedCarDto;

/// User attributes accepted on create and update. Carries no id.
///
/// `cars` is not validated by the derive; each embedded car is checked with the
/// car rules by the service so violations can be reported per index.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct SaveUserDto {
    #[validate(length(min = 1, message = "first name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: String,
    #[validate(email(message = "email is not a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "login is required"))]
    pub login: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    pub birthday: Option<NaiveDate>,
    pub phone: Option<String>,
    pub cars: Vec<EmbeddedCarDto>,
}
