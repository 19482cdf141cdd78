//! User domain entity

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::SaveUserDto;

/// A registered user.
///
/// The cars a user owns are not held here; they are looked up through the
/// car repository by owner id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Assigned by storage on first persist
    pub id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub login: String,
    pub password_hash: String,
    pub birthday: Option<NaiveDate>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build an unpersisted user. The embedded car list of `dto` is ignored here.
    pub fn new(dto: &SaveUserDto, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            first_name: dto.first_name.clone(),
            last_name: dto.last_name.clone(),
            email: dto.email.clone(),
            login: dto.login.clone(),
            password_hash,
            birthday: dto.birthday,
            phone: dto.phone.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Overwrite every profile attribute carried by `dto`; `id` and `created_at` survive.
    pub fn merge(&mut self, dto: &SaveUserDto, password_hash: String) {
        self.first_name = dto.first_name.clone();
        self.last_name = dto.last_name.clone();
        self.email = dto.email.clone();
        self.login = dto.login.clone();
        self.password_hash = password_hash;
        self.birthday = dto.birthday;
        self.phone = dto.phone.clone();
        self.updated_at = Utc::now();
    }

    /// Whether `other` is a different user than this one.
    pub fn is_other_than(&self, other: &User) -> bool {
        self.is_new() || self.id != other.id
    }
}
