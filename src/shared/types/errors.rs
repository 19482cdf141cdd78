use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::{ValidationErrors, ValidationErrorsKind};

/// A single structural constraint violated by an input payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Re-homes the violation under a parent field, e.g. `cars[2].year`.
    pub fn nested(self, prefix: &str) -> Self {
        Self {
            field: format!("{}.{}", prefix, self.field),
            message: self.message,
        }
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("License plate already in use: {0}")]
    DuplicateLicensePlate(String),

    #[error("Email already in use: {0}")]
    DuplicateEmail(String),

    #[error("Login already in use: {0}")]
    DuplicateLogin(String),

    #[error("Validation failed: {}", describe_violations(.0))]
    Validation(Vec<FieldViolation>),

    #[error("Storage error: {0}")]
    Storage(String),

    /// A server-side fault outside the store, e.g. password hashing.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn user_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: "User",
            field: "id",
            value: id.to_string(),
        }
    }

    pub fn car_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: "Car",
            field: "id",
            value: id.to_string(),
        }
    }

    /// Whether the caller may translate this into a "someone else holds it" response.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::DuplicateLicensePlate(_) | Self::DuplicateEmail(_) | Self::DuplicateLogin(_)
        )
    }
}

fn describe_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(flatten_violations(&errors))
    }
}

/// Flatten `validator` output into one violation per failed rule, sorted by field.
pub fn flatten_violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .errors()
        .iter()
        .flat_map(|(field, kind)| match kind {
            ValidationErrorsKind::Field(errs) => errs
                .iter()
                .map(|e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    FieldViolation::new(field.to_string(), message)
                })
                .collect::<Vec<_>>(),
            ValidationErrorsKind::Struct(inner) => flatten_violations(inner)
                .into_iter()
                .map(|v| v.nested(field))
                .collect(),
            ValidationErrorsKind::List(items) => items
                .iter()
                .flat_map(|(index, inner)| {
                    let prefix = format!("{}[{}]", field, index);
                    flatten_violations(inner)
                        .into_iter()
                        .map(move |v| v.nested(&prefix))
                })
                .collect(),
        })
        .collect();

    violations.sort_by(|a, b| a.field.cmp(&b.field).then(a.message.cmp(&b.message)));
    violations
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Crypto error: {0}")]
    Crypto(#[from] bcrypt::BcryptError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
