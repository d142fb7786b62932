use serde::Serialize;
use thiserror::Error;

/// One rejected input field, reported back to the client as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &str, message: &str) -> Self {
        Self { field: field.to_string(), message: message.to_string() }
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("invalid fields: {}", join_fields(.0))]
    Invalid(Vec<FieldViolation>),
    #[error("database error: {0}")]
    Db(String),
}

fn join_fields(violations: &[FieldViolation]) -> String {
    violations.iter().map(|v| v.field.as_str()).collect::<Vec<_>>().join(", ")
}

impl From<sea_orm::DbErr> for ModelError {
    fn from(e: sea_orm::DbErr) -> Self { Self::Db(e.to_string()) }
}
