pub mod sqlite;
pub mod repository;

pub use sqlite::*;
pub use repository::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("Duplicate {entity_type}: {detail}")]
    Duplicate { entity_type: String, detail: String },

    #[error("Referenced {entity_type} with id {id} does not exist")]
    UnresolvedReference { entity_type: String, id: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Missing discriminator '{field}' for {entity_type}")]
    MissingDiscriminator { entity_type: String, field: String },
}

impl From<rusqlite::Error> for DatabaseError {
    /// Classify constraint failures so callers can tell a uniqueness
    /// violation apart from a dangling foreign key.
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, ref msg) = err {
            if code.code == rusqlite::ErrorCode::ConstraintViolation {
                let detail = msg.clone().unwrap_or_else(|| err.to_string());
                return match code.extended_code {
                    rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                    | rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE => DatabaseError::Duplicate {
                        entity_type: constraint_table(&detail),
                        detail,
                    },
                    _ => DatabaseError::ConstraintViolation(detail),
                };
            }
        }
        DatabaseError::Sqlite(err)
    }
}

/// Table name out of a SQLite constraint message
/// (`UNIQUE constraint failed: medical_school.name`).
fn constraint_table(detail: &str) -> String {
    detail
        .rsplit(": ")
        .next()
        .and_then(|cols| cols.split('.').next())
        .unwrap_or("record")
        .to_string()
}

impl DatabaseError {
    pub fn not_found(entity_type: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    pub fn unresolved(entity_type: &str, id: impl ToString) -> Self {
        Self::UnresolvedReference {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
