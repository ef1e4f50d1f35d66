//! Database-specific error types and conversions.

use rentroll_core::error::RentRollError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Malformed {entity} row: {reason}")]
    InvalidRow { entity: &'static str, reason: String },

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Record already exists: {entity}")]
    AlreadyExists { entity: String },
}

impl DbError {
    pub(crate) fn invalid_row(entity: &'static str, reason: impl ToString) -> Self {
        DbError::InvalidRow {
            entity,
            reason: reason.to_string(),
        }
    }
}

impl From<DbError> for RentRollError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => RentRollError::NotFound { entity, id },
            DbError::AlreadyExists { entity } => RentRollError::AlreadyExists { entity },
            other => RentRollError::Database(other.to_string()),
        }
    }
}
