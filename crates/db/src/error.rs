//! Translation of store errors into application errors.
//!
//! Uniqueness and foreign-key constraints are the final word on races between
//! a pre-check and the write that follows it, so their violations surface as
//! the same outcome the pre-check would have produced.

use agora_common::AppError;
use sea_orm::{DbErr, SqlErr};

/// Map a database error, classifying constraint violations.
///
/// - unique violation -> [`AppError::Conflict`]
/// - foreign-key violation -> [`AppError::NotFound`] (a referenced row vanished)
/// - anything else -> [`AppError::Database`]
#[must_use]
pub fn map_db_err(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!(detail = %detail, "Unique constraint violated");
            AppError::Conflict("Resource already exists".to_string())
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            tracing::debug!(detail = %detail, "Foreign key constraint violated");
            AppError::NotFound("Referenced resource no longer exists".to_string())
        }
        _ => AppError::Database(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_errors_stay_database_errors() {
        let err = map_db_err(DbErr::Custom("connection reset".to_string()));
        match err {
            AppError::Database(msg) => assert!(msg.contains("connection reset")),
            other => panic!("Expected Database error, got {other:?}"),
        }
    }

    #[test]
    fn test_record_not_found_is_not_a_constraint() {
        let err = map_db_err(DbErr::RecordNotFound("post".to_string()));
        assert!(matches!(err, AppError::Database(_)));
    }
}
