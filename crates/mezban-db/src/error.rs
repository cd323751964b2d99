//! # Store Error Types
//!
//! The storage layer's error taxonomy, shared by every operation the UI
//! shell can invoke.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                │
//! │                                                                     │
//! │  SQLite Error (sqlx::Error)                                         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  StoreError (this module) ← normalized into four kinds,             │
//! │       │                     engine details never leak upward        │
//! │       ▼                                                             │
//! │  UI shell distinguishes "your input was invalid" from               │
//! │  "something internal failed"                                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store never retries on its own: every failure here is either an
//! input error or a storage fault that won't self-heal. The one
//! exception is snapshot import, which restores its own backup (see
//! [`crate::snapshot`]).

use thiserror::Error;

use mezban_core::ValidationError;

/// Storage-layer errors.
///
/// Exactly four kinds; callers can match exhaustively.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Caller input was rejected before anything was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The id the caller named does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The storage engine failed. Carries the attempted operation name
    /// so logs can say what was being done, not just what broke.
    #[error("storage failure in {op}: {message}")]
    Storage { op: String, message: String },

    /// A sale's total disagreed with the sum of its lines. Detected
    /// before commit; the write is aborted, never silently corrected.
    #[error("sale total {total_cents} does not match line sum {line_sum_cents}")]
    Integrity {
        total_cents: i64,
        line_sum_cents: i64,
    },
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl std::fmt::Display) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Storage error for a named operation.
    pub fn storage(op: impl Into<String>, message: impl std::fmt::Display) -> Self {
        StoreError::Storage {
            op: op.into(),
            message: message.to_string(),
        }
    }
}

/// Maps an sqlx error into the taxonomy, tagged with the operation name.
///
/// ## Error Mapping
/// ```text
/// UNIQUE constraint failed  → Validation(Duplicate)   (backstop; the
///                             repositories pre-check duplicates)
/// everything else           → Storage { op, .. }
/// ```
///
/// Usage: `.map_err(db_err("add_product"))?`
pub(crate) fn db_err(op: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |err| {
        if let sqlx::Error::Database(db_err) = &err {
            let msg = db_err.message();
            if let Some(column) = msg.strip_prefix("UNIQUE constraint failed: ") {
                return StoreError::Validation(ValidationError::Duplicate {
                    field: column.to_string(),
                    value: "(duplicate)".to_string(),
                });
            }
        }

        StoreError::storage(op, err)
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::storage("migrate", err)
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = StoreError::not_found("Product", 41);
        assert_eq!(err.to_string(), "Product not found: 41");
    }

    #[test]
    fn test_storage_carries_operation() {
        let err = StoreError::storage("record_sale", "disk I/O error");
        assert_eq!(
            err.to_string(),
            "storage failure in record_sale: disk I/O error"
        );
    }

    #[test]
    fn test_validation_converts_to_store_error() {
        let err: StoreError = ValidationError::EmptySale.into();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(err.to_string(), "sale has no line items");
    }

    #[test]
    fn test_integrity_message() {
        let err = StoreError::Integrity {
            total_cents: 600,
            line_sum_cents: 500,
        };
        assert_eq!(
            err.to_string(),
            "sale total 600 does not match line sum 500"
        );
    }
}
