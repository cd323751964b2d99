//! # Error Types
//!
//! Domain-specific error types for mezban-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  mezban-core errors (this file)                                     │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  mezban-db errors (separate crate)                                  │
//! │  └── StoreError       - Validation / NotFound / Storage / Integrity │
//! │                                                                     │
//! │  Flow: ValidationError → StoreError → UI shell                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field names, offending values)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before any row is written.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Invalid format (e.g., malformed currency code or HH:MM time).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., product name already in the catalog).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// A sale must carry at least one line item.
    #[error("sale has no line items")]
    EmptySale,

    /// Quantity does not move in the increment its unit allows.
    ///
    /// Whole units (`item`) sell in steps of 1; divisible units (kg,
    /// litre, ...) sell in steps of 0.5.
    #[error("quantity for unit '{unit}' must be a multiple of {step}")]
    BadQuantityStep { unit: String, step: f64 },

    /// Sale exceeds the maximum number of line items.
    #[error("sale cannot have more than {max} line items")]
    TooManyLines { max: usize },
}

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::Duplicate {
            field: "name".to_string(),
            value: "Tea".to_string(),
        };
        assert_eq!(err.to_string(), "name 'Tea' already exists");

        let err = ValidationError::BadQuantityStep {
            unit: "item".to_string(),
            step: 1.0,
        };
        assert_eq!(err.to_string(), "quantity for unit 'item' must be a multiple of 1");
    }

    #[test]
    fn test_empty_sale_message() {
        assert_eq!(ValidationError::EmptySale.to_string(), "sale has no line items");
    }
}
