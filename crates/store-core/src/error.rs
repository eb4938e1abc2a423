//! # Error Types
//!
//! Domain-specific error types for store-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  store-core errors (this file)                                         │
//! │  └── ValidationError  - Bad criteria or bad entity input               │
//! │                                                                         │
//! │  store-db errors (separate crate)                                      │
//! │  └── DbError          - Storage failures, NotFound, constraint hits    │
//! │                                                                         │
//! │  Flow: ValidationError → DbError → caller (HTTP 400/404/500)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, entity, value)
//! 3. Errors are enum variants, never String

use thiserror::Error;

use crate::types::EntityKind;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised for two kinds of caller input:
/// - criteria objects (unknown sort field, out-of-range pagination)
/// - entity payloads on insert/update (blank names, non-positive prices)
///
/// Never retried, never recovered locally.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid decimal).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Sort field is not on the entity's allow-list.
    ///
    /// ## When This Occurs
    /// ```text
    /// ProductCriteria { sort_field: "nonexistentColumn", .. }
    ///      │
    ///      ▼
    /// ProductField::from_str("nonexistentColumn")
    ///      │
    ///      ▼
    /// FieldNotFound { entity: Product, field: "nonexistentColumn" }
    /// ```
    /// The name never reaches SQL.
    #[error("{entity} has no sortable field '{field}'")]
    FieldNotFound { entity: EntityKind, field: String },

    /// Page index is negative or page size is not positive.
    #[error("Invalid pagination: page {page}, size {size}")]
    InvalidPagination { page: i64, size: i64 },
}

impl ValidationError {
    /// Creates a FieldNotFound error for the given entity.
    pub fn field_not_found(entity: EntityKind, field: impl Into<String>) -> Self {
        ValidationError::FieldNotFound {
            entity,
            field: field.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_not_found_message() {
        let err = ValidationError::field_not_found(EntityKind::Product, "nonexistentColumn");
        assert_eq!(
            err.to_string(),
            "Product has no sortable field 'nonexistentColumn'"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "dni".to_string(),
        };
        assert_eq!(err.to_string(), "dni is required");

        let err = ValidationError::InvalidPagination { page: -1, size: 10 };
        assert_eq!(err.to_string(), "Invalid pagination: page -1, size 10");
    }
}
