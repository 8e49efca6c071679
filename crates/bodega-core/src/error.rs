//! # Error Types
//!
//! Domain errors for bodega-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bodega-core errors (this file)                                        │
//! │  ├── CoreError        - Catalog rules and wrapped validation           │
//! │  └── ValidationError  - Form input failures                            │
//! │                                                                         │
//! │  bodega-db errors (separate crate)                                     │
//! │  └── DbError          - Data source, storage and config failures       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → front end toast         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Price parsing and pagination never produce errors: bad price text reads
//! as `0.0` and an out-of-range page is simply empty. Use
//! [`crate::price::is_valid_price`] when "zero" and "invalid" must be told
//! apart.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Catalog-level errors raised by pure domain operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A subcategory was attached to a product of another category.
    ///
    /// ## When This Occurs
    /// ```text
    /// Product form: category = "Bebidas", subcategory = "Carnes"
    ///      │
    ///      ▼
    /// SubcategoryMismatch { subcategory_id, category_id }
    ///      │
    ///      ▼
    /// UI toast: "Subcategoría no pertenece a la categoría"
    /// ```
    #[error("Subcategory {subcategory_id} does not belong to category {category_id}")]
    SubcategoryMismatch {
        subcategory_id: String,
        category_id: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Form input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (phone number, UUID, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in the allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Price text does not read as a non-negative amount.
    #[error("'{input}' is not a valid price")]
    InvalidPrice { input: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::SubcategoryMismatch {
            subcategory_id: "sub-1".to_string(),
            category_id: "cat-9".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Subcategory sub-1 does not belong to category cat-9"
        );

        let err = ValidationError::InvalidPrice {
            input: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "'abc' is not a valid price");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.to_string(), "Validation error: name is required");
    }
}
