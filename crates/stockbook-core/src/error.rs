//! # Error Types
//!
//! Domain-specific error types for stockbook-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockbook-core errors (this file)                                     │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  stockbook-db errors (separate crate)                                  │
//! │  └── DbError          - Store operation failures                       │
//! │                                                                         │
//! │  App errors                                                            │
//! │  └── ApiError         - What a caller sees (serialized)                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError                          │
//! │                          DbError   → ApiError                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (id, field, etc.)
//! 3. Errors are enum variants, never String

use chrono::NaiveDate;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Item id does not exist in the snapshot.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Category id does not exist in the snapshot.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Purchase id does not exist in the snapshot.
    #[error("Purchase not found: {0}")]
    PurchaseNotFound(String),

    /// Sale id does not exist in the snapshot.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Report range with the start after the end.
    ///
    /// ## When This Occurs
    /// ```text
    /// Sales report: start = 2024-03-01, end = 2024-02-01
    ///      │
    ///      ▼
    /// InvalidDateRange { start, end }
    ///      │
    ///      ▼
    /// UI shows: "Invalid date range: 2024-03-01 is after 2024-02-01"
    /// ```
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when form input doesn't meet requirements.
/// They are raised before anything reaches the store.
#[derive(Debug, Error, PartialEq, Eq)]
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

    /// Invalid format (e.g., invalid UUID, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
