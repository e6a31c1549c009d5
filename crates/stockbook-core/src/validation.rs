//! # Validation Module
//!
//! Input validation utilities for Stockbook.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Dashboard form                                               │
//! │  ├── Basic presence checks                                             │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Record drafts (types.rs)                                     │
//! │  └── THIS MODULE: field rules, called by every constructor             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store (SQLite)                                               │
//! │  └── NOT NULL constraints                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockbook_core::validation::{validate_name, validate_quantity};
//!
//! validate_name("name", "Basmati Rice").unwrap();
//! validate_quantity("quantity", 5).unwrap();
//! ```

use chrono::NaiveDate;

use crate::error::{CoreError, ValidationError};
use crate::{MAX_NAME_LEN, MAX_QUANTITY, MAX_UNIT_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (item or category).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
///
/// ## Returns
/// The trimmed name.
///
/// ## Example
/// ```rust
/// use stockbook_core::validation::validate_name;
///
/// assert_eq!(validate_name("name", "  Sugar ").unwrap(), "Sugar");
/// assert!(validate_name("name", "").is_err());
/// ```
pub fn validate_name(field: &str, name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates an optional unit label ("kg", "pcs", ...).
///
/// Blank units collapse to `None` so reports don't print a stray suffix.
pub fn validate_unit(unit: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(unit) = unit.map(str::trim).filter(|u| !u.is_empty()) else {
        return Ok(None);
    };

    if unit.chars().count() > MAX_UNIT_LEN {
        return Err(ValidationError::TooLong {
            field: "unit".to_string(),
            max: MAX_UNIT_LEN,
        });
    }

    Ok(Some(unit.to_string()))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a purchase or sale quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_QUANTITY
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Sales form: Add Sale                                                   │
/// │                                                                         │
/// │  User enters quantity: 0                                                │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity("quantity", 0) ← THIS FUNCTION                       │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"                │
/// │       │                                                                 │
/// │       └── OK → NewSale is built and handed to the store                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(field: &str, qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if qty > MAX_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Reference Validators
// =============================================================================

/// Validates a record id (UUID format).
///
/// Used for required selections such as the item of a sale.
///
/// ## Example
/// ```rust
/// use stockbook_core::validation::validate_id;
///
/// assert!(validate_id("itemId", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_id("itemId", "").is_err());
/// assert!(validate_id("itemId", "not-a-uuid").is_err());
/// ```
pub fn validate_id(field: &str, id: &str) -> ValidationResult<String> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(id.to_string())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses a form date in `YYYY-MM-DD` format.
pub fn parse_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "expected YYYY-MM-DD".to_string(),
    })
}

/// Validates a report range. Only a fully specified range can be inverted.
pub fn validate_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), CoreError> {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(CoreError::InvalidDateRange { start, end });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("name", "Sugar").unwrap(), "Sugar");
        assert_eq!(validate_name("name", "  Flour  ").unwrap(), "Flour");

        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_unit() {
        assert_eq!(validate_unit(Some("kg")).unwrap(), Some("kg".to_string()));
        assert_eq!(validate_unit(Some("  ")).unwrap(), None);
        assert_eq!(validate_unit(None).unwrap(), None);
        assert!(validate_unit(Some(&"x".repeat(40))).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity("quantity", 1).is_ok());
        assert!(validate_quantity("quantity", MAX_QUANTITY).is_ok());

        assert_eq!(
            validate_quantity("quantity", 0),
            Err(ValidationError::MustBePositive {
                field: "quantity".to_string()
            })
        );
        assert!(validate_quantity("quantity", -5).is_err());
        assert!(validate_quantity("quantity", MAX_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("itemId", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_id("itemId", "").is_err());
        assert!(validate_id("itemId", "123").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("date", "2024-02-10").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 10).unwrap()
        );
        assert!(parse_date("date", "").is_err());
        assert!(parse_date("date", "10/02/2024").is_err());
    }

    #[test]
    fn test_validate_date_range() {
        let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let feb = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

        assert!(validate_date_range(Some(jan), Some(feb)).is_ok());
        assert!(validate_date_range(Some(jan), Some(jan)).is_ok());
        assert!(validate_date_range(None, Some(jan)).is_ok());
        assert!(validate_date_range(Some(feb), None).is_ok());
        assert!(matches!(
            validate_date_range(Some(feb), Some(jan)),
            Err(CoreError::InvalidDateRange { .. })
        ));
    }
}
