//! # Validation Module
//!
//! Form validation for the admin dashboard's create/edit screens.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end (React form state)                                 │
//! │  ├── Input mask on the price field                                     │
//! │  └── Inline error under each field                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (called by the *Input constructors)              │
//! │  ├── Required / length rules                                           │
//! │  ├── Price text gate (is_valid_price)                                  │
//! │  └── Phone and id formats                                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Data source                                                  │
//! │  └── Foreign keys, not-found on update                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bodega_core::validation::{validate_name, validate_price_text};
//!
//! assert_eq!(validate_name("name", "  Bodegón La Esquina ").unwrap(), "Bodegón La Esquina");
//! assert_eq!(validate_price_text("1.250,50").unwrap(), 1250.5);
//! assert!(validate_price_text("abc").is_err());
//! ```

use crate::error::ValidationError;
use crate::price;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted merchant, category or product name.
pub const MAX_NAME_LEN: usize = 120;

/// Longest accepted product description.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Longest accepted address line.
pub const MAX_ADDRESS_LEN: usize = 250;

/// Longest accepted search query.
pub const MAX_SEARCH_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name and returns it trimmed.
///
/// ## Rules
/// - Must not be blank
/// - At most [`MAX_NAME_LEN`] characters (not bytes: names carry accents)
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

/// Validates optional free text; blank collapses to `None`.
pub fn validate_optional_text(
    field: &str,
    text: Option<&str>,
    max: usize,
) -> ValidationResult<Option<String>> {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    if text.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(Some(text.to_string()))
}

/// Validates a phone number and returns it trimmed.
///
/// ## Rules
/// - Optional leading `+`
/// - Digits, spaces and dashes only
/// - Between 7 and 15 digits (E.164 upper bound)
///
/// ## Example
/// ```rust
/// use bodega_core::validation::validate_phone;
///
/// assert!(validate_phone("+58 412-555-0199").is_ok());
/// assert!(validate_phone("0212 555 01").is_ok());
/// assert!(validate_phone("call me").is_err());
/// assert!(validate_phone("123").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<String> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone_number".to_string(),
        });
    }

    let body = phone.strip_prefix('+').unwrap_or(phone);
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone_number".to_string(),
            reason: "must contain only digits, spaces, dashes and a leading +".to_string(),
        });
    }

    let digits = body.chars().filter(char::is_ascii_digit).count();
    if !(7..=15).contains(&digits) {
        return Err(ValidationError::OutOfRange {
            field: "phone_number digits".to_string(),
            min: 7,
            max: 15,
        });
    }

    Ok(phone.to_string())
}

/// Validates a search query and returns it trimmed.
///
/// Empty is fine: it means "no filter".
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Price Validators
// =============================================================================

/// Validates the text of a price field (display or masked form) and
/// returns the amount.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product form: Save                                                     │
/// │                                                                         │
/// │  Price field shows "1.250,50"                                          │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_price_text ← THIS FUNCTION                                   │
/// │       │                                                                 │
/// │       ├── blank?            → "price is required"                      │
/// │       ├── !is_valid_price?  → "'abc' is not a valid price"             │
/// │       ├── over MAX_PRICE_CENTS? → out of range                        │
/// │       └── OK → 1250.5 → stored as 125050 cents                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_price_text(text: &str) -> ValidationResult<f64> {
    if text.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "price".to_string(),
        });
    }

    if !price::is_valid_price(text) {
        return Err(ValidationError::InvalidPrice {
            input: text.to_string(),
        });
    }

    let amount = price::parse_price(text);
    if price::to_cents(amount) > price::MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: price::MAX_PRICE_CENTS / 100,
        });
    }

    Ok(amount)
}

// =============================================================================
// Pagination Validators
// =============================================================================

/// Checks a requested page size against the selector's allow-list.
pub fn validate_page_size(size: usize, options: &[usize]) -> ValidationResult<()> {
    if options.contains(&size) {
        return Ok(());
    }

    Err(ValidationError::NotAllowed {
        field: "page_size".to_string(),
        allowed: options.iter().map(ToString::to_string).collect(),
    })
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string.
///
/// ## Example
/// ```rust
/// use bodega_core::validation::validate_uuid;
///
/// assert!(validate_uuid("category_id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("category_id", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

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
        assert_eq!(validate_name("name", " Arepera ").unwrap(), "Arepera");
        assert_eq!(
            validate_name("name", "   "),
            Err(ValidationError::Required {
                field: "name".to_string()
            })
        );
        assert!(validate_name("name", &"ñ".repeat(MAX_NAME_LEN)).is_ok());
        assert!(validate_name("name", &"ñ".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_optional_text() {
        assert_eq!(validate_optional_text("description", None, 10).unwrap(), None);
        assert_eq!(
            validate_optional_text("description", Some("  "), 10).unwrap(),
            None
        );
        assert_eq!(
            validate_optional_text("description", Some(" ok "), 10).unwrap(),
            Some("ok".to_string())
        );
        assert!(validate_optional_text("description", Some("too long text"), 5).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert_eq!(validate_phone(" +58 412 5550199 ").unwrap(), "+58 412 5550199");
        assert!(validate_phone("").is_err());
        assert!(validate_phone("++584125550199").is_err());
        assert!(validate_phone("12345678901234567").is_err());
    }

    #[test]
    fn test_validate_price_text() {
        assert_eq!(validate_price_text("$1.250,00").unwrap(), 1250.0);
        assert_eq!(validate_price_text("0").unwrap(), 0.0);
        assert!(matches!(
            validate_price_text(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_price_text("-5"),
            Err(ValidationError::InvalidPrice { .. })
        ));
        assert!(matches!(
            validate_price_text("abc"),
            Err(ValidationError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn test_validate_price_text_upper_bound() {
        assert_eq!(
            validate_price_text("1.000.000.000.000,00").unwrap(),
            1_000_000_000_000.0
        );
        assert!(matches!(
            validate_price_text("1.000.000.000.000,01"),
            Err(ValidationError::OutOfRange { field, .. }) if field == "price"
        ));
        assert!(matches!(
            validate_price_text("99.999.999.999.999.999.999.999"),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  harina pan ").unwrap(), "harina pan");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"a".repeat(MAX_SEARCH_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_page_size() {
        let options = crate::PAGE_SIZE_OPTIONS;
        assert!(validate_page_size(25, &options).is_ok());
        assert!(validate_page_size(7, &options).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("id", "").is_err());
        assert!(validate_uuid("id", "123").is_err());
    }
}
