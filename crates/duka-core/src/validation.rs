//! # Validation
//!
//! Input validation for business rules. These check the *shape* of inputs
//! (non-empty, length, sign, well-formed ids) independent of system state;
//! stateful rules (stock, shift guards, transitions) live with their types.

use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::TaxRate;

/// Maximum length for names and labels.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for SKUs.
pub const MAX_SKU_LENGTH: usize = 64;

/// Maximum length for free-text reasons and descriptions.
pub const MAX_TEXT_LENGTH: usize = 500;

/// Validates a required, bounded text field.
pub fn validate_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if value.len() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

/// Validates a display name (products, customers, held receipts).
pub fn validate_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    validate_text(field, value, MAX_NAME_LENGTH)
}

/// Validates a SKU.
pub fn validate_sku(value: &str) -> Result<(), ValidationError> {
    validate_text("sku", value, MAX_SKU_LENGTH)
}

/// Validates an entity id is a well-formed UUID.
pub fn validate_id(field: &'static str, value: &str) -> Result<(), ValidationError> {
    Uuid::parse_str(value).map_err(|_| ValidationError::InvalidId { field })?;
    Ok(())
}

/// Validates a monetary amount that must not be negative
/// (prices, floats, deposits, payout amounts).
pub fn validate_non_negative(field: &'static str, amount: Money) -> Result<(), ValidationError> {
    if amount.is_negative() {
        return Err(ValidationError::NegativeAmount { field });
    }
    Ok(())
}

/// Validates a tax rate is at most 100%.
pub fn validate_tax_rate(rate: TaxRate) -> Result<(), ValidationError> {
    if rate.bps() > 10000 {
        return Err(ValidationError::TaxRateTooHigh { bps: rate.bps() });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
