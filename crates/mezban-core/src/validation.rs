//! # Validation Module
//!
//! Input validation utilities for Mezban POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: UI shell                                                  │
//! │  ├── Basic format checks (empty, length)                            │
//! │  └── Immediate user feedback                                        │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE, called by the repositories                   │
//! │  └── Business rule validation before any row is written             │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  ├── NOT NULL constraints                                           │
//! │  ├── UNIQUE (name COLLATE NOCASE) on products                       │
//! │  └── Foreign key constraints with cascade delete                    │
//! │                                                                     │
//! │  Defense in depth: multiple layers catch different errors           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::types::{NewSaleLine, Settings};
use crate::{MAX_LINE_QUANTITY, MAX_SALE_LINES};

/// Tolerance for checking that an f64 quantity sits on its unit grid.
const QUANTITY_EPSILON: f64 = 1e-9;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 200 characters
///
/// Case-insensitive uniqueness is checked against the catalog by the
/// product repository, not here.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a currency tag ("PKR", "USD", ...).
///
/// ## Rules
/// - Exactly 3 ASCII letters, uppercase
pub fn validate_currency(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "currency".to_string(),
        });
    }

    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::InvalidFormat {
            field: "currency".to_string(),
            reason: "must be a 3-letter uppercase tag like PKR".to_string(),
        });
    }

    Ok(())
}

/// Validates a wall-clock time field ("HH:MM", 24-hour).
pub fn validate_time_hhmm(field: &str, value: &str) -> ValidationResult<()> {
    let bad = || ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be HH:MM in 24-hour time".to_string(),
    };

    let (hh, mm) = value.split_once(':').ok_or_else(bad)?;
    if hh.len() != 2 || mm.len() != 2 {
        return Err(bad());
    }

    let hours: u32 = hh.parse().map_err(|_| bad())?;
    let minutes: u32 = mm.parse().map_err(|_| bad())?;
    if hours > 23 || minutes > 59 {
        return Err(bad());
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a catalog price in cents.
///
/// ## Rules
/// - Must be strictly positive; a zero-priced product is rejected
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Whether a unit label sells in half steps rather than whole steps.
///
/// The catalog ships "item" as the default label for countable goods;
/// everything else (kg, litre, meter, ...) is treated as divisible.
pub fn is_divisible_unit(unit: &str) -> bool {
    !(unit.eq_ignore_ascii_case("item") || unit.eq_ignore_ascii_case("items"))
}

/// Validates a sold quantity against its unit's increment rule.
///
/// ## Rules
/// - Must be strictly positive
/// - Must not exceed [`MAX_LINE_QUANTITY`]
/// - `item` units move in whole steps of 1; divisible units in steps of 0.5
pub fn validate_quantity(quantity: f64, unit: &str) -> ValidationResult<()> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0.0,
            max: MAX_LINE_QUANTITY,
        });
    }

    let step = if is_divisible_unit(unit) { 0.5 } else { 1.0 };
    let steps = quantity / step;
    if (steps - steps.round()).abs() > QUANTITY_EPSILON {
        return Err(ValidationError::BadQuantityStep {
            unit: unit.to_string(),
            step,
        });
    }

    Ok(())
}

/// Validates a tax rate percentage.
///
/// ## Rules
/// - Must be between 0 and 100 inclusive
pub fn validate_tax_rate(rate: f64) -> ValidationResult<()> {
    if !rate.is_finite() || !(0.0..=100.0).contains(&rate) {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0.0,
            max: 100.0,
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a whole settings record before upsert.
///
/// ## Rules
/// - restaurant_name must not be empty
/// - currency must be a valid tag
/// - tax_rate, opening_time, closing_time validated when present
/// - opening_time must precede closing_time when both are present
///   (lexicographic compare is correct for zero-padded HH:MM)
pub fn validate_settings(settings: &Settings) -> ValidationResult<()> {
    if settings.restaurant_name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "restaurant_name".to_string(),
        });
    }

    validate_currency(&settings.currency)?;

    if let Some(rate) = settings.tax_rate {
        validate_tax_rate(rate)?;
    }

    if let Some(opening) = settings.opening_time.as_deref() {
        validate_time_hhmm("opening_time", opening)?;
    }
    if let Some(closing) = settings.closing_time.as_deref() {
        validate_time_hhmm("closing_time", closing)?;
    }

    if let (Some(opening), Some(closing)) =
        (settings.opening_time.as_deref(), settings.closing_time.as_deref())
    {
        if opening >= closing {
            return Err(ValidationError::InvalidFormat {
                field: "opening_time".to_string(),
                reason: "must be earlier than closing_time".to_string(),
            });
        }
    }

    Ok(())
}

/// Validates the line items of a sale before the recorder opens its
/// transaction.
///
/// ## Rules
/// - At least one line; at most [`MAX_SALE_LINES`]
/// - Every line: non-empty name, non-negative unit price, valid quantity
pub fn validate_sale_lines(lines: &[NewSaleLine]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::EmptySale);
    }

    if lines.len() > MAX_SALE_LINES {
        return Err(ValidationError::TooManyLines {
            max: MAX_SALE_LINES,
        });
    }

    for line in lines {
        validate_product_name(&line.name)?;

        if line.unit_price_cents < 0 {
            return Err(ValidationError::MustBePositive {
                field: "unit_price".to_string(),
            });
        }

        validate_quantity(line.quantity, &line.unit)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
