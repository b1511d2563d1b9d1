//! # Validation Module
//!
//! Business rule validation for Duka POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend                                                      │
//! │  ├── Basic format checks (empty, length)                                │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                        │
//! │  ├── Submission preconditions (fail closed, no network call)            │
//! │  └── Input range checks                                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Remote API                                                    │
//! │  └── Server-side constraints                                            │
//! │                                                                         │
//! │  Defense in depth: each layer catches different errors                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{CustomerRef, PaymentMethod};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Submission Preconditions
// =============================================================================

/// Validates cart + payment state before a transaction may be submitted.
///
/// ## Rules (fail closed, no network call)
/// - Cart must not be empty
/// - A payment method must be selected
/// - A credit sale must have a customer attached
///
/// ## User Workflow
/// ```text
/// Tap "Complete Sale"
///      │
///      ▼
/// validate_submission(...) ← THIS FUNCTION
///      │
///      ├── empty cart?        → blocking message, no request sent
///      ├── no payment?        → blocking message, no request sent
///      ├── credit, no customer → blocking message, no request sent
///      │
///      └── OK → assemble payload and POST /transactions
/// ```
pub fn validate_submission(
    cart: &Cart,
    payment: Option<PaymentMethod>,
    customer: Option<&CustomerRef>,
) -> CoreResult<PaymentMethod> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let method = payment.ok_or(CoreError::NoPaymentMethod)?;

    if method.requires_customer() && customer.is_none() {
        return Err(CoreError::CustomerRequired);
    }

    Ok(method)
}

// =============================================================================
// Input Validators
// =============================================================================

/// Validates a requested quantity.
///
/// ## Rules
/// - Must be positive (> 0). Clamping to stock happens in the cart;
///   this rejects obviously bad input before it reaches a mutation.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a discount percentage.
///
/// ## Rules
/// - Must be between 0 and 100. The cart also clamps, but direct API
///   input should be rejected rather than silently changed.
pub fn validate_discount_percent(pct: f64) -> ValidationResult<()> {
    if !(0.0..=100.0).contains(&pct) {
        return Err(ValidationError::OutOfRange {
            field: "discount_percent".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates a product id is present.
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product_id".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
