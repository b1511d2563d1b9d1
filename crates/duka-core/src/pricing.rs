//! # Pricing Engine
//!
//! Derives cart-level totals from cart state, a global discount and the
//! active payment-method tax policy.
//!
//! ## Computation Order (load-bearing)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. subtotal        = Σ quantity × unit_price   (per-line discounts    │
//! │                                                   ignored at this step) │
//! │  2. discount_total  = Σ line.discount_amount                            │
//! │                     + round(subtotal × global_discount)                 │
//! │  3. taxable         = subtotal − discount_total                         │
//! │  4. taxed?          = payment method ∈ policy.taxable_methods           │
//! │  5. tax_amount      = taxed ? round(taxable × policy.rate) : 0          │
//! │  6. total           = taxable + tax_amount                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The global discount applies to the pre-tax base ON TOP of per-line
//! discounts, and tax is conditional on the chosen payment method, not
//! universal. Applying tax unconditionally would change totals.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::money::{Money, Rate};
use crate::types::{PaymentMethod, TaxPolicy};

// =============================================================================
// Cart Totals
// =============================================================================

/// Derived cart totals. Never stored; recomputed deterministically from
/// the cart, the global discount and the selected payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub subtotal: Money,
    pub discount_total: Money,
    pub tax_amount: Money,
    pub total: Money,
    pub item_count: i64,
}

impl CartTotals {
    /// Totals of an empty cart.
    pub fn empty() -> Self {
        CartTotals {
            subtotal: Money::zero(),
            discount_total: Money::zero(),
            tax_amount: Money::zero(),
            total: Money::zero(),
            item_count: 0,
        }
    }
}

// =============================================================================
// Compute Totals
// =============================================================================

/// Computes cart totals. Pure: identical inputs always produce identical
/// output.
///
/// `payment` is the currently selected method, if any. With no method
/// selected (cart still being built) no tax applies, matching the
/// default-disabled policy.
pub fn compute_totals(
    cart: &Cart,
    global_discount: Rate,
    payment: Option<PaymentMethod>,
    policy: &TaxPolicy,
) -> CartTotals {
    let subtotal: Money = cart.lines().iter().map(|l| l.gross()).sum();

    let line_discounts: Money = cart.lines().iter().map(|l| l.discount_amount).sum();
    let discount_total = line_discounts + subtotal.apply_rate(global_discount);

    let taxable = subtotal - discount_total;

    let tax_amount = match payment {
        Some(method) if policy.is_taxable(method) => taxable.apply_rate(policy.rate),
        _ => Money::zero(),
    };

    CartTotals {
        subtotal,
        discount_total,
        tax_amount,
        total: taxable + tax_amount,
        item_count: cart.total_quantity(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductSnapshot;

    fn product(id: &str, price: i64, stock: i64) -> ProductSnapshot {
        ProductSnapshot {
            id: id.to_string(),
            sku: format!("SKU-{}", id),
            name: format!("Product {}", id),
            category: None,
            selling_price: Money::from_minor(price),
            current_stock: stock,
            min_stock_level: 0,
            has_expiry: false,
            expiry_date: None,
        }
    }

    /// The worked example: qty 3 × 1000 at 10% line discount, 5% global
    /// discount, non-taxable payment.
    #[test]
    fn test_worked_example() {
        let mut cart = Cart::new();
        cart.add_line(&product("1", 1000, 100), 3);
        cart.apply_discount("1", Rate::from_percent(10.0));

        let totals = compute_totals(
            &cart,
            Rate::from_percent(5.0),
            Some(PaymentMethod::Cash),
            &TaxPolicy::default(),
        );

        assert_eq!(totals.subtotal.minor(), 3000);
        assert_eq!(totals.discount_total.minor(), 450); // 300 line + 150 global
        assert_eq!(totals.tax_amount.minor(), 0);
        assert_eq!(totals.total.minor(), 2550);
        assert_eq!(totals.item_count, 3);
    }

    #[test]
    fn test_subtotal_ignores_discounts() {
        let mut cart = Cart::new();
        cart.add_line(&product("1", 1000, 100), 2);
        cart.add_line(&product("2", 500, 100), 4);
        cart.apply_discount("1", Rate::from_percent(50.0));

        let totals = compute_totals(&cart, Rate::zero(), None, &TaxPolicy::default());

        // 2×1000 + 4×500, regardless of the 50% line discount
        assert_eq!(totals.subtotal.minor(), 4000);
    }

    #[test]
    fn test_tax_conditional_on_payment_method() {
        let mut cart = Cart::new();
        cart.add_line(&product("1", 1000, 100), 1);

        let policy = TaxPolicy::new(Rate::from_bps(1800), [PaymentMethod::Card]);

        let cash = compute_totals(&cart, Rate::zero(), Some(PaymentMethod::Cash), &policy);
        assert_eq!(cash.tax_amount.minor(), 0);
        assert_eq!(cash.total.minor(), 1000);

        let card = compute_totals(&cart, Rate::zero(), Some(PaymentMethod::Card), &policy);
        assert_eq!(card.tax_amount.minor(), 180);
        assert_eq!(card.total.minor(), 1180);
    }

    #[test]
    fn test_no_payment_selected_means_no_tax() {
        let mut cart = Cart::new();
        cart.add_line(&product("1", 1000, 100), 1);

        let policy = TaxPolicy::new(Rate::from_bps(1800), [PaymentMethod::Cash]);
        let totals = compute_totals(&cart, Rate::zero(), None, &policy);

        assert_eq!(totals.tax_amount.minor(), 0);
    }

    #[test]
    fn test_tax_applies_to_post_discount_base() {
        let mut cart = Cart::new();
        cart.add_line(&product("1", 1000, 100), 3);
        cart.apply_discount("1", Rate::from_percent(10.0));

        let policy = TaxPolicy::new(Rate::from_bps(1000), [PaymentMethod::Card]);
        let totals = compute_totals(
            &cart,
            Rate::from_percent(5.0),
            Some(PaymentMethod::Card),
            &policy,
        );

        // taxable = 3000 − 450 = 2550; tax = 255
        assert_eq!(totals.tax_amount.minor(), 255);
        assert_eq!(totals.total.minor(), 2805);
    }

    #[test]
    fn test_deterministic() {
        let mut cart = Cart::new();
        cart.add_line(&product("1", 777, 100), 6);
        cart.apply_discount("1", Rate::from_percent(3.0));

        let policy = TaxPolicy::new(Rate::from_bps(825), [PaymentMethod::MobileMoney]);
        let a = compute_totals(
            &cart,
            Rate::from_percent(2.0),
            Some(PaymentMethod::MobileMoney),
            &policy,
        );
        let b = compute_totals(
            &cart,
            Rate::from_percent(2.0),
            Some(PaymentMethod::MobileMoney),
            &policy,
        );

        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_cart() {
        let cart = Cart::new();
        let totals = compute_totals(&cart, Rate::from_percent(5.0), None, &TaxPolicy::default());
        assert_eq!(totals, CartTotals::empty());
    }
}
