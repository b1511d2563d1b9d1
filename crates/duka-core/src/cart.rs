//! # Cart Store
//!
//! Owns the list of cart lines and their quantities/discounts.
//! Pure mutation functions, no I/O.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Cart Store Operations                               │
//! │                                                                         │
//! │  UI Action                 Operation               State Change         │
//! │  ─────────                 ─────────               ────────────         │
//! │                                                                         │
//! │  Tap product ────────────► add_line() ───────────► merge or push line   │
//! │                                                                         │
//! │  Edit quantity ──────────► set_quantity() ───────► clamp + recompute    │
//! │                                                                         │
//! │  Enter discount % ───────► apply_discount() ─────► clamp + recompute    │
//! │                                                                         │
//! │  Tap remove ─────────────► remove_line() ────────► drop line            │
//! │                                                                         │
//! │  New sale / post-submit ─► clear() ──────────────► empty cart           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by `product_id`; re-adding a known product merges
//!   into the existing line instead of duplicating it.
//! - `0 ≤ quantity ≤ available_stock` after every mutation. Excess
//!   requested quantity is silently clamped, never rejected.
//! - `line_total = quantity × unit_price − discount_amount` and
//!   `discount_amount = round(quantity × unit_price × discount)`, both
//!   recomputed on every mutation that touches quantity or discount.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, Rate};
use crate::types::ProductSnapshot;

// =============================================================================
// Cart Line
// =============================================================================

/// One product entry in an in-progress sale.
///
/// ## Price Freezing
/// `unit_price`, `name`, `sku` and `available_stock` are captured from
/// the product snapshot at add time. A catalog refresh after that does
/// not alter lines already in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    /// Product ID (catalog identifier).
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// SKU at time of adding (frozen).
    pub sku: String,

    /// Category at time of adding, if any.
    pub category: Option<String>,

    /// Unit price at time of adding (frozen).
    pub unit_price: Money,

    /// Quantity in the cart. Never exceeds `available_stock`.
    pub quantity: i64,

    /// Per-line discount rate, 0..=100%.
    pub discount: Rate,

    /// Derived: round(quantity × unit_price × discount).
    pub discount_amount: Money,

    /// Derived: quantity × unit_price − discount_amount.
    pub line_total: Money,

    /// Stock available when the line was created (the clamp ceiling).
    pub available_stock: i64,
}

impl CartLine {
    /// Creates a line from a product snapshot. Quantity is clamped to the
    /// snapshot's current stock; new lines start with no discount.
    fn from_product(product: &ProductSnapshot, quantity: i64) -> Self {
        let mut line = CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            sku: product.sku.clone(),
            category: product.category.clone(),
            unit_price: product.selling_price,
            quantity: quantity.clamp(0, product.current_stock),
            discount: Rate::zero(),
            discount_amount: Money::zero(),
            line_total: Money::zero(),
            available_stock: product.current_stock,
        };
        line.recompute();
        line
    }

    /// Recomputes `discount_amount` and `line_total` from the current
    /// quantity and discount rate.
    fn recompute(&mut self) {
        let gross = self.unit_price * self.quantity;
        self.discount_amount = gross.apply_rate(self.discount);
        self.line_total = gross - self.discount_amount;
    }

    /// The line value before any discount (quantity × unit price).
    #[inline]
    pub fn gross(&self) -> Money {
        self.unit_price * self.quantity
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The in-progress sale: an ordered sequence of lines keyed by product id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds a product to the cart, or merges into the existing line.
    ///
    /// ## Behavior
    /// - Existing line: `new_quantity = min(existing + quantity, stock)`.
    /// - New line: `quantity = min(quantity, stock)`, discount starts at 0.
    /// - Excess quantity is silently clamped, never rejected. A product
    ///   with zero stock therefore produces no visible change.
    ///
    /// The line total is recomputed with the line's current discount.
    pub fn add_line(&mut self, product: &ProductSnapshot, quantity: i64) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.id)
        {
            line.quantity = (line.quantity + quantity).clamp(0, line.available_stock);
            line.recompute();
            return;
        }

        self.lines.push(CartLine::from_product(product, quantity));
    }

    /// Removes a line unconditionally. Unknown ids are a no-op.
    pub fn remove_line(&mut self, product_id: &str) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Sets the quantity of a line.
    ///
    /// ## Behavior
    /// - `quantity ≤ 0` is equivalent to `remove_line`.
    /// - Otherwise clamps to `available_stock` and recomputes totals.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_line(product_id);
            return;
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = quantity.min(line.available_stock);
            line.recompute();
        }
    }

    /// Applies a per-line discount, clamped to 0..=100%, and recomputes
    /// the line's totals from its current quantity.
    pub fn apply_discount(&mut self, product_id: &str, discount: Rate) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.discount = discount.clamped();
            line.recompute();
        }
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Returns the lines in insertion order.
    #[inline]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Looks up a line by product id.
    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    /// Number of unique lines.
    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Checks if the cart is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
