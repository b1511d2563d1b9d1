//! # Domain Types
//!
//! Core domain types used throughout Duka POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ProductSnapshot │   │  Transaction    │   │  PaymentLine    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  method         │       │
//! │  │  sku / name     │   │  items          │   │  amount         │       │
//! │  │  current_stock  │   │  totals         │   │  reference?     │       │
//! │  │  expiry_date?   │   │  status         │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │   TaxPolicy     │   │ PaymentMethod   │                              │
//! │  │  ─────────────  │   │  ─────────────  │                              │
//! │  │  rate (bps)     │   │  Cash / Card    │                              │
//! │  │  taxable set    │   │  MobileMoney    │                              │
//! │  └─────────────────┘   │  BankTransfer   │                              │
//! │                        │  Credit         │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `ProductSnapshot` is the read-only view the remote catalog supplies.
//! Cart lines freeze the fields they need at add time, so a later catalog
//! refresh never changes an in-progress sale.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartLine;
use crate::money::{Money, Rate};

// =============================================================================
// Product Snapshot
// =============================================================================

/// A read-only product record as supplied by the remote catalog.
///
/// The core treats `current_stock`, `min_stock_level`, `selling_price`
/// and `expiry_date` as authoritative truth at read time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductSnapshot {
    /// Unique identifier.
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name shown to the cashier and on the receipt.
    pub name: String,

    /// Product category, if assigned.
    pub category: Option<String>,

    /// Selling price in minor currency units.
    pub selling_price: Money,

    /// Current stock level.
    pub current_stock: i64,

    /// The level at or below which a stock alert is raised.
    pub min_stock_level: i64,

    /// Whether this product tracks an expiry date.
    pub has_expiry: bool,

    /// Expiry date, when `has_expiry` is set.
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<DateTime<Utc>>,
}

// =============================================================================
// Payment Method
// =============================================================================

/// The tender type chosen for a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// Mobile money wallet (M-Pesa and friends).
    MobileMoney,
    /// Direct bank transfer.
    BankTransfer,
    /// Credit sale - settled later, requires an attached customer.
    Credit,
}

impl PaymentMethod {
    /// Credit sales carry no settlement at time of sale, so the
    /// transaction must reference a customer to collect from.
    #[inline]
    pub const fn requires_customer(&self) -> bool {
        matches!(self, PaymentMethod::Credit)
    }
}

// =============================================================================
// Payment Line
// =============================================================================

/// A payment towards a transaction.
///
/// The wire contract allows a list of payments, but this core submits a
/// cart with exactly one active payment method.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentLine {
    #[serde(rename = "type")]
    pub method: PaymentMethod,

    /// Amount paid in minor units.
    pub amount: Money,

    /// External reference (mobile money code, card auth, etc.).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

// =============================================================================
// Tax Policy
// =============================================================================

/// Which payment methods incur tax, and at what rate.
///
/// ## Load-Bearing Behavior
/// Tax is conditional on the chosen payment method, NOT universal.
/// A method absent from `taxable_methods` always yields zero tax.
/// The default policy has an empty set, i.e. tax disabled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxPolicy {
    /// Tax rate in basis points.
    pub rate: Rate,

    /// Payment methods for which tax is computed on the taxable base.
    pub taxable_methods: HashSet<PaymentMethod>,
}

impl TaxPolicy {
    /// Creates a policy taxing the given methods at the given rate.
    pub fn new(rate: Rate, taxable_methods: impl IntoIterator<Item = PaymentMethod>) -> Self {
        TaxPolicy {
            rate,
            taxable_methods: taxable_methods.into_iter().collect(),
        }
    }

    /// Checks whether the chosen method is taxed under this policy.
    #[inline]
    pub fn is_taxable(&self, method: PaymentMethod) -> bool {
        self.taxable_methods.contains(&method)
    }
}

// =============================================================================
// Notification Kind
// =============================================================================

/// Classification of a user-visible notification.
///
/// ## Cue Rule
/// Only `Error` and `Success` trigger the short audible/visual cue;
/// `Warning` and `Info` land in the log silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    /// Whether this kind triggers the audible/visual cue.
    #[inline]
    pub const fn triggers_cue(&self) -> bool {
        matches!(self, NotificationKind::Success | NotificationKind::Error)
    }
}

// =============================================================================
// Customer Reference
// =============================================================================

/// A lightweight reference to the customer attached to a sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerRef {
    pub id: String,
    pub name: String,
}

// =============================================================================
// Transaction
// =============================================================================

/// The status of a submitted transaction.
///
/// There is no partial or pending state in this core: a transaction is
/// either fully absent or fully completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Transaction was accepted by the remote endpoint.
    Completed,
}

/// A completed sale transaction.
///
/// Created only on successful submission, from the response identifier
/// plus the cart snapshot that was submitted. Immutable thereafter; the
/// cart is cleared atomically with its creation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Transaction {
    /// Identifier from the remote response (`transaction_number` or `id`).
    pub id: String,

    /// The sold lines, frozen at submission time.
    pub items: Vec<CartLine>,

    pub subtotal: Money,
    pub discount_total: Money,
    pub tax_amount: Money,
    pub total_amount: Money,

    /// Payments applied to this transaction.
    pub payments: Vec<PaymentLine>,

    pub status: TransactionStatus,

    /// Customer attached to the sale, when any.
    pub customer_id: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Receipt
// =============================================================================

/// Read-only view of a transaction for export collaborators.
///
/// Receipt generation (HTML/PDF) consumes this view and cannot reach
/// back into cart or transaction state.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction_id: String,
    pub items: Vec<ReceiptItem>,
    pub subtotal: Money,
    pub discount_total: Money,
    pub tax_amount: Money,
    pub total_amount: Money,
    pub payments: Vec<ReceiptPayment>,
    pub customer_id: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    pub name: String,
    pub sku: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub discount_amount: Money,
    pub line_total: Money,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptPayment {
    pub method: PaymentMethod,
    pub amount: Money,
}

impl From<&Transaction> for Receipt {
    fn from(tx: &Transaction) -> Self {
        Receipt {
            transaction_id: tx.id.clone(),
            items: tx
                .items
                .iter()
                .map(|line| ReceiptItem {
                    name: line.name.clone(),
                    sku: line.sku.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    discount_amount: line.discount_amount,
                    line_total: line.line_total,
                })
                .collect(),
            subtotal: tx.subtotal,
            discount_total: tx.discount_total,
            tax_amount: tx.tax_amount,
            total_amount: tx.total_amount,
            payments: tx
                .payments
                .iter()
                .map(|p| ReceiptPayment {
                    method: p.method,
                    amount: p.amount,
                })
                .collect(),
            customer_id: tx.customer_id.clone(),
            timestamp: tx.created_at.to_rfc3339(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
