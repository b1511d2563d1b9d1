//! # duka-core: Pure Business Logic for Duka POS
//!
//! This crate is the **heart** of Duka POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Duka POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (out of scope)                      │   │
//! │  │     Catalog UI ──► Cart UI ──► Payment UI ──► Receipt UI        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    duka-session                                  │   │
//! │  │     SessionContext, TransactionSubmitter, NotificationCenter,   │   │
//! │  │     AlertService, Scheduler                                      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ duka-core (THIS CRATE) ★                         │   │
//! │  │                                                                  │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐           │   │
//! │  │   │  money   │ │   cart   │ │ pricing  │ │  alert   │           │   │
//! │  │   │ Money    │ │ Cart     │ │ totals   │ │ scan     │           │   │
//! │  │   │ Rate     │ │ CartLine │ │ tax      │ │ dedup    │           │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘           │   │
//! │  │                                                                  │   │
//! │  │   NO I/O • NO NETWORK • NO TIMERS • PURE FUNCTIONS               │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    duka-api (Remote API Layer)                   │   │
//! │  │        GET /products, POST /transactions, POST /notifications    │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - Domain types (ProductSnapshot, Transaction, TaxPolicy, ...)
//! - [`cart`] - Cart store with merge/clamp/discount invariants
//! - [`pricing`] - Cart totals with payment-conditional tax
//! - [`alert`] - Stock/expiry alert derivation and dedup history
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Network, file system, timer access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are minor units (i64), rates
//!    are basis points - no floating point in financial math
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use duka_core::cart::Cart;
//! use duka_core::money::{Money, Rate};
//! use duka_core::pricing::compute_totals;
//! use duka_core::types::{PaymentMethod, ProductSnapshot, TaxPolicy};
//!
//! let product = ProductSnapshot {
//!     id: "p-1".into(),
//!     sku: "SODA-500".into(),
//!     name: "Soda 500ml".into(),
//!     category: None,
//!     selling_price: Money::from_minor(1000),
//!     current_stock: 24,
//!     min_stock_level: 6,
//!     has_expiry: false,
//!     expiry_date: None,
//! };
//!
//! let mut cart = Cart::new();
//! cart.add_line(&product, 3);
//! cart.apply_discount("p-1", Rate::from_percent(10.0));
//!
//! let totals = compute_totals(
//!     &cart,
//!     Rate::from_percent(5.0),
//!     Some(PaymentMethod::Cash),
//!     &TaxPolicy::default(),
//! );
//! assert_eq!(totals.total.minor(), 2550);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod alert;
pub mod cart;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use duka_core::Money` instead of
// `use duka_core::money::Money`

pub use alert::{Alert, AlertHistory, AlertPriority, AlertType, DedupWindows};
pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Rate};
pub use pricing::{compute_totals, CartTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum notifications retained in the in-memory log.
///
/// ## Why a constant?
/// The transient notification log is a bounded ring; older entries fall
/// off once the durable mirror has them. Shared here so session and UI
/// agree on the cap.
pub const MAX_NOTIFICATION_LOG: usize = 20;
