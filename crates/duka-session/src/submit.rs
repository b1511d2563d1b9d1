//! # Transaction Submitter
//!
//! Drives a sale from cart state to a completed Transaction.
//!
//! ## Submission State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Idle ──submit()──► Validating ──ok──► Submitting ──ok──► Completed    │
//! │    ▲                     │                  │                            │
//! │    │              precondition          POST fails /                    │
//! │    │                 fails              no identifier                   │
//! │    │                     │                  │                            │
//! │    └─────────────────────┘                  ▼                            │
//! │                                          Failed                          │
//! │                                   (cart untouched, user                  │
//! │                                    retries manually)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Hard Guarantees
//! - Validation failures (empty cart, no payment, credit without
//!   customer) return BEFORE any network call.
//! - The gateway is called exactly once per submit; there is no
//!   automatic retry below this seam.
//! - A second submit while one is in flight is refused with
//!   `SubmissionInFlight` rather than queued.
//! - On failure the cart, discounts, payment and customer are exactly
//!   as they were before the attempt.
//! - On success the cart is cleared and the global discount reset
//!   atomically with the Transaction's creation.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{info, warn};

use duka_api::{
    ApiError, CatalogSource, TransactionGateway, TransactionItem, TransactionRequest,
};
use duka_core::pricing::compute_totals;
use duka_core::types::{
    NotificationKind, PaymentLine, TaxPolicy, Transaction, TransactionStatus,
};
use duka_core::validation::validate_submission;

use crate::context::{CatalogCache, SaleHandle};
use crate::error::{SessionError, SessionResult};
use crate::notify::NotificationCenter;

/// Where the submitter currently is in the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Validating,
    Submitting,
    Completed,
    Failed,
}

impl SubmitState {
    /// Busy states refuse a second trigger.
    #[inline]
    fn is_busy(&self) -> bool {
        matches!(self, SubmitState::Validating | SubmitState::Submitting)
    }
}

/// Orchestrates one sale submission at a time.
pub struct TransactionSubmitter {
    sale: SaleHandle,
    catalog: CatalogCache,
    gateway: Arc<dyn TransactionGateway>,
    catalog_source: Arc<dyn CatalogSource>,
    notifications: Arc<NotificationCenter>,
    policy: TaxPolicy,
    state: Mutex<SubmitState>,
}

impl TransactionSubmitter {
    pub fn new(
        sale: SaleHandle,
        catalog: CatalogCache,
        gateway: Arc<dyn TransactionGateway>,
        catalog_source: Arc<dyn CatalogSource>,
        notifications: Arc<NotificationCenter>,
        policy: TaxPolicy,
    ) -> Self {
        TransactionSubmitter {
            sale,
            catalog,
            gateway,
            catalog_source,
            notifications,
            policy,
            state: Mutex::new(SubmitState::Idle),
        }
    }

    /// Current state machine position.
    pub fn state(&self) -> SubmitState {
        *self.state.lock().expect("Submit state mutex poisoned")
    }

    fn set_state(&self, next: SubmitState) {
        *self.state.lock().expect("Submit state mutex poisoned") = next;
    }

    /// Atomically claims the state machine for a new attempt.
    fn begin(&self) -> SessionResult<()> {
        let mut state = self.state.lock().expect("Submit state mutex poisoned");
        if state.is_busy() {
            return Err(SessionError::SubmissionInFlight);
        }
        *state = SubmitState::Validating;
        Ok(())
    }

    /// Submits the current sale.
    ///
    /// Returns the immutable Transaction on success. On any failure the
    /// sale state is preserved for a manual retry.
    pub async fn submit(&self) -> SessionResult<Transaction> {
        self.begin()?;

        // Freeze the sale for this attempt. Later mutations belong to
        // the next sale.
        let (cart, global_discount, payment, customer, notes) = self.sale.with(|s| {
            (
                s.cart.clone(),
                s.global_discount,
                s.payment,
                s.customer.clone(),
                s.notes.clone(),
            )
        });

        // Preconditions fail closed: nothing has been sent yet.
        let method = match validate_submission(&cart, payment, customer.as_ref()) {
            Ok(method) => method,
            Err(e) => {
                self.set_state(SubmitState::Idle);
                return Err(e.into());
            }
        };

        // Pre-sale stock levels, for the crossed-the-minimum check after
        // a successful sale.
        let pre_sale = self.catalog.snapshot();

        let totals = compute_totals(&cart, global_discount, Some(method), &self.policy);

        let request = TransactionRequest {
            items: cart.lines().iter().map(TransactionItem::from).collect(),
            customer_id: customer.as_ref().map(|c| c.id.clone()),
            subtotal: totals.subtotal,
            discount_total: totals.discount_total,
            tax_amount: totals.tax_amount,
            total_amount: totals.total,
            payment_methods: vec![PaymentLine {
                method,
                amount: totals.total,
                reference: None,
            }],
            notes,
        };

        self.set_state(SubmitState::Submitting);
        info!(total = %totals.total, items = cart.len(), "Submitting transaction");

        let response = match self.gateway.submit(&request).await {
            Ok(response) => response,
            Err(e) => return Err(self.fail(e)),
        };

        let id = match response.identifier() {
            Some(id) => id.to_string(),
            None => return Err(self.fail(ApiError::MissingIdentifier)),
        };

        let transaction = Transaction {
            id: id.clone(),
            items: cart.lines().to_vec(),
            subtotal: totals.subtotal,
            discount_total: totals.discount_total,
            tax_amount: totals.tax_amount,
            total_amount: totals.total,
            payments: request.payment_methods.clone(),
            status: TransactionStatus::Completed,
            customer_id: customer.map(|c| c.id),
            created_at: Utc::now(),
        };

        // Clear the sale atomically with the transaction's creation.
        self.sale.with_mut(|s| s.reset());

        // Post-sale catalog refresh is best-effort.
        match self.catalog_source.fetch_products().await {
            Ok(products) => self.catalog.replace(products),
            Err(e) => warn!(error = %e, "Post-sale catalog refresh failed"),
        }

        self.notifications.emit(
            NotificationKind::Success,
            "transaction",
            "Sale Completed",
            &format!("Transaction {} completed for {}", id, totals.total),
            None,
            Some(serde_json::json!({ "transactionId": id })),
        );

        self.warn_if_sale_crossed_minimum(&transaction, &pre_sale);

        self.set_state(SubmitState::Completed);
        Ok(transaction)
    }

    /// Records a failed attempt: failure notification, Failed state,
    /// sale untouched.
    fn fail(&self, error: ApiError) -> SessionError {
        warn!(error = %error, "Transaction submission failed");
        self.notifications.emit(
            NotificationKind::Error,
            "transaction",
            "Sale Failed",
            &format!("Transaction could not be completed: {}", error),
            None,
            None,
        );
        self.set_state(SubmitState::Failed);
        error.into()
    }

    /// Emits a warning for each sold line that pushed its product from
    /// above its minimum stock level to at-or-below it.
    ///
    /// Uses the pre-sale snapshot deliberately: a product already below
    /// minimum before the sale is the scan's job, not this one's.
    fn warn_if_sale_crossed_minimum(
        &self,
        transaction: &Transaction,
        pre_sale: &[duka_core::types::ProductSnapshot],
    ) {
        for line in &transaction.items {
            let Some(product) = pre_sale.iter().find(|p| p.id == line.product_id) else {
                continue;
            };
            let after = product.current_stock - line.quantity;
            if product.current_stock > product.min_stock_level
                && after <= product.min_stock_level
            {
                self.notifications.emit(
                    NotificationKind::Warning,
                    "inventory",
                    "Low Stock After Sale",
                    &format!(
                        "{} dropped to {} (minimum {})",
                        product.name,
                        after.max(0),
                        product.min_stock_level
                    ),
                    Some(format!("/inventory/{}", product.id)),
                    None,
                );
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
