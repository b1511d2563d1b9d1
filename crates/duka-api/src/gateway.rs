//! # Collaborator Traits
//!
//! Trait seams between the session layer and the remote API. The session
//! orchestrates against these; [`crate::http::HttpApi`] is the production
//! implementation and tests substitute counting/failing mocks.
//!
//! ## Why Traits Here?
//! The submission flow's hard guarantees ("an empty cart never calls the
//! network", "persistence failure never propagates") are only testable
//! if the network edge is swappable.

use async_trait::async_trait;

use duka_core::types::ProductSnapshot;

use crate::error::ApiResult;
use crate::payload::{NotificationRecord, PairedDevice, TransactionRequest, TransactionResponse};

/// Read access to the remote product catalog.
///
/// The core treats the returned snapshots as authoritative truth at
/// read time.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// `GET /products`
    async fn fetch_products(&self) -> ApiResult<Vec<ProductSnapshot>>;
}

/// Submission endpoint for completed sales.
#[async_trait]
pub trait TransactionGateway: Send + Sync {
    /// `POST /transactions` - called exactly once per submit action;
    /// no automatic retry lives below this seam.
    async fn submit(&self, request: &TransactionRequest) -> ApiResult<TransactionResponse>;
}

/// Durable mirror for notifications.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// `POST /notifications` - fire-and-forget; the caller swallows
    /// failures after logging them.
    async fn persist(&self, record: &NotificationRecord) -> ApiResult<()>;
}

/// Paired mobile device listing/revocation.
#[async_trait]
pub trait DeviceGateway: Send + Sync {
    /// `GET /devices`
    async fn fetch_devices(&self) -> ApiResult<Vec<PairedDevice>>;

    /// `POST /devices/{id}/revoke`
    async fn revoke_device(&self, device_id: &str) -> ApiResult<()>;
}
