//! # duka-api: Remote API Layer for Duka POS
//!
//! Every network contract lives in this crate: the collaborator traits
//! the session layer orchestrates against, the wire payload shapes, and
//! the production `reqwest` client.
//!
//! ## Modules
//!
//! - [`gateway`] - Collaborator traits (catalog, transactions,
//!   notifications, devices)
//! - [`payload`] - Wire DTOs matching the endpoint bodies exactly
//! - [`http`] - `HttpApi`, the reqwest-backed implementation
//! - [`error`] - Network error taxonomy
//!
//! ## Design Principles
//!
//! 1. **No business logic**: deciding what to send and when is the
//!    session layer's job
//! 2. **No automatic retry**: a failed call surfaces as `ApiError`
//!    exactly once; the user retries manually
//! 3. **Exact shapes**: payload field names are part of the endpoint
//!    contract, not a style choice

pub mod error;
pub mod gateway;
pub mod http;
pub mod payload;

pub use error::{ApiError, ApiResult};
pub use gateway::{CatalogSource, DeviceGateway, NotificationStore, TransactionGateway};
pub use http::HttpApi;
pub use payload::{
    NotificationRecord, PairedDevice, TransactionItem, TransactionRequest, TransactionResponse,
};
