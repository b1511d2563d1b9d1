//! # duka-session: Session Orchestration for Duka POS
//!
//! Wires the pure core (`duka-core`) to the remote API (`duka-api`) for
//! one cashier session: sale state, pricing reads, transaction
//! submission, alert scanning and the notification center.
//!
//! ## Modules
//!
//! - [`context`] - `SessionContext`, the top-level session object
//! - [`submit`] - Transaction submission state machine
//! - [`alerts`] - Alert scans with deduplication windows
//! - [`notify`] - Dual-write notification center
//! - [`scheduler`] - Cancellable recurring background tasks
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Session error taxonomy
//!
//! ## Typical Wiring
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use duka_session::config::SessionConfig;
//! use duka_session::context::SessionContext;
//! use duka_session::notify::NoOpCue;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = match SessionConfig::default_path() {
//!     Some(path) => SessionConfig::load(&path)?,
//!     None => SessionConfig::default(),
//! };
//!
//! let mut session = SessionContext::new(config, Arc::new(NoOpCue))?;
//! session.start();
//!
//! session.refresh_catalog().await?;
//! session.add_to_cart("product-1", 2)?;
//! session.select_payment(duka_core::types::PaymentMethod::Cash);
//! let transaction = session.submit().await?;
//! println!("completed {}", transaction.id);
//!
//! session.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod alerts;
pub mod config;
pub mod context;
pub mod error;
pub mod notify;
pub mod scheduler;
pub mod submit;

pub use alerts::AlertService;
pub use config::SessionConfig;
pub use context::{CatalogCache, SaleHandle, SaleState, SessionContext};
pub use error::{SessionError, SessionResult};
pub use notify::{NoOpCue, Notification, NotificationCenter, NotificationCue};
pub use scheduler::Scheduler;
pub use submit::{SubmitState, TransactionSubmitter};
