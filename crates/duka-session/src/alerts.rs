//! # Alert Service
//!
//! Stateful wrapper around the pure alert scan: runs the scan, applies
//! the per-type deduplication windows, and turns fresh alerts into
//! notifications.
//!
//! ```text
//! ┌──────────────┐   scan    ┌──────────────┐  filter_new  ┌──────────────┐
//! │  catalog     │ ────────► │ full sorted  │ ───────────► │ fresh alerts │
//! │  snapshot    │           │ alert list   │              │ (emitted as  │
//! └──────────────┘           │ (returned    │              │ warnings)    │
//!                            │  for the UI) │              └──────────────┘
//!                            └──────────────┘
//! ```
//!
//! The full list is always returned so the UI can render every active
//! condition; the dedup windows gate only notification noise.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::debug;

use duka_core::alert::{scan, Alert, AlertHistory, AlertPriority, AlertType, DedupWindows};
use duka_core::types::{NotificationKind, ProductSnapshot};

use crate::notify::NotificationCenter;

/// Runs alert scans and emits notifications for alerts outside their
/// dedup windows.
pub struct AlertService {
    history: Mutex<AlertHistory>,
    notifications: Arc<NotificationCenter>,
}

impl AlertService {
    pub fn new(windows: DedupWindows, notifications: Arc<NotificationCenter>) -> Self {
        AlertService {
            history: Mutex::new(AlertHistory::new(windows)),
            notifications,
        }
    }

    /// Scans `products`, notifies fresh alerts, and returns the full
    /// prioritized alert list.
    pub fn run_scan(&self, products: &[ProductSnapshot], now: DateTime<Utc>) -> Vec<Alert> {
        let alerts = scan(products, now);
        debug!(count = alerts.len(), "Alert scan complete");

        let fresh = self
            .history
            .lock()
            .expect("Alert history mutex poisoned")
            .filter_new(alerts.clone(), now);

        for alert in &fresh {
            self.notifications.emit(
                NotificationKind::Warning,
                category_for(alert.alert_type),
                title_for(alert),
                &alert.message,
                alert
                    .action_required
                    .then(|| format!("/inventory/{}", alert.product_id)),
                Some(serde_json::json!({
                    "productId": alert.product_id,
                    "priority": priority_label(alert.priority),
                })),
            );
        }

        alerts
    }

    /// Forgets dedup history, e.g. after the operating day rolls over.
    pub fn reset_history(&self) {
        self.history
            .lock()
            .expect("Alert history mutex poisoned")
            .reset();
    }
}

fn category_for(alert_type: AlertType) -> &'static str {
    match alert_type {
        AlertType::Stock => "inventory",
        AlertType::Expiry => "expiry",
    }
}

fn title_for(alert: &Alert) -> &'static str {
    match (alert.alert_type, alert.priority) {
        (AlertType::Stock, AlertPriority::Critical) => "Out of Stock",
        (AlertType::Stock, _) => "Low Stock",
        (AlertType::Expiry, AlertPriority::Critical) => "Product Expired",
        (AlertType::Expiry, _) => "Expiry Warning",
    }
}

fn priority_label(priority: AlertPriority) -> &'static str {
    match priority {
        AlertPriority::Critical => "critical",
        AlertPriority::High => "high",
        AlertPriority::Medium => "medium",
        AlertPriority::Low => "low",
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Duration;

    use duka_api::{ApiResult, NotificationRecord, NotificationStore};
    use duka_core::money::Money;

    use crate::notify::NoOpCue;

    struct SilentStore(AtomicUsize);

    #[async_trait]
    impl NotificationStore for SilentStore {
        async fn persist(&self, _record: &NotificationRecord) -> ApiResult<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn service() -> (AlertService, Arc<NotificationCenter>) {
        let center = Arc::new(NotificationCenter::new(
            Arc::new(SilentStore(AtomicUsize::new(0))),
            Arc::new(NoOpCue),
        ));
        (
            AlertService::new(DedupWindows::default(), Arc::clone(&center)),
            center,
        )
    }

    fn low_stock(id: &str) -> ProductSnapshot {
        ProductSnapshot {
            id: id.to_string(),
            sku: format!("SKU-{}", id),
            name: format!("Product {}", id),
            category: None,
            selling_price: Money::from_minor(500),
            current_stock: 1,
            min_stock_level: 5,
            has_expiry: false,
            expiry_date: None,
        }
    }

    #[tokio::test]
    async fn test_fresh_alert_emits_warning_notification() {
        let (service, center) = service();
        let now = Utc::now();

        let alerts = service.run_scan(&[low_stock("p1")], now);
        assert_eq!(alerts.len(), 1);

        let log = center.notifications();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].kind, NotificationKind::Warning);
        assert_eq!(log[0].title, "Low Stock");
        assert_eq!(log[0].category, "inventory");
    }

    #[tokio::test]
    async fn test_repeat_scan_returns_alert_but_suppresses_notification() {
        let (service, center) = service();
        let now = Utc::now();

        service.run_scan(&[low_stock("p1")], now);
        let again = now + Duration::minutes(2);
        let alerts = service.run_scan(&[low_stock("p1")], again);

        // The condition is still reported to the UI...
        assert_eq!(alerts.len(), 1);
        // ...but no second notification inside the window.
        assert_eq!(center.notifications().len(), 1);
    }

    #[tokio::test]
    async fn test_notification_returns_after_window() {
        let (service, center) = service();
        let now = Utc::now();

        service.run_scan(&[low_stock("p1")], now);
        let later = now + Duration::minutes(6);
        service.run_scan(&[low_stock("p1")], later);

        assert_eq!(center.notifications().len(), 2);
    }

    #[tokio::test]
    async fn test_reset_history_reopens_windows() {
        let (service, center) = service();
        let now = Utc::now();

        service.run_scan(&[low_stock("p1")], now);
        service.reset_history();
        service.run_scan(&[low_stock("p1")], now + Duration::seconds(1));

        assert_eq!(center.notifications().len(), 2);
    }
}
