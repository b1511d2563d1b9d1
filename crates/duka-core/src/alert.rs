//! # Alert Engine
//!
//! Derives prioritized operational alerts (stock/expiry) from a product
//! snapshot list.
//!
//! ## Classification Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  STOCK (current_stock ≤ min_stock_level)                                │
//! │    stock == 0          → Critical  "out of stock"                       │
//! │    stock ≤ min level   → High      "running low"                        │
//! │                                                                         │
//! │  EXPIRY (has_expiry && expiry_date set)                                 │
//! │    days = ceil((expiry_date − now) / 1 day)                             │
//! │    days < 0            → Critical  expired, remove from inventory       │
//! │    days 0..=3          → High      expiring soon                        │
//! │    days 4..=7          → Medium    expiring soon                        │
//! │    days 8..=30         → Low       expires this month                   │
//! │    days > 30           → no alert                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Statelessness
//! `scan` is pure: it recomputes alerts fresh from the snapshot on every
//! call. Time-windowed deduplication lives in [`AlertHistory`], a keyed
//! `(product_id, alert_type) → last_emitted_at` map the caller retains
//! between scans.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::types::ProductSnapshot;

// =============================================================================
// Alert Model
// =============================================================================

/// What kind of condition an alert reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Stock,
    Expiry,
}

/// Alert severity. Ordering of the enum matters only through `rank`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AlertPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertPriority {
    /// Numeric rank used for sorting: critical=4 … low=1.
    #[inline]
    pub const fn rank(&self) -> u8 {
        match self {
            AlertPriority::Critical => 4,
            AlertPriority::High => 3,
            AlertPriority::Medium => 2,
            AlertPriority::Low => 1,
        }
    }
}

/// A derived operational alert.
///
/// Alerts are not persisted as entities; every scan rebuilds them from
/// the current snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Alert {
    pub id: String,
    pub alert_type: AlertType,
    pub priority: AlertPriority,
    pub product_id: String,
    pub message: String,
    pub action_required: bool,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    fn new(
        alert_type: AlertType,
        priority: AlertPriority,
        product_id: &str,
        message: String,
        action_required: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Alert {
            id: Uuid::new_v4().to_string(),
            alert_type,
            priority,
            product_id: product_id.to_string(),
            message,
            action_required,
            timestamp: now,
        }
    }
}

// =============================================================================
// Scan
// =============================================================================

/// Whole days until expiry, rounded up. Negative when already expired.
pub fn days_until_expiry(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let secs = (expiry - now).num_seconds();
    (secs + 86_399).div_euclid(86_400)
}

/// Scans a product snapshot list and returns prioritized alerts.
///
/// Output is stable-sorted descending by priority rank; equal-priority
/// alerts keep scan order. Deduplication is the caller's job (see
/// [`AlertHistory`]).
pub fn scan(products: &[ProductSnapshot], now: DateTime<Utc>) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for product in products {
        if let Some(alert) = stock_alert(product, now) {
            alerts.push(alert);
        }
        if let Some(alert) = expiry_alert(product, now) {
            alerts.push(alert);
        }
    }

    // Vec::sort_by_key is stable, so ties keep scan order.
    alerts.sort_by_key(|a| std::cmp::Reverse(a.priority.rank()));
    alerts
}

fn stock_alert(product: &ProductSnapshot, now: DateTime<Utc>) -> Option<Alert> {
    if product.current_stock > product.min_stock_level {
        return None;
    }

    let (priority, message) = if product.current_stock == 0 {
        (
            AlertPriority::Critical,
            format!("{} is out of stock", product.name),
        )
    } else {
        (
            AlertPriority::High,
            format!(
                "{} is running low: {} left (minimum {})",
                product.name, product.current_stock, product.min_stock_level
            ),
        )
    };

    Some(Alert::new(
        AlertType::Stock,
        priority,
        &product.id,
        message,
        true,
        now,
    ))
}

fn expiry_alert(product: &ProductSnapshot, now: DateTime<Utc>) -> Option<Alert> {
    if !product.has_expiry {
        return None;
    }
    let expiry = product.expiry_date?;
    let days = days_until_expiry(expiry, now);

    if days > 30 {
        return None;
    }

    let (priority, message, action_required) = if days < 0 {
        (
            AlertPriority::Critical,
            format!("{} has expired - remove from inventory", product.name),
            true,
        )
    } else if days <= 7 {
        let priority = if days <= 3 {
            AlertPriority::High
        } else {
            AlertPriority::Medium
        };
        (
            priority,
            format!("{} is expiring soon ({} days left)", product.name, days),
            true,
        )
    } else {
        (
            AlertPriority::Low,
            format!("{} expires this month ({} days left)", product.name, days),
            false,
        )
    };

    Some(Alert::new(
        AlertType::Expiry,
        priority,
        &product.id,
        message,
        action_required,
        now,
    ))
}

// =============================================================================
// Dedup History
// =============================================================================

/// Suppression windows per alert type.
#[derive(Debug, Clone, Copy)]
pub struct DedupWindows {
    pub stock: Duration,
    pub expiry: Duration,
}

impl Default for DedupWindows {
    fn default() -> Self {
        DedupWindows {
            stock: Duration::minutes(5),
            expiry: Duration::hours(24),
        }
    }
}

impl DedupWindows {
    fn window(&self, alert_type: AlertType) -> Duration {
        match alert_type {
            AlertType::Stock => self.stock,
            AlertType::Expiry => self.expiry,
        }
    }
}

/// Keyed "last alerted at" map consulted before emission.
///
/// Replaces the source system's habit of re-scanning the notification
/// list for matching titles: same behavior, clearer invariant.
#[derive(Debug, Default)]
pub struct AlertHistory {
    windows: DedupWindows,
    last_emitted: HashMap<(String, AlertType), DateTime<Utc>>,
}

impl AlertHistory {
    pub fn new(windows: DedupWindows) -> Self {
        AlertHistory {
            windows,
            last_emitted: HashMap::new(),
        }
    }

    /// Checks whether an alert for this subject is outside its window.
    pub fn should_emit(&self, product_id: &str, alert_type: AlertType, now: DateTime<Utc>) -> bool {
        match self
            .last_emitted
            .get(&(product_id.to_string(), alert_type))
        {
            Some(&last) => now - last >= self.windows.window(alert_type),
            None => true,
        }
    }

    /// Records an emission.
    pub fn record(&mut self, product_id: &str, alert_type: AlertType, now: DateTime<Utc>) {
        self.last_emitted
            .insert((product_id.to_string(), alert_type), now);
    }

    /// Filters a scan result down to the alerts outside their windows,
    /// recording each one that passes.
    pub fn filter_new(&mut self, alerts: Vec<Alert>, now: DateTime<Utc>) -> Vec<Alert> {
        alerts
            .into_iter()
            .filter(|a| {
                if self.should_emit(&a.product_id, a.alert_type, now) {
                    self.record(&a.product_id, a.alert_type, now);
                    true
                } else {
                    false
                }
            })
            .collect()
    }

    /// Forgets all recorded emissions.
    pub fn reset(&mut self) {
        self.last_emitted.clear();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
