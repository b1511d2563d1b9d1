//! # Wire Payloads
//!
//! Request/response bodies for the remote POS API. Compatibility matters:
//! these shapes match the endpoint contracts exactly, so field names and
//! optionality are part of the contract, not a style choice.
//!
//! ## Endpoint Shapes
//! ```text
//! POST /transactions
//!   { items: [{product_id, quantity, unit_price, discount_percent}],
//!     customer_id | null, subtotal, discount_total, tax_amount,
//!     total_amount, payment_methods: [{type, amount, reference?}],
//!     notes }
//!
//! POST /notifications
//!   { type, title, message, action?, category, is_persistent: true,
//!     priority, metadata? }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use duka_core::cart::CartLine;
use duka_core::money::Money;
use duka_core::types::{NotificationKind, PaymentLine};

// =============================================================================
// Transaction Submission
// =============================================================================

/// One sold line as the transaction endpoint expects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionItem {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price: Money,
    /// Percentage, not basis points - the wire contract predates this port.
    pub discount_percent: f64,
}

impl From<&CartLine> for TransactionItem {
    fn from(line: &CartLine) -> Self {
        TransactionItem {
            product_id: line.product_id.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            discount_percent: line.discount.percent(),
        }
    }
}

/// Body of `POST /transactions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub items: Vec<TransactionItem>,
    /// Serialized as `null` when absent - the endpoint requires the key.
    pub customer_id: Option<String>,
    pub subtotal: Money,
    pub discount_total: Money,
    pub tax_amount: Money,
    pub total_amount: Money,
    pub payment_methods: Vec<PaymentLine>,
    pub notes: Option<String>,
}

/// Response of `POST /transactions`.
///
/// Success must include an identifier (`transaction_number` or `id`)
/// used to label the resulting Transaction record.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionResponse {
    #[serde(default)]
    pub transaction_number: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

impl TransactionResponse {
    /// The identifier labelling the Transaction; `transaction_number`
    /// wins when both are present.
    pub fn identifier(&self) -> Option<&str> {
        self.transaction_number
            .as_deref()
            .or(self.id.as_deref())
    }
}

// =============================================================================
// Notification Persistence
// =============================================================================

/// Body of `POST /notifications` (fire-and-forget, no response contract).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub category: String,
    /// Always true: the transient copy lives only in session memory.
    pub is_persistent: bool,
    pub priority: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

// =============================================================================
// Paired Devices
// =============================================================================

/// A paired mobile device as reported by `GET /devices`.
///
/// Pairing code generation/verification is server-side; the client only
/// lists devices and calls revoke.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairedDevice {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub last_seen_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use duka_core::money::Rate;
    use duka_core::types::PaymentMethod;

    #[test]
    fn test_request_shape() {
        let request = TransactionRequest {
            items: vec![TransactionItem {
                product_id: "p-1".to_string(),
                quantity: 3,
                unit_price: Money::from_minor(1000),
                discount_percent: 10.0,
            }],
            customer_id: None,
            subtotal: Money::from_minor(3000),
            discount_total: Money::from_minor(450),
            tax_amount: Money::zero(),
            total_amount: Money::from_minor(2550),
            payment_methods: vec![PaymentLine {
                method: PaymentMethod::Cash,
                amount: Money::from_minor(2550),
                reference: None,
            }],
            notes: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["items"][0]["product_id"], "p-1");
        assert_eq!(value["items"][0]["discount_percent"], 10.0);
        // customer_id must serialize as an explicit null
        assert!(value["customer_id"].is_null());
        assert_eq!(value["payment_methods"][0]["type"], "cash");
        assert_eq!(value["total_amount"], 2550);
    }

    #[test]
    fn test_item_from_cart_line() {
        let line = CartLine {
            product_id: "p-1".to_string(),
            name: "Soda".to_string(),
            sku: "SODA-500".to_string(),
            category: None,
            unit_price: Money::from_minor(1000),
            quantity: 3,
            discount: Rate::from_percent(10.0),
            discount_amount: Money::from_minor(300),
            line_total: Money::from_minor(2700),
            available_stock: 10,
        };

        let item = TransactionItem::from(&line);
        assert_eq!(item.quantity, 3);
        assert!((item.discount_percent - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_response_identifier_preference() {
        let both: TransactionResponse =
            serde_json::from_str(r#"{"transaction_number":"TX-001","id":"42"}"#).unwrap();
        assert_eq!(both.identifier(), Some("TX-001"));

        let id_only: TransactionResponse = serde_json::from_str(r#"{"id":"42"}"#).unwrap();
        assert_eq!(id_only.identifier(), Some("42"));

        let neither: TransactionResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(neither.identifier(), None);
    }

    #[test]
    fn test_notification_record_shape() {
        let record = NotificationRecord {
            kind: NotificationKind::Success,
            title: "Sale completed".to_string(),
            message: "TX-001 for 2550".to_string(),
            action: None,
            category: "transaction".to_string(),
            is_persistent: true,
            priority: "medium".to_string(),
            metadata: None,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "success");
        assert_eq!(value["is_persistent"], true);
        assert!(value.get("action").is_none());
        assert!(value.get("metadata").is_none());
    }
}
