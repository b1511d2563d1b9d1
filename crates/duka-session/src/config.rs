//! # Session Configuration
//!
//! Configuration management for a POS session.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     DUKA_API_URL=https://pos.example.com/api                           │
//! │     DUKA_TAX_RATE_BPS=1800                                             │
//! │     DUKA_TAXABLE_METHODS=card,bank_transfer                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/duka-pos/session.toml (Linux)                            │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     tax disabled, 60 s stock poll, daily expiry poll                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # session.toml
//! [api]
//! base_url = "https://pos.example.com/api"
//! timeout_secs = 30
//!
//! [tax]
//! rate_bps = 1800
//! taxable_methods = ["card", "bank_transfer"]
//!
//! [polling]
//! stock_interval_secs = 60
//! expiry_interval_secs = 86400
//! device_activity_interval_secs = 45
//!
//! [alerts]
//! stock_dedup_secs = 300
//! expiry_dedup_secs = 86400
//! ```

use std::path::{Path, PathBuf};

use chrono::Duration as ChronoDuration;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use duka_core::alert::DedupWindows;
use duka_core::money::Rate;
use duka_core::types::{PaymentMethod, TaxPolicy};

use crate::error::{SessionError, SessionResult};

// =============================================================================
// Config Sections
// =============================================================================

/// Remote API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Tax policy settings. Defaults to tax disabled (empty taxable set).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxConfig {
    pub rate_bps: u32,
    pub taxable_methods: Vec<PaymentMethod>,
}

impl TaxConfig {
    /// Builds the policy the pricing engine consumes.
    pub fn to_policy(&self) -> TaxPolicy {
        TaxPolicy::new(Rate::from_bps(self.rate_bps), self.taxable_methods.clone())
    }
}

/// Recurring-task intervals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Stock alerts re-evaluate on this cadence.
    pub stock_interval_secs: u64,
    /// Expiry alerts re-evaluate on this cadence.
    pub expiry_interval_secs: u64,
    /// Paired-device activity poll cadence.
    pub device_activity_interval_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        PollingConfig {
            stock_interval_secs: 60,
            expiry_interval_secs: 86_400,
            device_activity_interval_secs: 45,
        }
    }
}

/// Alert deduplication windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// A repeat stock alert for the same product is suppressed inside
    /// this window.
    pub stock_dedup_secs: i64,
    /// A repeat expiry alert for the same product is suppressed inside
    /// this window.
    pub expiry_dedup_secs: i64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        AlertConfig {
            stock_dedup_secs: 300,
            expiry_dedup_secs: 86_400,
        }
    }
}

impl AlertConfig {
    pub fn to_windows(&self) -> DedupWindows {
        DedupWindows {
            stock: ChronoDuration::seconds(self.stock_dedup_secs),
            expiry: ChronoDuration::seconds(self.expiry_dedup_secs),
        }
    }
}

// =============================================================================
// Session Config
// =============================================================================

/// Full session configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub api: ApiConfig,
    pub tax: TaxConfig,
    pub polling: PollingConfig,
    pub alerts: AlertConfig,
}

impl SessionConfig {
    /// Loads configuration: defaults ← TOML file ← environment.
    ///
    /// A missing file is not an error (defaults apply); a malformed
    /// file is.
    pub fn load(path: &Path) -> SessionResult<Self> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| SessionError::Config(format!("cannot read {:?}: {}", path, e)))?;
            toml::from_str(&raw)
                .map_err(|e| SessionError::Config(format!("cannot parse {:?}: {}", path, e)))?
        } else {
            debug!(?path, "No config file, using defaults");
            SessionConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Default config file location (`~/.config/duka-pos/session.toml`
    /// on Linux).
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "duka", "duka-pos")
            .map(|dirs| dirs.config_dir().join("session.toml"))
    }

    /// Applies `DUKA_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("DUKA_API_URL") {
            self.api.base_url = url;
        }

        if let Ok(raw) = std::env::var("DUKA_TAX_RATE_BPS") {
            match raw.parse() {
                Ok(bps) => self.tax.rate_bps = bps,
                Err(_) => warn!(value = %raw, "Ignoring invalid DUKA_TAX_RATE_BPS"),
            }
        }

        if let Ok(raw) = std::env::var("DUKA_TAXABLE_METHODS") {
            let mut methods = Vec::new();
            for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                match parse_payment_method(token) {
                    Some(m) => methods.push(m),
                    None => warn!(value = %token, "Ignoring unknown payment method"),
                }
            }
            self.tax.taxable_methods = methods;
        }
    }
}

fn parse_payment_method(token: &str) -> Option<PaymentMethod> {
    match token {
        "cash" => Some(PaymentMethod::Cash),
        "card" => Some(PaymentMethod::Card),
        "mobile_money" => Some(PaymentMethod::MobileMoney),
        "bank_transfer" => Some(PaymentMethod::BankTransfer),
        "credit" => Some(PaymentMethod::Credit),
        _ => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.polling.stock_interval_secs, 60);
        assert_eq!(config.polling.expiry_interval_secs, 86_400);
        assert_eq!(config.polling.device_activity_interval_secs, 45);
        assert_eq!(config.alerts.stock_dedup_secs, 300);
        assert_eq!(config.alerts.expiry_dedup_secs, 86_400);

        // Tax disabled by default
        let policy = config.tax.to_policy();
        assert!(policy.taxable_methods.is_empty());
    }

    #[test]
    fn test_parse_toml() {
        let config: SessionConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://pos.example.com/api"

            [tax]
            rate_bps = 1800
            taxable_methods = ["card", "bank_transfer"]

            [polling]
            stock_interval_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://pos.example.com/api");
        assert_eq!(config.tax.rate_bps, 1800);
        assert_eq!(config.polling.stock_interval_secs, 30);
        // Unspecified sections keep their defaults
        assert_eq!(config.polling.expiry_interval_secs, 86_400);

        let policy = config.tax.to_policy();
        assert!(policy.is_taxable(PaymentMethod::Card));
        assert!(!policy.is_taxable(PaymentMethod::Cash));
    }

    #[test]
    fn test_parse_payment_method() {
        assert_eq!(parse_payment_method("cash"), Some(PaymentMethod::Cash));
        assert_eq!(
            parse_payment_method("mobile_money"),
            Some(PaymentMethod::MobileMoney)
        );
        assert_eq!(parse_payment_method("bitcoin"), None);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = SessionConfig::load(Path::new("/nonexistent/session.toml")).unwrap();
        assert_eq!(config.polling.stock_interval_secs, 60);
    }
}
