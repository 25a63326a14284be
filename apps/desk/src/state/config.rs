//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`SERVICEPRO_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use servicepro_core::{TaxRate, Warehouse, DEFAULT_VAT_PERCENT};
use servicepro_store::mirror::{MirrorConfig, DEFAULT_LATENCY_MS};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Shop name (shown in the header and on slips)
    pub shop_name: String,

    /// Shop address lines (for slips)
    pub shop_address: Vec<String>,

    /// Warehouse preselected on new forms
    pub default_warehouse: Warehouse,

    /// VAT rate preselected on new VAT invoices, in whole percent
    pub vat_rate_percent: u32,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Simulated round trip of the mock data service
    pub mirror_latency_ms: u64,

    /// Seed file to start the session from. Demo data when absent.
    pub seed_path: Option<PathBuf>,

    /// Key for the document service. Never sent to the front end.
    ///
    /// Only read by the host, which builds its parser from it and installs
    /// it with `App::with_parser`.
    #[serde(skip_serializing, default)]
    pub ai_api_key: Option<String>,
}

impl Default for ConfigState {
    /// Returns default configuration suitable for development.
    ///
    /// ## Default Values
    /// - Shop: "ServicePro Tây Phát"
    /// - Warehouse: TAY_PHAT
    /// - VAT: 10 %
    /// - Mirror latency: 300ms
    /// - No seed file, no document service key
    fn default() -> Self {
        ConfigState {
            shop_name: "ServicePro Tây Phát".to_string(),
            shop_address: vec!["Tây Phát, Hà Nội".to_string()],
            default_warehouse: Warehouse::TayPhat,
            vat_rate_percent: DEFAULT_VAT_PERCENT,
            currency_symbol: "₫".to_string(),
            mirror_latency_ms: DEFAULT_LATENCY_MS,
            seed_path: None,
            ai_api_key: None,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `SERVICEPRO_SHOP_NAME`: Override shop name
    /// - `SERVICEPRO_DEFAULT_WAREHOUSE`: `TAY_PHAT` or `TNC`
    /// - `SERVICEPRO_VAT_RATE`: Default VAT rate in percent (e.g., "8")
    /// - `SERVICEPRO_MIRROR_LATENCY_MS`: Mock backend delay
    /// - `SERVICEPRO_SEED_PATH`: JSON seed file
    /// - `SERVICEPRO_AI_API_KEY`: Document service key
    ///
    /// Unparseable values are ignored and the default kept.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();

        if let Some(name) = lookup("SERVICEPRO_SHOP_NAME") {
            config.shop_name = name;
        }

        if let Some(warehouse) = lookup("SERVICEPRO_DEFAULT_WAREHOUSE").and_then(|c| Warehouse::from_code(c.trim())) {
            config.default_warehouse = warehouse;
        }

        if let Some(rate) = lookup("SERVICEPRO_VAT_RATE").and_then(|r| r.trim().parse::<u32>().ok()) {
            config.vat_rate_percent = rate;
        }

        if let Some(ms) = lookup("SERVICEPRO_MIRROR_LATENCY_MS").and_then(|v| v.trim().parse::<u64>().ok()) {
            config.mirror_latency_ms = ms;
        }

        if let Some(path) = lookup("SERVICEPRO_SEED_PATH") {
            config.seed_path = Some(PathBuf::from(path));
        }

        config.ai_api_key = lookup("SERVICEPRO_AI_API_KEY").filter(|k| !k.trim().is_empty());

        config
    }

    pub fn vat_rate(&self) -> TaxRate {
        TaxRate::from_percent(self.vat_rate_percent)
    }

    pub fn mirror(&self) -> MirrorConfig {
        MirrorConfig {
            latency: Duration::from_millis(self.mirror_latency_ms),
        }
    }

    /// Formats whole đồng with `.` thousands separators.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(1500000), "1.500.000 ₫");
    /// ```
    pub fn format_currency(&self, dong: i64) -> String {
        let digits = dong.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        format!(
            "{}{} {}",
            if dong < 0 { "-" } else { "" },
            grouped,
            self.currency_symbol
        )
    }
}
