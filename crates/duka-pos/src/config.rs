//! # Engine Configuration
//!
//! Runtime configuration for the POS engine.
//!
//! ## Sources (later wins)
//! ```text
//! Defaults (Kenyan duka: KSh, 16% VAT) ──► DUKA_* environment variables
//! ```

use std::path::PathBuf;

use duka_core::{Money, TaxRate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PosConfig {
    /// Shop name printed on receipts and reports.
    pub store_name: String,

    /// Currency symbol for display formatting.
    pub currency_symbol: String,

    /// VAT rate applied to the discounted subtotal.
    pub vat_rate: TaxRate,

    /// Maximum share of a cart total redeemable in loyalty points,
    /// in basis points (5000 = 50%).
    pub loyalty_redeem_cap_bps: u32,

    /// Cash value of one loyalty point, in cents.
    pub loyalty_redeem_rate_cents: i64,

    /// Path to the SQLite database file.
    pub database_path: PathBuf,
}

impl Default for PosConfig {
    fn default() -> Self {
        PosConfig {
            store_name: "Duka POS".to_string(),
            currency_symbol: "KSh".to_string(),
            // Kenyan standard VAT
            vat_rate: TaxRate::from_bps(1600),
            loyalty_redeem_cap_bps: 5000,
            loyalty_redeem_rate_cents: 100,
            database_path: PathBuf::from("duka.db"),
        }
    }
}

impl PosConfig {
    /// Builds a configuration from defaults overlaid with `DUKA_*`
    /// environment variables. Malformed values fall back to the default
    /// rather than failing startup.
    ///
    /// | Variable                 | Meaning                           |
    /// |--------------------------|-----------------------------------|
    /// | `DUKA_STORE_NAME`        | Shop name                         |
    /// | `DUKA_CURRENCY_SYMBOL`   | Display symbol                    |
    /// | `DUKA_VAT_RATE_BPS`      | VAT in basis points               |
    /// | `DUKA_REDEEM_CAP_BPS`    | Loyalty redemption cap            |
    /// | `DUKA_REDEEM_RATE_CENTS` | Value of one point in cents       |
    /// | `DUKA_DATABASE_PATH`     | SQLite file path                  |
    pub fn from_env() -> Self {
        let mut config = PosConfig::default();

        if let Ok(name) = std::env::var("DUKA_STORE_NAME") {
            config.store_name = name;
        }
        if let Ok(symbol) = std::env::var("DUKA_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }
        if let Ok(bps) = std::env::var("DUKA_VAT_RATE_BPS") {
            if let Ok(bps) = bps.parse::<u32>() {
                config.vat_rate = TaxRate::from_bps(bps);
            }
        }
        if let Ok(bps) = std::env::var("DUKA_REDEEM_CAP_BPS") {
            if let Ok(bps) = bps.parse::<u32>() {
                config.loyalty_redeem_cap_bps = bps;
            }
        }
        if let Ok(cents) = std::env::var("DUKA_REDEEM_RATE_CENTS") {
            if let Ok(cents) = cents.parse::<i64>() {
                // A point must be worth at least one cent.
                if cents > 0 {
                    config.loyalty_redeem_rate_cents = cents;
                }
            }
        }
        if let Ok(path) = std::env::var("DUKA_DATABASE_PATH") {
            config.database_path = PathBuf::from(path);
        }

        debug!(?config, "Configuration loaded");
        config
    }

    /// Formats an amount with the configured currency symbol.
    ///
    /// `format_currency(Money::from_cents(1099))` → `"KSh 10.99"`.
    pub fn format_currency(&self, amount: Money) -> String {
        format!("{} {}", self.currency_symbol, amount)
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
        let config = PosConfig::default();
        assert_eq!(config.vat_rate.bps(), 1600);
        assert_eq!(config.currency_symbol, "KSh");
    }

    #[test]
    fn test_format_currency() {
        let config = PosConfig::default();
        assert_eq!(config.format_currency(Money::from_cents(1099)), "KSh 10.99");
        assert_eq!(config.format_currency(Money::from_cents(-550)), "KSh -5.50");
    }

    // Env vars are process-global, so every DUKA_* case lives in this one
    // test to avoid interleaving with a parallel runner.
    #[test]
    fn test_from_env_overrides_and_fallback() {
        std::env::set_var("DUKA_STORE_NAME", "Mama Njeri Shop");
        std::env::set_var("DUKA_VAT_RATE_BPS", "800");
        std::env::set_var("DUKA_REDEEM_CAP_BPS", "not-a-number");
        std::env::set_var("DUKA_REDEEM_RATE_CENTS", "0");

        let config = PosConfig::from_env();
        assert_eq!(config.store_name, "Mama Njeri Shop");
        assert_eq!(config.vat_rate.bps(), 800);
        // Malformed value falls back to the default
        assert_eq!(config.loyalty_redeem_cap_bps, 5000);
        // A worthless point rate is rejected, not adopted
        assert_eq!(config.loyalty_redeem_rate_cents, 100);

        std::env::remove_var("DUKA_STORE_NAME");
        std::env::remove_var("DUKA_VAT_RATE_BPS");
        std::env::remove_var("DUKA_REDEEM_CAP_BPS");
        std::env::remove_var("DUKA_REDEEM_RATE_CENTS");
    }
}
