//! Currency conversion abstractions

use crate::core::error::FetchError;
use crate::core::rounding::{RATE_DP, round_dp};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Amount of `to` currency per one unit of `from` currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub from: String,
    pub to: String,
    pub rate: f64,
    /// Date stamp reported by the upstream rate table.
    pub last_update: String,
    pub timestamp: DateTime<Utc>,
}

impl ExchangeRate {
    pub fn new(
        from: &str,
        to: &str,
        rate: f64,
        last_update: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        ExchangeRate {
            from: from.to_string(),
            to: to.to_string(),
            rate: round_dp(rate, RATE_DP),
            last_update: last_update.to_string(),
            timestamp,
        }
    }
}

/// A base/quote currency pair, e.g. `USD -> KRW`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub from: String,
    pub to: String,
}

impl CurrencyPair {
    pub fn new(from: &str, to: &str) -> Self {
        CurrencyPair {
            from: from.to_uppercase(),
            to: to.to_uppercase(),
        }
    }

    /// Key used for this pair in a portfolio snapshot, e.g. `USD_KRW`.
    pub fn label(&self) -> String {
        format!("{}_{}", self.from.to_uppercase(), self.to.to_uppercase())
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Currency codes are case-insensitive.
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<ExchangeRate, FetchError>;
}
