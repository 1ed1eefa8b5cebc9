//! Stock quote abstractions and core types

use crate::core::error::FetchError;
use crate::core::rounding::{PRICE_DP, round_dp};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point-in-time price reading for one ticker plus its day-over-day change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub ticker: String,
    pub name: String,
    pub current_price: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_percent: f64,
    pub currency: String,
    pub timestamp: DateTime<Utc>,
}

impl Quote {
    /// Builds a quote from raw upstream prices.
    ///
    /// A missing or zero previous close yields a zero percent change. The
    /// change is computed from the unrounded prices, then every monetary
    /// field is rounded to two decimal places.
    pub fn from_prices(
        ticker: &str,
        name: &str,
        current_price: f64,
        previous_close: Option<f64>,
        currency: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let previous_close = previous_close.unwrap_or(0.0);
        let change = current_price - previous_close;
        let change_percent = if previous_close != 0.0 {
            change / previous_close * 100.0
        } else {
            0.0
        };

        Quote {
            ticker: ticker.to_string(),
            name: name.to_string(),
            current_price: round_dp(current_price, PRICE_DP),
            previous_close: round_dp(previous_close, PRICE_DP),
            change: round_dp(change, PRICE_DP),
            change_percent: round_dp(change_percent, PRICE_DP),
            currency: currency.to_string(),
            timestamp,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch_quote(&self, ticker: &str) -> Result<Quote, FetchError>;
}
