use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::core::{CurrencyPair, ExchangeRate, FetchError, RateProvider};

/// Rate tables from exchangerate-api.com. One request returns the rates of a
/// base currency against every supported currency.
pub struct ExchangeRateApiProvider {
    base_url: Url,
    client: reqwest::Client,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(ExchangeRateApiProvider {
            base_url: super::parse_base_url(base_url)?,
            client: super::http_client(timeout)?,
        })
    }

    async fn request_rate(&self, pair: &CurrencyPair) -> Result<ExchangeRate, FetchError> {
        let url = super::endpoint(&self.base_url, &["v4", "latest", pair.from.as_str()])?;
        debug!("Requesting rate table from {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(pair.label()));
        }
        if !status.is_success() {
            return Err(FetchError::UpstreamUnavailable(format!(
                "HTTP error: {status} for base currency: {}",
                pair.from
            )));
        }

        let text = response.text().await?;
        let table: RateTableResponse = serde_json::from_str(&text).map_err(|e| {
            FetchError::MalformedResponse(format!(
                "Failed to parse rate table for {}: {e}",
                pair.from
            ))
        })?;

        let rate = table
            .rates
            .get(&pair.to)
            .copied()
            .ok_or_else(|| FetchError::NotFound(pair.label()))?;

        Ok(ExchangeRate::new(
            &pair.from,
            &pair.to,
            rate,
            &table.date,
            Utc::now(),
        ))
    }
}

#[derive(Debug, Deserialize)]
struct RateTableResponse {
    rates: HashMap<String, f64>,
    date: String,
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self), fields(from = %from, to = %to))]
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<ExchangeRate, FetchError> {
        let pair = CurrencyPair::new(from, to);
        let result = self.request_rate(&pair).await;
        if let Err(e) = &result {
            warn!(kind = e.kind(), error = %e, "Error fetching exchange rate");
        }
        result
    }
}
