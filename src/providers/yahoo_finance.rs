use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::core::{FetchError, Quote, QuoteProvider};

// YahooFinanceProvider implementation for QuoteProvider
pub struct YahooFinanceProvider {
    base_url: Url,
    client: reqwest::Client,
}

impl YahooFinanceProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(YahooFinanceProvider {
            base_url: super::parse_base_url(base_url)?,
            client: super::http_client(timeout)?,
        })
    }

    async fn request_quote(&self, ticker: &str) -> Result<Quote, FetchError> {
        let mut url = super::endpoint(&self.base_url, &["v8", "finance", "chart", ticker])?;
        url.query_pairs_mut()
            .append_pair("interval", "1d")
            .append_pair("range", "1d");
        debug!("Requesting quote from {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(ticker.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::UpstreamUnavailable(format!(
                "HTTP error: {status} for symbol: {ticker}"
            )));
        }

        let text = response.text().await?;
        let data: YahooChartResponse = serde_json::from_str(&text).map_err(|e| {
            FetchError::MalformedResponse(format!(
                "Failed to parse chart response for {ticker}: {e}"
            ))
        })?;

        let item = data
            .chart
            .result
            .and_then(|items| items.into_iter().next())
            .ok_or_else(|| FetchError::NotFound(ticker.to_string()))?;

        // An empty trading history means there is nothing to quote
        let current_price = item
            .last_close()
            .ok_or_else(|| FetchError::NotFound(ticker.to_string()))?;

        let meta = item.meta;
        let previous_close = meta.previous_close.or(meta.chart_previous_close);
        let name = meta
            .short_name
            .or(meta.long_name)
            .unwrap_or_else(|| ticker.to_string());
        let currency = meta.currency.unwrap_or_else(|| "USD".to_string());

        Ok(Quote::from_prices(
            ticker,
            &name,
            current_price,
            previous_close,
            &currency,
            Utc::now(),
        ))
    }
}

#[derive(Deserialize, Debug)]
struct YahooChartResponse {
    chart: ChartResult,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    // Yahoo sends `"result": null` alongside an error object for unknown symbols
    result: Option<Vec<ChartItem>>,
}

#[derive(Deserialize, Debug)]
struct ChartItem {
    meta: ChartMeta,
    indicators: Option<Indicators>,
}

impl ChartItem {
    fn last_close(&self) -> Option<f64> {
        self.indicators
            .as_ref()?
            .quote
            .first()?
            .close
            .as_ref()?
            .iter()
            .rev()
            .find_map(|close| *close)
    }
}

#[derive(Deserialize, Debug)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Bars>,
}

#[derive(Deserialize, Debug)]
struct Bars {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    currency: Option<String>,
    short_name: Option<String>,
    long_name: Option<String>,
    previous_close: Option<f64>,
    chart_previous_close: Option<f64>,
}

#[async_trait]
impl QuoteProvider for YahooFinanceProvider {
    #[instrument(name = "YahooQuoteFetch", skip(self), fields(ticker = %ticker))]
    async fn fetch_quote(&self, ticker: &str) -> Result<Quote, FetchError> {
        let result = self.request_quote(ticker).await;
        if let Err(e) = &result {
            warn!(kind = e.kind(), error = %e, "Error fetching {ticker}");
        }
        result
    }
}
