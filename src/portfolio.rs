//! Aggregates the configured tickers and currency pairs into one snapshot.

use crate::core::config::{Holding, PortfolioConfig};
use crate::core::{CurrencyPair, ExchangeRate, Quote, QuoteProvider, RateProvider};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Everything the dashboard shows for one refresh.
///
/// Entries whose fetch failed are left out: quote lists shrink and rate
/// entries become `null`. The lists are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub korean_stocks: Vec<Quote>,
    pub us_stocks: Vec<Quote>,
    pub chinese_stocks: Vec<Quote>,
    /// Keyed by pair label (`USD_KRW`), in configured order.
    pub exchange_rates: IndexMap<String, Option<ExchangeRate>>,
    pub timestamp: DateTime<Utc>,
}

impl PortfolioSnapshot {
    /// Labelled groups in display order.
    pub fn groups(&self) -> [(&'static str, &[Quote]); 3] {
        [
            ("Korean Stocks", self.korean_stocks.as_slice()),
            ("US Stocks", self.us_stocks.as_slice()),
            ("Chinese Stocks", self.chinese_stocks.as_slice()),
        ]
    }
}

/// Builds a fresh snapshot.
///
/// Every ticker and every pair is requested exactly once. The requests run
/// concurrently; results keep the configured order.
#[instrument(name = "BuildSnapshot", skip_all)]
pub async fn build_snapshot(
    config: &PortfolioConfig,
    quote_provider: &dyn QuoteProvider,
    rate_provider: &dyn RateProvider,
) -> PortfolioSnapshot {
    let (korean_stocks, us_stocks, chinese_stocks, exchange_rates) = futures::join!(
        fetch_group(&config.korean_stocks, quote_provider),
        fetch_group(&config.us_stocks, quote_provider),
        fetch_group(&config.chinese_stocks, quote_provider),
        fetch_rates(&config.exchange_rates, rate_provider),
    );

    let snapshot = PortfolioSnapshot {
        korean_stocks,
        us_stocks,
        chinese_stocks,
        exchange_rates,
        timestamp: Utc::now(),
    };

    let quotes: usize = snapshot.groups().iter().map(|(_, q)| q.len()).sum();
    let rates = snapshot.exchange_rates.values().flatten().count();
    info!(quotes, rates, "Built portfolio snapshot");
    snapshot
}

async fn fetch_group(holdings: &[Holding], provider: &dyn QuoteProvider) -> Vec<Quote> {
    let futures = holdings.iter().map(|holding| async move {
        match provider.fetch_quote(&holding.ticker).await {
            Ok(quote) => Some(quote.with_name(&holding.name)),
            Err(e) => {
                debug!(ticker = %holding.ticker, kind = e.kind(), "Omitting holding from snapshot");
                None
            }
        }
    });

    join_all(futures).await.into_iter().flatten().collect()
}

async fn fetch_rates(
    pairs: &[CurrencyPair],
    provider: &dyn RateProvider,
) -> IndexMap<String, Option<ExchangeRate>> {
    let futures = pairs.iter().map(|pair| async move {
        let rate = match provider.fetch_rate(&pair.from, &pair.to).await {
            Ok(rate) => Some(rate),
            Err(e) => {
                debug!(pair = %pair.label(), kind = e.kind(), "Rate missing from snapshot");
                None
            }
        };
        (pair.label(), rate)
    });

    join_all(futures).await.into_iter().collect()
}
