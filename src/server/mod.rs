//! HTTP surface of the dashboard.
//!
//! | Route | Response |
//! |---|---|
//! | `GET /` | dashboard page |
//! | `GET /health` | `{"status":"ok"}` |
//! | `GET /stocks/{ticker}` | quote, or 404 |
//! | `GET /exchange/{from}/{to}` | exchange rate, or 404 |
//! | `GET /portfolio` | full snapshot, always 200 |

pub mod error;
pub mod handlers;

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::core::config::{AppConfig, PortfolioConfig};
use crate::core::{QuoteProvider, RateProvider};
use crate::providers::exchange_rate_api::ExchangeRateApiProvider;
use crate::providers::yahoo_finance::YahooFinanceProvider;

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub quote_provider: Arc<dyn QuoteProvider>,
    pub rate_provider: Arc<dyn RateProvider>,
    pub portfolio: Arc<PortfolioConfig>,
}

impl AppState {
    pub fn new(
        quote_provider: Arc<dyn QuoteProvider>,
        rate_provider: Arc<dyn RateProvider>,
        portfolio: PortfolioConfig,
    ) -> Self {
        AppState {
            quote_provider,
            rate_provider,
            portfolio: Arc::new(portfolio),
        }
    }

    /// Wires the real upstream providers described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let timeout = config.timeout();
        let quote_provider =
            YahooFinanceProvider::new(config.providers.yahoo_base_url(), timeout)?;
        let rate_provider =
            ExchangeRateApiProvider::new(config.providers.exchange_rate_base_url(), timeout)?;

        Ok(Self::new(
            Arc::new(quote_provider),
            Arc::new(rate_provider),
            config.portfolio.clone(),
        ))
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/health", get(handlers::health_check))
        .route("/stocks/{ticker}", get(handlers::get_stock))
        .route("/exchange/{from}/{to}", get(handlers::get_exchange))
        .route("/portfolio", get(handlers::get_portfolio))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Serves the dashboard on `0.0.0.0:port` until Ctrl+C or SIGTERM.
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(%addr, "Server listening");
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExchangeRate, FetchError, Quote};
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use chrono::Utc;
    use tower::ServiceExt;

    struct FixedQuotes;

    #[async_trait]
    impl QuoteProvider for FixedQuotes {
        async fn fetch_quote(&self, ticker: &str) -> std::result::Result<Quote, FetchError> {
            match ticker {
                "AAPL" => Ok(Quote::from_prices(
                    ticker,
                    "Apple Inc.",
                    150.0,
                    Some(148.0),
                    "USD",
                    Utc::now(),
                )),
                _ => Err(FetchError::NotFound(ticker.to_string())),
            }
        }
    }

    struct FixedRates;

    #[async_trait]
    impl RateProvider for FixedRates {
        async fn fetch_rate(
            &self,
            from: &str,
            to: &str,
        ) -> std::result::Result<ExchangeRate, FetchError> {
            match (from, to) {
                ("USD", "KRW") => Ok(ExchangeRate::new(from, to, 1382.5, "2024-05-01", Utc::now())),
                _ => Err(FetchError::NotFound(format!("{from}_{to}"))),
            }
        }
    }

    fn test_router() -> Router {
        create_router(AppState::new(
            Arc::new(FixedQuotes),
            Arc::new(FixedRates),
            PortfolioConfig::default(),
        ))
    }

    async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
        let response = test_router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get("/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_dashboard_page() {
        let response = test_router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("/portfolio"));
    }

    #[tokio::test]
    async fn test_unknown_stock_names_ticker() {
        let (status, body) = get("/stocks/NOPE").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["detail"], "Stock NOPE not found");
    }

    #[tokio::test]
    async fn test_exchange_codes_are_upper_cased() {
        let (status, body) = get("/exchange/usd/krw").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["from"], "USD");
        assert_eq!(json["rate"], 1382.5);

        let (status, body) = get("/exchange/CNY/KRW").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["detail"], "Exchange rate not found");
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "https://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
