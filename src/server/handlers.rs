use axum::{
    Json,
    extract::{Path, State},
    response::Html,
};
use serde::Serialize;

use super::AppState;
use super::error::{ApiError, ApiResult};
use crate::core::{ExchangeRate, Quote};
use crate::portfolio::{self, PortfolioSnapshot};

const DASHBOARD_HTML: &str = include_str!("dashboard.html");

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Mobile dashboard page; it polls `/portfolio` on its own.
pub async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn get_stock(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> ApiResult<Json<Quote>> {
    state
        .quote_provider
        .fetch_quote(&ticker)
        .await
        .map(Json)
        .map_err(|_| ApiError::NotFound(format!("Stock {ticker} not found")))
}

pub async fn get_exchange(
    State(state): State<AppState>,
    Path((from, to)): Path<(String, String)>,
) -> ApiResult<Json<ExchangeRate>> {
    state
        .rate_provider
        .fetch_rate(&from.to_uppercase(), &to.to_uppercase())
        .await
        .map(Json)
        .map_err(|_| ApiError::NotFound("Exchange rate not found".to_string()))
}

/// Never fails; upstream failures only make the snapshot sparser.
pub async fn get_portfolio(State(state): State<AppState>) -> Json<PortfolioSnapshot> {
    let snapshot = portfolio::build_snapshot(
        &state.portfolio,
        state.quote_provider.as_ref(),
        state.rate_provider.as_ref(),
    )
    .await;
    Json(snapshot)
}
