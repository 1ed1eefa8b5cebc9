pub mod exchange_rate_api;
pub mod yahoo_finance;

use anyhow::{Context, Result, bail};
use reqwest::Url;
use std::time::Duration;

use crate::core::FetchError;

const USER_AGENT: &str = concat!("myfolio/", env!("CARGO_PKG_VERSION"));

/// HTTP client shared by the upstream providers. Every request made with it
/// is bounded by `timeout`.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")
}

pub(crate) fn parse_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url).with_context(|| format!("Invalid base URL: {base_url}"))?;
    if url.cannot_be_a_base() {
        bail!("Invalid base URL: {base_url}");
    }
    Ok(url)
}

/// Appends `segments` to the base path. Each segment is percent-encoded, so
/// caller input can never add query strings, fragments or extra path levels.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, FetchError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| FetchError::UpstreamUnavailable(format!("Invalid base URL: {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
