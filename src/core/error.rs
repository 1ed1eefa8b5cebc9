//! Failure taxonomy for upstream fetches.

use thiserror::Error;

/// Why a quote or rate could not be produced.
///
/// Callers outside the providers only ever see "found" or "not found", but
/// the variant is kept so logs and tests can tell the causes apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("No data found for {0}")]
    NotFound(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Upstream timed out: {0}")]
    Timeout(String),
}

impl FetchError {
    /// Short, stable label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::NotFound(_) => "not_found",
            FetchError::UpstreamUnavailable(_) => "upstream_unavailable",
            FetchError::MalformedResponse(_) => "malformed_response",
            FetchError::Timeout(_) => "timeout",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err.to_string())
        } else if err.is_decode() {
            FetchError::MalformedResponse(err.to_string())
        } else {
            FetchError::UpstreamUnavailable(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(FetchError::NotFound("AAPL".into()).kind(), "not_found");
        assert_eq!(
            FetchError::UpstreamUnavailable("down".into()).kind(),
            "upstream_unavailable"
        );
        assert_eq!(
            FetchError::MalformedResponse("bad json".into()).kind(),
            "malformed_response"
        );
        assert_eq!(FetchError::Timeout("10s".into()).kind(), "timeout");
    }

    #[test]
    fn test_display_names_subject() {
        let err = FetchError::NotFound("005930.KS".to_string());
        assert_eq!(err.to_string(), "No data found for 005930.KS");
    }
}
