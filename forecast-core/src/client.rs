use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::model::ForecastPayload;

pub const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com/v1";

/// Upper bound on one outstanding request, so a caller is never stuck in
/// a loading state indefinitely. A timeout surfaces as [`FetchError::Transport`].
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure of a single forecast fetch. The variants map onto the three
/// failure classes the controller cares about: transport trouble, an
/// unhappy HTTP status, and a body that does not decode.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to reach the forecast service: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("forecast request failed with status {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("forecast response had an unexpected shape: {0}")]
    Malformed(String),
}

/// Source of forecast payloads, one city per call.
///
/// The seam between the controller and the network: tests complete
/// queries through a stub instead of a live endpoint.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch(&self, city: &str) -> Result<ForecastPayload, FetchError>;
}

/// HTTP client for the upstream forecast service.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    base_url: String,
    api_key: String,
    http: Client,
}

impl ForecastClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(FetchError::Transport)?;

        let base_url = base_url.into();

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            http,
        })
    }

    async fn fetch_forecast(&self, city: &str) -> Result<ForecastPayload, FetchError> {
        let url = format!("{}/forecast.json", self.base_url);

        // `without_url` drops the request URL from the error so the API key
        // (a query parameter) never reaches logs.
        let res = self
            .http
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", city),
                ("days", "2"),
                ("aqi", "no"),
                ("alerts", "no"),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.without_url()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.without_url()))?;

        if !status.is_success() {
            return Err(FetchError::Http { status, body: truncate_body(&body) });
        }

        serde_json::from_str(&body).map_err(|e| FetchError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl ForecastSource for ForecastClient {
    async fn fetch(&self, city: &str) -> Result<ForecastPayload, FetchError> {
        self.fetch_forecast(city).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    // Cut on a char boundary; a fixed byte offset can land inside a
    // multi-byte character and panic.
    let mut cut = MAX;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }

    format!("{}...", &body[..cut])
}
