use super::{read_json, BookingSource, SourceError};
use crate::analytics::BookingRecord;
use crate::config::UpstreamConfig;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

const SERVICE: &str = "reservations";

/// Response body of the reservation listing endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingsEnvelope {
    #[serde(default, alias = "data")]
    pub items: Vec<BookingRecord>,
}

/// Client for the third-party reservation API. The API key is injected here so
/// it never reaches the browser.
#[derive(Debug, Clone)]
pub struct ReservationsClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl ReservationsClient {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            api_key,
        }
    }

    pub fn from_config(http: reqwest::Client, config: &UpstreamConfig) -> Self {
        Self::new(
            http,
            config.reservations_url.clone(),
            config.reservations_api_key.clone(),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetches the reservation listing without interpreting it.
    pub async fn fetch_raw(&self) -> Result<Value, SourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SourceError::MissingCredentials { service: SERVICE })?;

        debug!(endpoint = %self.endpoint, "requesting reservations");
        let response = self
            .http
            .get(&self.endpoint)
            .bearer_auth(api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| SourceError::Transport {
                service: SERVICE,
                source,
            })?;

        read_json(SERVICE, response).await
    }
}

impl BookingSource for ReservationsClient {
    async fn fetch_bookings(&self) -> Result<Vec<BookingRecord>, SourceError> {
        let raw = self.fetch_raw().await?;
        let envelope: BookingsEnvelope =
            serde_json::from_value(raw).map_err(|source| SourceError::Decode {
                service: SERVICE,
                source,
            })?;
        Ok(envelope.items)
    }
}
