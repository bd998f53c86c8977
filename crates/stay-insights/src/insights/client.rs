use super::payload::{InsightRequest, InsightResponse};
use crate::config::UpstreamConfig;
use crate::sources::{read_json, SourceError};
use serde_json::Value;
use tracing::debug;

const SERVICE: &str = "insights";

/// Client for the language-model `generateContent` endpoint. The API key is
/// appended server-side as the `key` query parameter.
#[derive(Debug, Clone)]
pub struct InsightClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl InsightClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            model: model.into(),
            api_key,
        }
    }

    pub fn from_config(http: reqwest::Client, config: &UpstreamConfig) -> Self {
        Self::new(
            http,
            config.insights_url.clone(),
            config.insights_model.clone(),
            config.insights_api_key.clone(),
        )
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Posts `body` unchanged and returns the upstream JSON.
    pub async fn forward_raw(&self, body: &Value) -> Result<Value, SourceError> {
        self.post(body).await
    }

    pub async fn generate(&self, request: &InsightRequest) -> Result<InsightResponse, SourceError> {
        self.post(request).await
    }

    /// Sends `request` and returns the first candidate's text.
    pub async fn ask(&self, request: &InsightRequest) -> Result<String, SourceError> {
        self.generate(request)
            .await?
            .first_text()
            .ok_or(SourceError::EmptyResponse { service: SERVICE })
    }

    async fn post<B, T>(&self, body: &B) -> Result<T, SourceError>
    where
        B: serde::Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SourceError::MissingCredentials { service: SERVICE })?;

        let endpoint = self.endpoint();
        debug!(%endpoint, "requesting model insight");
        let response = self
            .http
            .post(&endpoint)
            .query(&[("key", api_key)])
            .json(body)
            .send()
            .await
            .map_err(|source| SourceError::Transport {
                service: SERVICE,
                source,
            })?;

        read_json(SERVICE, response).await
    }
}
