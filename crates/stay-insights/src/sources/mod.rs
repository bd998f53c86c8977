//! Where bookings come from: the reservation platform, a local export, or the
//! built-in sample set used when the platform cannot be reached.

mod import;
mod reservations;
mod sample;

use crate::analytics::BookingRecord;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use tracing::{info, warn};

pub use import::{BookingImportError, BookingImporter};
pub use reservations::{BookingsEnvelope, ReservationsClient};
pub use sample::sample_bookings;

/// Failure talking to an upstream HTTP collaborator.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("{service} API key is not configured")]
    MissingCredentials { service: &'static str },
    #[error("request to {service} failed: {source}")]
    Transport {
        service: &'static str,
        source: reqwest::Error,
    },
    #[error("{service} responded with {status}: {message}")]
    Upstream {
        service: &'static str,
        status: u16,
        message: String,
    },
    #[error("unexpected {service} response: {source}")]
    Decode {
        service: &'static str,
        source: serde_json::Error,
    },
    #[error("{service} returned no answer text")]
    EmptyResponse { service: &'static str },
}

impl SourceError {
    /// HTTP status a proxy should answer with when relaying this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            SourceError::MissingCredentials { .. } => 500,
            SourceError::Upstream { status, .. } => *status,
            SourceError::Transport { source, .. } if source.is_timeout() => 504,
            SourceError::Transport { .. }
            | SourceError::Decode { .. }
            | SourceError::EmptyResponse { .. } => 502,
        }
    }

    /// Message suitable for the `{ "error": ... }` body of a proxy response.
    pub fn public_message(&self) -> String {
        match self {
            SourceError::Upstream { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Anything that can produce the current booking snapshot.
pub trait BookingSource {
    fn fetch_bookings(
        &self,
    ) -> impl Future<Output = Result<Vec<BookingRecord>, SourceError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    Live,
    Sample,
}

/// Outcome of loading bookings: the real snapshot, or the sample set together
/// with the reason the real one was unavailable.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingFeed {
    Live(Vec<BookingRecord>),
    Fallback {
        bookings: Vec<BookingRecord>,
        reason: String,
    },
}

impl BookingFeed {
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self::Fallback {
            bookings: sample_bookings(),
            reason: reason.into(),
        }
    }

    pub fn bookings(&self) -> &[BookingRecord] {
        match self {
            Self::Live(bookings) | Self::Fallback { bookings, .. } => bookings,
        }
    }

    pub fn into_bookings(self) -> Vec<BookingRecord> {
        match self {
            Self::Live(bookings) | Self::Fallback { bookings, .. } => bookings,
        }
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            Self::Live(_) => None,
            Self::Fallback { reason, .. } => Some(reason),
        }
    }

    pub fn kind(&self) -> FeedKind {
        match self {
            Self::Live(_) => FeedKind::Live,
            Self::Fallback { .. } => FeedKind::Sample,
        }
    }
}

/// Fetches from `source`, substituting the sample set on any failure.
pub async fn load_booking_feed<S: BookingSource>(source: &S) -> BookingFeed {
    match source.fetch_bookings().await {
        Ok(bookings) => {
            info!(count = bookings.len(), "loaded bookings from reservation source");
            BookingFeed::Live(bookings)
        }
        Err(err) => {
            warn!(error = %err, "booking source unavailable, using sample dataset");
            BookingFeed::fallback(format!("Failed to fetch bookings: {}", err.public_message()))
        }
    }
}

/// Reads a JSON body, turning non-2xx answers into [`SourceError::Upstream`].
pub(crate) async fn read_json<T: DeserializeOwned>(
    service: &'static str,
    response: reqwest::Response,
) -> Result<T, SourceError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|source| SourceError::Transport { service, source })?;

    if !status.is_success() {
        let parsed = serde_json::from_slice::<Value>(&body).ok();
        let message = parsed
            .as_ref()
            .and_then(upstream_message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("upstream request failed")
                    .to_string()
            });
        return Err(SourceError::Upstream {
            service,
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&body).map_err(|source| SourceError::Decode { service, source })
}

/// Pulls a human-readable message out of the error shapes upstream APIs use.
pub(crate) fn upstream_message(body: &Value) -> Option<String> {
    let candidates = [
        body.get("error"),
        body.get("error").and_then(|error| error.get("message")),
        body.get("message"),
    ];

    candidates
        .into_iter()
        .flatten()
        .find_map(|value| value.as_str())
        .filter(|message| !message.trim().is_empty())
        .map(str::to_string)
}
