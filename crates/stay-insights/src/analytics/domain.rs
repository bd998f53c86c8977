use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Channel label used when a reservation carries no source.
pub const UNKNOWN_CHANNEL: &str = "Unknown";

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Reservation status as reported by the booking platform.
///
/// The set is open: anything other than `Booked` or `Cancelled` is kept verbatim
/// and falls outside both buckets during aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookingStatus {
    Booked,
    Cancelled,
    Other(String),
}

impl BookingStatus {
    pub fn label(&self) -> &str {
        match self {
            Self::Booked => "Booked",
            Self::Cancelled => "Cancelled",
            Self::Other(value) => value.as_str(),
        }
    }
}

impl Default for BookingStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for BookingStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Booked" => Self::Booked,
            "Cancelled" => Self::Cancelled,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for BookingStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<BookingStatus> for String {
    fn from(value: BookingStatus) -> Self {
        match value {
            BookingStatus::Other(value) => value,
            other => other.label().to_string(),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One reservation as consumed by the metrics aggregator.
///
/// Deserialization is deliberately loose: unparseable timestamps become `None`,
/// amounts may arrive as numbers or numeric strings, and identifiers may be
/// numeric. Snake_case field names are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    #[serde(default, deserialize_with = "loose_id")]
    pub id: String,
    #[serde(
        default,
        alias = "guest_name",
        deserialize_with = "loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub guest_name: Option<String>,
    #[serde(default, deserialize_with = "loose_timestamp")]
    pub arrival: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "loose_timestamp")]
    pub departure: Option<NaiveDateTime>,
    #[serde(default, alias = "total_amount", deserialize_with = "loose_amount")]
    pub total_amount: Option<f64>,
    #[serde(
        default,
        deserialize_with = "loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "loose_status")]
    pub status: BookingStatus,
    #[serde(
        default,
        alias = "creation_date",
        deserialize_with = "loose_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub creation_date: Option<NaiveDateTime>,
}

impl BookingRecord {
    /// Confirmed stay between two calendar dates with every optional field unset.
    pub fn new(id: impl Into<String>, arrival: NaiveDate, departure: NaiveDate) -> Self {
        Self {
            id: id.into(),
            guest_name: None,
            arrival: arrival.and_hms_opt(0, 0, 0),
            departure: departure.and_hms_opt(0, 0, 0),
            total_amount: None,
            source: None,
            status: BookingStatus::Booked,
            creation_date: None,
        }
    }

    pub fn with_guest(mut self, guest_name: impl Into<String>) -> Self {
        self.guest_name = Some(guest_name.into());
        self
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.total_amount = Some(amount);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<BookingStatus>) -> Self {
        self.status = status.into();
        self
    }

    pub fn created_at(mut self, creation_date: NaiveDateTime) -> Self {
        self.creation_date = Some(creation_date);
        self
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Booked
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == BookingStatus::Cancelled
    }

    pub fn amount(&self) -> f64 {
        self.total_amount.unwrap_or(0.0)
    }

    pub fn channel(&self) -> &str {
        match self.source.as_deref() {
            Some(source) if !source.is_empty() => source,
            _ => UNKNOWN_CHANNEL,
        }
    }

    pub fn arrival_date(&self) -> Option<NaiveDate> {
        self.arrival.map(|arrival| arrival.date())
    }

    /// Stay length in fractional days. Misordered dates yield a negative value;
    /// an invalid date on either end yields zero.
    pub fn nights(&self) -> f64 {
        match (self.arrival, self.departure) {
            (Some(arrival), Some(departure)) => days_between(arrival, departure),
            _ => 0.0,
        }
    }

    /// Days between creation and arrival, floored at zero. `None` when either
    /// timestamp is missing.
    pub fn lead_time_days(&self) -> Option<f64> {
        match (self.creation_date, self.arrival) {
            (Some(created), Some(arrival)) => Some(days_between(created, arrival).max(0.0)),
            _ => None,
        }
    }
}

fn days_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Parses the timestamp shapes booking platforms emit. Returns `None` for
/// anything unrecognised.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    None
}

fn loose_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => parse_timestamp(&raw),
        Some(Value::Number(millis)) => millis
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.naive_utc()),
        _ => None,
    })
}

fn loose_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let amount = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(amount.filter(|amount| amount.is_finite()))
}

fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        _ => None,
    })
}

fn loose_status<'de, D>(deserializer: D) -> Result<BookingStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(status)) => BookingStatus::from(status),
        _ => BookingStatus::default(),
    })
}

fn loose_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(id)) => id,
        Some(Value::Number(id)) => id.to_string(),
        _ => String::new(),
    })
}
