use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use stay_insights::analytics::DateRange;
use stay_insights::config::UpstreamConfig;
use stay_insights::insights::InsightClient;
use stay_insights::sources::ReservationsClient;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) reservations: ReservationsClient,
    pub(crate) insights: InsightClient,
}

impl AppState {
    pub(crate) fn new(
        http: reqwest::Client,
        upstream: &UpstreamConfig,
        metrics: PrometheusHandle,
    ) -> Self {
        Self {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(metrics),
            reservations: ReservationsClient::from_config(http.clone(), upstream),
            insights: InsightClient::from_config(http, upstream),
        }
    }
}

/// `start`/`end` query or body fields shared by the dashboard endpoints.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RangeParams {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) end: Option<NaiveDate>,
}

impl RangeParams {
    pub(crate) fn range(&self) -> DateRange {
        DateRange::new(self.start, self.end)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Blank values count as "no bound" so cleared date pickers need no special casing.
pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.filter(|value| !value.trim().is_empty())
        .map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
