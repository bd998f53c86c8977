use crate::infra::{AppState, RangeParams};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use stay_insights::analytics::{BookingMetrics, DateRange};
use stay_insights::dashboard::DashboardSession;
use stay_insights::error::AppError;
use stay_insights::insights::DEFAULT_QUESTION;
use stay_insights::sources::{load_booking_feed, FeedKind};
use tracing::{info, warn};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DashboardResponse {
    pub(crate) data_source: FeedKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) warning: Option<String>,
    pub(crate) range: DateRange,
    pub(crate) metrics: BookingMetrics,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AskRequest {
    #[serde(default)]
    pub(crate) question: String,
    #[serde(flatten)]
    pub(crate) range: RangeParams,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AskResponse {
    pub(crate) question: String,
    pub(crate) answer: String,
    pub(crate) answer_html: String,
    pub(crate) data_source: FeedKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) warning: Option<String>,
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/bookings", get(bookings_proxy))
        .route("/api/insights", post(insights_proxy))
        .route("/api/v1/dashboard", get(dashboard_endpoint))
        .route("/api/v1/dashboard/ask", post(ask_endpoint))
        .with_state(state)
}

pub(crate) async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Relays the reservation listing with the server-held key attached.
pub(crate) async fn bookings_proxy(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    match state.reservations.fetch_raw().await {
        Ok(body) => Ok(Json(body)),
        Err(err) => {
            warn!(error = %err, "booking proxy request failed");
            Err(err.into())
        }
    }
}

/// Relays a `generateContent` body with the server-held key attached.
pub(crate) async fn insights_proxy(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    match state.insights.forward_raw(&body).await {
        Ok(answer) => Ok(Json(answer)),
        Err(err) => {
            warn!(error = %err, "insight proxy request failed");
            Err(err.into())
        }
    }
}

async fn load_session(state: &AppState, range: DateRange) -> (DashboardSession, FeedKind) {
    let feed = load_booking_feed(&state.reservations).await;
    let kind = feed.kind();

    let mut session = DashboardSession::new();
    session.begin_load();
    session.load_feed(feed);
    session.set_range(range);
    (session, kind)
}

pub(crate) async fn dashboard_endpoint(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> Json<DashboardResponse> {
    let range = params.range();
    let (session, data_source) = load_session(&state, range).await;
    let metrics = session.metrics();
    info!(
        ?data_source,
        bookings = metrics.filtered_bookings.len(),
        "dashboard metrics computed"
    );

    Json(DashboardResponse {
        data_source,
        warning: session.state().warning.clone(),
        range,
        metrics,
    })
}

pub(crate) async fn ask_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    let (mut session, data_source) = load_session(&state, payload.range.range()).await;
    let (revision, request) = session.request_insight(&payload.question);

    let answer = match state.insights.ask(&request).await {
        Ok(answer) => answer,
        Err(err) => {
            warn!(error = %err, "insight request failed");
            return Err(err.into());
        }
    };
    session.resolve_insight(revision, Ok(answer));

    let dashboard = session.state();
    let question = match dashboard.question.as_str() {
        "" => DEFAULT_QUESTION.to_string(),
        asked => asked.to_string(),
    };
    Ok(Json(AskResponse {
        question,
        answer: dashboard.answer.clone().unwrap_or_default(),
        answer_html: session.answer_html().unwrap_or_default(),
        data_source,
        warning: dashboard.warning.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::extract::Query as UpstreamQuery;
    use axum::http::{HeaderMap, Request};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use stay_insights::config::UpstreamConfig;
    use std::collections::HashMap;
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use tower::ServiceExt;

    async fn fake_reservations(headers: HeaderMap) -> (StatusCode, Json<Value>) {
        let key = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        if key != "Bearer res-key" {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid API key" })),
            );
        }

        (
            StatusCode::OK,
            Json(json!({
                "items": [
                    { "id": 1, "arrival": "2024-01-15", "departure": "2024-01-20",
                      "totalAmount": 500, "source": "Airbnb", "status": "Booked" },
                    { "id": 2, "arrival": "2024-02-10", "departure": "2024-02-15",
                      "totalAmount": 650, "source": "Booking.com", "status": "Booked" }
                ]
            })),
        )
    }

    async fn fake_generate(
        UpstreamQuery(params): UpstreamQuery<HashMap<String, String>>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        if params.get("key").map(String::as_str) != Some("gem-key") {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": { "message": "API key not valid" } })),
            );
        }

        let has_bookings = body["contents"][0]["parts"][0]["text"]
            .as_str()
            .is_some_and(|text| text.contains("Booking.com"));
        let text = if has_bookings {
            "**Booking.com** led February"
        } else {
            "No February data"
        };
        (
            StatusCode::OK,
            Json(json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })),
        )
    }

    async fn spawn_upstream() -> String {
        let upstream = Router::new()
            .route("/reservations", get(fake_reservations))
            .route("/v1beta/models/:call", post(fake_generate));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind upstream");
        let addr = listener.local_addr().expect("upstream addr");
        tokio::spawn(async move {
            axum::serve(listener, upstream).await.expect("upstream serves");
        });
        format!("http://{addr}")
    }

    fn test_state(base: &str, reservations_key: Option<&str>, insights_key: Option<&str>) -> AppState {
        let upstream = UpstreamConfig {
            reservations_url: format!("{base}/reservations"),
            reservations_api_key: reservations_key.map(str::to_string),
            insights_url: format!("{base}/v1beta"),
            insights_model: "gemini-test".to_string(),
            insights_api_key: insights_key.map(str::to_string),
            timeout: Duration::from_secs(5),
        };
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let state = AppState::new(reqwest::Client::new(), &upstream, handle);
        state.readiness.store(true, Ordering::Release);
        state
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.expect("request handled");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request builds")
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn health_and_readiness_report_ok() {
        let app = router(test_state("http://127.0.0.1:9", None, None));
        let (status, body) = send(app.clone(), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, body) = send(app, get_request("/ready")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn bookings_proxy_passes_upstream_json_through() {
        let base = spawn_upstream().await;
        let app = router(test_state(&base, Some("res-key"), None));

        let (status, body) = send(app, get_request("/api/bookings")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn bookings_proxy_relays_upstream_status_and_message() {
        let base = spawn_upstream().await;
        let app = router(test_state(&base, Some("stale-key"), None));

        let (status, body) = send(app, get_request("/api/bookings")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid API key");
    }

    #[tokio::test]
    async fn proxies_without_keys_answer_server_error() {
        let app = router(test_state("http://127.0.0.1:9", None, None));

        let (status, body) = send(app.clone(), get_request("/api/bookings")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "reservations API key is not configured");

        let (status, body) = send(app, post_json("/api/insights", json!({ "contents": [] }))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "insights API key is not configured");
    }

    #[tokio::test]
    async fn insights_proxy_forwards_body() {
        let base = spawn_upstream().await;
        let app = router(test_state(&base, None, Some("gem-key")));
        let request = json!({
            "contents": [{ "parts": [{ "text": "Booking.com?" }] }],
            "systemInstruction": { "parts": [{ "text": "be brief" }] }
        });

        let (status, body) = send(app, post_json("/api/insights", request)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["candidates"][0]["content"]["parts"][0]["text"],
            "**Booking.com** led February"
        );
    }

    #[tokio::test]
    async fn dashboard_filters_live_bookings() {
        let base = spawn_upstream().await;
        let app = router(test_state(&base, Some("res-key"), None));

        let (status, body) = send(
            app,
            get_request("/api/v1/dashboard?start=2024-02-01&end=2024-02-28"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dataSource"], "live");
        assert!(body.get("warning").is_none());
        assert_eq!(body["metrics"]["totalBookings"], 1);
        assert_eq!(body["metrics"]["totalRevenue"], 650.0);
        assert_eq!(body["range"]["start"], "2024-02-01");
    }

    #[tokio::test]
    async fn dashboard_falls_back_to_sample_data() {
        let app = router(test_state("http://127.0.0.1:9", None, None));

        let (status, body) = send(app, get_request("/api/v1/dashboard")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dataSource"], "sample");
        assert_eq!(
            body["warning"],
            "Failed to fetch bookings: reservations API key is not configured"
        );
        assert_eq!(body["metrics"]["totalBookings"], 7);
    }

    #[tokio::test]
    async fn dashboard_rejects_malformed_range() {
        let app = router(test_state("http://127.0.0.1:9", None, None));
        let response = app
            .oneshot(get_request("/api/v1/dashboard?start=last-week"))
            .await
            .expect("request handled");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn ask_answers_over_filtered_bookings() {
        let base = spawn_upstream().await;
        let app = router(test_state(&base, Some("res-key"), Some("gem-key")));

        let (status, body) = send(
            app,
            post_json(
                "/api/v1/dashboard/ask",
                json!({ "question": "Who led February?", "start": "2024-02-01", "end": "2024-02-28" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["question"], "Who led February?");
        assert_eq!(body["answer"], "**Booking.com** led February");
        assert_eq!(body["answerHtml"], "<strong>Booking.com</strong> led February");
        assert_eq!(body["dataSource"], "live");
    }

    #[tokio::test]
    async fn ask_surfaces_insight_failure() {
        let base = spawn_upstream().await;
        let app = router(test_state(&base, Some("res-key"), Some("wrong")));

        let (status, body) = send(
            app,
            post_json("/api/v1/dashboard/ask", json!({ "question": "Anything?" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "API key not valid");
    }
}
