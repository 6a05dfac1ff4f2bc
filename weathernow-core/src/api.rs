//! HTTP API
//!
//! - `POST /api/ai`: answer a question about a snapshot (`AskRequest` → `AskResponse`)
//! - `GET /api/weather?city=`: look up a city and return its snapshot

use anyhow::Context;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::{
    assistant::FallbackChain,
    model::{AskRequest, AskResponse, Snapshot},
    provider::{LookupError, WeatherProvider},
};

/// Shared, read-only state for handlers.
#[derive(Debug)]
pub struct AppState {
    pub provider: Box<dyn WeatherProvider>,
    pub chain: FallbackChain,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid JSON body")]
    InvalidBody(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Weather service error")]
    Upstream(String),

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InvalidBody(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> Option<&str> {
        match self {
            ApiError::InvalidBody(d) | ApiError::Upstream(d) | ApiError::Internal(d) => Some(d),
            _ => None,
        }
    }

    fn from_lookup(err: anyhow::Error) -> Self {
        match err.downcast_ref::<LookupError>() {
            Some(LookupError::EmptyCity) => ApiError::BadRequest(err.to_string()),
            Some(LookupError::CityNotFound(_)) => ApiError::NotFound(err.to_string()),
            None => ApiError::Upstream(format!("{err:#}")),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.detail() {
            Some(detail) => json!({ "error": self.to_string(), "detail": detail }),
            None => json!({ "error": self.to_string() }),
        };
        (self.status(), Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/ai", post(ask).fallback(method_not_allowed))
        .route("/api/weather", get(weather).fallback(method_not_allowed))
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(state: AppState, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {err}");
    }
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn ask(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AskResponse>, ApiError> {
    let request = AskRequest::from_slice(&body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;

    let answered = state.chain.ask(&request).await.map_err(|err| {
        error!("Answering failed: {err:#}");
        ApiError::Internal(format!("{err:#}"))
    })?;

    Ok(Json(AskResponse { answer: answered.answer }))
}

#[derive(Debug, Deserialize)]
struct WeatherQuery {
    city: Option<String>,
}

async fn weather(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<Snapshot>, ApiError> {
    let city = query.city.unwrap_or_default();
    let snapshot = state.provider.snapshot(&city).await.map_err(ApiError::from_lookup)?;
    Ok(Json(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assistant::{AnswerBackend, BackendId},
        model::{Place, WeatherReading},
    };
    use anyhow::anyhow;
    use async_trait::async_trait;
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    #[derive(Debug)]
    struct StaticProvider;

    #[async_trait]
    impl WeatherProvider for StaticProvider {
        async fn snapshot(&self, city: &str) -> anyhow::Result<Snapshot> {
            match city.trim() {
                "" => Err(LookupError::EmptyCity.into()),
                "Paris" => Ok(Snapshot {
                    place: Place::new("Paris", Some("France".into())),
                    weather: WeatherReading {
                        temperature: Some(3.0),
                        wind_speed: Some(10.0),
                        condition_code: Some(61),
                        observed_at: Some("2024-07-15T14:00".into()),
                    },
                }),
                "Offline" => Err(anyhow!("connection reset")),
                other => Err(LookupError::CityNotFound(other.to_string()).into()),
            }
        }
    }

    #[derive(Debug)]
    struct Broken;

    #[async_trait]
    impl AnswerBackend for Broken {
        fn id(&self) -> BackendId {
            BackendId::Remote
        }

        async fn ask(&self, _request: &AskRequest) -> anyhow::Result<String> {
            Err(anyhow!("upstream exploded"))
        }
    }

    fn app() -> Router {
        router(AppState { provider: Box::new(StaticProvider), chain: FallbackChain::rules_only() })
    }

    async fn send(app: Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn ask_returns_rule_based_answer() {
        let body = json!({
            "place": { "name": "Paris", "country": "France" },
            "weather": { "temperature": 3, "windspeed": 10, "weathercode": 61 },
            "question": "Should I take an umbrella?"
        });

        let (status, value) = send(app(), "POST", "/api/ai", &body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert!(value["answer"].as_str().unwrap().contains("umbrella"));
    }

    #[tokio::test]
    async fn ask_with_empty_body_summarizes_unknowns() {
        let (status, value) = send(app(), "POST", "/api/ai", "").await;

        assert_eq!(status, StatusCode::OK);
        assert!(
            value["answer"]
                .as_str()
                .unwrap()
                .starts_with("Currently in the location: temperature unknown, unknown.")
        );
    }

    #[tokio::test]
    async fn ask_with_non_object_body_summarizes_unknowns() {
        for body in ["null", "[]", "\"hello\"", "42"] {
            let (status, value) = send(app(), "POST", "/api/ai", body).await;

            assert_eq!(status, StatusCode::OK, "body {body}");
            assert!(
                value["answer"]
                    .as_str()
                    .unwrap()
                    .starts_with("Currently in the location: temperature unknown, unknown."),
                "body {body}"
            );
        }
    }

    #[tokio::test]
    async fn ask_stringifies_array_questions() {
        let body = json!({
            "place": { "name": "Paris" },
            "weather": { "temperature": 3, "weathercode": 61 },
            "question": ["rain"]
        });

        let (status, value) = send(app(), "POST", "/api/ai", &body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert!(value["answer"].as_str().unwrap().contains("umbrella"));
    }

    #[tokio::test]
    async fn ask_rejects_other_methods() {
        let (status, value) = send(app(), "GET", "/api/ai", "").await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(value, json!({ "error": "Method not allowed" }));
    }

    #[tokio::test]
    async fn ask_rejects_malformed_json() {
        let (status, value) = send(app(), "POST", "/api/ai", "{ nope").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["error"], "Invalid JSON body");
        assert!(value["detail"].is_string());
    }

    #[tokio::test]
    async fn ask_reports_internal_failure_with_detail() {
        let app = router(AppState {
            provider: Box::new(StaticProvider),
            chain: FallbackChain::new(vec![Box::new(Broken)]),
        });

        let (status, value) = send(app, "POST", "/api/ai", "{}").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(value["error"], "Internal server error");
        assert!(value["detail"].as_str().unwrap().contains("upstream exploded"));
    }

    #[tokio::test]
    async fn weather_returns_snapshot() {
        let (status, value) = send(app(), "GET", "/api/weather?city=Paris", "").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["place"]["name"], "Paris");
        assert_eq!(value["weather"]["weathercode"], 61);
    }

    #[tokio::test]
    async fn weather_maps_lookup_errors() {
        let (status, value) = send(app(), "GET", "/api/weather?city=Atlantis", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(value["error"], "City not found: Atlantis");

        let (status, _) = send(app(), "GET", "/api/weather", "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, value) = send(app(), "GET", "/api/weather?city=Offline", "").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(value["detail"].as_str().unwrap().contains("connection reset"));

        let (status, _) = send(app(), "DELETE", "/api/weather?city=Paris", "").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
