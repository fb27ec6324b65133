//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, Uri, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tower_http::services::ServeDir;
use tracing::error;

use crate::map::MapView;
use crate::page::{PageError, build_map, build_page};

use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/api/map", get(map_json))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Reconstruct the URL the client used to reach this page.
///
/// Prefers the configured public base URL, then the `Host` header, then
/// the server's own bind address.
pub fn page_url(state: &AppState, headers: &HeaderMap, uri: &Uri) -> String {
    let path = uri.path_and_query().map_or("/", |pq| pq.as_str());

    if let Some(base) = &state.public_url {
        return format!("{base}{path}");
    }

    match headers.get(header::HOST).and_then(|v| v.to_str().ok()) {
        Some(host) => format!("http://{host}{path}"),
        None => format!("http://{}{path}", state.bind_addr),
    }
}

/// The map page: fetch readings, draw the map, generate the QR code.
///
/// Any failure renders the error page instead; the map and QR containers
/// are never emitted for a failed load.
async fn index_page(State(state): State<AppState>, headers: HeaderMap, uri: Uri) -> Response {
    let url = page_url(&state, &headers, &uri);

    let page = match build_page(state.source.as_ref(), &state.map, &url).await {
        Ok(page) => page,
        Err(e) => return error_page(&e),
    };

    let rendered = IndexTemplate::from_page(&page)
        .map_err(|e| e.to_string())
        .and_then(|t| t.render().map_err(|e| e.to_string()));

    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(message) => {
            error!(%message, "failed to render index page");
            render_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong",
                "The map page could not be rendered.",
                Some(message),
            )
        }
    }
}

/// The map view as JSON.
async fn map_json(State(state): State<AppState>) -> Result<Json<MapView>, AppError> {
    let map = build_map(state.source.as_ref(), &state.map).await?;
    Ok(Json(map))
}

/// Render a page failure into the status element.
fn error_page(err: &PageError) -> Response {
    error!(error = %err, "page load failed");

    match err {
        PageError::Fetch(_) => render_error(
            StatusCode::BAD_GATEWAY,
            "Air quality data unavailable",
            "Could not load the latest AQHI readings. Try again later.",
            Some(err.to_string()),
        ),
        PageError::Map(_) | PageError::Qr(_) => render_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Something went wrong",
            "The map page could not be rendered.",
            Some(err.to_string()),
        ),
    }
}

fn render_error(status: StatusCode, title: &str, message: &str, details: Option<String>) -> Response {
    let template = ErrorTemplate {
        title: title.to_string(),
        message: message.to_string(),
        details,
    };
    let html = template
        .render()
        .unwrap_or_else(|e| format!("Template error: {}", e));

    (status, Html(html)).into_response()
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadGateway { message: String },
    Internal { message: String },
}

impl From<PageError> for AppError {
    fn from(e: PageError) -> Self {
        match e {
            PageError::Fetch(_) => AppError::BadGateway {
                message: e.to_string(),
            },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        error!(%status, %message, "request failed");

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::SocketAddr;

    use futures::future::BoxFuture;

    use crate::aqhi::{AqhiError, StationReading, StationSource};
    use crate::map::MapConfig;

    struct StaticSource(Vec<StationReading>);

    impl StationSource for StaticSource {
        fn fetch_stations(&self) -> BoxFuture<'_, Result<Vec<StationReading>, AqhiError>> {
            Box::pin(async move { Ok(self.0.clone()) })
        }
    }

    struct FailingSource;

    impl StationSource for FailingSource {
        fn fetch_stations(&self) -> BoxFuture<'_, Result<Vec<StationReading>, AqhiError>> {
            Box::pin(async {
                Err(AqhiError::Api {
                    status: 500,
                    message: "upstream exploded".to_string(),
                })
            })
        }
    }

    fn bind_addr() -> SocketAddr {
        "127.0.0.1:3000".parse().unwrap()
    }

    fn readings() -> Vec<StationReading> {
        vec![
            StationReading::new("Edmonton East")
                .with_position(53.548, -113.368)
                .with_aqhi(4.0),
            StationReading::new("Red Deer")
                .with_position(52.268, -113.811)
                .with_aqhi(7.0),
            StationReading::new("Portable Unit").with_aqhi(2.0),
        ]
    }

    async fn serve(state: AppState) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = create_router(state, "static");
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn page_url_prefers_public_url() {
        let state = AppState::new(StaticSource(vec![]), MapConfig::default(), bind_addr())
            .with_public_url("https://aqhi.example.org/");
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, "internal:8080".parse().unwrap());
        let uri: Uri = "/?lang=fr".parse().unwrap();

        assert_eq!(
            page_url(&state, &headers, &uri),
            "https://aqhi.example.org/?lang=fr"
        );
    }

    #[test]
    fn page_url_uses_host_header() {
        let state = AppState::new(StaticSource(vec![]), MapConfig::default(), bind_addr());
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, "aqhi.local:3000".parse().unwrap());
        let uri: Uri = "/".parse().unwrap();

        assert_eq!(page_url(&state, &headers, &uri), "http://aqhi.local:3000/");
    }

    #[test]
    fn page_url_falls_back_to_bind_addr() {
        let state = AppState::new(StaticSource(vec![]), MapConfig::default(), bind_addr());
        let uri: Uri = "/".parse().unwrap();

        assert_eq!(
            page_url(&state, &HeaderMap::new(), &uri),
            "http://127.0.0.1:3000/"
        );
    }

    #[tokio::test]
    async fn health_check() {
        let state = AppState::new(StaticSource(vec![]), MapConfig::default(), bind_addr());
        let base = serve(state).await;

        let body = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn index_renders_map_and_qr() {
        let state = AppState::new(StaticSource(readings()), MapConfig::default(), bind_addr())
            .with_public_url("https://aqhi.example.org");
        let base = serve(state).await;

        let response = reqwest::get(format!("{base}/?station=edmonton"))
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body = response.text().await.unwrap();

        assert!(body.contains("id=\"map\" data-map="));
        assert!(body.contains("id=\"qr-code\""));
        assert!(body.contains("<img src=\"data:image/svg+xml;base64,"));
        assert!(body.contains("2 of 3 stations mapped"));
        assert!(body.contains("aqhi.example.org"));
        assert!(body.contains("station=edmonton"));
        assert!(!body.contains("id=\"status\""));
    }

    #[tokio::test]
    async fn legend_matches_tier_thresholds() {
        let state = AppState::new(StaticSource(readings()), MapConfig::default(), bind_addr());
        let base = serve(state).await;

        let body = reqwest::get(format!("{base}/")).await.unwrap().text().await.unwrap();

        assert!(body.contains("&le;3 Low risk"));
        assert!(body.contains("&gt;3&ndash;6 Moderate risk"));
        assert!(body.contains("&gt;6 High risk"));
    }

    #[tokio::test]
    async fn index_with_empty_feed() {
        let state = AppState::new(StaticSource(vec![]), MapConfig::default(), bind_addr());
        let base = serve(state).await;

        let response = reqwest::get(format!("{base}/")).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body = response.text().await.unwrap();

        assert!(body.contains("0 of 0 stations mapped"));
        assert!(body.contains("53.5461"));
        assert!(body.contains("-113.4938"));
    }

    #[tokio::test]
    async fn failed_fetch_renders_status_only() {
        let state = AppState::new(FailingSource, MapConfig::default(), bind_addr());
        let base = serve(state).await;

        let response = reqwest::get(format!("{base}/")).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_GATEWAY);
        let body = response.text().await.unwrap();

        assert!(body.contains("id=\"status\""));
        assert!(body.contains("Air quality data unavailable"));
        assert!(!body.contains("id=\"map\""));
        assert!(!body.contains("id=\"qr-code\""));
    }

    #[tokio::test]
    async fn api_map_returns_markers() {
        let state = AppState::new(StaticSource(readings()), MapConfig::default(), bind_addr());
        let base = serve(state).await;

        let json: serde_json::Value = reqwest::get(format!("{base}/api/map"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(json["zoom"], 10);
        let markers = json["markers"].as_array().unwrap();
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0]["color"], "orange");
        assert_eq!(markers[0]["radius"], 4000.0);
        assert_eq!(markers[1]["color"], "red");
        assert_eq!(markers[1]["radius"], 7000.0);
    }

    #[tokio::test]
    async fn api_map_failure_is_bad_gateway() {
        let state = AppState::new(FailingSource, MapConfig::default(), bind_addr());
        let base = serve(state).await;

        let response = reqwest::get(format!("{base}/api/map")).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_GATEWAY);

        let json: serde_json::Value = response.json().await.unwrap();
        assert!(json["error"].as_str().unwrap().contains("upstream exploded"));
    }
}
