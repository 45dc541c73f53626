use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::static_files::{render_page, serve_asset};
use crate::config::FrontendConfig;
use crate::models::StringCount;
use crate::storage::HitStore;
use crate::tracking::{AggregateError, Aggregator, HitRecorder, Identity};

/// 1x1 transparent GIF returned by every beacon request.
pub const TRACKER_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xff, 0xff, 0xff, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x01, 0x44, 0x00, 0x3b,
];

/// Client id used by the demo page.
const EXAMPLE_CLIENT_ID: &str = "example.com";

pub struct AppState {
    pub recorder: HitRecorder,
    pub aggregator: Aggregator,
    pub frontend: FrontendConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn HitStore>, store_timeout: Duration, frontend: FrontendConfig) -> Self {
        Self {
            recorder: HitRecorder::new(Arc::clone(&store), store_timeout),
            aggregator: Aggregator::new(store, store_timeout),
            frontend,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct UniquesResponse {
    pub uniques: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct BeaconParams {
    #[serde(default)]
    pub page: String,
    #[serde(default)]
    pub referer: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Record a pageview and answer with the tracking pixel.
///
/// The response is the same whether or not the hit was stored.
pub async fn tracker(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
    params: Result<Query<BeaconParams>, QueryRejection>,
    headers: HeaderMap,
) -> Response {
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            tracing::debug!(client_id = %client_id, error = %rejection, "ignoring malformed beacon query");
            BeaconParams::default()
        }
    };

    let identity = Identity::resolve(&headers);

    state
        .recorder
        .record(&client_id, &identity.user_id, &params.page, &params.referer)
        .await;

    let mut response = ([(header::CONTENT_TYPE, "image/gif")], TRACKER_GIF).into_response();
    if let Some(cookie) = identity.set_cookie() {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}

/// Number of distinct visitors for a client site
pub async fn uniques(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
) -> Result<Json<UniquesResponse>, ApiError> {
    state
        .aggregator
        .uniques(&client_id)
        .await
        .map(|uniques| Json(UniquesResponse { uniques }))
        .map_err(|e| read_failure(&client_id, "uniques", e))
}

/// Top referers for a client site
pub async fn referers(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
) -> Result<Json<Vec<StringCount>>, ApiError> {
    state
        .aggregator
        .top_referers(&client_id)
        .await
        .map(Json)
        .map_err(|e| read_failure(&client_id, "referers", e))
}

/// Top pages for a client site
pub async fn pages(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
) -> Result<Json<Vec<StringCount>>, ApiError> {
    state
        .aggregator
        .top_pages(&client_id)
        .await
        .map(Json)
        .map_err(|e| read_failure(&client_id, "pages", e))
}

/// Dashboard page for a client site
pub async fn dash(State(state): State<Arc<AppState>>, Path(client_id): Path<String>) -> Response {
    render_page("dash.html", &client_id, state.frontend.static_dir.as_deref()).await
}

/// Demo page embedding the tracker
pub async fn example(State(state): State<Arc<AppState>>) -> Response {
    render_page(
        "example.html",
        EXAMPLE_CLIENT_ID,
        state.frontend.static_dir.as_deref(),
    )
    .await
}

pub async fn scripts(State(state): State<Arc<AppState>>, Path(path): Path<String>) -> Response {
    serve_asset(
        &format!("scripts/{path}"),
        state.frontend.static_dir.as_deref(),
    )
    .await
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    #[derive(Serialize)]
    struct HealthResponse {
        status: String,
    }

    Json(HealthResponse {
        status: "OK".to_string(),
    })
}

pub async fn not_found() -> Response {
    super::static_files::not_found()
}

fn read_failure(client_id: &str, view: &str, err: AggregateError) -> ApiError {
    tracing::error!(client_id = %client_id, view, error = %err, "failed to compute aggregate");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: format!("Failed to retrieve {view}"),
        }),
    )
}
