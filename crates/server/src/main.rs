use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        ws::{Message, WebSocket},
        Path, Query, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use futures::{Sink, SinkExt, StreamExt};
use ingest::{open_source, IconRegistry, RowSource};
use serde::{de, Deserialize, Deserializer};
use shared::{
    domain::MarkerId,
    error::{ApiError, ErrorCode},
    protocol::{FilterRequest, FilterState, MapViewResponse, MarkerSummary, ServerEvent},
};
use tokio::sync::broadcast::{self, error::RecvError};
use tower_http::{limit::RequestBodyLimitLayer, services::ServeDir};
use tracing::{info, warn};

mod api;
mod app_state;
mod config;

use api::{MapContext, MapView};
use app_state::AppState;
use config::load_settings;

const MAX_REQUEST_BYTES: usize = 16 * 1024;

#[derive(Debug, Deserialize)]
struct MarkersQuery {
    #[serde(default, deserialize_with = "flag")]
    visible: bool,
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        other => Err(de::Error::custom(format!("invalid flag '{other}'"))),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let source = open_source(&settings.data_source)?;

    let api = MapContext::new(
        IconRegistry::with_base_url(&settings.icon_base_url),
        MapView::from(&settings.map),
    );
    let (events, _) = broadcast::channel(256);
    let state = Arc::new(AppState { api, events });

    tokio::spawn(load_in_background(Arc::clone(&state), source));

    let app = build_router(Arc::clone(&state), settings.static_dir.as_deref());
    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, source = %settings.data_source, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Runs once at startup. Routes are live before it finishes, so filters can be
/// applied while the map is still empty.
async fn load_in_background(state: Arc<AppState>, source: Box<dyn RowSource>) {
    let event = api::load_source(&state.api, source.as_ref()).await;
    let _ = state.events.send(event);
}

fn build_router(state: Arc<AppState>, static_dir: Option<&str>) -> Router {
    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/map", get(http_map_view))
        .route("/markers", get(http_list_markers))
        .route("/markers.geojson", get(http_markers_geojson))
        .route("/markers/:marker_id", get(http_get_marker))
        .route("/filter", get(http_filter_state).post(http_apply_filter))
        .route("/ws", get(ws_handler))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BYTES))
        .with_state(state);

    match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_map_view(State(state): State<Arc<AppState>>) -> Json<MapViewResponse> {
    Json(api::map_view(&state.api).await)
}

async fn http_list_markers(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MarkersQuery>, QueryRejection>,
) -> Result<Json<Vec<MarkerSummary>>, (StatusCode, Json<ApiError>)> {
    let Query(q) = query.map_err(|rejection| validation_error(rejection.body_text()))?;
    Ok(Json(api::list_markers(&state.api, q.visible).await))
}

async fn http_get_marker(
    State(state): State<Arc<AppState>>,
    marker_id: Result<Path<u64>, PathRejection>,
) -> Result<Json<MarkerSummary>, (StatusCode, Json<ApiError>)> {
    let Path(marker_id) = marker_id.map_err(|rejection| validation_error(rejection.body_text()))?;
    let marker = api::get_marker(&state.api, MarkerId(marker_id))
        .await
        .map_err(error_response)?;
    Ok(Json(marker))
}

async fn http_markers_geojson(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(api::visible_geojson(&state.api).await)
}

async fn http_filter_state(State(state): State<Arc<AppState>>) -> Json<FilterState> {
    Json(api::filter_state(&state.api).await)
}

async fn http_apply_filter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FilterRequest>,
) -> Result<Json<ServerEvent>, (StatusCode, Json<ApiError>)> {
    let event = api::apply_filter(&state.api, &req.category)
        .await
        .map_err(error_response)?;
    let _ = state.events.send(event.clone());
    Ok(Json(event))
}

fn error_response(error: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match error.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
    };
    (status, Json(error))
}

fn validation_error(message: String) -> (StatusCode, Json<ApiError>) {
    error_response(ApiError::new(ErrorCode::Validation, message))
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| ws_connection(state, socket))
}

async fn ws_connection(state: Arc<AppState>, socket: WebSocket) {
    let (sender, mut receiver) = socket.split();
    let send_task = tokio::spawn(forward_events(state.events.subscribe(), sender));

    while let Some(Ok(_msg)) = receiver.next().await {}

    send_task.abort();
}

/// Relays broadcast events to one client until the channel closes or the
/// client stops accepting messages. A lagging client skips the events it
/// missed and keeps receiving.
async fn forward_events<S>(mut events_rx: broadcast::Receiver<ServerEvent>, mut sink: S)
where
    S: Sink<Message> + Unpin,
{
    loop {
        let event = match events_rx.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "websocket client lagged behind the event stream");
                continue;
            }
            Err(RecvError::Closed) => break,
        };
        let text = match serde_json::to_string(&event) {
            Ok(v) => v,
            Err(_) => continue,
        };
        if sink.send(Message::Text(text)).await.is_err() {
            break;
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
