use std::sync::Arc;

use chrono::Utc;
use ingest::{export, IconRegistry, MapController, RowSource, VisibleSet};
use shared::{
    domain::{ActiveFilter, Coordinates, MarkerId},
    error::ApiError,
    protocol::{
        FilterState, MapViewResponse, MarkerSummary, ServerEvent, SkippedRowSummary,
        TileLayerSummary,
    },
};
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::config::MapSettings;

#[derive(Debug, Clone)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub tile_layer: TileLayerSummary,
}

impl From<&MapSettings> for MapView {
    fn from(settings: &MapSettings) -> Self {
        Self {
            center: Coordinates::new(settings.center[0], settings.center[1]),
            zoom: settings.zoom,
            tile_layer: TileLayerSummary {
                url_template: settings.tile_url.clone(),
                attribution: settings.tile_attribution.clone(),
                subdomains: settings.tile_subdomains.clone(),
                max_zoom: settings.tile_max_zoom,
            },
        }
    }
}

#[derive(Clone)]
pub struct MapContext {
    pub map: Arc<Mutex<MapController<VisibleSet>>>,
    pub view: MapView,
}

impl MapContext {
    pub fn new(icons: IconRegistry, view: MapView) -> Self {
        Self {
            map: Arc::new(Mutex::new(MapController::new(icons, VisibleSet::default()))),
            view,
        }
    }
}

pub async fn map_view(ctx: &MapContext) -> MapViewResponse {
    let map = ctx.map.lock().await;
    MapViewResponse {
        center: ctx.view.center,
        zoom: ctx.view.zoom,
        tile_layer: ctx.view.tile_layer.clone(),
        icons: map.icons().summaries(),
        filters: ActiveFilter::controls().collect(),
        active_filter: map.active_filter(),
    }
}

pub async fn list_markers(ctx: &MapContext, visible_only: bool) -> Vec<MarkerSummary> {
    ctx.map.lock().await.summaries(visible_only)
}

pub async fn get_marker(ctx: &MapContext, marker_id: MarkerId) -> Result<MarkerSummary, ApiError> {
    let map = ctx.map.lock().await;
    map.marker(marker_id)
        .map(|marker| marker.summary(map.is_visible(marker_id)))
        .ok_or_else(|| ApiError::not_found(format!("marker {} not found", marker_id.0)))
}

pub async fn visible_geojson(ctx: &MapContext) -> serde_json::Value {
    let map = ctx.map.lock().await;
    export::feature_collection(map.visible_markers())
}

pub async fn filter_state(ctx: &MapContext) -> FilterState {
    let map = ctx.map.lock().await;
    FilterState {
        active: map.active_filter(),
        visible: map.surface().len(),
        total: map.markers().len(),
    }
}

/// Parses a filter control value and applies it to every marker.
pub async fn apply_filter(ctx: &MapContext, raw: &str) -> Result<ServerEvent, ApiError> {
    let filter: ActiveFilter = raw.parse().map_err(ApiError::from)?;
    let outcome = ctx.map.lock().await.apply_filter(filter);
    info!(
        %filter,
        shown = outcome.shown.len(),
        hidden = outcome.hidden.len(),
        "filter applied"
    );
    Ok(ServerEvent::FilterApplied {
        active: outcome.active,
        shown: outcome.shown,
        hidden: outcome.hidden,
    })
}

/// Fetches the whole source, then ingests it. Nothing is appended when the
/// fetch or parse fails.
pub async fn load_source(ctx: &MapContext, source: &dyn RowSource) -> ServerEvent {
    let rows = match source.fetch_rows().await {
        Ok(rows) => rows,
        Err(err) => {
            let message = error_chain(&err);
            error!(source = %source.describe(), error = %message, "failed to load source");
            return ServerEvent::SourceFailed {
                source: source.describe(),
                message,
            };
        }
    };

    let report = ctx.map.lock().await.ingest(rows);
    ServerEvent::MarkersLoaded {
        added: report.added.len(),
        skipped: report.skipped.iter().map(SkippedRowSummary::from).collect(),
        loaded_at: Utc::now(),
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        cause = inner.source();
    }
    message
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
