use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ActiveFilter, Category, CategoryTag, Coordinates, MarkerId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconSummary {
    pub category: Category,
    pub url: String,
    pub size: [u32; 2],
    pub anchor: [i32; 2],
    pub popup_anchor: [i32; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileLayerSummary {
    pub url_template: String,
    pub attribution: String,
    pub subdomains: String,
    pub max_zoom: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapViewResponse {
    pub center: Coordinates,
    pub zoom: u8,
    pub tile_layer: TileLayerSummary,
    pub icons: Vec<IconSummary>,
    pub filters: Vec<ActiveFilter>,
    pub active_filter: ActiveFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerSummary {
    pub marker_id: MarkerId,
    pub position: Coordinates,
    pub name: String,
    pub category: CategoryTag,
    pub icon_url: String,
    pub popup_html: String,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRequest {
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterState {
    pub active: ActiveFilter,
    pub visible: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedRowSummary {
    pub line: u64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerEvent {
    MarkersLoaded {
        added: usize,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        skipped: Vec<SkippedRowSummary>,
        loaded_at: DateTime<Utc>,
    },
    FilterApplied {
        active: ActiveFilter,
        shown: Vec<MarkerId>,
        hidden: Vec<MarkerId>,
    },
    SourceFailed {
        source: String,
        message: String,
    },
}
