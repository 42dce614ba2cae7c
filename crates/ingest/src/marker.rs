use std::sync::Arc;

use shared::{
    domain::{CategoryTag, Coordinates, MarkerId},
    protocol::MarkerSummary,
};

use crate::{icons::Icon, popup::Popup};

#[derive(Debug, Clone)]
pub struct Marker {
    id: MarkerId,
    position: Coordinates,
    name: String,
    icon: Arc<Icon>,
    popup: Popup,
    category: CategoryTag,
}

impl Marker {
    pub(crate) fn new(
        id: MarkerId,
        position: Coordinates,
        name: String,
        icon: Arc<Icon>,
        popup: Popup,
        category: CategoryTag,
    ) -> Self {
        Self {
            id,
            position,
            name,
            icon,
            popup,
            category,
        }
    }

    pub fn id(&self) -> MarkerId {
        self.id
    }

    pub fn position(&self) -> Coordinates {
        self.position
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn icon(&self) -> &Arc<Icon> {
        &self.icon
    }

    pub fn popup(&self) -> &Popup {
        &self.popup
    }

    pub fn category(&self) -> &CategoryTag {
        &self.category
    }

    pub fn summary(&self, visible: bool) -> MarkerSummary {
        MarkerSummary {
            marker_id: self.id,
            position: self.position,
            name: self.name.clone(),
            category: self.category.clone(),
            icon_url: self.icon.url.clone(),
            popup_html: self.popup.html().to_string(),
            visible,
        }
    }
}
