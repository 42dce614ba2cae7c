use std::collections::BTreeSet;

use shared::domain::MarkerId;

use crate::marker::Marker;

/// The map widget markers are drawn on. Adding a marker that is already
/// present, or removing one that is absent, must be a no-op.
pub trait MapSurface {
    fn add_layer(&mut self, marker: &Marker);
    fn remove_layer(&mut self, id: MarkerId);
    fn has_layer(&self, id: MarkerId) -> bool;
}

/// In-process surface that only tracks which markers are on the map.
#[derive(Debug, Clone, Default)]
pub struct VisibleSet {
    ids: BTreeSet<MarkerId>,
}

impl VisibleSet {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = MarkerId> + '_ {
        self.ids.iter().copied()
    }
}

impl MapSurface for VisibleSet {
    fn add_layer(&mut self, marker: &Marker) {
        self.ids.insert(marker.id());
    }

    fn remove_layer(&mut self, id: MarkerId) {
        self.ids.remove(&id);
    }

    fn has_layer(&self, id: MarkerId) -> bool {
        self.ids.contains(&id)
    }
}
