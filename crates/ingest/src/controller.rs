use shared::{
    domain::{ActiveFilter, MarkerId},
    protocol::{MarkerSummary, SkippedRowSummary},
};
use tracing::{debug, info};

use crate::{
    icons::IconRegistry,
    marker::Marker,
    popup::Popup,
    record::{PointOfInterest, SkipReason, SourceRow},
    surface::MapSurface,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: SkipReason,
}

impl From<&SkippedRow> for SkippedRowSummary {
    fn from(value: &SkippedRow) -> Self {
        Self {
            line: value.line,
            reason: value.reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub added: Vec<MarkerId>,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    pub active: ActiveFilter,
    pub shown: Vec<MarkerId>,
    pub hidden: Vec<MarkerId>,
}

/// Owns the marker collection, the active filter and the surface the markers
/// are drawn on. Markers are only ever appended; after creation the only thing
/// that changes is whether they are on the surface.
pub struct MapController<S: MapSurface> {
    icons: IconRegistry,
    markers: Vec<Marker>,
    active: ActiveFilter,
    surface: S,
    next_id: u64,
}

impl<S: MapSurface> MapController<S> {
    pub fn new(icons: IconRegistry, surface: S) -> Self {
        Self {
            icons,
            markers: Vec::new(),
            active: ActiveFilter::All,
            surface,
            next_id: 1,
        }
    }

    /// Turns every row with usable coordinates into a marker. Rows without
    /// them are reported back and otherwise ignored.
    pub fn ingest<I>(&mut self, rows: I) -> IngestReport
    where
        I: IntoIterator<Item = SourceRow>,
    {
        let mut report = IngestReport::default();

        for row in rows {
            let poi = match PointOfInterest::from_row(&row) {
                Ok(poi) => poi,
                Err(reason) => {
                    debug!(line = row.line, %reason, "skipping row");
                    report.skipped.push(SkippedRow {
                        line: row.line,
                        reason,
                    });
                    continue;
                }
            };
            report.added.push(self.push_marker(poi));
        }

        info!(
            added = report.added.len(),
            skipped = report.skipped.len(),
            total = self.markers.len(),
            "ingested source rows"
        );
        report
    }

    fn push_marker(&mut self, poi: PointOfInterest) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;

        let icon = self.icons.resolve(&poi.category);
        let popup = Popup::render(&poi);
        let marker = Marker::new(id, poi.coordinates, poi.name, icon, popup, poi.category);

        if self.active.admits(marker.category()) {
            self.surface.add_layer(&marker);
        }
        self.markers.push(marker);
        id
    }

    pub fn apply_filter(&mut self, filter: ActiveFilter) -> FilterOutcome {
        self.active = filter;
        let mut outcome = FilterOutcome {
            active: filter,
            shown: Vec::new(),
            hidden: Vec::new(),
        };

        for marker in &self.markers {
            if filter.admits(marker.category()) {
                self.surface.add_layer(marker);
                outcome.shown.push(marker.id());
            } else {
                self.surface.remove_layer(marker.id());
                outcome.hidden.push(marker.id());
            }
        }

        debug!(
            %filter,
            shown = outcome.shown.len(),
            hidden = outcome.hidden.len(),
            "applied filter"
        );
        outcome
    }

    pub fn active_filter(&self) -> ActiveFilter {
        self.active
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn marker(&self, id: MarkerId) -> Option<&Marker> {
        // Ids are handed out in ascending order, so the collection stays sorted.
        self.markers
            .binary_search_by_key(&id, Marker::id)
            .ok()
            .map(|index| &self.markers[index])
    }

    pub fn is_visible(&self, id: MarkerId) -> bool {
        self.surface.has_layer(id)
    }

    pub fn visible_markers(&self) -> impl Iterator<Item = &Marker> + '_ {
        self.markers
            .iter()
            .filter(|marker| self.surface.has_layer(marker.id()))
    }

    pub fn summaries(&self, visible_only: bool) -> Vec<MarkerSummary> {
        self.markers
            .iter()
            .map(|marker| (marker, self.is_visible(marker.id())))
            .filter(|(_, visible)| *visible || !visible_only)
            .map(|(marker, visible)| marker.summary(visible))
            .collect()
    }

    pub fn icons(&self) -> &IconRegistry {
        &self.icons
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
