use serde_json::{json, Value};

use crate::marker::Marker;

/// GeoJSON `FeatureCollection` with one point feature per marker.
pub fn feature_collection<'a>(markers: impl IntoIterator<Item = &'a Marker>) -> Value {
    let features: Vec<Value> = markers.into_iter().map(feature).collect();
    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

fn feature(marker: &Marker) -> Value {
    let position = marker.position();
    json!({
        "type": "Feature",
        "id": marker.id().0,
        // GeoJSON positions are [longitude, latitude].
        "geometry": {
            "type": "Point",
            "coordinates": [position.lng, position.lat],
        },
        "properties": {
            "name": marker.name(),
            "category": marker.category().as_str(),
            "icon_url": marker.icon().url,
            "popup_html": marker.popup().html(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IconRegistry, MapController, SourceRow, VisibleSet};

    #[test]
    fn features_use_lng_lat_order() {
        let mut map = MapController::new(IconRegistry::default(), VisibleSet::default());
        map.ingest([SourceRow::from_pairs(
            2,
            [
                ("latitude", "37.8"),
                ("longitude", "-122.2"),
                ("name", "Spot A"),
                ("category", "Drinks"),
            ],
        )]);

        let collection = feature_collection(map.markers());
        assert_eq!(collection["type"], "FeatureCollection");
        let feature = &collection["features"][0];
        assert_eq!(feature["geometry"]["coordinates"], json!([-122.2, 37.8]));
        assert_eq!(feature["properties"]["category"], "drinks");
        assert_eq!(feature["properties"]["icon_url"], "liquid_marker.png");
    }
}
