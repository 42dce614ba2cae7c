use super::*;
use shared::domain::Category;

#[test]
fn normalizes_text_fields_and_defaults_name() {
    let row = SourceRow::from_pairs(
        2,
        [
            ("latitude", " 37.8 "),
            ("longitude", "-122.2"),
            ("name", "   "),
            ("category", " Drinks"),
            ("price", " $$ "),
            ("pro tip", " go early "),
        ],
    );

    let poi = PointOfInterest::from_row(&row).expect("poi");
    assert_eq!(poi.coordinates, Coordinates::new(37.8, -122.2));
    assert_eq!(poi.name, "Unnamed");
    assert_eq!(poi.category, CategoryTag::Known(Category::Drinks));
    assert_eq!(poi.price, "$$");
    assert_eq!(poi.pro_tip, "go early");
    assert_eq!(poi.description, "");
    assert_eq!(poi.address, "");
    assert_eq!(poi.external_link, "");
}

#[test]
fn empty_or_absent_coordinates_are_skipped() {
    let empty_lat = SourceRow::from_pairs(2, [("latitude", ""), ("longitude", "-122.2")]);
    assert_eq!(
        PointOfInterest::from_row(&empty_lat),
        Err(SkipReason::MissingLatitude)
    );

    let no_lng = SourceRow::from_pairs(3, [("latitude", "37.8")]);
    assert_eq!(
        PointOfInterest::from_row(&no_lng),
        Err(SkipReason::MissingLongitude)
    );
}

#[test]
fn non_numeric_coordinates_are_skipped() {
    let row = SourceRow::from_pairs(4, [("latitude", "abc"), ("longitude", "-122.2")]);
    assert_eq!(
        PointOfInterest::from_row(&row),
        Err(SkipReason::InvalidLatitude("abc".into()))
    );

    let row = SourceRow::from_pairs(5, [("latitude", "37.8"), ("longitude", "inf")]);
    assert_eq!(
        PointOfInterest::from_row(&row),
        Err(SkipReason::InvalidLongitude("inf".into()))
    );
}

#[test]
fn absent_category_uses_fallback_tag() {
    let row = SourceRow::from_pairs(6, [("latitude", "37.8"), ("longitude", "-122.2")]);
    let poi = PointOfInterest::from_row(&row).expect("poi");
    assert_eq!(poi.category, CategoryTag::Known(Category::Food));
}
