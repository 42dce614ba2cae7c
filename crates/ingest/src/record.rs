use std::collections::HashMap;

use shared::domain::{CategoryTag, Coordinates};
use thiserror::Error;

pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const NAME: &str = "name";
pub const CATEGORY: &str = "category";
pub const DESCRIPTION: &str = "description";
pub const PRICE: &str = "price";
pub const ADDRESS: &str = "address";
pub const LINK: &str = "link";
pub const PRO_TIP: &str = "pro tip";

const UNNAMED: &str = "Unnamed";

/// One data row keyed by its (normalized) header names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRow {
    pub line: u64,
    pub cells: HashMap<String, String>,
}

impl SourceRow {
    pub fn new(line: u64, cells: HashMap<String, String>) -> Self {
        Self { line, cells }
    }

    pub fn from_pairs<'a>(line: u64, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let cells = pairs
            .into_iter()
            .map(|(column, value)| (column.to_string(), value.to_string()))
            .collect();
        Self { line, cells }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    fn text(&self, column: &str) -> String {
        self.get(column).map(str::trim).unwrap_or_default().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("missing latitude")]
    MissingLatitude,
    #[error("missing longitude")]
    MissingLongitude,
    #[error("latitude '{0}' is not a finite number")]
    InvalidLatitude(String),
    #[error("longitude '{0}' is not a finite number")]
    InvalidLongitude(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointOfInterest {
    pub coordinates: Coordinates,
    pub name: String,
    pub category: CategoryTag,
    pub description: String,
    pub price: String,
    pub address: String,
    pub external_link: String,
    pub pro_tip: String,
}

impl PointOfInterest {
    pub fn from_row(row: &SourceRow) -> Result<Self, SkipReason> {
        let lat = coordinate(row, LATITUDE, SkipReason::MissingLatitude, SkipReason::InvalidLatitude)?;
        let lng = coordinate(row, LONGITUDE, SkipReason::MissingLongitude, SkipReason::InvalidLongitude)?;

        let name = match row.text(NAME) {
            name if name.is_empty() => UNNAMED.to_string(),
            name => name,
        };

        Ok(Self {
            coordinates: Coordinates::new(lat, lng),
            name,
            category: CategoryTag::from_source(row.get(CATEGORY)),
            description: row.text(DESCRIPTION),
            price: row.text(PRICE),
            address: row.text(ADDRESS),
            external_link: row.text(LINK),
            pro_tip: row.text(PRO_TIP),
        })
    }
}

fn coordinate(
    row: &SourceRow,
    column: &str,
    missing: SkipReason,
    invalid: fn(String) -> SkipReason,
) -> Result<f64, SkipReason> {
    let raw = row.get(column).map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(missing);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(invalid(raw.to_string())),
    }
}

#[cfg(test)]
#[path = "tests/record_tests.rs"]
mod tests;
