//! Turns a spreadsheet export of points of interest into map markers and
//! keeps their visibility in step with the active category filter.

mod controller;
pub mod export;
mod icons;
mod marker;
mod popup;
mod record;
pub mod source;
mod surface;

pub use controller::{FilterOutcome, IngestReport, MapController, SkippedRow};
pub use icons::{Icon, IconRegistry};
pub use marker::Marker;
pub use popup::Popup;
pub use record::{PointOfInterest, SkipReason, SourceRow};
pub use source::{open_source, parse_rows, FileSource, HttpSource, RowSource, SourceError};
pub use surface::{MapSurface, VisibleSet};
