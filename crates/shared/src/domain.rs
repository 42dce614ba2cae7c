use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ApiException, ErrorCode};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);
    };
}

id_newtype!(MarkerId);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// The closed set of categories a point of interest can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "food")]
    Food,
    #[serde(rename = "drinks")]
    Drinks,
    #[serde(rename = "objects dept")]
    ObjectsDept,
    #[serde(rename = "aesthetic moments")]
    AestheticMoments,
    #[serde(rename = "touch grass")]
    TouchGrass,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Drinks,
        Category::ObjectsDept,
        Category::AestheticMoments,
        Category::TouchGrass,
    ];

    /// Category whose icon stands in for missing or unlisted categories.
    pub const FALLBACK: Category = Category::Food;

    pub fn key(self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Drinks => "drinks",
            Category::ObjectsDept => "objects dept",
            Category::AestheticMoments => "aesthetic moments",
            Category::TouchGrass => "touch grass",
        }
    }

    /// Looks up an already normalized (trimmed, lower-cased) key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.key() == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Category label carried by a marker and matched by the filter.
///
/// Values outside the registry are kept verbatim so they still show up under
/// `all`, while their icon falls back to [`Category::FALLBACK`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryTag {
    Known(Category),
    Unlisted(String),
}

impl CategoryTag {
    /// Builds a tag from a raw source cell. Absent or blank cells resolve to
    /// the fallback category.
    pub fn from_source(raw: Option<&str>) -> Self {
        let normalized = raw.map(|value| value.trim().to_lowercase()).unwrap_or_default();
        if normalized.is_empty() {
            return CategoryTag::Known(Category::FALLBACK);
        }
        Self::from(normalized)
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryTag::Known(category) => category.key(),
            CategoryTag::Unlisted(raw) => raw,
        }
    }

    pub fn category(&self) -> Option<Category> {
        match self {
            CategoryTag::Known(category) => Some(*category),
            CategoryTag::Unlisted(_) => None,
        }
    }

    /// Category whose icon represents this tag.
    pub fn icon_category(&self) -> Category {
        match self {
            CategoryTag::Known(category) => *category,
            CategoryTag::Unlisted(_) => Category::FALLBACK,
        }
    }
}

impl From<String> for CategoryTag {
    fn from(value: String) -> Self {
        match Category::from_key(&value) {
            Some(category) => CategoryTag::Known(category),
            None => CategoryTag::Unlisted(value),
        }
    }
}

impl From<CategoryTag> for String {
    fn from(value: CategoryTag) -> Self {
        match value {
            CategoryTag::Known(category) => category.key().to_string(),
            CategoryTag::Unlisted(raw) => raw,
        }
    }
}

impl fmt::Display for CategoryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single filter currently applied to the marker collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ActiveFilter {
    #[default]
    All,
    Category(Category),
}

impl ActiveFilter {
    pub const ALL_KEY: &'static str = "all";

    pub fn admits(&self, tag: &CategoryTag) -> bool {
        match self {
            ActiveFilter::All => true,
            ActiveFilter::Category(category) => tag.category() == Some(*category),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            ActiveFilter::All => Self::ALL_KEY,
            ActiveFilter::Category(category) => category.key(),
        }
    }

    /// Every filter a control can declare, `all` first.
    pub fn controls() -> impl Iterator<Item = ActiveFilter> {
        std::iter::once(ActiveFilter::All).chain(Category::ALL.into_iter().map(ActiveFilter::Category))
    }
}

impl FromStr for ActiveFilter {
    type Err = ApiException;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if normalized == Self::ALL_KEY {
            return Ok(ActiveFilter::All);
        }
        Category::from_key(&normalized)
            .map(ActiveFilter::Category)
            .ok_or_else(|| {
                ApiException::new(
                    ErrorCode::Validation,
                    format!("unknown filter category '{}'", s.trim()),
                )
            })
    }
}

impl TryFrom<String> for ActiveFilter {
    type Error = ApiException;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ActiveFilter> for String {
    fn from(value: ActiveFilter) -> Self {
        value.key().to_string()
    }
}

impl fmt::Display for ActiveFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
