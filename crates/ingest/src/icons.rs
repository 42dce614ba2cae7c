use std::sync::Arc;

use shared::{
    domain::{Category, CategoryTag},
    protocol::IconSummary,
};

const ICON_SIZE: [u32; 2] = [32, 32];
const ICON_ANCHOR: [i32; 2] = [16, 32];
const POPUP_ANCHOR: [i32; 2] = [0, -30];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub url: String,
    pub size: [u32; 2],
    pub anchor: [i32; 2],
    pub popup_anchor: [i32; 2],
}

impl Icon {
    fn pin(url: String) -> Self {
        Self {
            url,
            size: ICON_SIZE,
            anchor: ICON_ANCHOR,
            popup_anchor: POPUP_ANCHOR,
        }
    }
}

/// Fixed registry with one icon per category. Markers hold clones of the
/// `Arc`, never their own copy.
#[derive(Debug, Clone)]
pub struct IconRegistry {
    food: Arc<Icon>,
    drinks: Arc<Icon>,
    objects_dept: Arc<Icon>,
    aesthetic_moments: Arc<Icon>,
    touch_grass: Arc<Icon>,
}

impl Default for IconRegistry {
    fn default() -> Self {
        Self::with_base_url("")
    }
}

impl IconRegistry {
    /// Builds the registry with every icon file resolved against `base_url`.
    /// An empty base keeps the bare file names.
    pub fn with_base_url(base_url: &str) -> Self {
        let base_url = base_url.trim().trim_end_matches('/');
        let pin = |category: Category| {
            let file = file_name(category);
            let url = if base_url.is_empty() {
                file.to_string()
            } else {
                format!("{base_url}/{file}")
            };
            Arc::new(Icon::pin(url))
        };

        Self {
            food: pin(Category::Food),
            drinks: pin(Category::Drinks),
            objects_dept: pin(Category::ObjectsDept),
            aesthetic_moments: pin(Category::AestheticMoments),
            touch_grass: pin(Category::TouchGrass),
        }
    }

    pub fn icon(&self, category: Category) -> &Arc<Icon> {
        match category {
            Category::Food => &self.food,
            Category::Drinks => &self.drinks,
            Category::ObjectsDept => &self.objects_dept,
            Category::AestheticMoments => &self.aesthetic_moments,
            Category::TouchGrass => &self.touch_grass,
        }
    }

    pub fn resolve(&self, tag: &CategoryTag) -> Arc<Icon> {
        Arc::clone(self.icon(tag.icon_category()))
    }

    pub fn summaries(&self) -> Vec<IconSummary> {
        Category::ALL
            .into_iter()
            .map(|category| {
                let icon = self.icon(category);
                IconSummary {
                    category,
                    url: icon.url.clone(),
                    size: icon.size,
                    anchor: icon.anchor,
                    popup_anchor: icon.popup_anchor,
                }
            })
            .collect()
    }
}

fn file_name(category: Category) -> &'static str {
    match category {
        Category::Food => "food_marker.png",
        Category::Drinks => "liquid_marker.png",
        Category::ObjectsDept => "objects_marker.png",
        Category::AestheticMoments => "aesthetic_marker.png",
        Category::TouchGrass => "grass_marker.png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlisted_tags_share_the_fallback_icon() {
        let registry = IconRegistry::default();
        let icon = registry.resolve(&CategoryTag::Unlisted("unknown-cat".into()));
        assert!(Arc::ptr_eq(&icon, registry.icon(Category::Food)));
        assert_eq!(icon.url, "food_marker.png");
    }

    #[test]
    fn base_url_is_joined_once() {
        let registry = IconRegistry::with_base_url("/static/icons/");
        assert_eq!(
            registry.icon(Category::Drinks).url,
            "/static/icons/liquid_marker.png"
        );
        assert_eq!(registry.summaries().len(), Category::ALL.len());
    }
}
