use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;
use tracing::warn;

pub const SETTINGS_FILE: &str = "slapmap.toml";

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_bind: String,
    pub data_source: String,
    pub icon_base_url: String,
    pub static_dir: Option<String>,
    pub map: MapSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub center: [f64; 2],
    pub zoom: u8,
    pub tile_url: String,
    pub tile_attribution: String,
    pub tile_subdomains: String,
    pub tile_max_zoom: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            data_source: "data/slapmap.csv".into(),
            icon_base_url: String::new(),
            static_dir: None,
            map: MapSettings::default(),
        }
    }
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            center: [37.85, -122.25],
            zoom: 13,
            tile_url: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}.png".into(),
            tile_attribution: "&copy; <a href=\"https://openstreetmap.org\">OpenStreetMap</a> & <a href=\"https://carto.com/\">CARTO</a>".into(),
            tile_subdomains: "abcd".into(),
            tile_max_zoom: 19,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    data_source: Option<String>,
    icon_base_url: Option<String>,
    static_dir: Option<String>,
    #[serde(default)]
    map: FileMapSettings,
}

#[derive(Debug, Default, Deserialize)]
struct FileMapSettings {
    center: Option<[f64; 2]>,
    zoom: Option<u8>,
    tile_url: Option<String>,
    tile_attribution: Option<String>,
    tile_subdomains: Option<String>,
    tile_max_zoom: Option<u8>,
}

/// Defaults, overlaid by `slapmap.toml` in the working directory, overlaid by
/// the environment.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    let path = Path::new(SETTINGS_FILE);
    if path.exists() {
        if let Err(error) = apply_file(&mut settings, path) {
            warn!(path = %path.display(), error = %format!("{error:#}"), "ignoring settings file");
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings
}

pub fn apply_file(settings: &mut Settings, path: &Path) -> anyhow::Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    let file_cfg: FileSettings = toml::from_str(&raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;

    if let Some(v) = file_cfg.bind_addr {
        settings.server_bind = v;
    }
    if let Some(v) = file_cfg.data_source {
        settings.data_source = v;
    }
    if let Some(v) = file_cfg.icon_base_url {
        settings.icon_base_url = v;
    }
    if let Some(v) = file_cfg.static_dir {
        settings.static_dir = Some(v);
    }

    let map = file_cfg.map;
    if let Some(v) = map.center {
        settings.map.center = v;
    }
    if let Some(v) = map.zoom {
        settings.map.zoom = v;
    }
    if let Some(v) = map.tile_url {
        settings.map.tile_url = v;
    }
    if let Some(v) = map.tile_attribution {
        settings.map.tile_attribution = v;
    }
    if let Some(v) = map.tile_subdomains {
        settings.map.tile_subdomains = v;
    }
    if let Some(v) = map.tile_max_zoom {
        settings.map.tile_max_zoom = v;
    }

    Ok(())
}

pub fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("SLAPMAP_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = lookup("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = lookup("SLAPMAP_DATA_SOURCE") {
        settings.data_source = v;
    }
    if let Some(v) = lookup("APP__DATA_SOURCE") {
        settings.data_source = v;
    }

    if let Some(v) = lookup("APP__ICON_BASE_URL") {
        settings.icon_base_url = v;
    }
    if let Some(v) = lookup("APP__STATIC_DIR") {
        settings.static_dir = Some(v);
    }
    if let Some(v) = lookup("APP__TILE_URL") {
        settings.map.tile_url = v;
    }

    if let Some(v) = lookup("APP__MAP_ZOOM") {
        match v.parse::<u8>() {
            Ok(parsed) => settings.map.zoom = parsed,
            Err(_) => warn!(value = %v, "ignoring non-numeric APP__MAP_ZOOM"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
