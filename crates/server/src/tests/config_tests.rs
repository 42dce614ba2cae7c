use super::*;

use std::{collections::HashMap, io::Write};

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_match_the_east_bay_view() {
    let settings = Settings::default();
    assert_eq!(settings.server_bind, "127.0.0.1:8080");
    assert_eq!(settings.map.center, [37.85, -122.25]);
    assert_eq!(settings.map.zoom, 13);
    assert_eq!(settings.map.tile_subdomains, "abcd");
    assert_eq!(settings.map.tile_max_zoom, 19);
}

#[test]
fn file_values_override_defaults() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        r#"
bind_addr = "0.0.0.0:9000"
data_source = "https://example.com/points.csv"
icon_base_url = "/icons"

[map]
center = [37.8, -122.3]
zoom = 12
"#
    )
    .expect("write");

    let mut settings = Settings::default();
    apply_file(&mut settings, file.path()).expect("apply");

    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert_eq!(settings.data_source, "https://example.com/points.csv");
    assert_eq!(settings.icon_base_url, "/icons");
    assert_eq!(settings.map.center, [37.8, -122.3]);
    assert_eq!(settings.map.zoom, 12);
    assert_eq!(settings.map.tile_max_zoom, 19);
}

#[test]
fn malformed_file_is_reported() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "bind_addr = [").expect("write");

    let mut settings = Settings::default();
    let err = apply_file(&mut settings, file.path()).expect_err("should fail");
    assert!(err.to_string().contains("failed to parse settings file"));
    assert_eq!(settings.server_bind, "127.0.0.1:8080");
}

#[test]
fn app_prefixed_env_wins_over_short_names() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        env(&[
            ("SLAPMAP_BIND", "127.0.0.1:1"),
            ("APP__BIND_ADDR", "127.0.0.1:2"),
            ("SLAPMAP_DATA_SOURCE", "a.csv"),
            ("APP__MAP_ZOOM", "15"),
        ]),
    );
    assert_eq!(settings.server_bind, "127.0.0.1:2");
    assert_eq!(settings.data_source, "a.csv");
    assert_eq!(settings.map.zoom, 15);
}

#[test]
fn non_numeric_zoom_is_ignored() {
    let mut settings = Settings::default();
    apply_env(&mut settings, env(&[("APP__MAP_ZOOM", "close")]));
    assert_eq!(settings.map.zoom, 13);
}
