use super::*;
use std::io::Write;

use axum::{routing::get, Router};
use tokio::net::TcpListener;

const SAMPLE_CSV: &str = "\
Name,Latitude,Longitude,Category,Description,Price,Address,Link,Pro Tip
Spot A,37.8,-122.2,Drinks,Cold ones,$$,1 Main St,https://example.com/a,Sit outside
Spot B,,-122.2,food,,,,,
Spot C,37.81,-122.21
";

async fn serve_csv(body: &'static str) -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new().route("/points.csv", get(move || async move { body }));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}/points.csv"))
}

#[test]
fn parses_header_keyed_rows_with_normalized_headers() {
    let rows = parse_rows(SAMPLE_CSV.as_bytes()).expect("rows");
    assert_eq!(rows.len(), 3);

    let first = &rows[0];
    assert_eq!(first.line, 2);
    assert_eq!(first.get("latitude"), Some("37.8"));
    assert_eq!(first.get("category"), Some("Drinks"));
    assert_eq!(first.get("pro tip"), Some("Sit outside"));

    assert_eq!(rows[1].get("latitude"), Some(""));
}

#[test]
fn short_rows_lack_trailing_columns() {
    let rows = parse_rows(SAMPLE_CSV.as_bytes()).expect("rows");
    let short = &rows[2];
    assert_eq!(short.get("longitude"), Some("-122.21"));
    assert_eq!(short.get("category"), None);
    assert_eq!(short.get("pro tip"), None);
}

#[test]
fn invalid_utf8_fails_the_whole_parse() {
    let mut bytes = b"latitude,longitude,name\n37.8,-122.2,ok\n37.9,-122.3,".to_vec();
    bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
    let err = parse_rows(bytes.as_slice()).expect_err("should fail");
    assert!(matches!(err, SourceError::Csv(_)));
}

#[tokio::test]
async fn file_source_reads_rows_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(SAMPLE_CSV.as_bytes()).expect("write");

    let source = FileSource::new(file.path());
    let rows = source.fetch_rows().await.expect("rows");
    assert_eq!(rows.len(), 3);
    assert_eq!(source.describe(), file.path().display().to_string());
}

#[tokio::test]
async fn missing_file_reports_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let source = FileSource::new(dir.path().join("absent.csv"));
    let err = source.fetch_rows().await.expect_err("should fail");
    assert!(matches!(err, SourceError::Io { .. }));
}

#[tokio::test]
async fn http_source_downloads_and_parses() {
    let url = serve_csv(SAMPLE_CSV).await.expect("server");
    let source = open_source(&url).expect("source");
    let rows = source.fetch_rows().await.expect("rows");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].get("name"), Some("Spot A"));
}

#[tokio::test]
async fn http_error_status_is_a_fetch_failure() {
    let url = serve_csv(SAMPLE_CSV).await.expect("server");
    let missing = url.replace("points.csv", "missing.csv");
    let source = open_source(&missing).expect("source");
    let err = source.fetch_rows().await.expect_err("should fail");
    assert!(matches!(err, SourceError::Http { .. }));
}

#[test]
fn classifies_source_locations() {
    let remote = open_source("https://example.com/points.csv").expect("remote");
    assert_eq!(remote.describe(), "https://example.com/points.csv");

    let local = open_source("data/points.csv").expect("local");
    assert_eq!(local.describe(), "data/points.csv");

    let err = open_source("ftp://example.com/points.csv")
        .err()
        .expect("should fail");
    assert!(matches!(err, SourceError::UnsupportedScheme(scheme) if scheme == "ftp"));
}
