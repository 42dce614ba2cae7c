use std::{
    collections::HashMap,
    io,
    path::PathBuf,
};

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::record::SourceRow;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read source file '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to fetch source '{url}'")]
    Http {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("malformed csv source")]
    Csv(#[from] csv::Error),
    #[error("unsupported source scheme '{0}'")]
    UnsupportedScheme(String),
}

/// Somewhere the full row set can be fetched from in one go.
#[async_trait]
pub trait RowSource: Send + Sync {
    fn describe(&self) -> String;
    async fn fetch_rows(&self) -> Result<Vec<SourceRow>, SourceError>;
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RowSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_rows(&self) -> Result<Vec<SourceRow>, SourceError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        let rows = parse_rows(bytes.as_slice())?;
        info!(path = %self.path.display(), rows = rows.len(), "read source file");
        Ok(rows)
    }
}

pub struct HttpSource {
    http: Client,
    url: Url,
}

impl HttpSource {
    pub fn new(url: Url) -> Self {
        Self {
            http: Client::new(),
            url,
        }
    }
}

#[async_trait]
impl RowSource for HttpSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch_rows(&self) -> Result<Vec<SourceRow>, SourceError> {
        let http_error = |source: reqwest::Error| SourceError::Http {
            url: self.url.clone(),
            source,
        };
        let body = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .map_err(http_error)?
            .error_for_status()
            .map_err(http_error)?
            .bytes()
            .await
            .map_err(http_error)?;
        let rows = parse_rows(body.as_ref())?;
        info!(url = %self.url, rows = rows.len(), "downloaded source");
        Ok(rows)
    }
}

/// Picks a loader for `location`: `http(s)://` URLs are downloaded,
/// `file://` URLs and anything that is not a URL are read from disk.
pub fn open_source(location: &str) -> Result<Box<dyn RowSource>, SourceError> {
    let location = location.trim();
    match Url::parse(location) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Box::new(HttpSource::new(url))),
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .map(|path| Box::new(FileSource::new(path)) as Box<dyn RowSource>)
            .map_err(|_| SourceError::UnsupportedScheme(url.to_string())),
        // Single letters are Windows drive prefixes, not schemes.
        Ok(url) if url.scheme().len() > 1 => {
            Err(SourceError::UnsupportedScheme(url.scheme().to_string()))
        }
        _ => Ok(Box::new(FileSource::new(location))),
    }
}

/// Parses a header-first CSV document. Header names are trimmed and
/// lower-cased; short rows simply lack the trailing columns. Any malformed
/// record fails the whole parse.
pub fn parse_rows<R: io::Read>(reader: R) -> Result<Vec<SourceRow>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_lowercase())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let cells: HashMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.clone(), value.to_string()))
            .collect();
        rows.push(SourceRow::new(line, cells));
    }
    Ok(rows)
}

#[cfg(test)]
#[path = "tests/source_tests.rs"]
mod tests;
