//! Catalog documents: parsing, files, and (with `fetch`) HTTP.
//!
//! A document is either a bare JSON array of records or a GeoJSON
//! `FeatureCollection` whose `features` are the records. Each record carries
//! its position as `coordinates` or `geometry.coordinates`, and a
//! `properties` block with `category` (or `type`), `title` and
//! `description`.
//!
//! Loading only fails for documents that are absent or not catalog-shaped.
//! Records with missing fields or bad coordinate values load fine and are
//! reported with their index when rendered.

use crate::catalog::{MarkerCatalog, PointRecord};
use crate::error::CatalogLoadError;
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::LoaderConfig;
#[cfg(feature = "fetch")]
use std::time::Duration;

type LoadResult<T> = std::result::Result<T, CatalogLoadError>;

#[derive(Deserialize)]
struct RawRecord {
    #[serde(default)]
    coordinates: Option<Vec<f64>>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
    #[serde(default)]
    properties: RawProperties,
}

#[derive(Deserialize)]
struct RawGeometry {
    #[serde(default)]
    coordinates: Option<Vec<f64>>,
}

#[derive(Deserialize, Default)]
struct RawProperties {
    #[serde(default)]
    category: Option<String>,
    // Older documents name the category `type`; `category` wins when both are set.
    #[serde(default, rename = "type")]
    legacy_type: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    relevance: Option<Value>,
}

impl From<RawRecord> for PointRecord {
    fn from(raw: RawRecord) -> Self {
        let coordinates = raw
            .coordinates
            .or_else(|| raw.geometry.and_then(|g| g.coordinates))
            .unwrap_or_default();
        PointRecord {
            coordinates,
            category: raw.properties.category.or(raw.properties.legacy_type),
            title: raw.properties.title,
            description: raw.properties.description,
            // Only exported, never rendered; non-numeric values are dropped.
            relevance: raw.properties.relevance.as_ref().and_then(Value::as_f64),
        }
    }
}

/// Parse a catalog document.
pub fn parse_catalog(document: &str) -> LoadResult<MarkerCatalog> {
    let value: Value = serde_json::from_str(document)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("features") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(CatalogLoadError::Structure(
                    "`features` is not an array".into(),
                ))
            }
            None => {
                return Err(CatalogLoadError::Structure(
                    "expected an array of records or an object with `features`".into(),
                ))
            }
        },
        _ => {
            return Err(CatalogLoadError::Structure(
                "expected an array of records or an object with `features`".into(),
            ))
        }
    };

    let records = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            if !item.is_object() {
                return Err(CatalogLoadError::Structure(format!(
                    "record {} is not an object",
                    i
                )));
            }
            serde_json::from_value::<RawRecord>(item)
                .map(PointRecord::from)
                .map_err(|e| CatalogLoadError::Structure(format!("record {}: {}", i, e)))
        })
        .collect::<LoadResult<Vec<_>>>()?;

    Ok(MarkerCatalog::new(records))
}

/// Read and parse a catalog document from disk.
pub fn load_catalog_file(path: impl AsRef<Path>) -> LoadResult<MarkerCatalog> {
    let path = path.as_ref();
    let body = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let catalog = parse_catalog(&body)?;
    debug!("loaded {} records from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Fetch a catalog document over HTTP, blocking the current thread.
///
/// Panics when called from inside a tokio runtime; async callers use
/// [`fetch_catalog_async`] or [`load_all`].
#[cfg(feature = "fetch")]
pub fn fetch_catalog(url: &str, config: &LoaderConfig) -> LoadResult<MarkerCatalog> {
    use reqwest::blocking::Client;

    let http_err = |reason: String| CatalogLoadError::Http {
        url: url.to_string(),
        reason,
    };

    let client = Client::builder()
        .timeout(Duration::from_millis(config.timeout_ms))
        .build()
        .map_err(|e| http_err(format!("Failed to build HTTP client: {}", e)))?;

    let resp = client
        .get(url)
        .header("User-Agent", config.user_agent.clone())
        .send()
        .map_err(|e| http_err(format!("HTTP GET failed: {}", e)))?;

    if !resp.status().is_success() {
        return Err(CatalogLoadError::Status {
            url: url.to_string(),
            status: resp.status().as_u16(),
        });
    }

    let body = resp
        .text()
        .map_err(|e| http_err(format!("Failed to read response body: {}", e)))?;

    let catalog = parse_catalog(&body)?;
    debug!("fetched {} records from {}", catalog.len(), url);
    Ok(catalog)
}

/// Async variant of [`fetch_catalog`]; needs a tokio runtime.
#[cfg(feature = "fetch")]
pub async fn fetch_catalog_async(url: &str, config: &LoaderConfig) -> LoadResult<MarkerCatalog> {
    let http_err = |reason: String| CatalogLoadError::Http {
        url: url.to_string(),
        reason,
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.timeout_ms))
        .build()
        .map_err(|e| http_err(format!("Failed to build HTTP client: {}", e)))?;

    let resp = client
        .get(url)
        .header("User-Agent", config.user_agent.clone())
        .send()
        .await
        .map_err(|e| http_err(format!("HTTP GET failed: {}", e)))?;

    if !resp.status().is_success() {
        return Err(CatalogLoadError::Status {
            url: url.to_string(),
            status: resp.status().as_u16(),
        });
    }

    let body = resp
        .text()
        .await
        .map_err(|e| http_err(format!("Failed to read response body: {}", e)))?;

    let catalog = parse_catalog(&body)?;
    debug!("fetched {} records from {}", catalog.len(), url);
    Ok(catalog)
}

/// Where a catalog document lives.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    File(PathBuf),
    #[cfg(feature = "fetch")]
    Url(url::Url),
}

impl CatalogSource {
    /// `http://` and `https://` locations are URLs, anything else is a path.
    pub fn parse(location: &str) -> Self {
        #[cfg(feature = "fetch")]
        {
            if let Ok(u) = url::Url::parse(location) {
                if u.scheme() == "http" || u.scheme() == "https" {
                    return CatalogSource::Url(u);
                }
            }
        }
        CatalogSource::File(PathBuf::from(location))
    }

    /// Load the document; needs a tokio runtime. `config` only applies to URLs.
    #[cfg_attr(not(feature = "fetch"), allow(unused_variables))]
    pub async fn load_async(&self, config: &LoaderConfig) -> LoadResult<MarkerCatalog> {
        match self {
            CatalogSource::File(p) => {
                let body = tokio::fs::read_to_string(p)
                    .await
                    .map_err(|source| CatalogLoadError::Io {
                        path: p.display().to_string(),
                        source,
                    })?;
                let catalog = parse_catalog(&body)?;
                debug!("loaded {} records from {}", catalog.len(), p.display());
                Ok(catalog)
            }
            #[cfg(feature = "fetch")]
            CatalogSource::Url(u) => fetch_catalog_async(u.as_str(), config).await,
        }
    }
}

/// Load several sources concurrently, one result per source in input order.
pub async fn load_all(
    sources: &[CatalogSource],
    config: &LoaderConfig,
) -> Vec<LoadResult<MarkerCatalog>> {
    futures::future::join_all(sources.iter().map(|s| s.load_async(config))).await
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::File(p) => write!(f, "{}", p.display()),
            #[cfg(feature = "fetch")]
            CatalogSource::Url(u) => write!(f, "{}", u),
        }
    }
}
