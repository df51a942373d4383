//! Map marker catalogs
//!
//! Turns an ordered catalog of geographic point records into marker placement
//! instructions for an interactive map widget: a checked position, an optional
//! CSS class picked by category, and popup markup built from the record's
//! title and description.
//!
//! # Features
//!
//! - **Pure renderer**: [`MarkerCatalogRenderer`] is stateless and
//!   deterministic; malformed records are reported with their index, never
//!   dropped silently
//! - **Data-driven styling**: categories map to classes through a
//!   [`CategoryStyleTable`] instead of code
//! - **Loaders** (`fetch` feature, default): catalogs from strings, files or
//!   HTTP, blocking or async
//! - **Page output**: [`rendering::PageBuilder`] emits a standalone map page
//!
//! # Example
//!
//! ```
//! use mapmarkers::{CategoryStyleTable, MarkerCatalog, MarkerCatalogRenderer, PointRecord};
//!
//! let catalog = MarkerCatalog::new(vec![PointRecord::new(-122.05, 37.0, "G", "G", "d1")]);
//! let styles = CategoryStyleTable::new().with("G", "g");
//!
//! let instructions = MarkerCatalogRenderer::new()
//!     .render_all(&catalog, &styles)
//!     .into_strict()
//!     .unwrap();
//! assert_eq!(instructions[0].style_class.as_deref(), Some("g"));
//! assert_eq!(instructions[0].popup_content, "<h3>G</h3><p>d1</p>");
//! ```

use serde::Deserialize;
use std::path::Path;

pub mod error;
pub use error::{CatalogLoadError, Error, MalformedRecordError, RecordFault, Result};

pub mod catalog;
pub use catalog::{LngLat, MarkerCatalog, PointRecord};

pub mod style;
pub use style::CategoryStyleTable;

pub mod loader;

pub mod rendering;
pub use rendering::{MarkerCatalogRenderer, PopupEscaping, RenderInstruction, RenderOutcome};

/// Map widget settings, passed explicitly and validated once at startup.
///
/// Defaults reproduce the historical map: streets style, Bay Area center,
/// zoom 8, popup offset 25. There is no default access token, so a default
/// config does not validate until one is supplied.
///
/// # Examples
///
/// ```
/// let cfg = mapmarkers::MapConfig {
///     access_token: "pk.example".to_string(),
///     ..Default::default()
/// };
/// assert!(cfg.validate().is_ok());
/// assert!(mapmarkers::MapConfig::default().validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    /// Widget access token
    pub access_token: String,
    /// Base map style URL
    pub style_url: String,
    /// Initial map center
    pub center: LngLat,
    /// Initial zoom level, 0 to 24
    pub zoom: f64,
    /// Popup offset from the marker in pixels
    pub popup_offset: u32,
    /// Class every marker element gets before its category class
    pub marker_class: String,
    /// Popup escaping mode (compatibility flag, raw by default)
    pub popup_escaping: PopupEscaping,
    /// Fit the initial view to the markers instead of `center`/`zoom`
    pub fit_to_markers: bool,
    /// Document title of generated pages
    pub page_title: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            style_url: "mapbox://styles/mapbox/streets-v11".to_string(),
            center: LngLat {
                lng: -121.98685827727454,
                lat: 37.360250540945366,
            },
            zoom: 8.0,
            popup_offset: 25,
            marker_class: "marker".to_string(),
            popup_escaping: PopupEscaping::Raw,
            fit_to_markers: false,
            page_title: "Map".to_string(),
        }
    }
}

impl MapConfig {
    /// Read a JSON config file; absent keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&s)
            .map_err(|e| Error::ConfigError(format!("Invalid config {}: {}", path.display(), e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.access_token.trim().is_empty() {
            return Err(Error::ConfigError("access_token is required".into()));
        }
        if self.access_token.chars().any(char::is_whitespace) {
            return Err(Error::ConfigError("access_token contains whitespace".into()));
        }
        if self.style_url.trim().is_empty() {
            return Err(Error::ConfigError("style_url is empty".into()));
        }
        if !self.zoom.is_finite() || !(0.0..=24.0).contains(&self.zoom) {
            return Err(Error::ConfigError(format!(
                "zoom {} outside [0, 24]",
                self.zoom
            )));
        }
        LngLat::new(self.center.lng, self.center.lat)
            .map_err(|fault| Error::ConfigError(format!("center: {}", fault)))?;
        if !style::is_css_class(&self.marker_class) {
            return Err(Error::ConfigError(format!(
                "marker_class {:?} is not a valid CSS class name",
                self.marker_class
            )));
        }
        Ok(())
    }

    pub fn renderer(&self) -> MarkerCatalogRenderer {
        MarkerCatalogRenderer::with_escaping(self.popup_escaping)
    }
}

/// Settings for fetching remote catalog documents
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// User agent string to send with requests
    pub user_agent: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("mapmarkers/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_ms: 30000,
        }
    }
}
