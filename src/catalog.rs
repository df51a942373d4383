//! Point records and the ordered catalog that holds them.

use crate::error::{MalformedRecordError, RecordFault};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A checked geographic position.
///
/// Serialized as a two-element `[lng, lat]` array, the order the map widget
/// expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 2]", from = "[f64; 2]")]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    /// Build a position, rejecting non-finite or out-of-range values.
    pub fn new(lng: f64, lat: f64) -> std::result::Result<Self, RecordFault> {
        if !lng.is_finite() || !lat.is_finite() {
            return Err(RecordFault::NonFiniteCoordinate);
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(RecordFault::LongitudeOutOfRange(lng));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(RecordFault::LatitudeOutOfRange(lat));
        }
        Ok(Self { lng, lat })
    }

    /// Check a raw coordinate list as found in catalog documents.
    pub fn from_slice(coords: &[f64]) -> std::result::Result<Self, RecordFault> {
        match coords {
            [lng, lat] => Self::new(*lng, *lat),
            other => Err(RecordFault::CoordinateArity(other.len())),
        }
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(p: LngLat) -> Self {
        [p.lng, p.lat]
    }
}

// Deserialization is unchecked; callers that accept untrusted positions go
// through `LngLat::new`.
impl From<[f64; 2]> for LngLat {
    fn from(v: [f64; 2]) -> Self {
        Self { lng: v[0], lat: v[1] }
    }
}

/// One point of interest as loaded from a catalog source.
///
/// Fields stay optional and coordinates stay raw so that incomplete records
/// survive loading and get reported with their index at render time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointRecord {
    /// Expected to be `[longitude, latitude]`
    pub coordinates: Vec<f64>,
    /// Case-sensitive key into a `CategoryStyleTable`
    pub category: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Geocoding relevance score, carried through for export only
    pub relevance: Option<f64>,
}

/// Borrowed view of a record that passed validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidRecord<'a> {
    pub position: LngLat,
    pub category: &'a str,
    pub title: &'a str,
    pub description: &'a str,
}

impl PointRecord {
    /// Build a complete record, e.g. for catalogs embedded in code.
    pub fn new(
        lng: f64,
        lat: f64,
        category: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            coordinates: vec![lng, lat],
            category: Some(category.into()),
            title: Some(title.into()),
            description: Some(description.into()),
            relevance: None,
        }
    }

    /// Validate this record, which sits at `index` in its catalog.
    ///
    /// Coordinates are checked first, then `category`, `title` and
    /// `description` in that order; the first fault wins.
    pub fn validate(&self, index: usize) -> std::result::Result<ValidRecord<'_>, MalformedRecordError> {
        let fail = |fault| MalformedRecordError { index, fault };

        let position = LngLat::from_slice(&self.coordinates).map_err(fail)?;
        let category = self
            .category
            .as_deref()
            .ok_or(RecordFault::MissingField("category"))
            .map_err(fail)?;
        let title = self
            .title
            .as_deref()
            .ok_or(RecordFault::MissingField("title"))
            .map_err(fail)?;
        let description = self
            .description
            .as_deref()
            .ok_or(RecordFault::MissingField("description"))
            .map_err(fail)?;

        Ok(ValidRecord {
            position,
            category,
            title,
            description,
        })
    }
}

/// Ordered collection of records rendered in one session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkerCatalog {
    records: Vec<PointRecord>,
}

impl MarkerCatalog {
    pub fn new(records: Vec<PointRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PointRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PointRecord> {
        self.records.iter()
    }

    /// Validate every record without rendering, returning all faults found.
    pub fn check(&self) -> Vec<MalformedRecordError> {
        self.records
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.validate(i).err())
            .collect()
    }

    /// Export as a GeoJSON `FeatureCollection`.
    ///
    /// Absent fields are omitted from `properties` rather than written as
    /// `null`, so a re-load reports the same faults.
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .records
            .iter()
            .map(|r| {
                let mut props = serde_json::Map::new();
                if let Some(c) = &r.category {
                    props.insert("category".into(), json!(c));
                }
                if let Some(t) = &r.title {
                    props.insert("title".into(), json!(t));
                }
                if let Some(d) = &r.description {
                    props.insert("description".into(), json!(d));
                }
                if let Some(rel) = r.relevance {
                    props.insert("relevance".into(), json!(rel));
                }
                json!({
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": r.coordinates },
                    "properties": props,
                })
            })
            .collect();

        json!({ "type": "FeatureCollection", "features": features })
    }
}

impl FromIterator<PointRecord> for MarkerCatalog {
    fn from_iter<I: IntoIterator<Item = PointRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a MarkerCatalog {
    type Item = &'a PointRecord;
    type IntoIter = std::slice::Iter<'a, PointRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
