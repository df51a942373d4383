//! Error types for catalog loading and rendering

use thiserror::Error;

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur anywhere in the crate
#[derive(Error, Debug)]
pub enum Error {
    /// The catalog document could not be obtained or parsed
    #[error(transparent)]
    CatalogLoad(#[from] CatalogLoadError),

    /// A single record failed validation
    #[error(transparent)]
    MalformedRecord(#[from] MalformedRecordError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Failed to produce output from rendered instructions
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Filesystem error outside of catalog loading
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The catalog document could not be fetched or parsed.
///
/// Distinct from [`MalformedRecordError`]: this means there is no usable
/// catalog at all, and the caller decides between rendering nothing and
/// aborting.
#[derive(Error, Debug)]
pub enum CatalogLoadError {
    /// Reading a local document failed
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Transport-level failure while fetching a remote document
    #[error("Failed to fetch catalog {url}: {reason}")]
    Http { url: String, reason: String },

    /// Remote server answered with a non-success status
    #[error("Catalog request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Document is not valid JSON, or a value has the wrong JSON type
    #[error("Failed to parse catalog document: {0}")]
    Parse(#[from] serde_json::Error),

    /// Document is JSON but does not have a catalog shape
    #[error("Unexpected catalog structure: {0}")]
    Structure(String),
}

/// What exactly is wrong with a record
#[derive(Debug, Clone, PartialEq)]
pub enum RecordFault {
    /// A required field is absent
    MissingField(&'static str),
    /// Coordinates did not hold exactly two values
    CoordinateArity(usize),
    /// NaN or infinite coordinate value
    NonFiniteCoordinate,
    LongitudeOutOfRange(f64),
    LatitudeOutOfRange(f64),
}

impl std::fmt::Display for RecordFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordFault::MissingField(name) => write!(f, "missing field `{}`", name),
            RecordFault::CoordinateArity(n) => {
                write!(f, "expected 2 coordinate values, found {}", n)
            }
            RecordFault::NonFiniteCoordinate => write!(f, "coordinate is not a finite number"),
            RecordFault::LongitudeOutOfRange(v) => {
                write!(f, "longitude {} outside [-180, 180]", v)
            }
            RecordFault::LatitudeOutOfRange(v) => write!(f, "latitude {} outside [-90, 90]", v),
        }
    }
}

/// A record at `index` failed validation and produced no instruction
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Malformed record at index {index}: {fault}")]
pub struct MalformedRecordError {
    /// Position of the record in its catalog
    pub index: usize,
    pub fault: RecordFault,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_record_message_names_index() {
        let err = MalformedRecordError {
            index: 3,
            fault: RecordFault::LongitudeOutOfRange(200.0),
        };
        assert_eq!(
            err.to_string(),
            "Malformed record at index 3: longitude 200 outside [-180, 180]"
        );
    }

    #[test]
    fn crate_error_wraps_load_error_transparently() {
        let err: Error = CatalogLoadError::Structure("no features".into()).into();
        assert_eq!(err.to_string(), "Unexpected catalog structure: no features");
    }
}
