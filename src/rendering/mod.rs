//! Catalog rendering: records in, marker placement instructions out.

pub mod bounds;
pub mod page;
pub mod popup;
pub mod sink;

pub use bounds::{bounds, centroid, Bounds};
pub use page::PageBuilder;
pub use popup::{escape_html, format_popup, format_popup_with, PopupEscaping};
pub use sink::MarkerSink;

use crate::catalog::{LngLat, MarkerCatalog};
use crate::error::MalformedRecordError;
use crate::style::CategoryStyleTable;
use crate::Result;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Everything the map widget needs to place one marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderInstruction {
    pub position: LngLat,
    /// Extra CSS class for the marker element; `None` when the category has
    /// no table entry
    pub style_class: Option<String>,
    /// Popup markup shown when the marker is activated
    pub popup_content: String,
}

/// Stateless catalog renderer.
///
/// Holds only the popup escaping mode, so one renderer can be shared across
/// threads and reused for any number of catalogs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerCatalogRenderer {
    escaping: PopupEscaping,
}

impl MarkerCatalogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_escaping(escaping: PopupEscaping) -> Self {
        Self { escaping }
    }

    pub fn escaping(&self) -> PopupEscaping {
        self.escaping
    }

    /// Render every record, one result per record, in catalog order.
    pub fn render_all(&self, catalog: &MarkerCatalog, styles: &CategoryStyleTable) -> RenderOutcome {
        let results = catalog
            .iter()
            .enumerate()
            .map(|(index, record)| -> std::result::Result<_, MalformedRecordError> {
                let valid = record.validate(index)?;
                Ok(RenderInstruction {
                    position: valid.position,
                    style_class: styles.lookup(valid.category).map(str::to_owned),
                    popup_content: format_popup_with(valid.title, valid.description, self.escaping),
                })
            })
            .collect();

        let outcome = RenderOutcome { results };
        debug!(
            "rendered {} records ({} malformed)",
            outcome.len(),
            outcome.error_count()
        );
        outcome
    }

    /// Render straight into a sink, skipping malformed records.
    ///
    /// Returns the skipped records' errors so none go unreported. Sink errors
    /// abort the run.
    pub fn render_into<S: MarkerSink>(
        &self,
        catalog: &MarkerCatalog,
        styles: &CategoryStyleTable,
        sink: &mut S,
    ) -> Result<Vec<MalformedRecordError>> {
        let mut skipped = Vec::new();
        for result in self.render_all(catalog, styles).results {
            match result {
                Ok(instruction) => sink.place_marker(&instruction)?,
                Err(e) => {
                    warn!("skipping record: {}", e);
                    skipped.push(e);
                }
            }
        }
        Ok(skipped)
    }
}

/// Per-record results of [`MarkerCatalogRenderer::render_all`].
///
/// Always the same length and order as the input catalog. The caller picks a
/// propagation policy: [`into_strict`](Self::into_strict) halts on the first
/// bad record, [`partition`](Self::partition) skips and continues.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutcome {
    results: Vec<std::result::Result<RenderInstruction, MalformedRecordError>>,
}

impl RenderOutcome {
    pub fn results(&self) -> &[std::result::Result<RenderInstruction, MalformedRecordError>] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_err()).count()
    }

    /// All instructions, or the first malformed record's error.
    pub fn into_strict(self) -> std::result::Result<Vec<RenderInstruction>, MalformedRecordError> {
        self.results.into_iter().collect()
    }

    /// Valid instructions in order, plus every error encountered.
    pub fn partition(self) -> (Vec<RenderInstruction>, Vec<MalformedRecordError>) {
        let mut instructions = Vec::with_capacity(self.results.len());
        let mut errors = Vec::new();
        for r in self.results {
            match r {
                Ok(i) => instructions.push(i),
                Err(e) => {
                    warn!("skipping record: {}", e);
                    errors.push(e);
                }
            }
        }
        (instructions, errors)
    }
}

/// Hex SHA-256 of the JSON serialization of `instructions`.
///
/// Stable for identical inputs, which makes it a cheap fingerprint for golden
/// files and for comparing two renders.
pub fn digest(instructions: &[RenderInstruction]) -> Result<String> {
    let bytes = serde_json::to_vec(instructions)
        .map_err(|e| crate::Error::RenderError(format!("Failed to serialize instructions: {}", e)))?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}
