//! Standalone HTML page that boots the map widget with a set of markers.

use crate::rendering::{bounds, escape_html, MarkerSink, RenderInstruction};
use crate::{Error, MapConfig, Result};
use serde::Serialize;

const TEMPLATE: &str = include_str!("page_template.html");

/// Collects instructions and emits a self-contained map page.
///
/// The config is validated when the builder is created, so a bad token or
/// zoom level fails before any catalog work is done.
#[derive(Debug, Clone)]
pub struct PageBuilder {
    config: MapConfig,
    instructions: Vec<RenderInstruction>,
}

impl PageBuilder {
    pub fn new(config: MapConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            instructions: Vec::new(),
        })
    }

    pub fn instructions(&self) -> &[RenderInstruction] {
        &self.instructions
    }

    pub fn finish(self) -> Result<String> {
        let fit = if self.config.fit_to_markers {
            bounds(&self.instructions)
        } else {
            None
        };

        let values = [
            ("PAGE_TITLE", escape_html(&self.config.page_title)),
            ("MARKER_CLASS", self.config.marker_class.clone()),
            ("MARKER_COUNT", self.instructions.len().to_string()),
            ("ACCESS_TOKEN", script_json(&self.config.access_token)?),
            ("STYLE_URL", script_json(&self.config.style_url)?),
            ("CENTER", script_json(&self.config.center)?),
            ("ZOOM", self.config.zoom.to_string()),
            ("POPUP_OFFSET", self.config.popup_offset.to_string()),
            ("INSTRUCTIONS", script_json(&self.instructions)?),
            ("BOUNDS", script_json(&fit)?),
        ];
        Ok(fill_template(TEMPLATE, &values))
    }
}

impl MarkerSink for PageBuilder {
    fn place_marker(&mut self, instruction: &RenderInstruction) -> Result<()> {
        self.instructions.push(instruction.clone());
        Ok(())
    }
}

/// Shortcut for a page over already-rendered instructions.
pub fn render_page(config: MapConfig, instructions: &[RenderInstruction]) -> Result<String> {
    let mut page = PageBuilder::new(config)?;
    for i in instructions {
        page.place_marker(i)?;
    }
    page.finish()
}

// JSON safe for inlining in a <script> element: `<` only occurs inside
// strings in serde_json output, and \u003c keeps `</script>` from closing
// the element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let s = serde_json::to_string(value)
        .map_err(|e| Error::RenderError(format!("Failed to serialize page data: {}", e)))?;
    Ok(s.replace('<', "\\u003c"))
}

// Single pass over the template so substituted text is never rescanned for
// placeholders.
fn fill_template(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len() + 1024);
    let mut rest = template;
    while let Some(start) = rest.find("__") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let hit = after.find("__").and_then(|end| {
            let name = &after[..end];
            values
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (v, end))
        });
        match hit {
            Some((v, end)) => {
                out.push_str(v);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("__");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
