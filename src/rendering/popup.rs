/// Popup markup for a single marker

use serde::{Deserialize, Serialize};

/// Whether popup fields are HTML-escaped before templating.
///
/// `Raw` reproduces the historical output byte for byte: titles and
/// descriptions are concatenated into the markup as-is, so any markup they
/// contain is live in the popup. `Html` escapes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopupEscaping {
    #[default]
    Raw,
    Html,
}

/// Fixed popup template: a heading with the title, then a paragraph with the
/// description. No escaping.
pub fn format_popup(title: &str, description: &str) -> String {
    format!("<h3>{}</h3><p>{}</p>", title, description)
}

/// Same template, honouring the escaping mode.
pub fn format_popup_with(title: &str, description: &str, escaping: PopupEscaping) -> String {
    match escaping {
        PopupEscaping::Raw => format_popup(title, description),
        PopupEscaping::Html => format_popup(&escape_html(title), &escape_html(description)),
    }
}

/// Escape the five HTML-significant characters.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
