//! HTML rendering of bilingual documents and their auxiliary panels
//!
//! Every renderer here is a pure function returning an HTML fragment as a
//! `String`. Text coming from the services is escaped before it is placed in
//! markup.
//!
//! # Example
//!
//! ```ignore
//! use bilingual_render::render::{render, Layout};
//!
//! let document: BilingualDocument = serde_json::from_str(json)?;
//! let html = render(&document, Layout::Continuous);
//! ```

pub mod continuous;
pub mod lemmas;
pub mod page;
pub mod questions;
pub mod side_by_side;

use crate::document::BilingualDocument;
use crate::orchestrator::ValidationError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;

pub use continuous::render_continuous;
pub use lemmas::render_lemmas;
pub use page::render_page;
pub use questions::render_questions;
pub use side_by_side::render_side_by_side;

/// How a document is laid out on the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// Flowing prose with the translation of each syntagma in parentheses.
    #[default]
    Continuous,
    /// A two-column table, one row per syntagma.
    SideBySide,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Continuous => "continuous",
            Layout::SideBySide => "side-by-side",
        }
    }
}

impl FromStr for Layout {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "continuous" => Ok(Layout::Continuous),
            "side-by-side" => Ok(Layout::SideBySide),
            other => Err(ValidationError::UnknownLayout(other.to_string())),
        }
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Render `document` in the requested layout.
pub fn render(document: &BilingualDocument, layout: Layout) -> String {
    match layout {
        Layout::Continuous => render_continuous(document),
        Layout::SideBySide => render_side_by_side(document),
    }
}

/// Escape the characters that are significant in HTML text and attributes.
pub fn escape_html(content: &str) -> Cow<'_, str> {
    if !content.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(content);
    }

    let mut result = String::with_capacity(content.len() + 16);
    for c in content.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}
