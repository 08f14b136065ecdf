//! Parsed icon font paired with its codepoint table.
//!
//! A `FontContext` is built in one step from the fetched font bytes and
//! stylesheet text and never mutated afterwards. Reloading produces a new
//! context that replaces the old one wholesale.

mod types;

use crate::error::{FontError, GlyphError};
use crate::stylesheet::CodepointTable;
use crate::svg;

pub use types::FontData;

/// Immutable icon font state.
#[derive(Debug, Clone)]
pub struct FontContext {
    font: FontData,
    codepoints: CodepointTable,
}

impl FontContext {
    pub fn new(font: FontData, codepoints: CodepointTable) -> Self {
        Self { font, codepoints }
    }

    /// Build a context from raw sfnt bytes and stylesheet text.
    pub fn from_sources(font_bytes: Vec<u8>, stylesheet: &str) -> Result<Self, FontError> {
        let font = FontData::new(font_bytes)?;
        let codepoints = CodepointTable::parse(stylesheet);
        if codepoints.is_empty() {
            log::warn!("Stylesheet declared no icon rules; every lookup will miss");
        }
        Ok(Self::new(font, codepoints))
    }

    pub fn font(&self) -> &FontData {
        &self.font
    }

    pub fn codepoints(&self) -> &CodepointTable {
        &self.codepoints
    }

    /// Glyph index mapped to `codepoint`, or `None` when the charmap has none.
    pub fn glyph_index(&self, codepoint: u32) -> Option<u16> {
        match self.font.font_ref().charmap().map(codepoint) {
            0 => None,
            glyph_id => Some(glyph_id),
        }
    }

    /// Resolve an icon name to its glyph index.
    pub fn resolve(&self, name: &str) -> Result<u16, GlyphError> {
        let codepoint = self
            .codepoints
            .get(name)
            .ok_or_else(|| GlyphError::UnknownIcon(name.to_string()))?;
        self.glyph_index(codepoint)
            .ok_or_else(|| GlyphError::MissingGlyph {
                name: name.to_string(),
                codepoint,
            })
    }

    /// Render an icon's glyph as a standalone SVG document filled with `fill`.
    pub fn render_svg(&self, name: &str, fill: &str) -> Result<String, GlyphError> {
        let glyph_id = self.resolve(name)?;
        let path = svg::glyph_path_data(self.font.font_ref(), glyph_id).ok_or_else(|| {
            GlyphError::Outline {
                name: name.to_string(),
                glyph_id,
            }
        })?;
        Ok(svg::svg_document(&path, fill))
    }
}
