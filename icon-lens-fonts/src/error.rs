//! Typed error types for icon-lens-fonts.

use thiserror::Error;

/// Failures while turning fetched bytes into a usable font.
#[derive(Debug, Error)]
pub enum FontError {
    /// The bytes are not a font swash can read.
    #[error("invalid font data ({len} bytes): not a TrueType/OpenType font")]
    InvalidFont {
        /// Length of the rejected buffer.
        len: usize,
    },

    /// A WOFF or WOFF2 container could not be decompressed.
    #[error("failed to decompress {format} container: {details}")]
    Decompress {
        /// Container format name.
        format: &'static str,
        /// Decoder error description.
        details: String,
    },
}

/// Reasons an icon name does not resolve to a renderable glyph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GlyphError {
    /// The icon name has no entry in the codepoint table.
    #[error("icon '{0}' is not defined in the stylesheet")]
    UnknownIcon(String),

    /// The font has no glyph mapped for the icon's codepoint.
    #[error("font has no glyph for '{name}' (U+{codepoint:04X})")]
    MissingGlyph {
        /// Icon name.
        name: String,
        /// Codepoint taken from the stylesheet.
        codepoint: u32,
    },

    /// The glyph outline could not be extracted.
    #[error("outline extraction failed for '{name}' (glyph {glyph_id})")]
    Outline {
        /// Icon name.
        name: String,
        /// Glyph index inside the font.
        glyph_id: u16,
    },
}
