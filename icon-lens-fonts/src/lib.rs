//! Icon font handling for icon-lens.
//!
//! This crate provides:
//! - Font container decoding (WOFF/WOFF2 to sfnt) and parsing via swash
//! - Stylesheet parsing into an icon-name to codepoint table
//! - Glyph resolution and outline-to-SVG serialization
//!
//! # Architecture
//!
//! A `FontContext` pairs one parsed icon font with the codepoint table built
//! from its companion stylesheet. It is immutable once built; callers replace
//! it wholesale when the font source changes.

pub mod decode;
pub mod error;
pub mod font_context;
pub mod stylesheet;
pub mod svg;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

// Re-export main types for convenience
pub use decode::{FontFormat, decode_font};
pub use error::{FontError, GlyphError};
pub use font_context::{FontContext, FontData};
pub use stylesheet::CodepointTable;
pub use svg::{SVG_FONT_SIZE, SVG_VIEW_BOX};
