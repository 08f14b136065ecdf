//! Font Loader: fetches the icon font and its stylesheet and builds a
//! [`FontContext`] from them.
//!
//! A load either yields a complete context or an error; it never mutates
//! existing state. Callers decide whether to swap the result in.

use icon_lens_fonts::{FontContext, FontError, decode_font};
use thiserror::Error;

use crate::http::{FetchError, HttpFetcher, MAX_FONT_SIZE, MAX_STYLESHEET_SIZE};

/// Source of raw resource bytes.
///
/// The HTTP implementation is [`HttpFetcher`]; tests and embedders can serve
/// resources from memory instead.
pub trait ResourceFetcher {
    /// Fetch the resource at `location`, failing if it exceeds `limit` bytes.
    fn fetch_bytes(&self, location: &str, limit: u64) -> Result<Vec<u8>, FetchError>;

    /// Fetch the resource at `location` as UTF-8 text.
    fn fetch_text(&self, location: &str, limit: u64) -> Result<String, FetchError> {
        let bytes = self.fetch_bytes(location, limit)?;
        String::from_utf8(bytes).map_err(|_| FetchError::Utf8 {
            location: location.to_string(),
        })
    }
}

/// Errors that can occur while loading a font context.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch icon font: {0}")]
    FontFetch(#[source] FetchError),

    #[error("failed to fetch icon stylesheet: {0}")]
    StyleFetch(#[source] FetchError),

    #[error("failed to parse icon font from {location}: {source}")]
    FontParse {
        location: String,
        #[source]
        source: FontError,
    },
}

/// Builds font contexts from configured resource locations.
pub struct FontLoader {
    fetcher: Box<dyn ResourceFetcher>,
}

impl FontLoader {
    pub fn new(fetcher: Box<dyn ResourceFetcher>) -> Self {
        Self { fetcher }
    }

    /// Loader that fetches over HTTP(S) or from local files.
    pub fn http() -> Self {
        Self::new(Box::new(HttpFetcher::new()))
    }

    /// Fetch and parse the font at `font_url` and the stylesheet at `style_url`.
    pub fn load(&self, font_url: &str, style_url: &str) -> Result<FontContext, LoadError> {
        log::info!("Loading icon font from {}", font_url);
        let raw = self
            .fetcher
            .fetch_bytes(font_url, MAX_FONT_SIZE)
            .map_err(LoadError::FontFetch)?;
        log::debug!("Fetched {} font bytes", raw.len());

        let parse_error = |source| LoadError::FontParse {
            location: font_url.to_string(),
            source,
        };
        let sfnt = decode_font(raw, font_url).map_err(parse_error)?;

        log::info!("Loading icon stylesheet from {}", style_url);
        let stylesheet = self
            .fetcher
            .fetch_text(style_url, MAX_STYLESHEET_SIZE)
            .map_err(LoadError::StyleFetch)?;

        let context = FontContext::from_sources(sfnt, &stylesheet).map_err(parse_error)?;
        log::info!(
            "Icon font ready: {} icon names in codepoint table",
            context.codepoints().len()
        );
        Ok(context)
    }
}

impl std::fmt::Debug for FontLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontLoader").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icon_lens_fonts::testing::TestFontBuilder;
    use std::collections::HashMap;

    struct MemoryFetcher(HashMap<&'static str, Vec<u8>>);

    impl ResourceFetcher for MemoryFetcher {
        fn fetch_bytes(&self, location: &str, limit: u64) -> Result<Vec<u8>, FetchError> {
            let bytes = self.0.get(location).ok_or_else(|| FetchError::InvalidLocation {
                location: location.to_string(),
                reason: "not found".to_string(),
            })?;
            if bytes.len() as u64 > limit {
                return Err(FetchError::TooLarge {
                    location: location.to_string(),
                    limit,
                });
            }
            Ok(bytes.clone())
        }
    }

    const CSS: &str = r#".icon-home:before{content:"\e901"}.icon-star:before{content:"\e902"}"#;

    fn loader(font: Vec<u8>, css: &str) -> FontLoader {
        let mut resources = HashMap::new();
        resources.insert("mem://font.ttf", font);
        resources.insert("mem://style.css", css.as_bytes().to_vec());
        FontLoader::new(Box::new(MemoryFetcher(resources)))
    }

    #[test]
    fn test_load_builds_context() {
        let font = TestFontBuilder::new()
            .square_glyph(0xe901)
            .triangle_glyph(0xe902)
            .build();
        let context = loader(font, CSS)
            .load("mem://font.ttf", "mem://style.css")
            .expect("load should succeed");
        assert_eq!(context.codepoints().get("icon-star"), Some(0xe902));
        assert_eq!(context.resolve("icon-home"), Ok(1));
    }

    #[test]
    fn test_load_empty_stylesheet_is_not_an_error() {
        let font = TestFontBuilder::new().square_glyph(0xe901).build();
        let context = loader(font, "body { color: red }")
            .load("mem://font.ttf", "mem://style.css")
            .expect("empty table is still a load");
        assert!(context.codepoints().is_empty());
    }

    #[test]
    fn test_load_missing_font() {
        let err = loader(Vec::new(), CSS)
            .load("mem://absent.ttf", "mem://style.css")
            .unwrap_err();
        assert!(matches!(err, LoadError::FontFetch(_)));
    }

    #[test]
    fn test_load_missing_stylesheet() {
        let font = TestFontBuilder::new().square_glyph(0xe901).build();
        let err = loader(font, CSS)
            .load("mem://font.ttf", "mem://absent.css")
            .unwrap_err();
        assert!(matches!(err, LoadError::StyleFetch(_)));
    }

    #[test]
    fn test_load_garbage_font() {
        let err = loader(b"definitely not a font".to_vec(), CSS)
            .load("mem://font.ttf", "mem://style.css")
            .unwrap_err();
        assert!(matches!(err, LoadError::FontParse { .. }));
    }
}
