//! Engine state shared by every component: configuration, the current font
//! context, the rasterizer and the decoration cache.
//!
//! There is exactly one `Session` per running engine. The font context is
//! swapped wholesale; nothing ever edits a loaded context in place.

use std::path::PathBuf;
use std::sync::Arc;

use icon_lens_config::Config;
use icon_lens_fonts::FontContext;

use crate::decoration::DecorationCache;
use crate::host::{DecorationHandle, DecorationSurface};
use crate::loader::{FontLoader, LoadError};
use crate::rasterizer::{GlyphRasterizer, RasterizeError};

#[derive(Debug)]
pub struct Session {
    config: Config,
    font: Option<Arc<FontContext>>,
    rasterizer: GlyphRasterizer,
    decorations: DecorationCache,
}

impl Session {
    /// Session with no font loaded yet.
    pub fn new(config: Config) -> Self {
        let rasterizer = Self::rasterizer_for(&config);
        Self {
            config,
            font: None,
            rasterizer,
            decorations: DecorationCache::new(),
        }
    }

    fn rasterizer_for(config: &Config) -> GlyphRasterizer {
        GlyphRasterizer::new(&config.storage_root(), config.icon_style.color.clone())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current font context, if a load has ever succeeded.
    pub fn font(&self) -> Option<&Arc<FontContext>> {
        self.font.as_ref()
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn replace_font(&mut self, font: FontContext) {
        self.font = Some(Arc::new(font));
    }

    /// Load the configured font and stylesheet.
    ///
    /// On failure the previous context (or its absence) is left untouched.
    pub fn load_font(&mut self, loader: &FontLoader) -> Result<(), LoadError> {
        let font = loader.load(&self.config.icon_url, &self.config.style_url)?;
        self.replace_font(font);
        Ok(())
    }

    pub fn rasterizer(&self) -> &GlyphRasterizer {
        &self.rasterizer
    }

    pub fn decorations(&self) -> &DecorationCache {
        &self.decorations
    }

    /// Rasterize `name` against the current font.
    pub fn rasterize(&self, name: &str) -> Result<PathBuf, RasterizeError> {
        self.rasterizer.rasterize(name, self.font.as_deref())
    }

    /// Decoration handle for `name`, rasterizing on first use.
    pub fn decoration(
        &mut self,
        name: &str,
        surface: &mut dyn DecorationSurface,
    ) -> Result<DecorationHandle, RasterizeError> {
        let rasterizer = &self.rasterizer;
        let font = self.font.as_deref();
        self.decorations
            .get_handle(name, self.config.editor_font_size, surface, |name| {
                rasterizer.rasterize(name, font)
            })
    }

    pub fn dispose_all(&mut self, surface: &mut dyn DecorationSurface) -> usize {
        self.decorations.dispose_all(surface)
    }

    /// Adopt `config`, returning whether the font source changed.
    ///
    /// Decorations are not touched here; callers dispose them first.
    pub fn apply_config(&mut self, config: Config) -> bool {
        let font_source_changed = self.config.font_source_changed(&config);
        self.rasterizer = Self::rasterizer_for(&config);
        self.config = config;
        font_source_changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingSurface;
    use icon_lens_fonts::testing::TestFontBuilder;
    use tempfile::TempDir;

    fn session(temp_dir: &TempDir) -> Session {
        let config = Config {
            cache_dir: Some(temp_dir.path().to_path_buf()),
            ..Config::default()
        };
        Session::new(config)
    }

    fn font() -> FontContext {
        let bytes = TestFontBuilder::new().square_glyph(0xe901).build();
        FontContext::from_sources(bytes, r#".icon-home:before{content:"\e901"}"#).unwrap()
    }

    #[test]
    fn test_no_font_means_unavailable() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut session = session(&temp_dir);
        let mut surface = RecordingSurface::new();
        assert!(!session.has_font());
        assert!(matches!(
            session.decoration("icon-home", &mut surface),
            Err(RasterizeError::NoFont)
        ));
        assert!(session.decorations().is_empty());
    }

    #[test]
    fn test_decoration_uses_font_size() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut session = session(&temp_dir);
        session.replace_font(font());
        let mut surface = RecordingSurface::new();

        let handle = session.decoration("icon-home", &mut surface).unwrap();
        let options = surface.style(handle).unwrap();
        assert_eq!(options.after.width, "14px");
        assert!(options.icon_path().starts_with(temp_dir.path()));
    }

    #[test]
    fn test_apply_config_reports_font_source_change() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut session = session(&temp_dir);

        let mut same_source = session.config().clone();
        same_source.editor_font_size = 20;
        assert!(!session.apply_config(same_source));
        assert_eq!(session.config().editor_font_size, 20);

        let mut new_source = session.config().clone();
        new_source.icon_url = "https://cdn.example.com/v2/icons.woff2".to_string();
        assert!(session.apply_config(new_source));
    }

    #[test]
    fn test_apply_config_moves_artifact_root() {
        let first = TempDir::new().expect("Failed to create temp dir");
        let second = TempDir::new().expect("Failed to create temp dir");
        let mut session = session(&first);
        let config = Config {
            cache_dir: Some(second.path().to_path_buf()),
            ..session.config().clone()
        };
        session.apply_config(config);
        assert!(session.rasterizer().artifact_dir().starts_with(second.path()));
    }
}
