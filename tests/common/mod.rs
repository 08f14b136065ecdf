//! Shared integration test helpers for icon-lens.
//!
//! Include this module at the top of each test file that needs it:
//!
//! ```ignore
//! mod common;
//! use common::{config_with_tmp_dir, controller};
//! ```
//!
//! Fonts are built in memory and served by [`MapFetcher`], so no test touches
//! the network.

#![allow(dead_code)]

use icon_lens::host::RecordingSurface;
use icon_lens::http::FetchError;
use icon_lens::{Config, FontLoader, RefreshController, ResourceFetcher, Session};
use icon_lens_fonts::testing::TestFontBuilder;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

pub const FONT_URL: &str = "mem://icons/iconfont.ttf";
pub const STYLE_URL: &str = "mem://icons/iconfont.css";
pub const MISSING_URL: &str = "mem://icons/missing.ttf";

/// `icon-home` and `icon-star` have glyphs; `icon-ghost` maps to a codepoint the font lacks.
pub const STYLESHEET: &str = concat!(
    r#".icon-home:before{content:"\e901"}"#,
    r#".icon-star:before{content:"\e902"}"#,
    r#".icon-ghost:before{content:"\e9ff"}"#,
);

pub fn test_font() -> Vec<u8> {
    TestFontBuilder::new()
        .square_glyph(0xe901)
        .triangle_glyph(0xe902)
        .build()
}

/// In-memory resource fetcher that counts fetches.
#[derive(Clone, Default)]
pub struct MapFetcher {
    resources: HashMap<String, Vec<u8>>,
    fetches: Arc<AtomicUsize>,
}

impl MapFetcher {
    /// Fetcher serving the test font and stylesheet.
    pub fn with_icons() -> Self {
        Self::default()
            .with(FONT_URL, test_font())
            .with(STYLE_URL, STYLESHEET.as_bytes().to_vec())
    }

    pub fn with(mut self, location: &str, bytes: Vec<u8>) -> Self {
        self.resources.insert(location.to_string(), bytes);
        self
    }

    /// Shared counter of `fetch_bytes` calls, readable after the fetcher is boxed.
    pub fn fetch_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.fetches)
    }
}

impl ResourceFetcher for MapFetcher {
    fn fetch_bytes(&self, location: &str, limit: u64) -> Result<Vec<u8>, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let bytes = self
            .resources
            .get(location)
            .ok_or_else(|| FetchError::InvalidLocation {
                location: location.to_string(),
                reason: "no such test resource".to_string(),
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

/// Config pointing at the in-memory icon set, with artifacts stored in a temp dir.
///
/// The `TempDir` must be kept alive for the duration of the test.
pub fn config_with_tmp_dir() -> (Config, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = Config {
        icon_url: FONT_URL.to_string(),
        style_url: STYLE_URL.to_string(),
        cache_dir: Some(temp_dir.path().to_path_buf()),
        ..Config::default()
    };
    (config, temp_dir)
}

pub fn controller(config: Config, fetcher: MapFetcher) -> RefreshController<RecordingSurface> {
    RefreshController::new(
        Session::new(config),
        FontLoader::new(Box::new(fetcher)),
        RecordingSurface::new(),
    )
}

/// Session with the test font already loaded.
pub fn loaded_session(config: Config) -> Session {
    let mut session = Session::new(config);
    session
        .load_font(&FontLoader::new(Box::new(MapFetcher::with_icons())))
        .expect("test icon set should load");
    session
}
