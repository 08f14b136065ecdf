//! Decoration Cache: one decoration style per icon name.
//!
//! Each entry pairs the surface handle with the render options it was
//! created from, so the artifact path can be recovered later (completion
//! previews use it). Entries are only ever dropped all at once.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::host::{DecorationHandle, DecorationSurface};
use crate::rasterizer::RasterizeError;

/// Where the decoration shows up in the overview ruler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverviewRulerLane {
    Left,
    Center,
    Right,
    Full,
}

/// Border applied before the decorated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderStyle {
    pub border_color: String,
}

/// Inline image attached after the decorated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentStyle {
    pub margin: String,
    pub content_icon_path: PathBuf,
    pub height: String,
    pub width: String,
}

/// Color override for the attachment in one theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeAttachment {
    pub color: String,
}

/// Theme-specific overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeStyle {
    pub border_color: String,
    pub after: ThemeAttachment,
}

/// Visual parameters a decoration style is created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    pub overview_ruler_lane: OverviewRulerLane,
    pub before: BorderStyle,
    pub after: AttachmentStyle,
    pub light: ThemeStyle,
    pub dark: ThemeStyle,
}

impl RenderOptions {
    /// Style for an icon artifact drawn at the editor's font size.
    pub fn for_icon(icon_path: &Path, font_size: u32) -> Self {
        let size = format!("{font_size}px");
        Self {
            overview_ruler_lane: OverviewRulerLane::Right,
            before: BorderStyle {
                border_color: "#f00".to_string(),
            },
            after: AttachmentStyle {
                margin: "0 0 0 3px".to_string(),
                content_icon_path: icon_path.to_path_buf(),
                height: size.clone(),
                width: size,
            },
            light: ThemeStyle {
                border_color: "#ccc".to_string(),
                after: ThemeAttachment {
                    color: "red".to_string(),
                },
            },
            dark: ThemeStyle {
                border_color: "#999".to_string(),
                after: ThemeAttachment {
                    color: "blue".to_string(),
                },
            },
        }
    }

    pub fn icon_path(&self) -> &Path {
        &self.after.content_icon_path
    }
}

#[derive(Debug, Clone)]
struct DecorationEntry {
    handle: DecorationHandle,
    options: RenderOptions,
}

/// Name to decoration-style cache.
#[derive(Debug, Default)]
pub struct DecorationCache {
    entries: HashMap<String, DecorationEntry>,
}

impl DecorationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for `name`, creating the style on first use.
    ///
    /// `rasterize` is only called on a miss; its error means the icon is
    /// unavailable and nothing is registered.
    pub fn get_handle<F>(
        &mut self,
        name: &str,
        font_size: u32,
        surface: &mut dyn DecorationSurface,
        rasterize: F,
    ) -> Result<DecorationHandle, RasterizeError>
    where
        F: FnOnce(&str) -> Result<PathBuf, RasterizeError>,
    {
        if let Some(entry) = self.entries.get(name) {
            return Ok(entry.handle);
        }

        let icon_path = rasterize(name)?;
        let options = RenderOptions::for_icon(&icon_path, font_size);
        let handle = surface.create_decoration(&options);
        log::debug!("Created decoration {:?} for {}", handle, name);
        self.entries
            .insert(name.to_string(), DecorationEntry { handle, options });
        Ok(handle)
    }

    /// Existing handle for `name`, without creating one.
    pub fn handle(&self, name: &str) -> Option<DecorationHandle> {
        self.entries.get(name).map(|entry| entry.handle)
    }

    /// Options the style for `name` was created from.
    pub fn render_options(&self, name: &str) -> Option<&RenderOptions> {
        self.entries.get(name).map(|entry| &entry.options)
    }

    /// Dispose every registered style and forget them. Returns how many were released.
    pub fn dispose_all(&mut self, surface: &mut dyn DecorationSurface) -> usize {
        let count = self.entries.len();
        for (name, entry) in self.entries.drain() {
            log::trace!("Disposing decoration {:?} for {}", entry.handle, name);
            surface.dispose_decoration(entry.handle);
        }
        if count > 0 {
            log::debug!("Disposed {} decorations", count);
        }
        count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
