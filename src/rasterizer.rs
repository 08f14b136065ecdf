//! Glyph Rasterizer: turns an icon name into an SVG artifact on disk.
//!
//! Artifacts live at `<storage root>/icon-lens/<icon name>.svg`. An existing
//! artifact is returned as-is without consulting the font, so a changed icon
//! set only shows up after the artifact directory is cleared.

use std::path::{Path, PathBuf};

use icon_lens_fonts::{FontContext, GlyphError};
use thiserror::Error;

/// Directory under the storage root that holds the artifacts.
pub const ARTIFACT_DIR_NAME: &str = "icon-lens";

/// Why an icon could not be rasterized.
#[derive(Debug, Error)]
pub enum RasterizeError {
    #[error("no icon font is loaded")]
    NoFont,

    #[error("'{0}' cannot be used as an artifact file name")]
    InvalidName(String),

    #[error(transparent)]
    Glyph(#[from] GlyphError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes and finds cached glyph artifacts.
#[derive(Debug, Clone)]
pub struct GlyphRasterizer {
    artifact_dir: PathBuf,
    fill: String,
}

impl GlyphRasterizer {
    /// Rasterizer storing artifacts below `storage_root`, filled with `fill`.
    pub fn new(storage_root: &Path, fill: impl Into<String>) -> Self {
        Self {
            artifact_dir: storage_root.join(ARTIFACT_DIR_NAME),
            fill: fill.into(),
        }
    }

    pub fn artifact_dir(&self) -> &Path {
        &self.artifact_dir
    }

    pub fn fill(&self) -> &str {
        &self.fill
    }

    /// Deterministic artifact path for `name`.
    ///
    /// Names are matched tokens, but table entries come from a remote
    /// stylesheet, so anything that could escape the directory is refused.
    pub fn artifact_path(&self, name: &str) -> Result<PathBuf, RasterizeError> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(RasterizeError::InvalidName(name.to_string()));
        }
        Ok(self.artifact_dir.join(format!("{name}.svg")))
    }

    /// Return the artifact for `name`, rendering it from `font` on a cache miss.
    pub fn rasterize(
        &self,
        name: &str,
        font: Option<&FontContext>,
    ) -> Result<PathBuf, RasterizeError> {
        let path = self.artifact_path(name)?;
        if path.is_file() {
            log::trace!("Artifact cache hit for {}", name);
            return Ok(path);
        }

        let font = font.ok_or(RasterizeError::NoFont)?;
        let svg = font.render_svg(name, &self.fill)?;
        self.write_atomic(&path, svg.as_bytes())?;
        log::debug!("Rasterized {} to {}", name, path.display());
        Ok(path)
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> Result<(), RasterizeError> {
        let io_error = |source| RasterizeError::Io {
            path: path.to_path_buf(),
            source,
        };
        std::fs::create_dir_all(&self.artifact_dir).map_err(io_error)?;

        // A reader never sees a half-written artifact
        let temp_path = path.with_extension("svg.tmp");
        std::fs::write(&temp_path, contents).map_err(io_error)?;
        std::fs::rename(&temp_path, path).map_err(io_error)?;
        Ok(())
    }
}
