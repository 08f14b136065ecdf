//! Owned font data types.

use std::sync::Arc;
use swash::{CacheKey, FontRef};

use crate::error::FontError;

/// Owned font bytes plus the location of the face inside them.
///
/// The face offset and cache key are resolved once at construction, so
/// borrowing a `FontRef` later is infallible and keeps scaler caches warm.
#[derive(Clone)]
pub struct FontData {
    /// Raw font data bytes (TTF/OTF, already decompressed)
    pub data: Arc<Vec<u8>>,
    offset: u32,
    key: CacheKey,
}

impl std::fmt::Debug for FontData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontData")
            .field("data_len", &self.data.len())
            .field("offset", &self.offset)
            .finish()
    }
}

impl FontData {
    /// Parse font bytes. A collection contributes its first face.
    pub fn new(data: Vec<u8>) -> Result<Self, FontError> {
        let (offset, key) = {
            let font_ref = FontRef::from_index(&data, 0)
                .ok_or(FontError::InvalidFont { len: data.len() })?;
            (font_ref.offset, font_ref.key)
        };

        Ok(FontData {
            data: Arc::new(data),
            offset,
            key,
        })
    }

    /// Borrow a swash reference for charmap lookups and scaling.
    pub fn font_ref(&self) -> FontRef<'_> {
        FontRef {
            data: self.data.as_slice(),
            offset: self.offset,
            key: self.key,
        }
    }
}
