//! Host editor seam.
//!
//! The engine never talks to an editor directly. Documents are read through
//! [`TextDocument`] and decorations are pushed through [`DecorationSurface`];
//! an embedding editor (or the CLI) supplies the implementations.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::decoration::RenderOptions;

/// A span on one line, in zero-based UTF-16 columns (end exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TokenRange {
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

/// Read-only line access to a text document.
pub trait TextDocument {
    /// Identity of the document; edit events are matched against it.
    fn uri(&self) -> &str;

    fn line_count(&self) -> usize;

    /// Text of `line` without its line terminator.
    fn line_text(&self, line: usize) -> Option<&str>;
}

/// In-memory document snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    uri: String,
    lines: Vec<String>,
}

impl SourceDocument {
    pub fn new(uri: impl Into<String>, text: &str) -> Self {
        Self {
            uri: uri.into(),
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Read a snapshot of the file at `path`.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(path.display().to_string(), &text))
    }
}

impl TextDocument for SourceDocument {
    fn uri(&self) -> &str {
        &self.uri
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_text(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(String::as_str)
    }
}

/// Opaque identifier of a decoration style created on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DecorationHandle(pub u64);

/// Host rendering surface.
pub trait DecorationSurface {
    /// Create a decoration style; the returned handle stays valid until disposed.
    fn create_decoration(&mut self, options: &RenderOptions) -> DecorationHandle;

    /// Replace the ranges `handle` is drawn at in the active view.
    fn set_decorations(&mut self, handle: DecorationHandle, ranges: &[TokenRange]);

    /// Release the style behind `handle`.
    fn dispose_decoration(&mut self, handle: DecorationHandle);
}

/// Surface that keeps every style and range set in memory.
///
/// Backs the CLI output and lets callers inspect what a refresh applied.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    next_id: u64,
    styles: HashMap<DecorationHandle, RenderOptions>,
    applied: BTreeMap<DecorationHandle, Vec<TokenRange>>,
    disposed: Vec<DecorationHandle>,
    apply_calls: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options of a live (not disposed) style.
    pub fn style(&self, handle: DecorationHandle) -> Option<&RenderOptions> {
        self.styles.get(&handle)
    }

    pub fn live_styles(&self) -> usize {
        self.styles.len()
    }

    /// Ranges most recently applied for `handle` (empty when cleared).
    pub fn ranges(&self, handle: DecorationHandle) -> &[TokenRange] {
        self.applied.get(&handle).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Handles that currently have at least one range applied.
    pub fn decorated(&self) -> impl Iterator<Item = (DecorationHandle, &[TokenRange])> {
        self.applied
            .iter()
            .filter(|(_, ranges)| !ranges.is_empty())
            .map(|(handle, ranges)| (*handle, ranges.as_slice()))
    }

    pub fn disposed(&self) -> &[DecorationHandle] {
        &self.disposed
    }

    /// Number of `set_decorations` calls received.
    pub fn apply_calls(&self) -> usize {
        self.apply_calls
    }
}

impl DecorationSurface for RecordingSurface {
    fn create_decoration(&mut self, options: &RenderOptions) -> DecorationHandle {
        self.next_id += 1;
        let handle = DecorationHandle(self.next_id);
        self.styles.insert(handle, options.clone());
        handle
    }

    fn set_decorations(&mut self, handle: DecorationHandle, ranges: &[TokenRange]) {
        self.apply_calls += 1;
        if !self.styles.contains_key(&handle) {
            log::warn!("set_decorations on unknown or disposed handle {:?}", handle);
            return;
        }
        self.applied.insert(handle, ranges.to_vec());
    }

    fn dispose_decoration(&mut self, handle: DecorationHandle) {
        if self.styles.remove(&handle).is_some() {
            self.applied.remove(&handle);
            self.disposed.push(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_source_document_lines() {
        let doc = SourceDocument::new("mem://a", "first\r\nsecond\n\nfourth");
        assert_eq!(doc.uri(), "mem://a");
        assert_eq!(doc.line_count(), 4);
        assert_eq!(doc.line_text(0), Some("first"));
        assert_eq!(doc.line_text(2), Some(""));
        assert_eq!(doc.line_text(4), None);
    }

    #[test]
    fn test_recording_surface_lifecycle() {
        let mut surface = RecordingSurface::new();
        let options = RenderOptions::for_icon(&PathBuf::from("/tmp/icon-home.svg"), 14);
        let a = surface.create_decoration(&options);
        let b = surface.create_decoration(&options);
        assert_ne!(a, b);
        assert_eq!(surface.live_styles(), 2);

        let range = TokenRange {
            line: 0,
            start: 2,
            end: 11,
        };
        surface.set_decorations(a, &[range]);
        assert_eq!(surface.ranges(a), &[range]);
        assert_eq!(surface.decorated().count(), 1);

        surface.dispose_decoration(a);
        surface.dispose_decoration(a);
        assert_eq!(surface.disposed(), &[a]);
        assert!(surface.ranges(a).is_empty());
        assert!(surface.style(a).is_none());
        assert!(surface.style(b).is_some());
    }
}
