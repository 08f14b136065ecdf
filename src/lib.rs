//! icon-lens: inline icon-font glyph decorations for text documents.
//!
//! The engine scans documents for `icon-*` class-name tokens, resolves each
//! token to a glyph in a remotely hosted icon font, rasterizes the glyph to a
//! cached SVG and hands grouped decoration ranges to a host surface. It also
//! offers icon-name completions with glyph previews.
//!
//! Host editors plug in through the traits in [`host`]; the `icon-lens`
//! binary is one such host.

pub mod activation;
pub mod cli;
pub mod completion;
pub mod controller;
pub mod debug;
pub mod decoration;
pub mod host;
pub mod http;
pub mod loader;
pub mod rasterizer;
pub mod scanner;
pub mod scheduler;
pub mod session;

pub use icon_lens_config::{ActivationMode, Config};
pub use icon_lens_fonts::FontContext;

pub use activation::{Activation, check_activation};
pub use completion::{CompletionItem, provide_completions};
pub use controller::{HostEvent, RefreshController, RefreshReport};
pub use decoration::{DecorationCache, RenderOptions};
pub use host::{DecorationHandle, DecorationSurface, SourceDocument, TextDocument, TokenRange};
pub use loader::{FontLoader, LoadError, ResourceFetcher};
pub use rasterizer::{GlyphRasterizer, RasterizeError};
pub use scanner::{TokenOccurrence, scan};
pub use session::Session;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
