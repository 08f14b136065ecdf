//! Icon-name completion with glyph previews.

use serde::Serialize;
use std::path::Path;
use url::Url;

use crate::host::{DecorationSurface, TextDocument};
use crate::session::Session;

/// Completion is offered when the text before the cursor ends with this.
pub const TRIGGER_TOKEN: &str = "icon-";

/// Character that makes the host ask for completions.
pub const TRIGGER_CHARACTER: char = '-';

/// Kind reported to the host for each suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompletionItemKind {
    Constant,
}

/// One suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItem {
    /// Full icon name
    pub label: String,
    pub kind: CompletionItemKind,
    /// Markdown preview image of the glyph
    pub documentation: Option<String>,
    /// Text inserted after the typed `icon-`
    pub insert_text: String,
}

/// Text of `line` before column `character`, counted in UTF-16 units.
///
/// A column inside a surrogate pair excludes that pair.
pub fn line_prefix(document: &dyn TextDocument, line: usize, character: usize) -> Option<String> {
    let text = document.line_text(line)?;
    let mut columns = 0;
    for (idx, ch) in text.char_indices() {
        columns += ch.len_utf16();
        if columns > character {
            return Some(text[..idx].to_string());
        }
    }
    Some(text.to_string())
}

fn preview_uri(path: &Path) -> String {
    Url::from_file_path(path)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| path.display().to_string())
}

/// Suggestions for `line_prefix`, or `None` when it does not end with the trigger.
///
/// Every icon in the codepoint table whose decoration resolves is offered,
/// in stylesheet declaration order. Resolving creates the decoration, so the preview reuses
/// the same artifact the inline decoration shows.
pub fn provide_completions(
    line_prefix: &str,
    session: &mut Session,
    surface: &mut dyn DecorationSurface,
) -> Option<Vec<CompletionItem>> {
    if !line_prefix.ends_with(TRIGGER_TOKEN) {
        return None;
    }

    let names: Vec<String> = match session.font() {
        Some(font) => font
            .codepoints()
            .iter()
            .map(|(name, _)| name.to_string())
            .collect(),
        None => Vec::new(),
    };

    let mut items = Vec::with_capacity(names.len());
    for name in names {
        if let Err(e) = session.decoration(&name, surface) {
            log::debug!("No completion for {}: {}", name, e);
            continue;
        }

        let documentation = session
            .decorations()
            .render_options(&name)
            .map(|options| format!("![{}]({})", name, preview_uri(options.icon_path())));
        let insert_text = name
            .strip_prefix(TRIGGER_TOKEN)
            .unwrap_or(&name)
            .to_string();

        items.push(CompletionItem {
            label: name,
            kind: CompletionItemKind::Constant,
            documentation,
            insert_text,
        });
    }

    log::debug!("Offering {} icon completions", items.len());
    Some(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{RecordingSurface, SourceDocument};
    use icon_lens_config::Config;
    use icon_lens_fonts::FontContext;
    use icon_lens_fonts::testing::TestFontBuilder;
    use tempfile::TempDir;

    fn session(temp_dir: &TempDir) -> Session {
        let config = Config {
            cache_dir: Some(temp_dir.path().to_path_buf()),
            ..Config::default()
        };
        let mut session = Session::new(config);
        let bytes = TestFontBuilder::new()
            .square_glyph(0xe901)
            .triangle_glyph(0xe902)
            .build();
        let css = r#".icon-star:before{content:"\e902"}.icon-home:before{content:"\e901"}.icon-ghost:before{content:"\e9ff"}"#;
        session.replace_font(FontContext::from_sources(bytes, css).unwrap());
        session
    }

    #[test]
    fn test_requires_trigger() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut session = session(&temp_dir);
        let mut surface = RecordingSurface::new();
        assert!(provide_completions("class=\"icon", &mut session, &mut surface).is_none());
        assert!(provide_completions("", &mut session, &mut surface).is_none());
        assert_eq!(surface.live_styles(), 0);
    }

    #[test]
    fn test_items_in_declaration_order_without_unresolvable() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut session = session(&temp_dir);
        let mut surface = RecordingSurface::new();

        let items = provide_completions("<i class=\"icon-", &mut session, &mut surface).unwrap();
        let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["icon-star", "icon-home"]);
        assert_eq!(items[0].insert_text, "star");
        assert_eq!(items[0].kind, CompletionItemKind::Constant);
    }

    #[cfg(unix)]
    #[test]
    fn test_documentation_points_at_artifact() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut session = session(&temp_dir);
        let mut surface = RecordingSurface::new();

        let items = provide_completions("icon-", &mut session, &mut surface).unwrap();
        let doc = items[1].documentation.as_deref().unwrap();
        assert!(doc.starts_with("![icon-home](file://"));
        assert!(doc.ends_with("/icon-lens/icon-home.svg)"));
    }

    #[test]
    fn test_no_font_offers_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = Config {
            cache_dir: Some(temp_dir.path().to_path_buf()),
            ..Config::default()
        };
        let mut session = Session::new(config);
        let mut surface = RecordingSurface::new();
        assert_eq!(
            provide_completions("icon-", &mut session, &mut surface),
            Some(Vec::new())
        );
    }

    #[test]
    fn test_line_prefix_counts_utf16_units() {
        let doc = SourceDocument::new("mem://a", "ü <i class=\"icon-home\">");
        assert_eq!(
            line_prefix(&doc, 0, 17).as_deref(),
            Some("ü <i class=\"icon-")
        );
        assert_eq!(line_prefix(&doc, 3, 0), None);

        let astral = SourceDocument::new("mem://b", "\u{1F600}<i class=\"icon-home\">");
        assert_eq!(
            line_prefix(&astral, 0, 17).as_deref(),
            Some("\u{1F600}<i class=\"icon-")
        );
        assert_eq!(line_prefix(&astral, 0, 1).as_deref(), Some(""));
        assert_eq!(
            line_prefix(&astral, 0, 500).as_deref(),
            Some("\u{1F600}<i class=\"icon-home\">")
        );
    }
}
