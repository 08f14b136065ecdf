//! Glyph outline to SVG serialization.
//!
//! Outlines are scaled to a 1024px em with the baseline at y=0 and the Y axis
//! flipped into SVG's downward orientation, then wrapped in a fixed square
//! view box.

use swash::FontRef;
use swash::scale::ScaleContext;
use swash::zeno::{Command, PathData, Vector};

/// Pixel size the outline is scaled to.
pub const SVG_FONT_SIZE: f32 = 1024.0;

/// View box covering the em square above a 64px descender band.
pub const SVG_VIEW_BOX: &str = "0 -960 1024 1024";

/// Format a coordinate with at most two decimals and no trailing zeros.
fn fmt_coord(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let text = format!("{:.2}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn push_point(out: &mut String, point: Vector) {
    out.push_str(&fmt_coord(point.x));
    out.push(' ');
    // Font outlines are Y-up; SVG is Y-down
    out.push_str(&fmt_coord(-point.y));
}

/// Serialize outline commands into SVG path data.
pub fn path_data<I>(commands: I) -> String
where
    I: IntoIterator<Item = Command>,
{
    let mut d = String::new();
    for command in commands {
        match command {
            Command::MoveTo(p) => {
                d.push('M');
                push_point(&mut d, p);
            }
            Command::LineTo(p) => {
                d.push('L');
                push_point(&mut d, p);
            }
            Command::QuadTo(c, p) => {
                d.push('Q');
                push_point(&mut d, c);
                d.push(' ');
                push_point(&mut d, p);
            }
            Command::CurveTo(c1, c2, p) => {
                d.push('C');
                push_point(&mut d, c1);
                d.push(' ');
                push_point(&mut d, c2);
                d.push(' ');
                push_point(&mut d, p);
            }
            Command::Close => d.push('Z'),
        }
    }
    d
}

/// Wrap path data in a minimal standalone SVG document.
pub fn svg_document(path_data: &str, fill: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{SVG_VIEW_BOX}" fill="{fill}"><path d="{path_data}" fill="{fill}" /></svg>"#
    )
}

/// Scale a glyph's outline and serialize it as path data.
///
/// Returns `None` when the font has no outline for the glyph.
pub fn glyph_path_data(font: FontRef<'_>, glyph_id: u16) -> Option<String> {
    let mut context = ScaleContext::new();
    let mut scaler = context
        .builder(font)
        .size(SVG_FONT_SIZE)
        .hint(false)
        .build();
    let outline = scaler.scale_outline(glyph_id)?;
    Some(path_data(outline.path().commands()))
}
