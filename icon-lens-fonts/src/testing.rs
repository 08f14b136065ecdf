//! In-memory TrueType font builder for tests.
//!
//! Produces a minimal `glyf`-flavoured font: glyph 0 is an empty `.notdef`,
//! every added glyph is a single closed contour of on-curve points, and a
//! format 4 `cmap` maps each glyph's codepoint. Units per em is 1024 so
//! outline coordinates come out unscaled at the SVG render size.

const UNITS_PER_EM: u16 = 1024;

#[derive(Debug, Clone)]
struct TestGlyph {
    codepoint: u32,
    points: Vec<(i16, i16)>,
}

/// Builder for tiny single-contour TrueType fonts.
#[derive(Debug, Clone, Default)]
pub struct TestFontBuilder {
    glyphs: Vec<TestGlyph>,
}

impl TestFontBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a glyph for a BMP `codepoint` with one contour through `points`.
    pub fn glyph(mut self, codepoint: u32, points: &[(i16, i16)]) -> Self {
        assert!(codepoint < 0xFFFF, "test fonts only map BMP codepoints");
        assert!(points.len() >= 3, "a contour needs at least three points");
        self.glyphs.push(TestGlyph {
            codepoint,
            points: points.to_vec(),
        });
        self
    }

    /// Add an 800x700 square glyph.
    pub fn square_glyph(self, codepoint: u32) -> Self {
        self.glyph(codepoint, &[(100, 0), (100, 700), (900, 700), (900, 0)])
    }

    /// Add a triangle glyph.
    pub fn triangle_glyph(self, codepoint: u32) -> Self {
        self.glyph(codepoint, &[(100, 0), (512, 800), (924, 0)])
    }

    /// Serialize the font. Glyph ids follow insertion order starting at 1.
    pub fn build(&self) -> Vec<u8> {
        let num_glyphs = (self.glyphs.len() + 1) as u16;

        // Glyph 0 (.notdef) is empty: its start and end offsets are both 0
        let mut glyf = Vec::new();
        let mut loca = vec![0u32, 0u32];
        for glyph in &self.glyphs {
            glyf.extend(encode_simple_glyph(&glyph.points));
            while glyf.len() % 4 != 0 {
                glyf.push(0);
            }
            loca.push(glyf.len() as u32);
        }
        let loca_bytes: Vec<u8> = loca.iter().flat_map(|o| o.to_be_bytes()).collect();

        let tables: Vec<([u8; 4], Vec<u8>)> = vec![
            (*b"cmap", self.cmap()),
            (*b"glyf", glyf),
            (*b"head", head()),
            (*b"hhea", hhea(num_glyphs)),
            (*b"hmtx", hmtx(num_glyphs)),
            (*b"loca", loca_bytes),
            (*b"maxp", maxp(num_glyphs, self.max_points())),
        ];
        assemble(&tables)
    }

    fn max_points(&self) -> u16 {
        self.glyphs
            .iter()
            .map(|g| g.points.len() as u16)
            .max()
            .unwrap_or(0)
    }

    fn cmap(&self) -> Vec<u8> {
        let mut mapped: Vec<(u16, u16)> = self
            .glyphs
            .iter()
            .enumerate()
            .map(|(i, g)| (g.codepoint as u16, (i + 1) as u16))
            .collect();
        mapped.sort_unstable();

        // One single-codepoint segment per glyph plus the terminating 0xFFFF segment
        let seg_count = (mapped.len() + 1) as u16;
        let entry_selector = 15 - seg_count.leading_zeros() as u16;
        let search_range = 2 * (1u16 << entry_selector);
        let range_shift = 2 * seg_count - search_range;

        let mut end_codes = Vec::new();
        let mut start_codes = Vec::new();
        let mut deltas = Vec::new();
        for (codepoint, glyph_id) in &mapped {
            end_codes.push(*codepoint);
            start_codes.push(*codepoint);
            deltas.push(glyph_id.wrapping_sub(*codepoint));
        }
        end_codes.push(0xFFFF);
        start_codes.push(0xFFFF);
        deltas.push(1);

        let mut sub = Vec::new();
        put_u16(&mut sub, 4); // format
        put_u16(&mut sub, 16 + 8 * seg_count); // length
        put_u16(&mut sub, 0); // language
        put_u16(&mut sub, seg_count * 2);
        put_u16(&mut sub, search_range);
        put_u16(&mut sub, entry_selector);
        put_u16(&mut sub, range_shift);
        end_codes.iter().for_each(|v| put_u16(&mut sub, *v));
        put_u16(&mut sub, 0); // reservedPad
        start_codes.iter().for_each(|v| put_u16(&mut sub, *v));
        deltas.iter().for_each(|v| put_u16(&mut sub, *v));
        (0..seg_count).for_each(|_| put_u16(&mut sub, 0)); // idRangeOffset

        let mut cmap = Vec::new();
        put_u16(&mut cmap, 0); // version
        put_u16(&mut cmap, 1); // numTables
        put_u16(&mut cmap, 3); // platform: Windows
        put_u16(&mut cmap, 1); // encoding: Unicode BMP
        put_u32(&mut cmap, 12); // subtable offset
        cmap.extend(sub);
        cmap
    }
}

fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn put_i16(out: &mut Vec<u8>, value: i16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn encode_simple_glyph(points: &[(i16, i16)]) -> Vec<u8> {
    let x_min = points.iter().map(|p| p.0).min().unwrap_or(0);
    let x_max = points.iter().map(|p| p.0).max().unwrap_or(0);
    let y_min = points.iter().map(|p| p.1).min().unwrap_or(0);
    let y_max = points.iter().map(|p| p.1).max().unwrap_or(0);

    let mut out = Vec::new();
    put_i16(&mut out, 1); // numberOfContours
    put_i16(&mut out, x_min);
    put_i16(&mut out, y_min);
    put_i16(&mut out, x_max);
    put_i16(&mut out, y_max);
    put_u16(&mut out, points.len() as u16 - 1); // endPtsOfContours[0]
    put_u16(&mut out, 0); // instructionLength
    // ON_CURVE only: coordinates are full i16 deltas
    out.extend(std::iter::repeat_n(0x01u8, points.len()));
    let mut prev = 0i16;
    for (x, _) in points {
        put_i16(&mut out, x - prev);
        prev = *x;
    }
    prev = 0;
    for (_, y) in points {
        put_i16(&mut out, y - prev);
        prev = *y;
    }
    out
}

fn head() -> Vec<u8> {
    let mut out = Vec::new();
    put_u32(&mut out, 0x0001_0000); // version
    put_u32(&mut out, 0x0001_0000); // fontRevision
    put_u32(&mut out, 0); // checkSumAdjustment
    put_u32(&mut out, 0x5F0F_3CF5); // magicNumber
    put_u16(&mut out, 0x000B); // flags
    put_u16(&mut out, UNITS_PER_EM);
    out.extend_from_slice(&[0u8; 16]); // created + modified
    put_i16(&mut out, 0); // xMin
    put_i16(&mut out, -64); // yMin
    put_i16(&mut out, 1024); // xMax
    put_i16(&mut out, 960); // yMax
    put_u16(&mut out, 0); // macStyle
    put_u16(&mut out, 8); // lowestRecPPEM
    put_i16(&mut out, 2); // fontDirectionHint
    put_i16(&mut out, 1); // indexToLocFormat: long offsets
    put_i16(&mut out, 0); // glyphDataFormat
    out
}

fn hhea(num_glyphs: u16) -> Vec<u8> {
    let mut out = Vec::new();
    put_u32(&mut out, 0x0001_0000); // version
    put_i16(&mut out, 960); // ascender
    put_i16(&mut out, -64); // descender
    put_i16(&mut out, 0); // lineGap
    put_u16(&mut out, UNITS_PER_EM); // advanceWidthMax
    put_i16(&mut out, 0); // minLeftSideBearing
    put_i16(&mut out, 0); // minRightSideBearing
    put_i16(&mut out, 1024); // xMaxExtent
    put_i16(&mut out, 1); // caretSlopeRise
    put_i16(&mut out, 0); // caretSlopeRun
    put_i16(&mut out, 0); // caretOffset
    out.extend_from_slice(&[0u8; 8]); // reserved
    put_i16(&mut out, 0); // metricDataFormat
    put_u16(&mut out, num_glyphs); // numberOfHMetrics
    out
}

fn hmtx(num_glyphs: u16) -> Vec<u8> {
    let mut out = Vec::new();
    for _ in 0..num_glyphs {
        put_u16(&mut out, UNITS_PER_EM); // advanceWidth
        put_i16(&mut out, 0); // lsb
    }
    out
}

fn maxp(num_glyphs: u16, max_points: u16) -> Vec<u8> {
    let mut out = Vec::new();
    put_u32(&mut out, 0x0001_0000); // version 1.0
    put_u16(&mut out, num_glyphs);
    put_u16(&mut out, max_points); // maxPoints
    put_u16(&mut out, 1); // maxContours
    put_u16(&mut out, 0); // maxCompositePoints
    put_u16(&mut out, 0); // maxCompositeContours
    put_u16(&mut out, 2); // maxZones
    put_u16(&mut out, 0); // maxTwilightPoints
    put_u16(&mut out, 0); // maxStorage
    put_u16(&mut out, 0); // maxFunctionDefs
    put_u16(&mut out, 0); // maxInstructionDefs
    put_u16(&mut out, 0); // maxStackElements
    put_u16(&mut out, 0); // maxSizeOfInstructions
    put_u16(&mut out, 0); // maxComponentElements
    put_u16(&mut out, 0); // maxComponentDepth
    out
}

fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

/// Lay out the table directory followed by 4-byte aligned table data.
/// `tables` must already be sorted by tag.
fn assemble(tables: &[([u8; 4], Vec<u8>)]) -> Vec<u8> {
    let num_tables = tables.len() as u16;
    let entry_selector = 15 - num_tables.leading_zeros() as u16;
    let search_range = 16 * (1u16 << entry_selector);
    let range_shift = 16 * num_tables - search_range;

    let mut out = Vec::new();
    put_u32(&mut out, 0x0001_0000); // sfntVersion
    put_u16(&mut out, num_tables);
    put_u16(&mut out, search_range);
    put_u16(&mut out, entry_selector);
    put_u16(&mut out, range_shift);

    let mut offset = 12 + 16 * tables.len();
    let mut body = Vec::new();
    for (tag, data) in tables {
        out.extend_from_slice(tag);
        put_u32(&mut out, checksum(data));
        put_u32(&mut out, offset as u32);
        put_u32(&mut out, data.len() as u32);

        body.extend_from_slice(data);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        offset = 12 + 16 * tables.len() + body.len();
    }
    out.extend(body);
    out
}
