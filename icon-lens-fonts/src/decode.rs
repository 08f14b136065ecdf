//! Web-font container detection and decompression.

use crate::error::FontError;

/// Container format of a fetched font resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFormat {
    /// Plain TrueType/OpenType (or a collection)
    Sfnt,
    /// WOFF 1.0 (zlib-compressed tables)
    Woff,
    /// WOFF 2.0 (brotli-compressed, transformed tables)
    Woff2,
}

impl FontFormat {
    /// Detect the container format.
    ///
    /// The leading magic decides when it is recognisable; otherwise the
    /// location's file extension is used, and anything else is treated as sfnt.
    pub fn detect(bytes: &[u8], location: &str) -> Self {
        match bytes.get(..4) {
            Some(b"wOF2") => return FontFormat::Woff2,
            Some(b"wOFF") => return FontFormat::Woff,
            Some([0x00, 0x01, 0x00, 0x00]) | Some(b"OTTO") | Some(b"true") | Some(b"ttcf") => {
                return FontFormat::Sfnt;
            }
            _ => {}
        }

        // Strip query string and fragment before looking at the extension
        let path = location.split(['?', '#']).next().unwrap_or(location);
        let lower = path.to_ascii_lowercase();
        if lower.ends_with(".woff2") {
            FontFormat::Woff2
        } else if lower.ends_with(".woff") {
            FontFormat::Woff
        } else {
            FontFormat::Sfnt
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FontFormat::Sfnt => "sfnt",
            FontFormat::Woff => "WOFF",
            FontFormat::Woff2 => "WOFF2",
        }
    }
}

/// Convert fetched font bytes into uncompressed sfnt bytes.
pub fn decode_font(bytes: Vec<u8>, location: &str) -> Result<Vec<u8>, FontError> {
    let format = FontFormat::detect(&bytes, location);
    log::debug!(
        "Decoding {} bytes from {} as {}",
        bytes.len(),
        location,
        format.name()
    );

    match format {
        FontFormat::Sfnt => Ok(bytes),
        FontFormat::Woff => wuff::decompress_woff1(&bytes).map_err(|e| FontError::Decompress {
            format: format.name(),
            details: format!("{e:?}"),
        }),
        FontFormat::Woff2 => wuff::decompress_woff2(&bytes).map_err(|e| FontError::Decompress {
            format: format.name(),
            details: format!("{e:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::glyph_path_data;
    use crate::testing::TestFontBuilder;

    #[test]
    fn test_detect_by_magic() {
        assert_eq!(FontFormat::detect(b"wOF2rest", "font.bin"), FontFormat::Woff2);
        assert_eq!(FontFormat::detect(b"wOFFrest", "font.bin"), FontFormat::Woff);
        assert_eq!(FontFormat::detect(b"OTTOrest", "font.woff2"), FontFormat::Sfnt);
        assert_eq!(
            FontFormat::detect(&[0, 1, 0, 0, 0, 7], "icons.woff2"),
            FontFormat::Sfnt
        );
    }

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(
            FontFormat::detect(b"", "https://cdn.example.com/iconfont.woff2?v=3"),
            FontFormat::Woff2
        );
        assert_eq!(
            FontFormat::detect(b"xx", "https://cdn.example.com/ICONFONT.WOFF"),
            FontFormat::Woff
        );
        assert_eq!(FontFormat::detect(b"xx", "/tmp/icons.ttf"), FontFormat::Sfnt);
    }

    #[test]
    fn test_sfnt_passes_through() {
        let bytes = vec![0, 1, 0, 0, 1, 2, 3];
        let decoded = decode_font(bytes.clone(), "font.ttf").unwrap();
        assert_eq!(decoded, bytes);
    }

    /// Wrap sfnt bytes in a WOFF 1.0 container that stores every table uncompressed.
    fn wrap_woff1(sfnt: &[u8]) -> Vec<u8> {
        let be16 = |at: usize| u16::from_be_bytes([sfnt[at], sfnt[at + 1]]);
        let be32 = |at: usize| u32::from_be_bytes(sfnt[at..at + 4].try_into().unwrap());
        let num_tables = be16(4) as usize;
        let data_start = 44 + 20 * num_tables;

        let mut directory = Vec::new();
        let mut data = Vec::new();
        for i in 0..num_tables {
            let record = 12 + 16 * i;
            let offset = be32(record + 8) as usize;
            let length = be32(record + 12);
            directory.extend_from_slice(&sfnt[record..record + 4]); // tag
            directory.extend(((data_start + data.len()) as u32).to_be_bytes());
            directory.extend(length.to_be_bytes()); // compLength == origLength
            directory.extend(length.to_be_bytes());
            directory.extend_from_slice(&sfnt[record + 4..record + 8]); // checksum
            data.extend_from_slice(&sfnt[offset..offset + length as usize]);
            while data.len() % 4 != 0 {
                data.push(0);
            }
        }

        let mut out = Vec::new();
        out.extend_from_slice(b"wOFF");
        out.extend_from_slice(&sfnt[..4]); // flavor
        out.extend(((data_start + data.len()) as u32).to_be_bytes());
        out.extend((num_tables as u16).to_be_bytes());
        out.extend(0u16.to_be_bytes()); // reserved
        out.extend((sfnt.len() as u32).to_be_bytes());
        out.extend(1u16.to_be_bytes()); // majorVersion
        out.extend(0u16.to_be_bytes()); // minorVersion
        out.extend([0u8; 20]); // no metadata or private block
        out.extend(directory);
        out.extend(data);
        out
    }

    #[test]
    fn test_woff1_decodes_to_same_font() {
        let sfnt = TestFontBuilder::new()
            .square_glyph(0xe901)
            .triangle_glyph(0xe902)
            .build();
        let woff = wrap_woff1(&sfnt);
        assert_eq!(FontFormat::detect(&woff, "mem://icons"), FontFormat::Woff);

        let decoded = decode_font(woff, "mem://icons").unwrap();
        let original = swash::FontRef::from_index(&sfnt, 0).unwrap();
        let font = swash::FontRef::from_index(&decoded, 0).expect("decoded font should parse");
        for codepoint in [0xe901u32, 0xe902, 0xe903] {
            assert_eq!(
                font.charmap().map(codepoint),
                original.charmap().map(codepoint)
            );
        }
        for glyph_id in [1, 2] {
            assert_eq!(
                glyph_path_data(font, glyph_id),
                glyph_path_data(original, glyph_id)
            );
        }
    }

    #[test]
    fn test_truncated_woff1_is_error() {
        let mut woff = wrap_woff1(&TestFontBuilder::new().square_glyph(0xe901).build());
        woff.truncate(woff.len() - 4);
        let err = decode_font(woff, "font.woff").unwrap_err();
        assert!(matches!(err, FontError::Decompress { format: "WOFF", .. }));
    }

    #[test]
    fn test_corrupt_woff2_is_error() {
        let err = decode_font(b"wOF2garbage".to_vec(), "font.woff2").unwrap_err();
        assert!(matches!(err, FontError::Decompress { format: "WOFF2", .. }));
    }
}
