//! UFO font source for the icon set

use super::outline::{to_contours, GlyphOutline};
use super::{ASCENDER, DESCENDER, UNITS_PER_EM};
use norad::fontinfo::NonNegativeIntegerOrFloat;
use norad::{Font, FontInfo, Glyph};

/// Build a single-master UFO holding one glyph per icon plus `.notdef`
pub fn build_ufo(glyphs: &[GlyphOutline], family_name: &str) -> Font {
    let mut font = Font::new();
    font.font_info = font_info(family_name);

    let layer = font.default_layer_mut();

    let mut notdef = Glyph::new(".notdef");
    notdef.width = UNITS_PER_EM / 2.0;
    layer.insert_glyph(notdef);

    for outline in glyphs {
        let mut glyph = Glyph::new(&outline.name);
        glyph.width = outline.advance_width;
        glyph.codepoints.insert(outline.codepoint);
        glyph.contours = to_contours(&outline.path);
        layer.insert_glyph(glyph);
    }

    font
}

fn font_info(family_name: &str) -> FontInfo {
    let mut info = FontInfo::default();
    info.family_name = Some(family_name.to_string());
    info.style_name = Some("Regular".to_string());
    info.units_per_em = NonNegativeIntegerOrFloat::new(UNITS_PER_EM);
    info.ascender = Some(ASCENDER);
    info.descender = Some(DESCENDER);
    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::BezPath;

    fn outline(name: &str, codepoint: char) -> GlyphOutline {
        GlyphOutline {
            name: name.to_string(),
            codepoint,
            advance_width: 1000.0,
            path: BezPath::from_svg("M0 0L1000 0L1000 850Z").unwrap(),
        }
    }

    #[test]
    fn test_build_ufo() {
        let glyphs = [outline("home-icon", '\u{F101}'), outline("search", '\u{F102}')];
        let font = build_ufo(&glyphs, "iconfont");

        assert_eq!(font.font_info.family_name.as_deref(), Some("iconfont"));
        assert_eq!(font.font_info.ascender, Some(ASCENDER));

        let layer = font.default_layer();
        assert_eq!(layer.len(), 3);

        let search = layer.get_glyph("search").expect("search glyph");
        assert!(search.codepoints.contains('\u{F102}'));
        assert_eq!(search.contours.len(), 1);
        assert_eq!(search.width, 1000.0);
        assert!(layer.get_glyph(".notdef").is_some());
    }
}
