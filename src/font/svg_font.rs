//! SVG font output
//!
//! SVG fonts share the UFO's y-up coordinate system, so glyph outlines are
//! written as-is.

use super::outline::GlyphOutline;
use super::{ASCENDER, DESCENDER, UNITS_PER_EM};
use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::path::Path;

pub fn render_svg_font(glyphs: &[GlyphOutline], font_name: &str) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    let units_per_em = UNITS_PER_EM.to_string();

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))?;

    let mut svg = BytesStart::new("svg");
    svg.push_attribute(("xmlns", "http://www.w3.org/2000/svg"));
    writer.write_event(Event::Start(svg))?;
    writer.write_event(Event::Start(BytesStart::new("defs")))?;

    let mut font = BytesStart::new("font");
    font.push_attribute(("id", font_name));
    font.push_attribute(("horiz-adv-x", units_per_em.as_str()));
    writer.write_event(Event::Start(font))?;

    let mut face = BytesStart::new("font-face");
    face.push_attribute(("font-family", font_name));
    face.push_attribute(("font-weight", "400"));
    face.push_attribute(("font-stretch", "normal"));
    face.push_attribute(("units-per-em", units_per_em.as_str()));
    face.push_attribute(("ascent", ASCENDER.to_string().as_str()));
    face.push_attribute(("descent", DESCENDER.to_string().as_str()));
    writer.write_event(Event::Empty(face))?;

    let mut missing = BytesStart::new("missing-glyph");
    missing.push_attribute(("horiz-adv-x", "0"));
    writer.write_event(Event::Empty(missing))?;

    for outline in glyphs {
        let mut glyph = BytesStart::new("glyph");
        glyph.push_attribute(("glyph-name", outline.name.as_str()));
        glyph.push_attribute(("unicode", outline.codepoint.to_string().as_str()));
        glyph.push_attribute(("horiz-adv-x", outline.advance_width.to_string().as_str()));
        glyph.push_attribute(("d", outline.path.to_svg().as_str()));
        writer.write_event(Event::Empty(glyph))?;
    }

    writer.write_event(Event::End(BytesEnd::new("font")))?;
    writer.write_event(Event::End(BytesEnd::new("defs")))?;
    writer.write_event(Event::End(BytesEnd::new("svg")))?;

    Ok(String::from_utf8(writer.into_inner())?)
}

pub fn write_svg_font(glyphs: &[GlyphOutline], font_name: &str, path: &Path) -> Result<()> {
    let text = render_svg_font(glyphs, font_name)?;
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::SvgDocument;
    use kurbo::BezPath;

    #[test]
    fn test_svg_font_lists_glyphs() {
        let glyphs = vec![GlyphOutline {
            name: "home-icon".to_string(),
            codepoint: '\u{F101}',
            advance_width: 1000.0,
            path: BezPath::from_svg("M0 0L1000 0L500 850Z").unwrap(),
        }];

        let text = render_svg_font(&glyphs, "iconfont").unwrap();
        let document = SvgDocument::parse(&text, "iconfont.svg").unwrap();
        let elements = document.elements().unwrap();

        let face = elements.iter().find(|e| e.name == "font-face").unwrap();
        assert_eq!(face.attribute("units-per-em"), Some("1000"));
        assert_eq!(face.attribute("descent"), Some("-150"));

        let glyph = elements.iter().find(|e| e.name == "glyph").unwrap();
        assert_eq!(glyph.attribute("glyph-name"), Some("home-icon"));
        assert_eq!(glyph.attribute("unicode"), Some("\u{F101}"));
        assert_eq!(glyph.attribute("horiz-adv-x"), Some("1000"));
        assert!(glyph.attribute("d").is_some_and(|d| d.starts_with('M')));
    }
}
