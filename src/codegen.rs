//! TypeScript module generation
//!
//! The generated module declares the icon font, one attribute selector per
//! icon and an element factory per icon. Output is a pure function of its
//! inputs so regenerated modules diff cleanly.

use crate::font::{FontArtifact, FontFormat};
use crate::glyphs::GlyphAssignment;
use crate::naming::accessor_name;
use std::fmt::Write;

/// File name of the generated module inside the output directory
pub const MODULE_FILE_NAME: &str = "index.ts";

/// Tag name of generated icon elements
pub const ICON_TAG: &str = "ui-icon";

/// Prefix of the per-icon attribute
pub const ATTRIBUTE_PREFIX: &str = "ui-";

/// A font reference in the generated declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSource {
    pub format: FontFormat,
    pub hash: Option<String>,
}

impl From<&FontArtifact> for FontSource {
    fn from(artifact: &FontArtifact) -> Self {
        Self {
            format: artifact.format,
            hash: artifact.hash.clone(),
        }
    }
}

/// Render the output module.
///
/// `base_path` is the URL prefix the placed fonts are served under. Fonts are
/// declared in [`FontFormat`] order whatever order they are passed in; glyphs
/// keep their given order.
pub fn generate_module(
    base_path: &str,
    fonts: &[FontSource],
    glyphs: &[GlyphAssignment],
) -> String {
    let mut fonts = fonts.to_vec();
    fonts.sort_by_key(|font| font.format);
    fonts.dedup_by_key(|font| font.format);

    let base_path = base_path.trim_end_matches('/');
    let mut out = String::new();

    out.push_str("import { select, style, content, Font, fontFamily, fontWeight, fontStyle } from '@acryps/style';\n\n");
    out.push('\n');

    out.push_str("export const iconFont = new Font('icons', fontWeight('normal'), fontStyle('normal'))");
    for font in &fonts {
        let mut url = format!("{base_path}/{}", font.format.placed_file_name());
        if let Some(hash) = &font.hash {
            let _ = write!(url, "?{hash}");
        }
        let _ = write!(
            out,
            "\n\t.addSource({}, '{}')",
            quote(&url),
            font.format.css_format()
        );
    }
    out.push_str(";\n\n");

    let _ = writeln!(out, "export const icons = () => select('{ICON_TAG}',");
    out.push_str("\tfontFamily(iconFont.name),\n");
    out.push_str("\tfontWeight('normal'),\n\n");
    out.push_str("\tstyle(':empty').before('?'),\n\n");
    for glyph in glyphs {
        let _ = writeln!(
            out,
            "\tstyle('[{ATTRIBUTE_PREFIX}{}]').before('{}'),",
            glyph.identifier,
            glyph.escape()
        );
    }
    out.push_str(");\n\n");

    out.push_str("const createIconElement = (name: string) => {\n");
    let _ = writeln!(out, "\tconst element = document.createElement('{ICON_TAG}');");
    let _ = writeln!(out, "\telement.setAttribute(`{ATTRIBUTE_PREFIX}${{name}}`, '');\n");
    out.push_str("\treturn element;\n");
    out.push_str("};\n\n");

    for glyph in glyphs {
        let _ = writeln!(
            out,
            "export const {} = () => createIconElement('{}');",
            accessor_name(&glyph.identifier),
            glyph.identifier
        );
    }

    out
}

/// Single-quoted TypeScript string literal
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}
