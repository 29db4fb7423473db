//! Private-use-area glyph allocation
//!
//! Each icon gets the codepoint `U+F100 + n`, where `n` is its 1-based
//! position in the ordered identifier list. The generated module spells it as
//! the escape `\uf1` followed by two hex digits, which bounds the range to
//! `01..=ff`.

use crate::core::errors::{PipelineError, PipelineResult};

/// Base of the private-use-area block the icons live in
pub const CODEPOINT_BASE: u32 = 0xF100;

/// Largest number of icons that fit the two-hex-digit suffix.
///
/// Indices are 1-based, so the suffixes run `01..=ff` and hold 255 icons. A
/// 256th icon would need the suffix `100`, which is outside the escape form,
/// so it is rejected rather than given a third digit.
pub const MAX_ICONS: usize = 0xFF;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphAssignment {
    pub identifier: String,
    /// 1-based position in the icon listing
    pub index: u8,
}

impl GlyphAssignment {
    /// The assigned Unicode codepoint
    pub fn codepoint(&self) -> char {
        // U+F101..=U+F1FF is inside the BMP private use area
        char::from_u32(CODEPOINT_BASE + u32::from(self.index))
            .unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    /// Two lowercase hex digits appended to the `\uf1` prefix
    pub fn suffix(&self) -> String {
        format!("{:02x}", self.index)
    }

    /// String-literal escape for the glyph, e.g. `\uf101`
    pub fn escape(&self) -> String {
        format!("\\uf1{}", self.suffix())
    }
}

/// Assign codepoints to identifiers in listing order.
///
/// Fails with [`PipelineError::Capacity`] instead of wrapping past `ff`.
pub fn allocate<I, S>(identifiers: I) -> PipelineResult<Vec<GlyphAssignment>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let identifiers: Vec<String> = identifiers.into_iter().map(Into::into).collect();

    if identifiers.len() > MAX_ICONS {
        return Err(PipelineError::Capacity {
            count: identifiers.len(),
            max: MAX_ICONS,
        });
    }

    identifiers
        .into_iter()
        .enumerate()
        .map(|(position, identifier)| {
            let index = u8::try_from(position + 1).map_err(|_| PipelineError::Capacity {
                count: position + 1,
                max: MAX_ICONS,
            })?;
            Ok(GlyphAssignment { identifier, index })
        })
        .collect()
}
