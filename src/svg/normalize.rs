//! Geometry normalization
//!
//! The font converter scales glyphs badly when icons declare mixed sizes, so
//! every document is rewritten to a uniform box before conversion.

use super::document::SvgDocument;
use crate::core::errors::{PipelineError, PipelineResult};
use std::fmt;
use std::str::FromStr;

/// Height every icon is scaled to by [`NormalizeStrategy::Rescale`].
/// Small boxes suffer from rounding in the converter.
pub const DEFAULT_TARGET_SIZE: f64 = 250.0;

/// How icon geometry is made uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormalizeStrategy {
    /// Keep aspect ratio, force the height to `target_size`
    Rescale { target_size: f64 },
    /// Require an origin-aligned viewBox and size the icon from it
    AlignViewBox,
}

impl Default for NormalizeStrategy {
    fn default() -> Self {
        Self::Rescale {
            target_size: DEFAULT_TARGET_SIZE,
        }
    }
}

/// The `viewBox` attribute: origin and extent of the icon's coordinate system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub fn new(min_x: f64, min_y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x,
            min_y,
            width,
            height,
        }
    }

    pub fn is_origin_aligned(&self) -> bool {
        self.min_x == 0.0 && self.min_y == 0.0
    }
}

impl FromStr for ViewBox {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let numbers = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<f64>().map_err(|_| ()))
            .collect::<Result<Vec<_>, _>>()?;

        match numbers.as_slice() {
            [min_x, min_y, width, height] if numbers.iter().all(|n| n.is_finite()) => {
                Ok(Self::new(*min_x, *min_y, *width, *height))
            }
            _ => Err(()),
        }
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.min_x, self.min_y, self.width, self.height)
    }
}

/// Parse an SVG length such as `24`, `24.5px`, `1e2` or `2em`, ignoring the
/// unit suffix. Percentages have no intrinsic size and yield `None`.
pub fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    let end = number_prefix_len(value);
    let (number, unit) = value.split_at(end);

    if number.is_empty() || unit.trim_start().starts_with('%') {
        return None;
    }

    number.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Length of the longest prefix of `value` that reads as a number. An
/// exponent only counts when digits follow it, so `2em` stops after `2`.
fn number_prefix_len(value: &str) -> usize {
    let bytes = value.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let integer_end = digits_from(end);
    let mut mantissa_end = integer_end;
    if bytes.get(integer_end) == Some(&b'.') {
        let fraction_end = digits_from(integer_end + 1);
        if fraction_end > integer_end + 1 || integer_end > end {
            mantissa_end = fraction_end;
        }
    }
    if mantissa_end == end {
        return 0;
    }

    if matches!(bytes.get(mantissa_end), Some(b'e' | b'E')) {
        let mut exponent = mantissa_end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_end = digits_from(exponent);
        if exponent_end > exponent {
            return exponent_end;
        }
    }

    mantissa_end
}

/// Rewrite the document's size according to `strategy` and return the
/// resulting viewBox
pub fn normalize(
    document: &mut SvgDocument,
    strategy: NormalizeStrategy,
) -> PipelineResult<ViewBox> {
    let file = document.file().to_path_buf();

    let view_box = match document.root_attribute("viewBox")? {
        Some(value) => {
            let view_box = value
                .parse::<ViewBox>()
                .map_err(|_| PipelineError::MalformedViewBox {
                    file: file.clone(),
                    value: value.clone(),
                })?;

            if strategy == NormalizeStrategy::AlignViewBox && !view_box.is_origin_aligned() {
                return Err(PipelineError::MisalignedViewBox { file, value });
            }
            view_box
        }
        None => {
            let (width, height) = declared_size(document)?
                .ok_or_else(|| PipelineError::MissingDimensions { file: file.clone() })?;
            let view_box = ViewBox::new(0.0, 0.0, width, height);
            document.set_root_attribute("viewBox", &view_box.to_string())?;
            view_box
        }
    };

    let (width, height) = match strategy {
        NormalizeStrategy::Rescale { target_size } => {
            let (width, height) =
                declared_size(document)?.unwrap_or((view_box.width, view_box.height));
            if height <= 0.0 {
                return Err(PipelineError::MissingDimensions { file });
            }
            (target_size * (width / height), target_size)
        }
        NormalizeStrategy::AlignViewBox => (view_box.width, view_box.height),
    };

    document.set_root_attribute("width", &width.to_string())?;
    document.set_root_attribute("height", &height.to_string())?;

    Ok(view_box)
}

fn declared_size(document: &SvgDocument) -> PipelineResult<Option<(f64, f64)>> {
    let width = document.root_attribute("width")?;
    let height = document.root_attribute("height")?;

    Ok(width
        .as_deref()
        .and_then(parse_length)
        .zip(height.as_deref().and_then(parse_length)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svg(attributes: &str) -> SvgDocument {
        let text = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" {attributes}><path d="M0 0L1 1Z"/></svg>"#
        );
        SvgDocument::parse(&text, "icon.svg").unwrap()
    }

    fn size(document: &SvgDocument) -> (String, String) {
        (
            document.root_attribute("width").unwrap().unwrap(),
            document.root_attribute("height").unwrap().unwrap(),
        )
    }

    #[test]
    fn test_parse_view_box() {
        assert_eq!("0 0 24 24".parse::<ViewBox>(), Ok(ViewBox::new(0.0, 0.0, 24.0, 24.0)));
        assert_eq!("0,0,16,8".parse::<ViewBox>(), Ok(ViewBox::new(0.0, 0.0, 16.0, 8.0)));
        assert_eq!(" -1  2.5 10 10 ".parse::<ViewBox>(), Ok(ViewBox::new(-1.0, 2.5, 10.0, 10.0)));
        assert!("0 0 24".parse::<ViewBox>().is_err());
        assert!("a b c d".parse::<ViewBox>().is_err());
    }

    #[test]
    fn test_parse_length() {
        assert_eq!(parse_length("24"), Some(24.0));
        assert_eq!(parse_length("24.5px"), Some(24.5));
        assert_eq!(parse_length("1e2"), Some(100.0));
        assert_eq!(parse_length("100%"), None);
        assert_eq!(parse_length("auto"), None);
    }

    #[test]
    fn test_parse_length_font_relative_units() {
        assert_eq!(parse_length("2em"), Some(2.0));
        assert_eq!(parse_length("24ex"), Some(24.0));
        assert_eq!(parse_length("1e2px"), Some(100.0));
        assert_eq!(parse_length("1.5e-1em"), Some(0.15));
        assert_eq!(parse_length(".5em"), Some(0.5));
        assert_eq!(parse_length("3.em"), Some(3.0));
        assert_eq!(parse_length("-4e"), Some(-4.0));
        assert_eq!(parse_length("em"), None);
        assert_eq!(parse_length("."), None);
        assert_eq!(parse_length("-"), None);
    }

    #[test]
    fn test_rescale_accepts_em_dimensions() {
        let mut document = svg(r#"width="2em" height="1em""#);
        let view_box = normalize(&mut document, NormalizeStrategy::default()).unwrap();
        assert_eq!(view_box, ViewBox::new(0.0, 0.0, 2.0, 1.0));
        assert_eq!(size(&document), ("500".to_string(), "250".to_string()));
    }

    #[test]
    fn test_rescale_preserves_aspect_ratio() {
        let mut document = svg(r#"width="48" height="32""#);
        let strategy = NormalizeStrategy::Rescale { target_size: 250.0 };
        let view_box = normalize(&mut document, strategy).unwrap();

        assert_eq!(view_box, ViewBox::new(0.0, 0.0, 48.0, 32.0));
        assert_eq!(document.root_attribute("viewBox").unwrap().as_deref(), Some("0 0 48 32"));

        let (width, height) = size(&document);
        assert_eq!(height, "250");
        let width: f64 = width.parse().unwrap();
        assert!((width - 250.0 * 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_rescale_keeps_existing_view_box() {
        let mut document = svg(r#"width="10px" height="30px" viewBox="5 5 10 30""#);
        let view_box = normalize(&mut document, NormalizeStrategy::default()).unwrap();
        assert_eq!(view_box, ViewBox::new(5.0, 5.0, 10.0, 30.0));

        let (width, height) = size(&document);
        assert_eq!(height, "250");
        let width: f64 = width.parse().unwrap();
        assert!((width - 250.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_rescale_falls_back_to_view_box_extent() {
        let mut document = svg(r#"viewBox="0 0 20 10""#);
        normalize(&mut document, NormalizeStrategy::default()).unwrap();
        assert_eq!(size(&document), ("500".to_string(), "250".to_string()));
    }

    #[test]
    fn test_align_rewrites_size_from_view_box() {
        let mut document = svg(r#"width="1em" height="1em" viewBox="0 0 16 12""#);
        normalize(&mut document, NormalizeStrategy::AlignViewBox).unwrap();
        assert_eq!(size(&document), ("16".to_string(), "12".to_string()));
    }

    #[test]
    fn test_align_rejects_offset_origin() {
        for value in ["10 0 24 24", "0 -2 24 24", "1 1 24 24"] {
            let mut document = svg(&format!(r#"viewBox="{value}""#));
            match normalize(&mut document, NormalizeStrategy::AlignViewBox) {
                Err(PipelineError::MisalignedViewBox { file, value: found }) => {
                    assert_eq!(file.to_str(), Some("icon.svg"));
                    assert_eq!(found, value);
                }
                other => panic!("expected misaligned viewBox error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_align_synthesizes_missing_view_box() {
        let mut document = svg(r#"width="24" height="24""#);
        let view_box = normalize(&mut document, NormalizeStrategy::AlignViewBox).unwrap();
        assert!(view_box.is_origin_aligned());
        assert_eq!(size(&document), ("24".to_string(), "24".to_string()));
    }

    #[test]
    fn test_missing_dimensions() {
        let mut document = svg("");
        let error = normalize(&mut document, NormalizeStrategy::default()).unwrap_err();
        assert!(matches!(error, PipelineError::MissingDimensions { .. }));
    }

    #[test]
    fn test_malformed_view_box() {
        let mut document = svg(r#"viewBox="0 0 24""#);
        let error = normalize(&mut document, NormalizeStrategy::AlignViewBox).unwrap_err();
        assert!(matches!(error, PipelineError::MalformedViewBox { .. }));
    }
}
