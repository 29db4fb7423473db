//! Glyph outlines from normalized icons
//!
//! Collects the filled shapes of an icon as a single `kurbo` path, maps it
//! from viewBox space (y down) into font units (y up) and converts it to UFO
//! contours.

use super::{ASCENDER, UNITS_PER_EM};
use crate::core::errors::{PipelineError, PipelineResult};
use crate::pipeline::NormalizedIcon;
use crate::svg::normalize::parse_length;
use crate::svg::{SvgDocument, SvgElement, ViewBox};
use kurbo::{Affine, BezPath, Circle, Ellipse, PathEl, Point, Rect, RoundedRect, Shape};
use norad::{Contour, ContourPoint, PointType};
use tracing::warn;

/// Flattening tolerance for primitive shapes, in SVG user units
const SHAPE_TOLERANCE: f64 = 0.01;

/// Points closer than this are treated as the same contour start
const CLOSE_EPSILON: f64 = 1e-6;

/// A glyph ready to be written into a font source
#[derive(Debug, Clone)]
pub struct GlyphOutline {
    pub name: String,
    pub codepoint: char,
    pub advance_width: f64,
    /// Outline in font units
    pub path: BezPath,
}

/// Load every icon's outline, in glyph order
pub fn load_glyphs(icons: &[NormalizedIcon]) -> PipelineResult<Vec<GlyphOutline>> {
    icons.iter().map(load_glyph).collect()
}

pub fn load_glyph(icon: &NormalizedIcon) -> PipelineResult<GlyphOutline> {
    let document = SvgDocument::open(&icon.path)?;
    let path = document_outline(&document)?;
    let transform = font_transform(&icon.view_box);

    Ok(GlyphOutline {
        name: glyph_name(icon),
        codepoint: icon.glyph.codepoint(),
        advance_width: (icon.view_box.width * scale(&icon.view_box)).round(),
        path: transform * path,
    })
}

fn glyph_name(icon: &NormalizedIcon) -> String {
    if icon.glyph.identifier.is_empty() {
        format!("icon{}", icon.glyph.index)
    } else {
        icon.glyph.identifier.clone()
    }
}

fn scale(view_box: &ViewBox) -> f64 {
    if view_box.height > 0.0 {
        UNITS_PER_EM / view_box.height
    } else {
        1.0
    }
}

/// Map viewBox coordinates into font units: origin at the viewBox corner,
/// height scaled to one em, top of the box on the ascender
pub fn font_transform(view_box: &ViewBox) -> Affine {
    let s = scale(view_box);
    Affine::new([
        s,
        0.0,
        0.0,
        -s,
        -view_box.min_x * s,
        ASCENDER + view_box.min_y * s,
    ])
}

/// Elements that draw something this extractor does not turn into outlines
const UNSUPPORTED_ELEMENTS: &[&str] = &["use", "line", "text", "image"];

/// All filled shapes of a document, in the root's user space
pub fn document_outline(document: &SvgDocument) -> PipelineResult<BezPath> {
    let mut outline = BezPath::new();
    let file = document.file().display();

    for element in document.elements()? {
        if element.hidden {
            continue;
        }
        if UNSUPPORTED_ELEMENTS.contains(&element.name.as_str()) {
            warn!("Skipping unsupported <{}> in {}", element.name, file);
            continue;
        }

        let Some(shape) = element_path(&element, document)? else {
            continue;
        };
        if !element.filled {
            warn!(
                "Skipping <{}> without fill in {}; strokes are not outlined",
                element.name, file
            );
            continue;
        }

        for el in (element.transform * shape).elements() {
            outline.push(*el);
        }
    }

    Ok(outline)
}

fn element_path(element: &SvgElement, document: &SvgDocument) -> PipelineResult<Option<BezPath>> {
    let number = |key: &str| element.attribute(key).and_then(parse_length).unwrap_or(0.0);

    let path = match element.name.as_str() {
        "path" => {
            let Some(data) = element.attribute("d") else {
                return Ok(None);
            };
            BezPath::from_svg(data).map_err(|e| {
                PipelineError::invalid_svg(document.file(), format!("bad path data: {e}"))
            })?
        }
        "rect" => {
            let (x, y) = (number("x"), number("y"));
            let (width, height) = (number("width"), number("height"));
            if width <= 0.0 || height <= 0.0 {
                return Ok(None);
            }

            let rx = element.attribute("rx").and_then(parse_length);
            let ry = element.attribute("ry").and_then(parse_length);
            let radius = rx.or(ry).unwrap_or(0.0).min(width / 2.0).min(height / 2.0);
            let rect = Rect::new(x, y, x + width, y + height);

            if radius > 0.0 {
                RoundedRect::from_rect(rect, radius).to_path(SHAPE_TOLERANCE)
            } else {
                rect.to_path(SHAPE_TOLERANCE)
            }
        }
        "circle" => {
            let r = number("r");
            if r <= 0.0 {
                return Ok(None);
            }
            Circle::new((number("cx"), number("cy")), r).to_path(SHAPE_TOLERANCE)
        }
        "ellipse" => {
            let (rx, ry) = (number("rx"), number("ry"));
            if rx <= 0.0 || ry <= 0.0 {
                return Ok(None);
            }
            Ellipse::new((number("cx"), number("cy")), (rx, ry), 0.0).to_path(SHAPE_TOLERANCE)
        }
        // Fill closes open polylines too
        "polygon" | "polyline" => match element.attribute("points").map(parse_points) {
            Some(points) if points.len() >= 3 => {
                let mut path = BezPath::new();
                path.move_to(points[0]);
                for point in &points[1..] {
                    path.line_to(*point);
                }
                path.close_path();
                path
            }
            _ => return Ok(None),
        },
        _ => return Ok(None),
    };

    Ok(Some(path))
}

fn parse_points(value: &str) -> Vec<Point> {
    let numbers: Vec<f64> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map_while(|part| part.parse().ok())
        .collect();

    numbers
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect()
}

/// Convert a path into closed UFO contours
pub fn to_contours(path: &BezPath) -> Vec<Contour> {
    let mut contours = Vec::new();
    let mut points = Vec::new();

    for element in path.elements() {
        match *element {
            PathEl::MoveTo(p) => {
                finish_contour(&mut points, &mut contours);
                points.push(contour_point(p, PointType::Line));
            }
            PathEl::LineTo(p) => points.push(contour_point(p, PointType::Line)),
            PathEl::QuadTo(c, p) => {
                points.push(contour_point(c, PointType::OffCurve));
                points.push(contour_point(p, PointType::QCurve));
            }
            PathEl::CurveTo(c1, c2, p) => {
                points.push(contour_point(c1, PointType::OffCurve));
                points.push(contour_point(c2, PointType::OffCurve));
                points.push(contour_point(p, PointType::Curve));
            }
            PathEl::ClosePath => finish_contour(&mut points, &mut contours),
        }
    }
    finish_contour(&mut points, &mut contours);

    contours
}

fn contour_point(p: Point, typ: PointType) -> ContourPoint {
    ContourPoint::new(p.x, p.y, typ, false, None, None)
}

/// Close the pending contour. When the last segment ends on the start point
/// the duplicate is dropped and the start takes over its segment type.
fn finish_contour(points: &mut Vec<ContourPoint>, contours: &mut Vec<Contour>) {
    let on_curve = points
        .iter()
        .filter(|p| p.typ != PointType::OffCurve)
        .count();
    if on_curve < 2 {
        points.clear();
        return;
    }

    let first = Point::new(points[0].x, points[0].y);
    if let Some(last) = points.last() {
        if Point::new(last.x, last.y).distance(first) < CLOSE_EPSILON {
            let typ = last.typ.clone();
            points.pop();
            points[0].typ = typ;
        }
    }

    if points.len() >= 2 {
        contours.push(Contour::new(std::mem::take(points), None));
    }
    points.clear();
}
