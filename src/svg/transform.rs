//! The SVG `transform` attribute

use kurbo::{Affine, Vec2};

/// Parse a transform list such as `translate(10 10) scale(2)` into a single
/// affine. Functions apply right to left, as in SVG: the last one listed
/// acts on the shape first. Returns `None` for malformed input.
pub fn parse_transform(value: &str) -> Option<Affine> {
    let mut transform = Affine::IDENTITY;
    let mut rest = value.trim_start_matches(is_separator);

    while !rest.is_empty() {
        let open = rest.find('(')?;
        let close = open + rest[open..].find(')')?;
        let name = rest[..open].trim();
        let args = parse_numbers(&rest[open + 1..close])?;

        transform *= function(name, &args)?;
        rest = rest[close + 1..].trim_start_matches(is_separator);
    }

    Some(transform)
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ','
}

fn function(name: &str, args: &[f64]) -> Option<Affine> {
    let transform = match (name, args) {
        ("matrix", &[a, b, c, d, e, f]) => Affine::new([a, b, c, d, e, f]),
        ("translate", &[tx]) => Affine::translate((tx, 0.0)),
        ("translate", &[tx, ty]) => Affine::translate((tx, ty)),
        ("scale", &[s]) => Affine::scale(s),
        ("scale", &[sx, sy]) => Affine::scale_non_uniform(sx, sy),
        ("rotate", &[angle]) => Affine::rotate(angle.to_radians()),
        ("rotate", &[angle, cx, cy]) => {
            let center = Vec2::new(cx, cy);
            let rotation = Affine::rotate(angle.to_radians());
            Affine::translate(center) * rotation * Affine::translate(-center)
        }
        ("skewX", &[angle]) => {
            let tan = angle.to_radians().tan();
            Affine::new([1.0, 0.0, tan, 1.0, 0.0, 0.0])
        }
        ("skewY", &[angle]) => {
            let tan = angle.to_radians().tan();
            Affine::new([1.0, tan, 0.0, 1.0, 0.0, 0.0])
        }
        _ => return None,
    };
    Some(transform)
}

/// Numbers separated by whitespace, commas, or a sign that starts the next
/// number (`10-5` is two numbers)
fn parse_numbers(value: &str) -> Option<Vec<f64>> {
    let mut numbers = Vec::new();
    let mut current = String::new();
    let mut previous = None;

    for c in value.chars() {
        let starts_number = matches!(c, '-' | '+') && !matches!(previous, Some('e' | 'E'));
        if (is_separator(c) || starts_number) && !current.is_empty() {
            numbers.push(current.parse::<f64>().ok()?);
            current.clear();
        }
        if !is_separator(c) {
            current.push(c);
        }
        previous = Some(c);
    }
    if !current.is_empty() {
        numbers.push(current.parse::<f64>().ok()?);
    }

    numbers.iter().all(|n| n.is_finite()).then_some(numbers)
}
