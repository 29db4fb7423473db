//! Icon identifier derivation
//!
//! Turns raw file names into the canonical identifiers used as CSS attribute
//! names, glyph names and (camel-cased) accessor function names.

/// File extension recognized as an icon source
pub const ICON_EXTENSION: &str = "svg";

/// Check whether a file name carries the icon extension (ASCII case-insensitive)
pub fn is_icon_file(file_name: &str) -> bool {
    strip_icon_extension(file_name).is_some()
}

fn strip_icon_extension(file_name: &str) -> Option<&str> {
    let split = file_name.len().checked_sub(ICON_EXTENSION.len() + 1)?;
    let (stem, extension) = (file_name.get(..split)?, file_name.get(split..)?);
    let extension = extension.strip_prefix('.')?;
    extension
        .eq_ignore_ascii_case(ICON_EXTENSION)
        .then_some(stem)
}

/// Derive the canonical icon identifier from a file name.
///
/// Lowercases the name, strips the `.svg` extension, replaces every character
/// outside `[a-z0-9-]` with `-`, collapses hyphen runs and trims hyphens from
/// both ends. The result may be empty for degenerate names.
///
/// ```
/// use iconforge::naming::derive_identifier;
///
/// assert_eq!(derive_identifier("Home Icon.svg"), "home-icon");
/// assert_eq!(derive_identifier("search!!.svg"), "search");
/// ```
pub fn derive_identifier(file_name: &str) -> String {
    let lowered = file_name.to_lowercase();
    let stem = strip_icon_extension(&lowered).unwrap_or(&lowered);

    let mut identifier = String::with_capacity(stem.len());
    for c in stem.chars() {
        let c = match c {
            'a'..='z' | '0'..='9' => c,
            _ => '-',
        };

        if c == '-' && (identifier.is_empty() || identifier.ends_with('-')) {
            continue;
        }
        identifier.push(c);
    }

    while identifier.ends_with('-') {
        identifier.pop();
    }

    identifier
}

/// Name of the generated accessor function for an identifier.
///
/// `home-icon` becomes `homeIconIcon`. A hyphen before a digit is dropped, and
/// a leading digit gets an underscore so the result stays a valid identifier.
pub fn accessor_name(identifier: &str) -> String {
    let mut name = String::with_capacity(identifier.len() + 4);
    let mut upper_next = false;

    for c in identifier.chars() {
        if c == '-' {
            upper_next = true;
            continue;
        }

        if upper_next && !name.is_empty() {
            name.push(c.to_ascii_uppercase());
        } else {
            name.push(c);
        }
        upper_next = false;
    }

    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }

    name.push_str("Icon");
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_identifier() {
        assert_eq!(derive_identifier("Home Icon.svg"), "home-icon");
        assert_eq!(derive_identifier("search!!.svg"), "search");
        assert_eq!(derive_identifier("arrow_left--small.svg"), "arrow-left-small");
        assert_eq!(derive_identifier("Ünïcode.SVG"), "n-code");
        assert_eq!(derive_identifier("2x-grid.svg"), "2x-grid");
    }

    #[test]
    fn test_derive_identifier_degenerate() {
        assert_eq!(derive_identifier("!!!.svg"), "");
        assert_eq!(derive_identifier(".svg"), "");
    }

    #[test]
    fn test_derive_identifier_is_idempotent() {
        for name in ["Home Icon.svg", "a--b.svg", "--x__y--.svg", "plain", "Ω.svg"] {
            let once = derive_identifier(name);
            assert_eq!(derive_identifier(&once), once, "not idempotent for {name}");
            assert!(!once.contains("--"));
            assert!(once
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }
    }

    #[test]
    fn test_is_icon_file() {
        assert!(is_icon_file("home.svg"));
        assert!(is_icon_file("HOME.SVG"));
        assert!(!is_icon_file("home.svg.bak"));
        assert!(!is_icon_file("readme.md"));
        assert!(!is_icon_file("svg"));
    }

    #[test]
    fn test_accessor_name() {
        assert_eq!(accessor_name("home-icon"), "homeIconIcon");
        assert_eq!(accessor_name("search"), "searchIcon");
        assert_eq!(accessor_name("arrow-2x"), "arrow2xIcon");
        assert_eq!(accessor_name("3d-box"), "_3dBoxIcon");
        assert_eq!(accessor_name(""), "Icon");
    }
}
