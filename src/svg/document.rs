//! Minimal SVG document model
//!
//! Keeps the full `quick-xml` event stream so a document can be rewritten
//! without losing anything, and offers access to the root element's
//! attributes plus a flat view of the drawable elements.

use super::transform::parse_transform;
use crate::core::errors::{PipelineError, PipelineResult};
use kurbo::Affine;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::path::{Path, PathBuf};

/// Containers whose children are never painted directly
const NON_RENDERED_CONTAINERS: &[&str] = &[
    "defs",
    "clipPath",
    "mask",
    "symbol",
    "pattern",
    "marker",
    "linearGradient",
    "radialGradient",
];

/// An element as seen by outline extraction
#[derive(Debug, Clone, PartialEq)]
pub struct SvgElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    /// Inside a non-rendered container such as `<defs>`
    pub hidden: bool,
    /// Own `transform` composed with every ancestor's, mapping the element's
    /// coordinates into the root's user space
    pub transform: Affine,
    /// Effective `fill` after inheritance is not `none`
    pub filled: bool,
}

impl SvgElement {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct SvgDocument {
    file: PathBuf,
    events: Vec<Event<'static>>,
    root: usize,
}

impl SvgDocument {
    /// Read and parse an SVG file
    pub fn open(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        Self::parse(&text, path)
    }

    /// Parse SVG text; `file` is only used for error messages
    pub fn parse(text: &str, file: impl AsRef<Path>) -> PipelineResult<Self> {
        let file = file.as_ref();
        let mut reader = Reader::from_str(text);
        let mut events = Vec::new();
        let mut root = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| PipelineError::invalid_svg(file, e))?;

            match &event {
                Event::Eof => break,
                Event::Start(_) | Event::Empty(_) if root.is_none() => root = Some(events.len()),
                _ => {}
            }

            events.push(event.into_owned());
        }

        let root = root.ok_or_else(|| PipelineError::invalid_svg(file, "no root element"))?;
        let document = Self {
            file: file.to_path_buf(),
            events,
            root,
        };

        let root_name = local_name(document.root_start());
        if root_name != "svg" {
            return Err(PipelineError::invalid_svg(
                file,
                format!("root element is <{root_name}>, expected <svg>"),
            ));
        }

        Ok(document)
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    fn root_start(&self) -> &BytesStart<'static> {
        match &self.events[self.root] {
            Event::Start(start) | Event::Empty(start) => start,
            _ => unreachable!("root index always points at a start tag"),
        }
    }

    /// Read an attribute of the root `<svg>` element
    pub fn root_attribute(&self, key: &str) -> PipelineResult<Option<String>> {
        Ok(read_attributes(self.root_start(), &self.file)?
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v))
    }

    /// Set (or add) an attribute on the root `<svg>` element, keeping the
    /// order of the existing attributes
    pub fn set_root_attribute(&mut self, key: &str, value: &str) -> PipelineResult<()> {
        let start = self.root_start();
        let mut attributes = read_attributes(start, &self.file)?;

        match attributes.iter_mut().find(|(k, _)| k == key) {
            Some(existing) => existing.1 = value.to_string(),
            None => attributes.push((key.to_string(), value.to_string())),
        }

        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut rebuilt = BytesStart::new(name);
        for (k, v) in &attributes {
            rebuilt.push_attribute((k.as_str(), v.as_str()));
        }

        self.events[self.root] = match &self.events[self.root] {
            Event::Empty(_) => Event::Empty(rebuilt),
            _ => Event::Start(rebuilt),
        };
        Ok(())
    }

    /// All elements below the root, in document order, with their inherited
    /// transform and fill resolved
    pub fn elements(&self) -> PipelineResult<Vec<SvgElement>> {
        let root_attributes = read_attributes(self.root_start(), &self.file)?;
        let root = Scope {
            name: "svg".to_string(),
            transform: Affine::IDENTITY,
            filled: fill_of(&root_attributes).unwrap_or(true),
        };

        let mut elements = Vec::new();
        let mut stack: Vec<Scope> = Vec::new();

        for event in &self.events[self.root + 1..] {
            match event {
                Event::Start(start) | Event::Empty(start) => {
                    let name = local_name(start);
                    let attributes = read_attributes(start, &self.file)?;
                    let parent = stack.last().unwrap_or(&root);
                    let hidden = stack
                        .iter()
                        .any(|scope| NON_RENDERED_CONTAINERS.contains(&scope.name.as_str()));

                    let own = match attributes.iter().find(|(k, _)| k == "transform") {
                        Some((_, value)) => parse_transform(value).ok_or_else(|| {
                            let reason = format!("bad transform '{value}'");
                            PipelineError::invalid_svg(&self.file, reason)
                        })?,
                        None => Affine::IDENTITY,
                    };
                    let scope = Scope {
                        name: name.clone(),
                        transform: parent.transform * own,
                        filled: fill_of(&attributes).unwrap_or(parent.filled),
                    };

                    elements.push(SvgElement {
                        name,
                        attributes,
                        hidden,
                        transform: scope.transform,
                        filled: scope.filled,
                    });

                    if matches!(event, Event::Start(_)) {
                        stack.push(scope);
                    }
                }
                Event::End(_) => {
                    stack.pop();
                }
                _ => {}
            }
        }

        Ok(elements)
    }

    /// Serialize the document back to text
    pub fn to_xml(&self) -> PipelineResult<String> {
        let mut writer = Writer::new(Vec::new());
        for event in &self.events {
            writer
                .write_event(event.clone())
                .map_err(|e| PipelineError::invalid_svg(&self.file, e))?;
        }

        String::from_utf8(writer.into_inner())
            .map_err(|e| PipelineError::invalid_svg(&self.file, e))
    }

    /// Write the serialized document to `path`
    pub fn save(&self, path: impl AsRef<Path>) -> PipelineResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_xml()?).map_err(|e| PipelineError::io(path, e))
    }
}

/// Inherited state of an open element
struct Scope {
    name: String,
    transform: Affine,
    filled: bool,
}

/// Whether the attributes set a fill, from `fill` or the `style` attribute
fn fill_of(attributes: &[(String, String)]) -> Option<bool> {
    let from_style = attributes
        .iter()
        .find(|(k, _)| k == "style")
        .and_then(|(_, style)| {
            style.split(';').find_map(|declaration| {
                let (property, value) = declaration.split_once(':')?;
                (property.trim() == "fill").then(|| value.trim().to_string())
            })
        });
    let fill = from_style.or_else(|| {
        attributes
            .iter()
            .find(|(k, _)| k == "fill")
            .map(|(_, v)| v.trim().to_string())
    })?;

    Some(fill != "none")
}

fn local_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

fn read_attributes(start: &BytesStart<'_>, file: &Path) -> PipelineResult<Vec<(String, String)>> {
    start
        .attributes()
        .map(|attribute| {
            let attribute = attribute.map_err(|e| PipelineError::invalid_svg(file, e))?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|e| PipelineError::invalid_svg(file, e))?
                .into_owned();
            Ok((key, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ICON: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- exported -->
<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24">
  <defs><clipPath id="c"><rect width="4" height="4"/></clipPath></defs>
  <g fill="none"><path d="M0 0L10 0L10 10Z"/></g>
  <circle cx="12" cy="12" r="3"/>
</svg>"#;

    #[test]
    fn test_root_attributes() {
        let document = SvgDocument::parse(ICON, "icon.svg").unwrap();
        assert_eq!(document.root_attribute("width").unwrap().as_deref(), Some("24"));
        assert_eq!(
            document.root_attribute("viewBox").unwrap().as_deref(),
            Some("0 0 24 24")
        );
        assert_eq!(document.root_attribute("missing").unwrap(), None);
    }

    #[test]
    fn test_set_root_attribute_preserves_order() {
        let mut document = SvgDocument::parse(ICON, "icon.svg").unwrap();
        document.set_root_attribute("height", "250").unwrap();
        document.set_root_attribute("data-new", "yes").unwrap();

        let xml = document.to_xml().unwrap();
        assert!(xml.contains(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="250" viewBox="0 0 24 24" data-new="yes">"#
        ));
        assert!(xml.contains("<!-- exported -->"));
        assert!(xml.contains(r#"<path d="M0 0L10 0L10 10Z"/>"#));
    }

    #[test]
    fn test_elements_mark_definitions_hidden() {
        let document = SvgDocument::parse(ICON, "icon.svg").unwrap();
        let elements = document.elements().unwrap();
        let names: Vec<_> = elements.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["defs", "clipPath", "rect", "g", "path", "circle"]);

        let rect = &elements[2];
        assert!(rect.hidden);
        let path = &elements[4];
        assert!(!path.hidden);
        assert_eq!(path.attribute("d"), Some("M0 0L10 0L10 10Z"));
    }

    #[test]
    fn test_elements_compose_transforms() {
        let document = SvgDocument::parse(
            r#"<svg viewBox="0 0 24 24">
  <g transform="translate(10 10)">
    <g transform="scale(2)"><rect width="1" height="1" transform="translate(1 0)"/></g>
  </g>
  <circle r="1"/>
</svg>"#,
            "icon.svg",
        )
        .unwrap();
        let elements = document.elements().unwrap();

        let rect = elements.iter().find(|e| e.name == "rect").unwrap();
        // translate(10 10) scale(2) translate(1 0)
        assert_eq!(rect.transform * kurbo::Point::ZERO, kurbo::Point::new(12.0, 10.0));

        let circle = elements.iter().find(|e| e.name == "circle").unwrap();
        assert_eq!(circle.transform, Affine::IDENTITY);
    }

    #[test]
    fn test_elements_inherit_fill() {
        let document = SvgDocument::parse(
            r#"<svg fill="none" stroke="black">
  <path d="M0 0L1 1"/>
  <g style="stroke-width: 2; fill: #000"><path d="M0 0L1 0L1 1Z"/></g>
  <path fill="red" d="M0 0L1 0L1 1Z"/>
</svg>"#,
            "icon.svg",
        )
        .unwrap();
        let filled: Vec<_> = document
            .elements()
            .unwrap()
            .iter()
            .filter(|e| e.name == "path")
            .map(|e| e.filled)
            .collect();
        assert_eq!(filled, [false, true, true]);
    }

    #[test]
    fn test_bad_transform_names_file() {
        let document =
            SvgDocument::parse(r#"<svg><g transform="wobble(1)"/></svg>"#, "icon.svg").unwrap();
        let error = document.elements().unwrap_err();
        assert!(matches!(error, PipelineError::InvalidSvg { .. }));
        assert!(error.to_string().contains("wobble"));
    }

    #[test]
    fn test_rejects_non_svg_root() {
        let error = SvgDocument::parse("<html></html>", "page.svg").unwrap_err();
        assert!(matches!(error, PipelineError::InvalidSvg { .. }));
        assert!(error.to_string().contains("page.svg"));
    }

    #[test]
    fn test_rejects_empty_document() {
        assert!(SvgDocument::parse("", "empty.svg").is_err());
    }
}
