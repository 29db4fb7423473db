//! SVG icon sources
//!
//! Parsing and serialization of icon documents, and the geometry rewrite that
//! prepares them for font conversion.

pub mod document;
pub mod normalize;
pub mod transform;

pub use document::{SvgDocument, SvgElement};
pub use normalize::{normalize, NormalizeStrategy, ViewBox, DEFAULT_TARGET_SIZE};
pub use transform::parse_transform;
