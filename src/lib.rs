//! iconforge
pub mod codegen;
pub mod core;
pub mod font;
pub mod glyphs;
pub mod logging;
pub mod naming;
pub mod pipeline;
pub mod svg;
