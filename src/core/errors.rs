//! Error types for the icon font pipeline
//!
//! Every variant is fatal: the pipeline aborts on the first error and the
//! temporary workspace is released on the way out.

use std::path::{Path, PathBuf};
use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid SVG in {}: {reason}", file.display())]
    InvalidSvg { file: PathBuf, reason: String },

    #[error(
        "Missing dimensions in {}: the root element needs a viewBox or both width and height",
        file.display()
    )]
    MissingDimensions { file: PathBuf },

    #[error("Malformed viewBox '{value}' in {}: expected four numbers", file.display())]
    MalformedViewBox { file: PathBuf, value: String },

    #[error(
        "The viewBox of {} does not start at 0 0 (found '{value}').\nRe-export the icon with an origin-aligned viewBox.",
        file.display()
    )]
    MisalignedViewBox { file: PathBuf, value: String },

    #[error(
        "Icon identifier '{identifier}' is derived from both {} and {}",
        first.display(),
        second.display()
    )]
    DuplicateIdentifier {
        identifier: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Too many icons: found {count}, the glyph range holds at most {max}")]
    Capacity { count: usize, max: usize },

    #[error("Font generation failed: {0:#}")]
    FontGeneration(#[source] anyhow::Error),
}

impl PipelineError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn invalid_svg(file: impl AsRef<Path>, reason: impl ToString) -> Self {
        Self::InvalidSvg {
            file: file.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// The source file this error is about, if any
    pub fn file(&self) -> Option<&Path> {
        match self {
            Self::InvalidSvg { file, .. }
            | Self::MissingDimensions { file }
            | Self::MalformedViewBox { file, .. }
            | Self::MisalignedViewBox { file, .. } => Some(file),
            Self::DuplicateIdentifier { second, .. } => Some(second),
            Self::Io { .. } | Self::Capacity { .. } | Self::FontGeneration(_) => None,
        }
    }
}
