//! Icon discovery
//!
//! Lists the source directory, keeps the files with the icon extension and
//! derives their identifiers. Listing order is the byte-wise order of the
//! file names, independent of the filesystem.

use crate::core::errors::{PipelineError, PipelineResult};
use crate::glyphs::GlyphAssignment;
use crate::naming::{derive_identifier, is_icon_file};
use crate::svg::{SvgDocument, ViewBox};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// An icon file found in the source directory
#[derive(Debug, Clone)]
pub struct IconSource {
    pub file_name: String,
    pub path: PathBuf,
    pub identifier: String,
}

impl IconSource {
    pub fn load(&self) -> PipelineResult<SvgDocument> {
        SvgDocument::open(&self.path)
    }
}

/// An icon after geometry normalization, written into the workspace
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedIcon {
    pub glyph: GlyphAssignment,
    /// Original source file, for error messages
    pub source: PathBuf,
    /// Rewritten copy inside the workspace
    pub path: PathBuf,
    pub view_box: ViewBox,
}

/// Find the icon files in `dir`, in listing order
pub fn scan_sources(dir: &Path) -> PipelineResult<Vec<IconSource>> {
    let entries = fs::read_dir(dir).map_err(|e| PipelineError::io(dir, e))?;

    let mut sources = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PipelineError::io(dir, e))?;
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().into_owned();

        if !is_icon_file(&file_name) || !path.is_file() {
            continue;
        }

        let identifier = derive_identifier(&file_name);
        if identifier.is_empty() {
            warn!("{} yields an empty icon identifier", path.display());
        }
        debug!("Found icon '{}' in {}", identifier, file_name);

        sources.push(IconSource {
            file_name,
            path,
            identifier,
        });
    }

    sources.sort_by(|a, b| a.file_name.as_bytes().cmp(b.file_name.as_bytes()));
    check_unique(&sources)?;
    Ok(sources)
}

/// Two files must not map onto the same identifier
fn check_unique(sources: &[IconSource]) -> PipelineResult<()> {
    let mut seen: HashMap<&str, &Path> = HashMap::new();
    for source in sources {
        if let Some(first) = seen.insert(&source.identifier, &source.path) {
            return Err(PipelineError::DuplicateIdentifier {
                identifier: source.identifier.clone(),
                first: first.to_path_buf(),
                second: source.path.clone(),
            });
        }
    }
    Ok(())
}
