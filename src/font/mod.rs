//! Font generation and artifact placement
//!
//! A [`FontGenerator`] turns the normalized icon set into per-format font
//! binaries named `<font_name>.<ext>`. Which formats it produces is up to the
//! generator; a format counts as present only if its file exists afterwards.
//! Present artifacts are then moved to `font/index.<ext>` in the output
//! directory.

pub mod fontc;
pub mod outline;
pub mod svg_font;
pub mod ufo;
pub mod woff;

use crate::core::errors::{PipelineError, PipelineResult};
use crate::pipeline::NormalizedIcon;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

pub use fontc::FontcGenerator;

/// Base name of the files a generator writes
pub const FONT_NAME: &str = "iconfont";

/// Name of the directory the fonts are placed in, inside the output directory
pub const FONT_DIRECTORY: &str = "font";

pub const UNITS_PER_EM: f64 = 1000.0;
pub const ASCENDER: f64 = 850.0;
pub const DESCENDER: f64 = -150.0;

/// Length of the cache-busting token appended to font URLs
const HASH_LENGTH: usize = 10;

/// Web font formats, in the order they are declared in the generated module
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FontFormat {
    Eot,
    Svg,
    Ttf,
    Woff,
    Woff2,
}

impl FontFormat {
    pub const ALL: [FontFormat; 5] = [
        FontFormat::Eot,
        FontFormat::Svg,
        FontFormat::Ttf,
        FontFormat::Woff,
        FontFormat::Woff2,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            FontFormat::Eot => "eot",
            FontFormat::Svg => "svg",
            FontFormat::Ttf => "ttf",
            FontFormat::Woff => "woff",
            FontFormat::Woff2 => "woff2",
        }
    }

    /// Identifier used in the CSS `format()` hint
    pub fn css_format(&self) -> &'static str {
        match self {
            FontFormat::Eot => "embedded-opentype",
            FontFormat::Svg => "svg",
            FontFormat::Ttf => "truetype",
            FontFormat::Woff => "woff",
            FontFormat::Woff2 => "woff2",
        }
    }

    /// File name a generator writes this format to
    pub fn generated_file_name(&self, font_name: &str) -> String {
        format!("{font_name}.{}", self.extension())
    }

    /// File name of the placed artifact
    pub fn placed_file_name(&self) -> String {
        format!("index.{}", self.extension())
    }
}

impl fmt::Display for FontFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A font binary produced by a generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontArtifact {
    pub format: FontFormat,
    pub path: PathBuf,
    /// Short content digest, set when hashing is enabled during placement
    pub hash: Option<String>,
}

/// Everything a generator gets to work with
#[derive(Debug, Clone, Copy)]
pub struct FontRequest<'a> {
    pub font_name: &'a str,
    /// Icons in glyph order
    pub icons: &'a [NormalizedIcon],
    /// Directory the generator writes `<font_name>.<ext>` files into
    pub destination: &'a Path,
}

/// External font conversion engine
///
/// Completion is reported once, through the returned future; any error aborts
/// the pipeline.
#[allow(async_fn_in_trait)]
pub trait FontGenerator {
    async fn generate(&self, request: &FontRequest<'_>) -> anyhow::Result<()>;
}

/// Find the formats a generator actually produced in `destination`
pub fn collect_artifacts(destination: &Path, font_name: &str) -> Vec<FontArtifact> {
    FontFormat::ALL
        .iter()
        .filter_map(|format| {
            let path = destination.join(format.generated_file_name(font_name));
            if path.is_file() {
                Some(FontArtifact {
                    format: *format,
                    path,
                    hash: None,
                })
            } else {
                debug!("Font generator produced no {} output", format);
                None
            }
        })
        .collect()
}

/// Move artifacts to `<output_dir>/font/index.<ext>`, optionally hashing them.
///
/// Placed files of formats that are absent from this build are removed so a
/// stale binary is never left next to the new ones.
pub async fn place_artifacts(
    artifacts: &[FontArtifact],
    output_dir: &Path,
    content_hash: bool,
) -> PipelineResult<Vec<FontArtifact>> {
    let font_dir = output_dir.join(FONT_DIRECTORY);
    fs::create_dir_all(&font_dir)
        .await
        .map_err(|e| PipelineError::io(&font_dir, e))?;

    let mut placed = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let target = font_dir.join(artifact.format.placed_file_name());
        move_file(&artifact.path, &target).await?;

        let hash = if content_hash {
            let bytes = fs::read(&target)
                .await
                .map_err(|e| PipelineError::io(&target, e))?;
            Some(content_digest(&bytes))
        } else {
            None
        };

        debug!("Placed {} font at {}", artifact.format, target.display());
        placed.push(FontArtifact {
            format: artifact.format,
            path: target,
            hash,
        });
    }

    for format in FontFormat::ALL {
        if placed.iter().any(|artifact| artifact.format == format) {
            continue;
        }
        let stale = font_dir.join(format.placed_file_name());
        if stale.is_file() {
            warn!("Removing stale {} font from a previous build", format);
            fs::remove_file(&stale)
                .await
                .map_err(|e| PipelineError::io(&stale, e))?;
        }
    }

    Ok(placed)
}

/// Short hex SHA-256 digest used as a cache-busting token
pub fn content_digest(bytes: &[u8]) -> String {
    let digest = format!("{:x}", Sha256::digest(bytes));
    digest[..HASH_LENGTH].to_string()
}

async fn move_file(from: &Path, to: &Path) -> PipelineResult<()> {
    if fs::rename(from, to).await.is_ok() {
        return Ok(());
    }

    // The workspace can live on another filesystem than the output
    fs::copy(from, to)
        .await
        .map_err(|e| PipelineError::io(to, e))?;
    fs::remove_file(from)
        .await
        .map_err(|e| PipelineError::io(from, e))
}
