//! Pipeline orchestration
//!
//! One run goes: scan sources → derive identifiers → allocate glyphs →
//! normalize geometry into the workspace → generate fonts → place artifacts →
//! write the module. Everything before artifact placement only touches the
//! workspace, so a rejected icon leaves the output directory alone.

pub mod sources;
pub mod workspace;

pub use sources::{scan_sources, IconSource, NormalizedIcon};
pub use workspace::Workspace;

use crate::codegen::{generate_module, FontSource, MODULE_FILE_NAME};
use crate::core::errors::{PipelineError, PipelineResult};
use crate::font::{self, FontArtifact, FontGenerator, FontRequest, FONT_NAME};
use crate::glyphs::{self, GlyphAssignment};
use crate::svg::{normalize, NormalizeStrategy};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default URL prefix of the fonts in the generated module
pub const DEFAULT_BASE_PATH: &str = "./font";

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub base_path: String,
    pub strategy: NormalizeStrategy,
    /// Append a content digest to font URLs
    pub content_hash: bool,
}

impl PipelineConfig {
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            strategy: NormalizeStrategy::default(),
            content_hash: false,
        }
    }
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub glyphs: Vec<GlyphAssignment>,
    pub fonts: Vec<FontArtifact>,
    pub module_path: PathBuf,
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn run<G: FontGenerator>(&self, generator: &G) -> PipelineResult<BuildReport> {
        let config = &self.config;
        info!(
            "Building icon font from {} into {}",
            config.source_dir.display(),
            config.output_dir.display()
        );

        let workspace = Workspace::create(&config.output_dir)?;

        let sources = scan_sources(&config.source_dir)?;
        let glyphs = glyphs::allocate(sources.iter().map(|source| source.identifier.clone()))?;
        let sources_dir = workspace.sources_dir()?;
        let icons = normalize_sources(&sources, &glyphs, config.strategy, &sources_dir)?;
        info!("Normalized {} icons", icons.len());

        let font_dir = workspace.font_dir()?;
        let request = FontRequest {
            font_name: FONT_NAME,
            icons: &icons,
            destination: &font_dir,
        };
        generator
            .generate(&request)
            .await
            .map_err(PipelineError::FontGeneration)?;

        let artifacts = font::collect_artifacts(&font_dir, FONT_NAME);
        let fonts =
            font::place_artifacts(&artifacts, &config.output_dir, config.content_hash).await?;
        let formats: Vec<String> = fonts.iter().map(|f| f.format.to_string()).collect();
        info!("Placed fonts: {}", formats.join(", "));

        let module_path = write_module(config, &fonts, &glyphs)?;
        info!("Wrote {}", module_path.display());

        workspace.close()?;

        Ok(BuildReport {
            glyphs,
            fonts,
            module_path,
        })
    }
}

/// Rewrite every source into `sources_dir`, pairing it with its glyph
fn normalize_sources(
    sources: &[IconSource],
    glyphs: &[GlyphAssignment],
    strategy: NormalizeStrategy,
    sources_dir: &Path,
) -> PipelineResult<Vec<NormalizedIcon>> {
    sources
        .iter()
        .zip(glyphs)
        .map(|(source, glyph)| {
            let mut document = source.load()?;
            let view_box = normalize(&mut document, strategy)?;

            let path = sources_dir.join(format!("{:02x}.svg", glyph.index));
            document.save(&path)?;
            debug!("Normalized {} ({})", source.file_name, view_box);

            Ok(NormalizedIcon {
                glyph: glyph.clone(),
                source: source.path.clone(),
                path,
                view_box,
            })
        })
        .collect()
}

fn write_module(
    config: &PipelineConfig,
    fonts: &[FontArtifact],
    glyphs: &[GlyphAssignment],
) -> PipelineResult<PathBuf> {
    let sources: Vec<FontSource> = fonts.iter().map(FontSource::from).collect();
    let text = generate_module(&config.base_path, &sources, glyphs);

    let path = config.output_dir.join(MODULE_FILE_NAME);
    std::fs::write(&path, text).map_err(|e| PipelineError::io(&path, e))?;
    Ok(path)
}
