//! Default font generator
//!
//! Writes an SVG font directly, compiles a TrueType binary from a UFO source
//! with the `fontc` compiler and wraps that binary as WOFF and WOFF2. EOT is
//! not produced.

use super::outline::{load_glyphs, GlyphOutline};
use super::{svg_font, ufo, woff, FontFormat, FontGenerator, FontRequest};
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info};

pub struct FontcGenerator {
    executable: PathBuf,
}

impl Default for FontcGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl FontcGenerator {
    pub fn new() -> Self {
        Self::with_executable("fontc")
    }

    pub fn with_executable(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Write the UFO source next to the generated fonts
    pub fn write_ufo(
        &self,
        glyphs: &[GlyphOutline],
        font_name: &str,
        destination: &Path,
    ) -> Result<PathBuf> {
        let ufo_path = destination.join(format!("{font_name}.ufo"));
        ufo::build_ufo(glyphs, font_name)
            .save(&ufo_path)
            .with_context(|| format!("Failed to write UFO source {}", ufo_path.display()))?;
        Ok(ufo_path)
    }

    async fn compile_with_fontc(
        &self,
        ufo_path: &Path,
        output_path: &Path,
        build_dir: &Path,
    ) -> Result<()> {
        let mut cmd = Command::new(&self.executable);
        cmd.arg("--build-dir")
            .arg(build_dir)
            .arg("--output-file")
            .arg(output_path)
            .arg(ufo_path);

        debug!("Running {:?}", cmd);
        let output = cmd
            .output()
            .await
            .with_context(|| format!("Failed to execute {}", self.executable.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "fontc compilation failed ({}): {}",
                output.status,
                stderr.trim()
            ));
        }

        Ok(())
    }
}

impl FontGenerator for FontcGenerator {
    async fn generate(&self, request: &FontRequest<'_>) -> Result<()> {
        let glyphs = load_glyphs(request.icons)?;
        let destination = request.destination;

        let svg_path = destination.join(FontFormat::Svg.generated_file_name(request.font_name));
        svg_font::write_svg_font(&glyphs, request.font_name, &svg_path)?;

        let ufo_path = self.write_ufo(&glyphs, request.font_name, destination)?;
        let ttf_path = destination.join(FontFormat::Ttf.generated_file_name(request.font_name));
        self.compile_with_fontc(&ufo_path, &ttf_path, &destination.join("build"))
            .await?;
        info!("Compiled {} glyphs with fontc", glyphs.len());

        write_web_fonts(&ttf_path, destination, request.font_name).await
    }
}

/// Wrap the compiled TrueType font as WOFF and WOFF2 next to it
pub async fn write_web_fonts(ttf_path: &Path, destination: &Path, font_name: &str) -> Result<()> {
    let ttf = fs::read(ttf_path)
        .await
        .with_context(|| format!("Failed to read {}", ttf_path.display()))?;

    let flavours = [
        (FontFormat::Woff, woff::encode_woff(&ttf)?),
        (FontFormat::Woff2, woff::encode_woff2(&ttf)?),
    ];
    for (format, bytes) in flavours {
        let path = destination.join(format.generated_file_name(font_name));
        fs::write(&path, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
    }
    Ok(())
}
