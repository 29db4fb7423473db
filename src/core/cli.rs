//! Command line interface for iconforge
//!
//! Handles parsing command line arguments and provides
//! validation for user inputs before the pipeline starts.

use crate::pipeline::{PipelineConfig, DEFAULT_BASE_PATH};
use crate::svg::{NormalizeStrategy, DEFAULT_TARGET_SIZE};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// How icon sizes are made uniform before font conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum StrategyArg {
    /// Scale every icon to the same height, keeping its aspect ratio
    #[default]
    Rescale,
    /// Require viewBoxes starting at 0 0 and size icons from them
    AlignViewBox,
}

/// iconforge CLI arguments
///
/// Examples:
///   iconforge icons/ src/icons                     # Fonts referenced as ./font
///   iconforge icons/ src/icons /assets/icons       # Custom font URL prefix
///   iconforge icons/ out --strategy align-view-box # Reject offset viewBoxes
///   iconforge icons/ out --content-hash            # Cache-busting font URLs
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "iconforge",
    version,
    about = "Build an icon web font and TypeScript module from SVG icons",
    long_about = "iconforge converts a directory of SVG icons into an icon web font and a generated TypeScript module. The module declares the font, binds one private-use-area glyph to each icon through a CSS attribute selector, and exports one element factory per icon."
)]
pub struct CliArgs {
    /// Directory containing the SVG icons
    #[clap(value_name = "SOURCE", help = "Directory containing the SVG icons")]
    pub source: PathBuf,

    /// Directory receiving font/ and index.ts
    #[clap(value_name = "OUTPUT", help = "Directory receiving font/ and index.ts")]
    pub output: PathBuf,

    /// URL prefix the fonts are referenced under in the generated module
    #[clap(
        value_name = "BASE_PATH",
        default_value = DEFAULT_BASE_PATH,
        help = "URL prefix of the fonts in the generated module"
    )]
    pub base_path: String,

    /// Geometry normalization strategy
    #[clap(
        long = "strategy",
        short = 's',
        value_enum,
        default_value_t = StrategyArg::Rescale,
        help = "How icon sizes are normalized",
        long_help = "How icon sizes are normalized before conversion. 'rescale' scales every icon to the target height and keeps its aspect ratio. 'align-view-box' requires every viewBox to start at 0 0 and takes the icon size from it."
    )]
    pub strategy: StrategyArg,

    /// Target height for the rescale strategy
    #[clap(
        long = "target-size",
        value_name = "UNITS",
        default_value_t = DEFAULT_TARGET_SIZE,
        help = "Icon height used by the rescale strategy"
    )]
    pub target_size: f64,

    /// Append a content digest to each font URL
    #[clap(
        long = "content-hash",
        help = "Append a content digest to font URLs for cache busting"
    )]
    pub content_hash: bool,

    /// Font compiler executable
    #[clap(
        long = "fontc",
        value_name = "PATH",
        default_value = "fontc",
        help = "fontc executable used to compile the TrueType font"
    )]
    pub fontc: PathBuf,
}

impl CliArgs {
    /// Validate the CLI arguments after parsing
    pub fn validate(&self) -> Result<(), String> {
        if !self.source.is_dir() {
            return Err(format!(
                "Source directory does not exist: {}\nMake sure the path is correct and points to a directory of SVG files.",
                self.source.display()
            ));
        }

        if self.output.is_file() {
            return Err(format!(
                "Output path is a file: {}\nThe output must be a directory.",
                self.output.display()
            ));
        }

        if !(self.target_size.is_finite() && self.target_size > 0.0) {
            return Err(format!(
                "Invalid target size: {}\nThe target size must be a positive number.",
                self.target_size
            ));
        }

        Ok(())
    }

    pub fn normalize_strategy(&self) -> NormalizeStrategy {
        match self.strategy {
            StrategyArg::Rescale => NormalizeStrategy::Rescale {
                target_size: self.target_size,
            },
            StrategyArg::AlignViewBox => NormalizeStrategy::AlignViewBox,
        }
    }

    pub fn to_config(&self) -> PipelineConfig {
        PipelineConfig {
            source_dir: self.source.clone(),
            output_dir: self.output.clone(),
            base_path: self.base_path.clone(),
            strategy: self.normalize_strategy(),
            content_hash: self.content_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn test_positional_defaults() {
        let args = CliArgs::try_parse_from(["iconforge", "icons", "out"]).unwrap();
        assert_eq!(args.source, PathBuf::from("icons"));
        assert_eq!(args.output, PathBuf::from("out"));
        assert_eq!(args.base_path, "./font");
        assert_eq!(args.strategy, StrategyArg::Rescale);
        assert!(!args.content_hash);

        let config = args.to_config();
        assert_eq!(config.strategy, NormalizeStrategy::Rescale { target_size: 250.0 });
    }

    #[test]
    fn test_options() {
        let args = CliArgs::try_parse_from([
            "iconforge",
            "icons",
            "out",
            "/assets/icons",
            "--strategy",
            "align-view-box",
            "--content-hash",
        ])
        .unwrap();
        assert_eq!(args.base_path, "/assets/icons");

        let config = args.to_config();
        assert_eq!(config.strategy, NormalizeStrategy::AlignViewBox);
        assert!(config.content_hash);
    }

    #[test]
    fn test_requires_source_and_output() {
        assert!(CliArgs::try_parse_from(["iconforge", "icons"]).is_err());
    }

    #[test]
    fn test_validate_source_directory() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("missing");
        let args = CliArgs::try_parse_from([
            OsStr::new("iconforge"),
            missing.as_os_str(),
            root.path().join("out").as_os_str(),
        ])
        .unwrap();
        assert!(args.validate().unwrap_err().contains("does not exist"));

        let args = CliArgs {
            source: root.path().to_path_buf(),
            ..args
        };
        assert!(args.validate().is_ok());
    }
}
