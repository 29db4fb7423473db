//! Scoped temporary workspace
//!
//! Holds the normalized icons and the raw generator output for one run. It
//! lives next to the output directory (`.<output-name>-XXXXXX`) and is removed
//! when dropped, whichever way the run ends.

use crate::core::errors::{PipelineError, PipelineResult};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn create(output_dir: &Path) -> PipelineResult<Self> {
        let parent = match output_dir.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|e| PipelineError::io(&parent, e))?;

        let name = output_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());

        let dir = tempfile::Builder::new()
            .prefix(&format!(".{name}-"))
            .tempdir_in(&parent)
            .map_err(|e| PipelineError::io(&parent, e))?;

        debug!("Created workspace {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Directory for normalized icon copies
    pub fn sources_dir(&self) -> PipelineResult<PathBuf> {
        self.subdirectory("sources")
    }

    /// Directory the font generator writes into
    pub fn font_dir(&self) -> PipelineResult<PathBuf> {
        self.subdirectory("webfont")
    }

    fn subdirectory(&self, name: &str) -> PipelineResult<PathBuf> {
        let path = self.dir.path().join(name);
        fs::create_dir_all(&path).map_err(|e| PipelineError::io(&path, e))?;
        Ok(path)
    }

    /// Remove the workspace, reporting failures that `Drop` would swallow
    pub fn close(self) -> PipelineResult<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close().map_err(|e| PipelineError::io(&path, e))?;
        debug!("Removed workspace {}", path.display());
        Ok(())
    }
}
