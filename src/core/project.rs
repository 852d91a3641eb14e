//! Project discovery and structure

use rust_embed::Embed;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Embed)]
#[folder = "assets/catalog/"]
struct SampleCatalog;

/// A gbx project: a directory holding `.gbx/` and, by default, a `data/` catalog
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .gbx/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(".gbx").is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new project with the sample catalog
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if root.join(".gbx").exists() {
            return Err(ProjectError::AlreadyExists(root));
        }

        Self::create(root)
    }

    /// Initialize even if .gbx/ exists, rewriting the config and sample catalog
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::create(root)
    }

    fn create(root: PathBuf) -> Result<Self, ProjectError> {
        let project = Self { root };

        std::fs::create_dir_all(project.gbx_dir()).map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::write(project.config_path(), Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        seed_catalog(&project.data_dir())?;
        tracing::debug!(root = %project.root.display(), "project initialised");

        Ok(project)
    }

    fn default_config() -> &'static str {
        r#"# gbx project configuration

# Catalog directory, relative to the project root (default: data)
# data_dir: data

# Default operating conditions
# load_type: uniform          # uniform, moderate-shock, heavy-shock
# hours_per_day: 8
# mounting_direction: horizontal

# Default output format (auto, json, yaml, tsv, csv, md)
# default_format: auto
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .gbx configuration directory
    pub fn gbx_dir(&self) -> PathBuf {
        self.root.join(".gbx")
    }

    pub fn config_path(&self) -> PathBuf {
        self.gbx_dir().join("config.yaml")
    }

    /// Default catalog directory
    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }
}

/// Names of the datasets in the embedded sample catalog
pub fn sample_datasets() -> Vec<String> {
    let mut names: Vec<String> = SampleCatalog::iter().map(|f| f.to_string()).collect();
    names.sort();
    names
}

/// Write the embedded sample catalog into a directory
pub fn seed_catalog(dir: &Path) -> Result<Vec<PathBuf>, ProjectError> {
    std::fs::create_dir_all(dir).map_err(|e| ProjectError::IoError(e.to_string()))?;

    let mut written = Vec::new();
    for name in sample_datasets() {
        if let Some(file) = SampleCatalog::get(&name) {
            let path = dir.join(&name);
            std::fs::write(&path, file.data.as_ref()).map_err(|e| ProjectError::IoError(e.to_string()))?;
            written.push(path);
        }
    }
    Ok(written)
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a gbx project (searched from {searched_from:?}). Run 'gbx init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("gbx project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}
