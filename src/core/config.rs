//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::selection::OperatingConditions;
use crate::core::suitability::LoadType;
use crate::core::Project;

/// gbx configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog directory; relative paths resolve against the project root
    pub data_dir: Option<PathBuf>,

    /// Default load type for suitability checks
    pub load_type: Option<String>,

    /// Default operating hours per day
    pub hours_per_day: Option<f64>,

    /// Default mounting direction
    pub mounting_direction: Option<String>,

    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let project = Project::discover().ok();
        Self::load_for(project.as_ref())
    }

    /// Load configuration for a known project (or none)
    pub fn load_for(project: Option<&Project>) -> Self {
        let mut config = Config::default();

        // 1. Global user config (~/.config/gbx/config.yaml)
        if let Some(global) = Self::global_config_path().and_then(|p| Self::read_file(&p)) {
            config.merge(global);
        }

        // 2. Project config (.gbx/config.yaml)
        if let Some(project) = project {
            if let Some(local) = Self::read_file(&project.config_path()) {
                config.merge(local);
            }
        }

        // 3. Environment variables
        config.apply_env(|name| std::env::var(name).ok());

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                None
            }
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "gbx")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Override fields from `GBX_*` environment variables
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var("GBX_DATA_DIR").filter(|v| !v.is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(load_type) = var("GBX_LOAD_TYPE").filter(|v| !v.is_empty()) {
            self.load_type = Some(load_type);
        }
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.data_dir.is_some() {
            self.data_dir = other.data_dir;
        }
        if other.load_type.is_some() {
            self.load_type = other.load_type;
        }
        if other.hours_per_day.is_some() {
            self.hours_per_day = other.hours_per_day;
        }
        if other.mounting_direction.is_some() {
            self.mounting_direction = other.mounting_direction;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Catalog directory: configured path, else `<project>/data`, else `./data`
    pub fn data_dir(&self, project: Option<&Project>) -> PathBuf {
        match (&self.data_dir, project) {
            (Some(dir), Some(project)) if dir.is_relative() => project.root().join(dir),
            (Some(dir), _) => dir.clone(),
            (None, Some(project)) => project.data_dir(),
            (None, None) => PathBuf::from("data"),
        }
    }

    /// Operating conditions built from the configured defaults
    pub fn conditions(&self) -> OperatingConditions {
        let defaults = OperatingConditions::default();
        OperatingConditions {
            hours_per_day: self.hours_per_day.unwrap_or(defaults.hours_per_day),
            load_type: self
                .load_type
                .as_deref()
                .map_or(LoadType::default(), |l| l.parse().unwrap_or_default()),
            mounting_direction: self
                .mounting_direction
                .clone()
                .unwrap_or(defaults.mounting_direction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_later_layer() {
        let mut base: Config = serde_yml::from_str("load_type: uniform\nhours_per_day: 16\n").unwrap();
        let project: Config = serde_yml::from_str("load_type: heavy-shock\n").unwrap();
        base.merge(project);

        assert_eq!(base.load_type.as_deref(), Some("heavy-shock"));
        assert_eq!(base.hours_per_day, Some(16.0));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config {
            load_type: Some("uniform".to_string()),
            ..Config::default()
        };
        config.apply_env(|name| match name {
            "GBX_LOAD_TYPE" => Some("moderate-shock".to_string()),
            "GBX_DATA_DIR" => Some("/srv/catalog".to_string()),
            _ => None,
        });

        assert_eq!(config.load_type.as_deref(), Some("moderate-shock"));
        assert_eq!(config.data_dir(None), PathBuf::from("/srv/catalog"));
    }

    #[test]
    fn test_conditions_defaults() {
        let conditions = Config::default().conditions();
        assert_eq!(conditions, OperatingConditions::default());

        let config = Config {
            load_type: Some("heavy shock".to_string()),
            hours_per_day: Some(24.0),
            ..Config::default()
        };
        let conditions = config.conditions();
        assert_eq!(conditions.load_type, LoadType::HeavyShock);
        assert_eq!(conditions.hours_per_day, 24.0);
        assert_eq!(conditions.mounting_direction, "horizontal");
    }

    #[test]
    fn test_data_dir_resolution() {
        let tmp = tempfile::tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();

        assert_eq!(Config::default().data_dir(Some(&project)), project.data_dir());

        let relative = Config {
            data_dir: Some(PathBuf::from("catalog")),
            ..Config::default()
        };
        assert_eq!(relative.data_dir(Some(&project)), project.root().join("catalog"));
        assert_eq!(Config::default().data_dir(None), PathBuf::from("data"));
    }

    #[test]
    fn test_load_for_reads_project_config() {
        let tmp = tempfile::tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        std::fs::write(project.config_path(), "mounting_direction: vertical\n").unwrap();

        let config = Config::load_for(Some(&project));
        assert_eq!(config.mounting_direction.as_deref(), Some("vertical"));
    }
}
