//! Catalog datasets - loaded once, validated, then shared read-only
//!
//! A catalog directory holds up to five datasets:
//!
//! | stem       | required | shape                                      |
//! |------------|----------|--------------------------------------------|
//! | `motors`   | yes      | list of [`Motor`]                          |
//! | `reducers` | yes      | list of [`Reducer`]                        |
//! | `bushings` | no       | list of [`Bushing`]                        |
//! | `adapters` | no       | `model -> shaft key -> type -> part code`  |
//! | `drawings` | no       | `series|size|stage|bore[|tap] -> files`    |
//!
//! Every record is validated before the catalog is handed out, so the
//! resolvers never see malformed data.

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::keys::KeyParseError;
use crate::core::loader::{find_dataset, load_dataset, OrderedMap};
use crate::diagnostics::DatasetSyntaxError;
use crate::entities::adapter::{AdapterCatalog, RawAdapterCatalog};
use crate::entities::drawing::{DrawingIndex, DrawingSet};
use crate::entities::{Bushing, Motor, Reducer};

/// Errors raised while loading or validating catalog data
#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("failed to read {path}")]
    #[diagnostic(code(gbx::catalog::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(DatasetSyntaxError),

    #[error("required dataset '{name}' not found in {dir}")]
    #[diagnostic(
        code(gbx::catalog::missing),
        help("expected {name}.json or {name}.yaml; run `gbx init` to seed a sample catalog")
    )]
    MissingDataset { name: &'static str, dir: PathBuf },

    #[error("invalid motor '{id}': {reason}")]
    #[diagnostic(code(gbx::catalog::motor))]
    InvalidMotor { id: String, reason: String },

    #[error("invalid reducer '{id}': {reason}")]
    #[diagnostic(code(gbx::catalog::reducer))]
    InvalidReducer { id: String, reason: String },

    #[error("duplicate bushing for shaft {shaft_mm} mm into bore {hole_mm} mm")]
    #[diagnostic(
        code(gbx::catalog::bushing),
        help("each (shaft, bore) pair may map to at most one bushing")
    )]
    DuplicateBushing { shaft_mm: f64, hole_mm: f64 },

    #[error("invalid adapter entry {model}/{shaft}/{adapter_type}: {reason}")]
    #[diagnostic(code(gbx::catalog::adapter))]
    InvalidAdapter {
        model: String,
        shaft: String,
        adapter_type: String,
        reason: String,
    },

    #[error("invalid drawing index: {0}")]
    #[diagnostic(code(gbx::catalog::drawing))]
    InvalidDrawingKey(KeyParseError),
}

/// All catalog datasets
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub motors: Vec<Motor>,
    pub reducers: Vec<Reducer>,
    pub bushings: Vec<Bushing>,
    pub adapters: AdapterCatalog,
    pub drawings: DrawingIndex,
}

impl Catalog {
    /// Load and validate every dataset in a catalog directory
    pub fn load(dir: &Path) -> Result<Self, CatalogError> {
        let motors: Vec<Motor> = load_dataset(&require(dir, "motors")?)?;
        let reducers: Vec<Reducer> = load_dataset(&require(dir, "reducers")?)?;

        let bushings: Vec<Bushing> = load_optional(dir, "bushings")?.unwrap_or_default();

        let adapters = match load_optional::<RawAdapterCatalog>(dir, "adapters")? {
            Some(raw) => AdapterCatalog::from_raw(raw)?,
            None => AdapterCatalog::default(),
        };

        let drawings = match load_optional::<OrderedMap<DrawingSet>>(dir, "drawings")? {
            Some(raw) => DrawingIndex::from_raw(raw)?,
            None => DrawingIndex::default(),
        };

        let catalog = Self::from_parts(motors, reducers, bushings, adapters, drawings)?;

        tracing::info!(
            dir = %dir.display(),
            motors = catalog.motors.len(),
            reducers = catalog.reducers.len(),
            bushings = catalog.bushings.len(),
            adapter_models = catalog.adapters.len(),
            drawing_keys = catalog.drawings.len(),
            "catalog loaded"
        );

        Ok(catalog)
    }

    /// Assemble a catalog from already-decoded datasets, validating every record
    pub fn from_parts(
        motors: Vec<Motor>,
        reducers: Vec<Reducer>,
        bushings: Vec<Bushing>,
        adapters: AdapterCatalog,
        drawings: DrawingIndex,
    ) -> Result<Self, CatalogError> {
        let catalog = Self {
            motors,
            reducers,
            bushings,
            adapters,
            drawings,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check record invariants across all datasets
    pub fn validate(&self) -> Result<(), CatalogError> {
        for motor in &self.motors {
            motor.validate()?;
        }
        for reducer in &self.reducers {
            reducer.validate()?;
        }
        validate_bushings(&self.bushings)
    }

    /// Find a motor by id, falling back to a case-insensitive model name match
    pub fn motor(&self, key: &str) -> Option<&Motor> {
        self.motors.iter().find(|m| m.id == key).or_else(|| {
            self.motors
                .iter()
                .find(|m| m.model_name.eq_ignore_ascii_case(key))
        })
    }

    /// Find a reducer by id or model name
    pub fn reducer(&self, key: &str) -> Option<&Reducer> {
        self.reducers.iter().find(|r| r.id == key).or_else(|| {
            self.reducers
                .iter()
                .find(|r| r.model_name.eq_ignore_ascii_case(key))
        })
    }
}

fn require(dir: &Path, name: &'static str) -> Result<PathBuf, CatalogError> {
    find_dataset(dir, name).ok_or_else(|| CatalogError::MissingDataset {
        name,
        dir: dir.to_path_buf(),
    })
}

fn load_optional<T: serde::de::DeserializeOwned + 'static>(
    dir: &Path,
    name: &str,
) -> Result<Option<T>, CatalogError> {
    match find_dataset(dir, name) {
        Some(path) => load_dataset(&path).map(Some),
        None => {
            tracing::warn!(dataset = name, dir = %dir.display(), "optional dataset missing, using empty");
            Ok(None)
        }
    }
}

/// Reject two bushings registered for the same (shaft, bore) pair
pub fn validate_bushings(bushings: &[Bushing]) -> Result<(), CatalogError> {
    for (i, a) in bushings.iter().enumerate() {
        if bushings[i + 1..]
            .iter()
            .any(|b| b.fits(a.shaft_mm, a.hole_mm))
        {
            return Err(CatalogError::DuplicateBushing {
                shaft_mm: a.shaft_mm,
                hole_mm: a.hole_mm,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const MOTORS: &str = r#"[
        { "id": "M0001", "brand": "Acme", "modelName": "AC-200", "shaftDiameter": 8,
          "ratedTorque": 2.39, "ratedRPM": 3000 }
    ]"#;

    const REDUCERS: &str = r#"[
        { "id": "reducer-GPB-42", "series": "GPB", "size": 42, "modelName": "GPB042",
          "shaftHoleDiameter": 8, "supportedRatios": [10],
          "ratioData": { "10": { "torque": 24, "efficiency": 0.95, "stage": "L1" } } }
    ]"#;

    fn write_minimal(dir: &Path) {
        fs::write(dir.join("motors.json"), MOTORS).unwrap();
        fs::write(dir.join("reducers.json"), REDUCERS).unwrap();
    }

    #[test]
    fn test_load_minimal_catalog() {
        let tmp = tempdir().unwrap();
        write_minimal(tmp.path());

        let catalog = Catalog::load(tmp.path()).unwrap();
        assert_eq!(catalog.motors.len(), 1);
        assert_eq!(catalog.reducers.len(), 1);
        assert!(catalog.bushings.is_empty());
        assert!(catalog.adapters.is_empty());
        assert!(catalog.drawings.is_empty());
    }

    #[test]
    fn test_missing_required_dataset() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("motors.json"), MOTORS).unwrap();

        let err = Catalog::load(tmp.path()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingDataset { name: "reducers", .. }));
    }

    #[test]
    fn test_load_rejects_bad_reducer() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("motors.json"), MOTORS).unwrap();
        fs::write(
            tmp.path().join("reducers.json"),
            r#"[{ "id": "R1", "series": "GPB", "size": 42, "modelName": "GPB042",
                  "shaftHoleDiameter": 8, "supportedRatios": [10, 20],
                  "ratioData": { "10": { "torque": 24, "efficiency": 0.95 } } }]"#,
        )
        .unwrap();

        let err = Catalog::load(tmp.path()).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidReducer { .. }));
    }

    #[test]
    fn test_load_rejects_zero_shaft_motor() {
        let tmp = tempdir().unwrap();
        write_minimal(tmp.path());
        fs::write(
            tmp.path().join("motors.json"),
            r#"[{ "id": "M9", "brand": "Acme", "shaftDiameter": 0 }]"#,
        )
        .unwrap();

        let err = Catalog::load(tmp.path()).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidMotor { .. }));
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let tmp = tempdir().unwrap();
        write_minimal(tmp.path());
        fs::write(tmp.path().join("bushings.json"), "[{ \"code\": \"B1419\", }]").unwrap();

        let err = Catalog::load(tmp.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Syntax(_)));
    }

    #[test]
    fn test_yaml_datasets() {
        let tmp = tempdir().unwrap();
        write_minimal(tmp.path());
        fs::write(
            tmp.path().join("bushings.yaml"),
            "- code: B1419\n  shaftMm: 14\n  holeMm: 19\n  lenMm: 20\n",
        )
        .unwrap();

        let catalog = Catalog::load(tmp.path()).unwrap();
        assert_eq!(catalog.bushings[0].code, "B1419");
    }

    #[test]
    fn test_duplicate_bushings_rejected() {
        let bushings = vec![
            Bushing::new("B1419", 14.0, 19.0, 20.0),
            Bushing::new("B1419-2", 14.0, 19.0, 25.0),
        ];
        let err = validate_bushings(&bushings).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateBushing { .. }));

        let distinct = vec![
            Bushing::new("B1419", 14.0, 19.0, 20.0),
            Bushing::new("B1422", 14.0, 22.0, 20.0),
        ];
        assert!(validate_bushings(&distinct).is_ok());
    }

    #[test]
    fn test_lookups() {
        let tmp = tempdir().unwrap();
        write_minimal(tmp.path());
        let catalog = Catalog::load(tmp.path()).unwrap();

        assert!(catalog.motor("M0001").is_some());
        assert!(catalog.motor("ac-200").is_some());
        assert!(catalog.motor("M9999").is_none());

        assert!(catalog.reducer("reducer-GPB-42").is_some());
        assert!(catalog.reducer("GPB042").is_some());
        assert!(catalog.reducer("gpb042").is_some());
        assert!(catalog.reducer("GPB060").is_none());
    }
}
