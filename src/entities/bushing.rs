//! Bushing entity - sleeve that sizes a smaller motor shaft up to a gearbox bore

use serde::{Deserialize, Serialize};

/// Bushing catalog record for one (shaft, hole) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bushing {
    /// Catalog identifier
    #[serde(default)]
    pub id: String,

    /// Orderable part code (e.g. "B1419")
    pub code: String,

    /// Motor shaft diameter in mm
    pub shaft_mm: f64,

    /// Gearbox bore diameter in mm
    pub hole_mm: f64,

    /// Bushing length in mm
    #[serde(default)]
    pub len_mm: f64,
}

impl Bushing {
    pub fn new(code: impl Into<String>, shaft_mm: f64, hole_mm: f64, len_mm: f64) -> Self {
        let code = code.into();
        Self {
            id: code.clone(),
            code,
            shaft_mm,
            hole_mm,
            len_mm,
        }
    }

    /// Check whether this bushing adapts exactly this shaft into this bore
    pub fn fits(&self, shaft_mm: f64, hole_mm: f64) -> bool {
        self.shaft_mm == shaft_mm && self.hole_mm == hole_mm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bushing_fits_exact_pair_only() {
        let bushing = Bushing::new("B1419", 14.0, 19.0, 20.0);
        assert!(bushing.fits(14.0, 19.0));
        assert!(!bushing.fits(14.0, 22.0));
        assert!(!bushing.fits(19.0, 14.0));
    }

    #[test]
    fn test_bushing_dataset_shape() {
        let json = r#"{ "id": "BS-01", "code": "B0814", "shaftMm": 8, "holeMm": 14, "lenMm": 18 }"#;
        let bushing: Bushing = serde_json::from_str(json).unwrap();
        assert_eq!(bushing.id, "BS-01");
        assert_eq!(bushing.shaft_mm, 8.0);
        assert_eq!(bushing.hole_mm, 14.0);
        assert_eq!(bushing.len_mm, 18.0);
    }
}
