//! Motor entity - servo motor catalog record
//!
//! A motor is the driving side of a selection. Only the shaft diameter and
//! the rated speed/torque feed the sizing engine; the flange attributes
//! (centering diameter, fixing PCD, mounting tap) select the adapter.

use serde::{Deserialize, Serialize};

use crate::core::catalog::CatalogError;
use crate::core::keys::{format_number, PartCode, ShaftKey};

/// Motor catalog record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Motor {
    /// Catalog identifier (e.g. "M0001")
    pub id: String,

    /// Manufacturer
    pub brand: String,

    /// Product family (e.g. "HG", "MINAS A6")
    #[serde(default)]
    pub series: String,

    /// Category within the family (e.g. "HG-KR")
    #[serde(default)]
    pub basic_type: String,

    /// Orderable model name
    #[serde(default)]
    pub model_name: String,

    /// Output shaft diameter in mm
    pub shaft_diameter: f64,

    /// Rated power in kW
    #[serde(default)]
    pub rated_power: f64,

    /// Rated torque in N·m
    #[serde(default)]
    pub rated_torque: f64,

    /// Peak torque in N·m
    #[serde(default)]
    pub peak_torque: f64,

    /// Rated speed in rpm
    #[serde(rename = "ratedRPM", default)]
    pub rated_rpm: f64,

    /// Maximum speed in rpm
    #[serde(rename = "maxRPM", default)]
    pub max_rpm: f64,

    /// Rotor inertia in kg·cm²
    #[serde(default)]
    pub inertia: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shaft_length: Option<f64>,

    /// Flange spigot (centering) diameter in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centering_dia: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centering_height: Option<f64>,

    /// Pitch circle diameter of the fixing holes in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixing_pcd: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixing_hole_size: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_size: Option<f64>,

    /// Adapter code as printed in the motor database (e.g. "8-30-46-M4")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adapter_code: Option<String>,

    /// Mounting tap thread (e.g. "M4")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mounting_tap: Option<String>,
}

impl Motor {
    /// Create a motor with the fields the sizing engine needs
    pub fn new(
        id: impl Into<String>,
        brand: impl Into<String>,
        model_name: impl Into<String>,
        shaft_diameter: f64,
        rated_torque: f64,
        rated_rpm: f64,
    ) -> Self {
        Self {
            id: id.into(),
            brand: brand.into(),
            series: String::new(),
            basic_type: String::new(),
            model_name: model_name.into(),
            shaft_diameter,
            rated_power: 0.0,
            rated_torque,
            peak_torque: 0.0,
            rated_rpm,
            max_rpm: 0.0,
            inertia: 0.0,
            weight_kg: None,
            shaft_length: None,
            centering_dia: None,
            centering_height: None,
            fixing_pcd: None,
            fixing_hole_size: None,
            body_size: None,
            adapter_code: None,
            mounting_tap: None,
        }
    }

    /// Set the flange attributes used for exact adapter matching
    pub fn with_flange(mut self, centering_dia: f64, fixing_pcd: f64, mounting_tap: &str) -> Self {
        self.centering_dia = Some(centering_dia);
        self.fixing_pcd = Some(fixing_pcd);
        self.mounting_tap = Some(mounting_tap.to_string());
        self
    }

    /// Shaft-size key for adapter lookups
    pub fn shaft_key(&self) -> ShaftKey {
        ShaftKey::from_diameter(self.shaft_diameter)
    }

    /// Part code this motor's flange requires.
    ///
    /// Only available when centering diameter, fixing PCD and mounting tap are
    /// all known; partial flange data never produces a code.
    pub fn flange_code(&self) -> Option<PartCode> {
        match (self.centering_dia, self.fixing_pcd, self.mounting_tap.as_deref()) {
            (Some(centering), Some(pcd), Some(tap)) if !tap.is_empty() => Some(PartCode::for_flange(
                self.shaft_diameter,
                centering,
                pcd,
                Some(tap),
            )),
            _ => None,
        }
    }

    /// "Brand Model" label for lists and reports
    pub fn display_name(&self) -> String {
        if self.model_name.is_empty() {
            format!("{} {}", self.brand, self.id)
        } else {
            format!("{} {}", self.brand, self.model_name)
        }
    }

    /// Rated power for display: watts below 1 kW, kilowatts otherwise
    pub fn power_display(&self) -> String {
        if self.rated_power > 0.0 && self.rated_power < 1.0 {
            format!("{} W", format_number((self.rated_power * 1000.0).round()))
        } else {
            format!("{} kW", format_number(self.rated_power))
        }
    }

    /// Check the record invariants
    pub fn validate(&self) -> Result<(), CatalogError> {
        if !self.shaft_diameter.is_finite() || self.shaft_diameter <= 0.0 {
            return Err(CatalogError::InvalidMotor {
                id: self.id.clone(),
                reason: format!(
                    "shaft diameter must be positive (got {})",
                    self.shaft_diameter
                ),
            });
        }
        if self.id.trim().is_empty() {
            return Err(CatalogError::InvalidMotor {
                id: self.model_name.clone(),
                reason: "missing id".to_string(),
            });
        }
        Ok(())
    }
}
