//! Reducer entity - planetary gearbox model with per-ratio ratings
//!
//! A reducer supports a discrete set of gear ratios. Each ratio carries its
//! own rated output torque, efficiency and stage label ([`RatioSpec`]); the
//! aggregate fields on [`Reducer`] are for display and fallback only.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::core::catalog::CatalogError;
use crate::core::keys::format_number;

/// Gear reduction ratio
///
/// Some catalogs write ratios with a "K" suffix ("3K"); the suffix is
/// dropped on parse. Ratios compare with total ordering so they can key maps.
#[derive(Debug, Clone, Copy)]
pub struct Ratio(f64);

impl Ratio {
    pub fn new(value: f64) -> Self {
        Ratio(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl From<f64> for Ratio {
    fn from(value: f64) -> Self {
        Ratio(value)
    }
}

impl PartialEq for Ratio {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ratio {}

impl PartialOrd for Ratio {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ratio {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Ratio {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_number(self.0))
    }
}

impl FromStr for Ratio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches(&['K', 'k'][..]);
        trimmed
            .parse::<f64>()
            .map(Ratio)
            .map_err(|_| format!("invalid ratio '{}'", s))
    }
}

impl Serialize for Ratio {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.0)
    }
}

impl<'de> Deserialize<'de> for Ratio {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RatioVisitor;

        impl<'de> Visitor<'de> for RatioVisitor {
            type Value = Ratio;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a gear ratio as a number or numeric string")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Ratio, E> {
                Ok(Ratio(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Ratio, E> {
                Ok(Ratio(v as f64))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Ratio, E> {
                Ok(Ratio(v as f64))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Ratio, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(RatioVisitor)
    }
}

/// Rating of a reducer at one specific ratio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioSpec {
    /// Rated output torque in N·m
    #[serde(default)]
    pub torque: f64,

    /// Efficiency as a fraction in (0, 1]
    pub efficiency: f64,

    /// Stage label (L1, L2, ...)
    #[serde(default)]
    pub stage: String,
}

impl RatioSpec {
    pub fn new(torque: f64, efficiency: f64, stage: impl Into<String>) -> Self {
        Self {
            torque,
            efficiency,
            stage: stage.into(),
        }
    }
}

/// Drawing and CAD file names attached directly to a reducer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReducerDrawings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cad_step: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cad_igs: Option<String>,
}

/// Gearbox model catalog record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reducer {
    /// Catalog identifier (e.g. "reducer-GPB-42")
    pub id: String,

    /// Gearbox category (in-line, right-angle, hollow rotary, ...)
    #[serde(rename = "type", default)]
    pub reducer_type: String,

    /// Product series (e.g. "GPB")
    pub series: String,

    /// Frame size
    pub size: u32,

    /// Model name, series + 3-digit size (e.g. "GPB042")
    pub model_name: String,

    /// Input coupling bore diameter in mm (0 for models mounted without an adapter)
    #[serde(default)]
    pub shaft_hole_diameter: f64,

    /// Ratios this model can be ordered with
    pub supported_ratios: Vec<Ratio>,

    /// Rating per supported ratio
    #[serde(serialize_with = "serialize_ratio_data")]
    pub ratio_data: BTreeMap<Ratio, RatioSpec>,

    #[serde(rename = "maxInputRPM", default, skip_serializing_if = "Option::is_none")]
    pub max_input_rpm: Option<f64>,

    /// Largest rated torque over all ratios in N·m
    #[serde(default)]
    pub max_output_torque: f64,

    /// Allowed radial load in N
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_radial_load: Option<f64>,

    /// Allowed axial load in N
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_axial_load: Option<f64>,

    /// Representative efficiency (best stage)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<f64>,

    /// Weight in kg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Noise in dB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise: Option<f64>,

    /// Torsional rigidity in N·m/arcmin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rigidity: Option<f64>,

    /// Inertia in kg·cm²
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inertia: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilting_moment: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawings: Option<ReducerDrawings>,
}

/// JSON object keys must be strings, so ratios are written as "10", "3.5"
fn serialize_ratio_data<S>(data: &BTreeMap<Ratio, RatioSpec>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    use serde::ser::SerializeMap;

    let mut map = serializer.serialize_map(Some(data.len()))?;
    for (ratio, spec) in data {
        map.serialize_entry(&ratio.to_string(), spec)?;
    }
    map.end()
}

impl Reducer {
    /// Create a reducer from its per-ratio ratings.
    ///
    /// The supported-ratio list and the maximum output torque are derived
    /// from `ratio_data`, so the result always satisfies the ratio invariant.
    pub fn new(
        series: impl Into<String>,
        size: u32,
        shaft_hole_diameter: f64,
        ratio_data: BTreeMap<Ratio, RatioSpec>,
    ) -> Self {
        let series = series.into();
        let supported_ratios: Vec<Ratio> = ratio_data.keys().copied().collect();
        let max_output_torque = ratio_data
            .values()
            .map(|s| s.torque)
            .fold(0.0_f64, f64::max);
        let efficiency = ratio_data
            .values()
            .map(|s| s.efficiency)
            .fold(None, |acc: Option<f64>, e| Some(acc.map_or(e, |a| a.max(e))));

        Self {
            id: format!("reducer-{}-{}", series, size),
            reducer_type: String::new(),
            model_name: format!("{}{:03}", series, size),
            series,
            size,
            shaft_hole_diameter,
            supported_ratios,
            ratio_data,
            max_input_rpm: None,
            max_output_torque,
            allowed_radial_load: None,
            allowed_axial_load: None,
            efficiency,
            weight: None,
            noise: None,
            rigidity: None,
            inertia: None,
            tilting_moment: None,
            drawings: None,
        }
    }

    /// Rating at a specific ratio
    pub fn ratio_spec(&self, ratio: Ratio) -> Option<&RatioSpec> {
        self.ratio_data.get(&ratio)
    }

    /// Check whether the model can be ordered with this ratio
    pub fn supports(&self, ratio: Ratio) -> bool {
        self.supported_ratios.contains(&ratio)
    }

    /// Stage label at a ratio, if rated
    pub fn stage(&self, ratio: Ratio) -> Option<&str> {
        self.ratio_spec(ratio)
            .map(|s| s.stage.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Models with no input bore mount directly (hollow rotary) and take no motor adapter
    pub fn is_hollow(&self) -> bool {
        self.shaft_hole_diameter <= 0.0
    }

    /// Check the record invariants
    pub fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason: String| CatalogError::InvalidReducer {
            id: self.id.clone(),
            reason,
        };

        if self.supported_ratios.is_empty() {
            return Err(invalid("no supported ratios".to_string()));
        }

        for ratio in &self.supported_ratios {
            if !ratio.value().is_finite() || ratio.value() <= 0.0 {
                return Err(invalid(format!("ratio {} is not positive", ratio)));
            }
        }

        if !self.shaft_hole_diameter.is_finite() || self.shaft_hole_diameter < 0.0 {
            return Err(invalid(format!(
                "input bore must not be negative (got {})",
                self.shaft_hole_diameter
            )));
        }

        let supported: BTreeSet<Ratio> = self.supported_ratios.iter().copied().collect();
        let rated: BTreeSet<Ratio> = self.ratio_data.keys().copied().collect();

        if let Some(missing) = supported.difference(&rated).next() {
            return Err(invalid(format!("ratio {} has no rating in ratioData", missing)));
        }
        if let Some(extra) = rated.difference(&supported).next() {
            return Err(invalid(format!(
                "ratioData rates {} which is not a supported ratio",
                extra
            )));
        }

        for (ratio, spec) in &self.ratio_data {
            if !(spec.efficiency > 0.0 && spec.efficiency <= 1.0) {
                return Err(invalid(format!(
                    "efficiency {} at ratio {} is outside (0, 1]",
                    spec.efficiency, ratio
                )));
            }
        }

        Ok(())
    }
}
