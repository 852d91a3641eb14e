//! Suitability verdicts from service factor and load type

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Verdict tier, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suitability {
    Suitable,
    Caution,
    Unsuitable,
}

impl fmt::Display for Suitability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suitability::Suitable => write!(f, "suitable"),
            Suitability::Caution => write!(f, "caution"),
            Suitability::Unsuitable => write!(f, "unsuitable"),
        }
    }
}

/// Character of the driven load
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadType {
    #[default]
    Uniform,
    ModerateShock,
    HeavyShock,
    /// Unrecognised label, kept as written
    Other(String),
}

impl LoadType {
    /// Minimum service factor multiplier for this load
    pub fn factor(&self) -> f64 {
        match self {
            LoadType::Uniform => 1.25,
            LoadType::ModerateShock => 1.5,
            LoadType::HeavyShock => 2.0,
            LoadType::Other(_) => 1.0,
        }
    }

    /// The recognised load types
    pub fn known() -> [LoadType; 3] {
        [LoadType::Uniform, LoadType::ModerateShock, LoadType::HeavyShock]
    }
}

impl fmt::Display for LoadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadType::Uniform => write!(f, "uniform"),
            LoadType::ModerateShock => write!(f, "moderate-shock"),
            LoadType::HeavyShock => write!(f, "heavy-shock"),
            LoadType::Other(label) => write!(f, "{}", label),
        }
    }
}

impl FromStr for LoadType {
    type Err = Infallible;

    /// Accepts English labels and the Korean labels used by the source catalogs
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        let normalized = label.to_lowercase().replace(&['_', ' '][..], "-");
        Ok(match normalized.as_str() {
            "uniform" | "uniform-load" | "균일-부하" | "균일부하" => LoadType::Uniform,
            "moderate" | "moderate-shock" | "moderate-shock-load" | "중충격" => {
                LoadType::ModerateShock
            }
            "heavy" | "heavy-shock" | "heavy-shock-load" | "강충격" => LoadType::HeavyShock,
            _ => LoadType::Other(label.to_string()),
        })
    }
}

impl Serialize for LoadType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LoadType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(label.parse().unwrap_or_else(|never: Infallible| match never {}))
    }
}

/// Load factor for a load-type label; unknown labels give 1.0
pub fn load_factor(label: &str) -> f64 {
    label.parse::<LoadType>().map_or(1.0, |lt| lt.factor())
}

/// Classify a service factor against a load factor.
///
/// Suitable from `1.2 * load_factor`, caution from `1.0 * load_factor`,
/// unsuitable below that (including a service factor of 0).
pub fn classify(service_factor: f64, load_factor: f64) -> Suitability {
    if service_factor >= 1.2 * load_factor {
        Suitability::Suitable
    } else if service_factor >= 1.0 * load_factor {
        Suitability::Caution
    } else {
        Suitability::Unsuitable
    }
}
