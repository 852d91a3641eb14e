//! Structured catalog keys with explicit encode/decode pairs
//!
//! The prepared datasets address records through three string-encoded
//! composite keys. Each one gets a type here so producer and consumer can't
//! drift apart on formatting (zero padding, decimal shafts, tap casing).
//!
//! - [`ShaftKey`] - `G08`, `G14`, `G6.35`
//! - [`PartCode`] - `8-30-45-M3`, `14-50-70`
//! - [`DrawingKey`] - `GPB|042|L1|8|M3`

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// Format a dimension the way the catalogs write it: integers without a
/// decimal point, everything else as the shortest round-trip decimal.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Shaft-size key used by the adapter catalog
#[derive(Debug, Clone, Copy)]
pub struct ShaftKey {
    diameter: f64,
}

impl ShaftKey {
    /// Key for a motor shaft diameter in millimetres
    pub fn from_diameter(diameter: f64) -> Self {
        Self { diameter }
    }

    /// Shaft diameter in millimetres
    pub fn diameter(&self) -> f64 {
        self.diameter
    }
}

impl PartialEq for ShaftKey {
    fn eq(&self, other: &Self) -> bool {
        self.diameter.to_bits() == other.diameter.to_bits()
    }
}

impl Eq for ShaftKey {}

impl Hash for ShaftKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.diameter.to_bits().hash(state);
    }
}

impl fmt::Display for ShaftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.diameter.fract() == 0.0 {
            write!(f, "G{:02}", self.diameter as i64)
        } else {
            write!(f, "G{}", self.diameter)
        }
    }
}

impl FromStr for ShaftKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('G')
            .or_else(|| s.strip_prefix('g'))
            .ok_or_else(|| KeyParseError::InvalidShaftKey(s.to_string()))?;

        let diameter: f64 = digits
            .trim()
            .parse()
            .map_err(|_| KeyParseError::InvalidShaftKey(s.to_string()))?;

        if !diameter.is_finite() || diameter <= 0.0 {
            return Err(KeyParseError::InvalidShaftKey(s.to_string()));
        }

        Ok(Self { diameter })
    }
}

/// Adapter part code: shaft, centering diameter, fixing PCD and optional tap
#[derive(Debug, Clone, PartialEq)]
pub struct PartCode {
    pub shaft_dia: f64,
    pub centering_dia: f64,
    pub fixing_pcd: f64,
    /// Mounting tap thread (e.g. "M3"); some adapter types have none
    pub mounting_tap: Option<String>,
}

impl PartCode {
    /// Part code a motor flange would need
    pub fn for_flange(
        shaft_dia: f64,
        centering_dia: f64,
        fixing_pcd: f64,
        mounting_tap: Option<&str>,
    ) -> Self {
        Self {
            shaft_dia,
            centering_dia,
            fixing_pcd,
            mounting_tap: mounting_tap.map(String::from),
        }
    }
}

impl fmt::Display for PartCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            format_number(self.shaft_dia),
            format_number(self.centering_dia),
            format_number(self.fixing_pcd)
        )?;
        if let Some(ref tap) = self.mounting_tap {
            write!(f, "-{}", tap)?;
        }
        Ok(())
    }
}

impl FromStr for PartCode {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').map(str::trim).collect();
        if parts.len() < 3 {
            return Err(KeyParseError::InvalidPartCode {
                code: s.to_string(),
                reason: "expected at least shaft, centering and PCD segments".to_string(),
            });
        }

        let number = |idx: usize, what: &str| -> Result<f64, KeyParseError> {
            parts[idx].parse::<f64>().map_err(|_| KeyParseError::InvalidPartCode {
                code: s.to_string(),
                reason: format!("{} '{}' is not a number", what, parts[idx]),
            })
        };

        let shaft_dia = number(0, "shaft diameter")?;
        let centering_dia = number(1, "centering diameter")?;
        let fixing_pcd = number(2, "fixing PCD")?;

        let last = parts[parts.len() - 1];
        let mounting_tap = if last.starts_with('M') {
            Some(last.to_string())
        } else {
            None
        };

        Ok(Self {
            shaft_dia,
            centering_dia,
            fixing_pcd,
            mounting_tap,
        })
    }
}

/// Drawing-index key: `series|size|stage|bore[|TAP]`
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingKey {
    pub series: String,
    pub size: u32,
    pub stage: String,
    pub bore: f64,
    pub mounting_tap: Option<String>,
}

impl DrawingKey {
    pub fn new(
        series: impl Into<String>,
        size: u32,
        stage: impl Into<String>,
        bore: f64,
        mounting_tap: Option<&str>,
    ) -> Self {
        Self {
            series: series.into(),
            size,
            stage: stage.into(),
            bore,
            mounting_tap: mounting_tap.map(|t| t.to_uppercase()),
        }
    }

    /// Key without the mounting tap segment, used for prefix merging
    pub fn prefix(&self) -> String {
        format!(
            "{}|{:03}|{}|{}",
            self.series,
            self.size,
            self.stage,
            format_number(self.bore)
        )
    }

    /// True if `other` shares series, size, stage and bore with this key
    pub fn same_prefix(&self, other: &DrawingKey) -> bool {
        self.series == other.series
            && self.size == other.size
            && self.stage == other.stage
            && self.bore.to_bits() == other.bore.to_bits()
    }
}

impl fmt::Display for DrawingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())?;
        if let Some(ref tap) = self.mounting_tap {
            write!(f, "|{}", tap)?;
        }
        Ok(())
    }
}

impl FromStr for DrawingKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| KeyParseError::InvalidDrawingKey {
            key: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = s.split('|').collect();
        if parts.len() != 4 && parts.len() != 5 {
            return Err(invalid("expected series|size|stage|bore[|tap]"));
        }

        let size: u32 = parts[1]
            .parse()
            .map_err(|_| invalid("size is not an unsigned integer"))?;
        let bore: f64 = parts[3]
            .parse()
            .map_err(|_| invalid("bore diameter is not a number"))?;
        let mounting_tap = parts.get(4).filter(|t| !t.is_empty()).copied();

        Ok(DrawingKey::new(parts[0], size, parts[2], bore, mounting_tap))
    }
}

/// Errors that can occur when decoding a catalog key
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KeyParseError {
    #[error("invalid shaft key '{0}' (expected G<diameter>, e.g. G08 or G6.35)")]
    InvalidShaftKey(String),

    #[error("invalid adapter part code '{code}': {reason}")]
    InvalidPartCode { code: String, reason: String },

    #[error("invalid drawing key '{key}': {reason}")]
    InvalidDrawingKey { key: String, reason: String },
}
