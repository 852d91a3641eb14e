//! Shaft compatibility between a motor and a gearbox input bore
//!
//! A motor couples to a gearbox either directly (shaft == bore) or through a
//! catalogued bushing that sleeves a smaller shaft up to the bore. An
//! oversized shaft never fits. Bushings are matched on the exact pair only.

use serde::Serialize;

use crate::entities::Bushing;

/// How a motor shaft mates with a gearbox bore
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShaftFit<'a> {
    /// Shaft and bore are the same size
    Direct,
    /// Shaft is smaller and a bushing exists for the pair
    Bushing { bushing: &'a Bushing },
    /// Shaft is larger than the bore, or no bushing is registered
    Incompatible,
}

impl ShaftFit<'_> {
    pub fn is_compatible(&self) -> bool {
        !matches!(self, ShaftFit::Incompatible)
    }
}

/// Bushing adapting `shaft_mm` into `bore_mm`.
///
/// Returns `None` when no bushing is needed (equal sizes) or none is
/// registered for the exact pair.
pub fn find_bushing(bushings: &[Bushing], shaft_mm: f64, bore_mm: f64) -> Option<&Bushing> {
    if shaft_mm == bore_mm {
        return None;
    }
    bushings.iter().find(|b| b.fits(shaft_mm, bore_mm))
}

/// Classify how a shaft mates with a bore
pub fn shaft_fit(bushings: &[Bushing], shaft_mm: f64, bore_mm: f64) -> ShaftFit<'_> {
    if shaft_mm == bore_mm {
        return ShaftFit::Direct;
    }
    if shaft_mm > bore_mm {
        return ShaftFit::Incompatible;
    }
    match find_bushing(bushings, shaft_mm, bore_mm) {
        Some(bushing) => ShaftFit::Bushing { bushing },
        None => ShaftFit::Incompatible,
    }
}

/// True if the shaft couples to the bore directly or through a bushing
pub fn is_shaft_compatible(bushings: &[Bushing], shaft_mm: f64, bore_mm: f64) -> bool {
    shaft_fit(bushings, shaft_mm, bore_mm).is_compatible()
}
