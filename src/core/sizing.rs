//! Sizing calculations
//!
//! All functions are total: degenerate inputs (zero or negative ratio or
//! torque) give 0 instead of an error or a division by zero.
//!
//! Service factor is `rated / applied` - how many times over-rated the
//! gearbox is for the torque it must deliver. Higher is safer.

use serde::Serialize;

use crate::entities::{Motor, Ratio, Reducer};

/// Gearbox output speed in rpm
pub fn output_rpm(motor_rated_rpm: f64, ratio: Option<Ratio>) -> f64 {
    match ratio {
        Some(r) if r.value() > 0.0 => motor_rated_rpm / r.value(),
        _ => 0.0,
    }
}

/// Gearbox output torque in N·m
pub fn output_torque(motor_rated_torque: f64, ratio: Ratio, efficiency: f64) -> f64 {
    if ratio.value() <= 0.0 {
        return 0.0;
    }
    motor_rated_torque * ratio.value() * clamp_efficiency(efficiency)
}

/// Efficiency outside (0, 1] is treated as lossless
pub fn clamp_efficiency(efficiency: f64) -> f64 {
    if efficiency > 0.0 && efficiency <= 1.0 {
        efficiency
    } else {
        1.0
    }
}

/// Efficiency at a ratio, falling back to the reducer's representative value
pub fn effective_efficiency(reducer: &Reducer, ratio: Ratio) -> f64 {
    let specific = reducer
        .ratio_spec(ratio)
        .map(|s| s.efficiency)
        .filter(|e| *e != 0.0);
    clamp_efficiency(specific.or(reducer.efficiency).unwrap_or(0.0))
}

/// Rated output torque at a ratio, falling back to the reducer's maximum
pub fn effective_rated_torque(reducer: &Reducer, ratio: Ratio) -> f64 {
    reducer
        .ratio_spec(ratio)
        .map(|s| s.torque)
        .filter(|t| *t != 0.0)
        .unwrap_or(reducer.max_output_torque)
}

/// Rated torque over applied torque; 0 if either is not positive
pub fn service_factor(applied_output_torque: f64, reducer_rated_torque: f64) -> f64 {
    if applied_output_torque <= 0.0 || reducer_rated_torque <= 0.0 {
        return 0.0;
    }
    reducer_rated_torque / applied_output_torque
}

/// Derived mechanical outputs for one motor, reducer and ratio
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sizing {
    #[serde(rename = "outputRPM")]
    pub output_rpm: f64,
    pub output_torque: f64,
    pub efficiency: f64,
    pub rated_torque: f64,
    pub service_factor: f64,
}

/// Run every sizing calculation for a pairing
pub fn size(motor: &Motor, reducer: &Reducer, ratio: Ratio) -> Sizing {
    let efficiency = effective_efficiency(reducer, ratio);
    let rated_torque = effective_rated_torque(reducer, ratio);
    let output_torque = output_torque(motor.rated_torque, ratio, efficiency);

    Sizing {
        output_rpm: output_rpm(motor.rated_rpm, Some(ratio)),
        output_torque,
        efficiency,
        rated_torque,
        service_factor: service_factor(output_torque, rated_torque),
    }
}
