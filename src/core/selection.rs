//! Selection workflow
//!
//! Candidate queries are pure functions over an explicit [`Catalog`];
//! [`SelectionSession`] is the only mutable state and holds the user's
//! choices through the five workflow steps. Choosing something upstream
//! clears every choice that depended on it.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::core::adapter::find_adapter;
use crate::core::catalog::Catalog;
use crate::core::compat::{find_bushing, is_shaft_compatible};
use crate::core::sizing::{size, Sizing};
use crate::core::suitability::{classify, LoadType, Suitability};
use crate::entities::{Adapter, Bushing, Motor, Ratio, Reducer};

/// Operating conditions entered by the user. Only the load type affects the verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperatingConditions {
    pub hours_per_day: f64,
    pub load_type: LoadType,
    pub mounting_direction: String,
}

impl Default for OperatingConditions {
    fn default() -> Self {
        Self {
            hours_per_day: 8.0,
            load_type: LoadType::Uniform,
            mounting_direction: "horizontal".to_string(),
        }
    }
}

/// Workflow step
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    #[default]
    Motor = 1,
    MotorSpec = 2,
    Conditions = 3,
    Reducer = 4,
    Result = 5,
}

impl Step {
    /// Step for a number, clamped to 1..=5
    pub fn from_number(n: i64) -> Self {
        match n.clamp(1, 5) {
            1 => Step::Motor,
            2 => Step::MotorSpec,
            3 => Step::Conditions,
            4 => Step::Reducer,
            _ => Step::Result,
        }
    }

    pub fn number(self) -> i64 {
        self as i64
    }

    pub fn next(self) -> Self {
        Step::from_number(self.number() + 1)
    }

    pub fn prev(self) -> Self {
        Step::from_number(self.number() - 1)
    }
}

/// One evaluated gearbox for a motor and ratio
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate<'a> {
    pub reducer: &'a Reducer,
    pub ratio: Ratio,
    #[serde(flatten)]
    pub sizing: Sizing,
    pub stage: Option<String>,
    pub load_factor: f64,
    pub suitability: Suitability,
    pub bushing: Option<&'a Bushing>,
    pub adapter: Option<Adapter>,
}

/// Completed selection: the chosen pairing and everything derived from it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResult {
    pub motor: Motor,
    pub reducer: Reducer,
    pub selected_ratio: Ratio,
    #[serde(rename = "outputRPM")]
    pub output_rpm: f64,
    pub output_torque: f64,
    pub service_factor: f64,
    pub suitability: Suitability,
    pub efficiency: f64,
    pub rated_torque: f64,
    pub stage: Option<String>,
    pub load_factor: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bushing: Option<Bushing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adapter: Option<Adapter>,
}

impl SelectionResult {
    pub fn from_candidate(motor: &Motor, candidate: &Candidate<'_>) -> Self {
        Self {
            motor: motor.clone(),
            reducer: candidate.reducer.clone(),
            selected_ratio: candidate.ratio,
            output_rpm: candidate.sizing.output_rpm,
            output_torque: candidate.sizing.output_torque,
            service_factor: candidate.sizing.service_factor,
            suitability: candidate.suitability,
            efficiency: candidate.sizing.efficiency,
            rated_torque: candidate.sizing.rated_torque,
            stage: candidate.stage.clone(),
            load_factor: candidate.load_factor,
            bushing: candidate.bushing.cloned(),
            adapter: candidate.adapter.clone(),
        }
    }
}

/// Reducers whose input bore accepts the motor shaft, directly or via a bushing
pub fn compatible_reducers<'a>(catalog: &'a Catalog, motor: &Motor) -> Vec<&'a Reducer> {
    catalog
        .reducers
        .iter()
        .filter(|r| is_shaft_compatible(&catalog.bushings, motor.shaft_diameter, r.shaft_hole_diameter))
        .collect()
}

/// Distinct reducer types, sorted
pub fn reducer_types(reducers: &[&Reducer]) -> Vec<String> {
    let mut types: Vec<String> = reducers
        .iter()
        .map(|r| r.reducer_type.clone())
        .filter(|t| !t.is_empty())
        .collect();
    types.sort();
    types.dedup();
    types
}

/// Distinct series, optionally limited to one reducer type, sorted
pub fn series_of(reducers: &[&Reducer], reducer_type: Option<&str>) -> Vec<String> {
    let mut series: Vec<String> = reducers
        .iter()
        .filter(|r| reducer_type.is_none_or(|t| r.reducer_type == t))
        .map(|r| r.series.clone())
        .collect();
    series.sort();
    series.dedup();
    series
}

/// Ratios offered by the reducers, optionally limited to one series; sorted, deduplicated
pub fn available_ratios(reducers: &[&Reducer], series: Option<&str>) -> Vec<Ratio> {
    let mut ratios: Vec<Ratio> = reducers
        .iter()
        .filter(|r| series.is_none_or(|s| r.series == s))
        .flat_map(|r| r.supported_ratios.iter().copied())
        .collect();
    ratios.sort();
    ratios.dedup();
    ratios
}

/// Size, classify and resolve parts for one pairing
pub fn evaluate<'a>(
    catalog: &'a Catalog,
    motor: &Motor,
    reducer: &'a Reducer,
    ratio: Ratio,
    conditions: &OperatingConditions,
) -> Candidate<'a> {
    let sizing = size(motor, reducer, ratio);
    let load_factor = conditions.load_type.factor();

    Candidate {
        reducer,
        ratio,
        sizing,
        stage: reducer.stage(ratio).map(String::from),
        load_factor,
        suitability: classify(sizing.service_factor, load_factor),
        bushing: find_bushing(&catalog.bushings, motor.shaft_diameter, reducer.shaft_hole_diameter),
        adapter: find_adapter(&catalog.adapters, &reducer.model_name, motor),
    }
}

/// Evaluate every compatible reducer that supports the ratio.
///
/// Sorted by tier (suitable first), then by service factor, highest first.
pub fn rank_candidates<'a>(
    catalog: &'a Catalog,
    motor: &Motor,
    ratio: Ratio,
    series: Option<&str>,
    conditions: &OperatingConditions,
) -> Vec<Candidate<'a>> {
    let mut candidates: Vec<Candidate<'a>> = compatible_reducers(catalog, motor)
        .into_iter()
        .filter(|r| series.is_none_or(|s| r.series == s))
        .filter(|r| r.supports(ratio))
        .map(|r| evaluate(catalog, motor, r, ratio, conditions))
        .collect();

    candidates.sort_by(|a, b| rank_order(a, b));
    candidates
}

fn rank_order(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    a.suitability
        .cmp(&b.suitability)
        .then_with(|| b.sizing.service_factor.total_cmp(&a.sizing.service_factor))
}

/// In-progress selection state
#[derive(Debug, Clone, Default)]
pub struct SelectionSession {
    step: Step,
    motor: Option<Motor>,
    reducer_type: Option<String>,
    series: Option<String>,
    ratio: Option<Ratio>,
    reducer: Option<Reducer>,
    conditions: OperatingConditions,
    result: Option<SelectionResult>,
}

impl SelectionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn go_to(&mut self, step: i64) {
        self.step = Step::from_number(step);
    }

    pub fn next(&mut self) {
        self.step = self.step.next();
    }

    pub fn prev(&mut self) {
        self.step = self.step.prev();
    }

    pub fn motor(&self) -> Option<&Motor> {
        self.motor.as_ref()
    }

    pub fn reducer_type(&self) -> Option<&str> {
        self.reducer_type.as_deref()
    }

    pub fn series(&self) -> Option<&str> {
        self.series.as_deref()
    }

    pub fn ratio(&self) -> Option<Ratio> {
        self.ratio
    }

    pub fn reducer(&self) -> Option<&Reducer> {
        self.reducer.as_ref()
    }

    pub fn conditions(&self) -> &OperatingConditions {
        &self.conditions
    }

    pub fn result(&self) -> Option<&SelectionResult> {
        self.result.as_ref()
    }

    /// Choose a motor; clears every downstream choice
    pub fn select_motor(&mut self, motor: Option<Motor>) {
        self.motor = motor;
        self.reducer_type = None;
        self.select_series(None);
    }

    /// Filter by reducer type; clears series, ratio and reducer
    pub fn select_type(&mut self, reducer_type: Option<String>) {
        self.reducer_type = reducer_type;
        self.select_series(None);
    }

    /// Filter by series; clears ratio and reducer
    pub fn select_series(&mut self, series: Option<String>) {
        self.series = series;
        self.select_ratio(None);
    }

    /// Choose a ratio; clears the reducer
    pub fn select_ratio(&mut self, ratio: Option<Ratio>) {
        self.ratio = ratio;
        self.select_reducer(None);
    }

    pub fn select_reducer(&mut self, reducer: Option<Reducer>) {
        self.reducer = reducer;
        self.result = None;
    }

    pub fn set_conditions(&mut self, conditions: OperatingConditions) {
        self.conditions = conditions;
        self.result = None;
    }

    /// Compute and store the result once motor, reducer and ratio are chosen
    pub fn confirm(&mut self, catalog: &Catalog) -> Option<&SelectionResult> {
        let motor = self.motor.as_ref()?;
        let reducer = self.reducer.as_ref()?;
        let ratio = self.ratio?;

        let candidate = evaluate(catalog, motor, reducer, ratio, &self.conditions);
        self.result = Some(SelectionResult::from_candidate(motor, &candidate));
        self.result.as_ref()
    }

    /// Back to step 1 with nothing chosen and default conditions
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
