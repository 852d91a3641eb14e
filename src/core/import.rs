//! CSV ingestion for the catalog datasets
//!
//! Turns the raw database exports into typed records. Every imported record
//! passes the same validation as a catalog load, so a successful import can
//! be written straight into the data directory.

use csv::ReaderBuilder;
use miette::Diagnostic;
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::str::FromStr;
use thiserror::Error;

use crate::core::catalog::{validate_bushings, CatalogError};
use crate::entities::{AdapterCatalog, Bushing, Motor, Ratio, RatioSpec, Reducer};

/// Dataset a CSV file is imported into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Bushings,
    Motors,
    Reducers,
}

impl ImportKind {
    /// Dataset file stem
    pub fn dataset(&self) -> &'static str {
        match self {
            ImportKind::Bushings => "bushings",
            ImportKind::Motors => "motors",
            ImportKind::Reducers => "reducers",
        }
    }

    /// Columns that must be present in the header row
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            ImportKind::Bushings => BUSHING_COLUMNS,
            ImportKind::Motors => MOTOR_COLUMNS,
            ImportKind::Reducers => REDUCER_COLUMNS,
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dataset())
    }
}

impl FromStr for ImportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bushing" | "bushings" => Ok(ImportKind::Bushings),
            "motor" | "motors" => Ok(ImportKind::Motors),
            "reducer" | "reducers" | "gearbox" | "gearboxes" => Ok(ImportKind::Reducers),
            _ => Err(format!(
                "unsupported dataset '{}'. Supported: bushings, motors, reducers",
                s
            )),
        }
    }
}

const BUSHING_COLUMNS: &[&str] = &["bushing_code", "shaft_mm", "hole_mm"];

const MOTOR_COLUMNS: &[&str] = &[
    "id",
    "manufacturer",
    "series",
    "basic_type",
    "special_type",
    "power_p_w",
    "nominal_output_torque_tn_nm",
    "torque_peak_tmax_nm",
    "nominal_speed_n_rpm",
    "max_speed_nmax_rpm",
    "inertia_j_kgcm2_e4",
    "mass_m_kg2",
    "shaft_diameter_d60",
    "shaft_length_l60",
    "centering_diameter_d61",
    "pitch_circle_diameter",
    "fixing_hole_size",
    "centering_depth_l612",
    "body_size",
    "adapter_code",
];

const REDUCER_COLUMNS: &[&str] = &[
    "gearbox_data_id",
    "gb_type",
    "gb_series",
    "gb_size",
    "gb_ratio",
    "gb_stage",
    "gb_rated_torque",
    "gb_inertia",
    "gb_input_speed",
    "gb_max_speed",
    "gb_rigidity",
    "gb_radial_force",
    "gb_axial_force",
    "gb_efficiency",
    "gb_weight",
    "gb_noise",
    "gb_tilting_moment",
];

/// Efficiency assumed for a ratio row without one
pub const DEFAULT_EFFICIENCY: f64 = 0.95;

#[derive(Debug, Error, Diagnostic)]
pub enum ImportError {
    #[error("CSV parse error at row {row}")]
    #[diagnostic(code(gbx::import::csv))]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("missing column '{column}'")]
    #[diagnostic(
        code(gbx::import::column),
        help("the header row must contain: {expected}")
    )]
    MissingColumn { column: String, expected: String },

    #[error("row {row}: {reason}")]
    #[diagnostic(code(gbx::import::row))]
    InvalidRow { row: usize, reason: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] CatalogError),
}

/// Records produced by an import plus row counts
#[derive(Debug, Clone)]
pub struct ImportReport<T> {
    pub records: Vec<T>,
    pub rows: usize,
    pub skipped: usize,
}

impl<T> Default for ImportReport<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            rows: 0,
            skipped: 0,
        }
    }
}

/// Lower-cased header name to column index
struct Columns(HashMap<String, usize>);

impl Columns {
    fn read<R: Read>(rdr: &mut csv::Reader<R>, required: &[&str]) -> Result<Self, ImportError> {
        let headers = rdr
            .headers()
            .map_err(|source| ImportError::Csv { row: 1, source })?;
        let map: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim_start_matches('\u{feff}').trim().to_lowercase(), i))
            .collect();

        if let Some(column) = required.iter().find(|c| !map.contains_key(**c)) {
            return Err(ImportError::MissingColumn {
                column: column.to_string(),
                expected: required.join(", "),
            });
        }
        Ok(Columns(map))
    }

    /// Trimmed cell text; empty cells and "NULL" are absent
    fn text(&self, record: &csv::StringRecord, column: &str) -> Option<String> {
        self.0
            .get(column)
            .and_then(|&idx| record.get(idx))
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "NULL")
            .map(String::from)
    }

    fn number(&self, record: &csv::StringRecord, column: &str) -> Option<f64> {
        self.text(record, column)
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|n| n.is_finite())
    }
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input)
}

/// Import `busing_id, bushing_code, shaft_mm, hole_mm, len_mm` rows.
///
/// Rows without a bushing code are skipped.
pub fn import_bushings<R: Read>(input: R) -> Result<ImportReport<Bushing>, ImportError> {
    let mut rdr = reader(input);
    let columns = Columns::read(&mut rdr, BUSHING_COLUMNS)?;
    let mut report = ImportReport::default();

    for (idx, result) in rdr.records().enumerate() {
        let row = idx + 2;
        let record = result.map_err(|source| ImportError::Csv { row, source })?;
        report.rows += 1;

        let Some(code) = columns.text(&record, "bushing_code") else {
            report.skipped += 1;
            continue;
        };

        let size = |column: &str| {
            columns.number(&record, column).ok_or_else(|| ImportError::InvalidRow {
                row,
                reason: format!("bushing {} has no numeric {}", code, column),
            })
        };
        let shaft_mm = size("shaft_mm")?;
        let hole_mm = size("hole_mm")?;

        let mut bushing = Bushing::new(code.clone(), shaft_mm, hole_mm, columns.number(&record, "len_mm").unwrap_or(0.0));
        bushing.id = columns.text(&record, "busing_id").unwrap_or(code);
        report.records.push(bushing);
    }

    validate_bushings(&report.records)?;
    tracing::info!(rows = report.rows, bushings = report.records.len(), "bushings imported");
    Ok(report)
}

/// Split a motor adapter code such as "(8-30-46-M4)" into the bare code and its tap
pub fn parse_motor_adapter_code(raw: &str) -> (Option<String>, Option<String>) {
    let code: String = raw.trim().chars().filter(|c| *c != '(' && *c != ')').collect();
    if code.is_empty() {
        return (None, None);
    }
    let tap = code
        .rsplit('-')
        .next()
        .filter(|last| last.starts_with('M'))
        .map(String::from);
    (Some(code), tap)
}

/// Import rows from the motor database export.
///
/// Rows whose id does not start with "M" are skipped. Power is converted
/// from watts to kilowatts, rounded to two decimals.
pub fn import_motors<R: Read>(input: R) -> Result<ImportReport<Motor>, ImportError> {
    let mut rdr = reader(input);
    let columns = Columns::read(&mut rdr, MOTOR_COLUMNS)?;
    let mut report = ImportReport::default();

    for (idx, result) in rdr.records().enumerate() {
        let row = idx + 2;
        let record = result.map_err(|source| ImportError::Csv { row, source })?;
        report.rows += 1;

        let id = match columns.text(&record, "id") {
            Some(id) if id.starts_with('M') => id,
            _ => {
                report.skipped += 1;
                continue;
            }
        };

        let text = |column: &str| columns.text(&record, column).unwrap_or_default();
        let num = |column: &str| columns.number(&record, column);

        let mut motor = Motor::new(
            id,
            text("manufacturer"),
            text("special_type"),
            num("shaft_diameter_d60").unwrap_or(0.0),
            num("nominal_output_torque_tn_nm").unwrap_or(0.0),
            num("nominal_speed_n_rpm").unwrap_or(0.0),
        );
        motor.series = text("series");
        motor.basic_type = text("basic_type");
        motor.rated_power = num("power_p_w").map_or(0.0, |w| (w / 10.0).round() / 100.0);
        motor.peak_torque = num("torque_peak_tmax_nm").unwrap_or(0.0);
        motor.max_rpm = num("max_speed_nmax_rpm").unwrap_or(0.0);
        motor.inertia = num("inertia_j_kgcm2_e4").unwrap_or(0.0);
        motor.weight_kg = num("mass_m_kg2");
        motor.shaft_length = num("shaft_length_l60");
        motor.centering_dia = num("centering_diameter_d61");
        motor.centering_height = num("centering_depth_l612");
        motor.fixing_pcd = num("pitch_circle_diameter");
        motor.fixing_hole_size = num("fixing_hole_size");
        motor.body_size = num("body_size");

        let (adapter_code, mounting_tap) =
            parse_motor_adapter_code(&columns.text(&record, "adapter_code").unwrap_or_default());
        motor.adapter_code = adapter_code;
        motor.mounting_tap = mounting_tap;

        motor.validate().map_err(|e| ImportError::InvalidRow {
            row,
            reason: e.to_string(),
        })?;
        report.records.push(motor);
    }

    tracing::info!(rows = report.rows, motors = report.records.len(), "motors imported");
    Ok(report)
}

/// Stage label guessed from efficiency when the row has none
pub fn infer_stage(efficiency: Option<f64>) -> &'static str {
    match efficiency {
        Some(e) if e >= 0.96 => "L1",
        Some(e) if e >= 0.93 => "L2",
        _ => "L3",
    }
}

/// Import one-row-per-ratio gearbox data, grouped into one reducer per
/// (series, size).
///
/// The input bore is the largest shaft size the adapter catalog lists for
/// the model, or 0 when the model takes no adapter.
pub fn import_reducers<R: Read>(
    input: R,
    adapters: &AdapterCatalog,
) -> Result<ImportReport<Reducer>, ImportError> {
    let mut rdr = reader(input);
    let columns = Columns::read(&mut rdr, REDUCER_COLUMNS)?;
    let mut report: ImportReport<Reducer> = ImportReport::default();
    let mut groups: HashMap<(String, u32), usize> = HashMap::new();

    for (idx, result) in rdr.records().enumerate() {
        let row = idx + 2;
        let record = result.map_err(|source| ImportError::Csv { row, source })?;
        report.rows += 1;

        let num = |column: &str| columns.number(&record, column);

        let is_gearbox = columns
            .text(&record, "gearbox_data_id")
            .is_some_and(|id| id.starts_with('G'));
        let series = columns.text(&record, "gb_series");
        let size = columns
            .text(&record, "gb_size")
            .and_then(|s| s.parse::<u32>().ok());
        let ratio = columns
            .text(&record, "gb_ratio")
            .and_then(|s| s.parse::<Ratio>().ok());

        let (Some(series), Some(size), Some(ratio), true) = (series, size, ratio, is_gearbox) else {
            report.skipped += 1;
            continue;
        };

        let torque = num("gb_rated_torque");
        let efficiency = num("gb_efficiency");
        let stage = columns
            .text(&record, "gb_stage")
            .unwrap_or_else(|| infer_stage(efficiency).to_string());

        let slot = *groups.entry((series.clone(), size)).or_insert_with(|| {
            let mut reducer = Reducer::new(series.clone(), size, 0.0, Default::default());
            reducer.shaft_hole_diameter = adapters.max_shaft(&reducer.model_name).unwrap_or(0.0);
            reducer.reducer_type = columns.text(&record, "gb_type").unwrap_or_default();
            reducer.max_input_rpm = num("gb_input_speed");
            reducer.allowed_radial_load = num("gb_radial_force");
            reducer.allowed_axial_load = num("gb_axial_force");
            reducer.efficiency = efficiency;
            reducer.weight = num("gb_weight");
            reducer.noise = num("gb_noise");
            reducer.rigidity = num("gb_rigidity");
            reducer.inertia = num("gb_inertia");
            reducer.tilting_moment = num("gb_tilting_moment");
            report.records.push(reducer);
            report.records.len() - 1
        });

        let reducer = &mut report.records[slot];
        let torque = torque.unwrap_or(0.0);
        reducer.ratio_data.insert(
            ratio,
            RatioSpec::new(torque, efficiency.unwrap_or(DEFAULT_EFFICIENCY), stage),
        );
        if !reducer.supported_ratios.contains(&ratio) {
            reducer.supported_ratios.push(ratio);
        }
        reducer.max_output_torque = reducer.max_output_torque.max(torque);
    }

    for reducer in &mut report.records {
        reducer.supported_ratios.sort();
        reducer.validate()?;
    }

    tracing::info!(rows = report.rows, reducers = report.records.len(), "reducers imported");
    Ok(report)
}
