//! `gbx candidates` command - Ranked gearboxes for a motor at one ratio

use console::style;
use miette::Result;

use crate::cli::helpers::{find_motor, parse_ratio, print_structured, Workspace};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::keys::format_number;
use crate::core::selection::rank_candidates;

#[derive(clap::Args, Debug)]
pub struct CandidatesArgs {
    /// Motor id or model name
    #[arg(long, short = 'm')]
    pub motor: String,

    /// Gear ratio (e.g. 10)
    #[arg(long, short = 'r')]
    pub ratio: String,

    /// Limit to one series
    #[arg(long, short = 's')]
    pub series: Option<String>,

    /// Load type: uniform, moderate-shock, heavy-shock (default from config)
    #[arg(long, short = 'l')]
    pub load_type: Option<String>,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("model", "MODEL", 10),
    ColumnDef::new("type", "TYPE", 14),
    ColumnDef::new("stage", "STAGE", 6),
    ColumnDef::new("rpm", "OUT RPM", 9),
    ColumnDef::new("torque", "OUT N·m", 9),
    ColumnDef::new("rated", "RATED N·m", 10),
    ColumnDef::new("sf", "SF", 7),
    ColumnDef::new("verdict", "VERDICT", 11),
    ColumnDef::new("bushing", "BUSHING", 9),
    ColumnDef::new("adapter", "ADAPTER", 18),
];

pub fn run(args: CandidatesArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(global)?;
    let catalog = workspace.catalog()?;
    let format = workspace.format(global);

    let motor = find_motor(&catalog, &args.motor)?;
    let ratio = parse_ratio(&args.ratio)?;
    let conditions = workspace.conditions(args.load_type.as_deref(), None, None);

    let candidates = rank_candidates(&catalog, motor, ratio, args.series.as_deref(), &conditions);
    tracing::debug!(motor = %motor.id, %ratio, count = candidates.len(), "candidates ranked");

    if print_structured(&candidates, format)? {
        return Ok(());
    }

    if candidates.is_empty() {
        println!(
            "No compatible gearbox offers ratio {} for {}.",
            ratio,
            motor.display_name()
        );
        return Ok(());
    }

    if !global.quiet && matches!(format, OutputFormat::Auto | OutputFormat::Tsv) {
        println!(
            "{} at {} rpm, {:.2} N·m, ratio {}, {} load (factor {:.2})",
            style(motor.display_name()).yellow(),
            format_number(motor.rated_rpm),
            motor.rated_torque,
            style(ratio).cyan(),
            conditions.load_type,
            conditions.load_type.factor()
        );
        println!();
    }

    let rows: Vec<TableRow> = candidates
        .iter()
        .map(|c| {
            TableRow::new()
                .cell("model", CellValue::Id(c.reducer.model_name.clone()))
                .cell("type", CellValue::Type(c.reducer.reducer_type.clone()))
                .cell("stage", CellValue::opt_text(c.stage.clone()))
                .cell("rpm", CellValue::Float(c.sizing.output_rpm, 1))
                .cell("torque", CellValue::Float(c.sizing.output_torque, 2))
                .cell("rated", CellValue::Float(c.sizing.rated_torque, 1))
                .cell("sf", CellValue::Float(c.sizing.service_factor, 2))
                .cell("verdict", CellValue::Verdict(c.suitability))
                .cell("bushing", CellValue::opt_text(c.bushing.map(|b| b.code.clone())))
                .cell(
                    "adapter",
                    CellValue::opt_text(c.adapter.as_ref().map(|a| format!("{} {}", a.adapter_type, a.code))),
                )
        })
        .collect();

    let formatter = TableFormatter::new(COLUMNS, "candidate");
    if global.quiet {
        formatter.without_summary().output(&rows, format);
    } else {
        formatter.output(&rows, format);
    }
    Ok(())
}
