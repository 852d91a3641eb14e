//! `gbx reducer` command - Browse the gearbox catalog

use clap::Subcommand;
use console::style;
use miette::Result;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{find_motor, find_reducer, parse_ratio, print_structured, Workspace};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::GlobalOpts;
use crate::core::compat::{shaft_fit, ShaftFit};
use crate::core::keys::format_number;
use crate::core::selection::compatible_reducers;
use crate::entities::Reducer;

#[derive(Subcommand, Debug)]
pub enum ReducerCommands {
    /// List gearboxes with filtering
    List(ListArgs),

    /// Show a gearbox's details and per-ratio ratings
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only gearboxes whose input accepts this motor's shaft
    #[arg(long, short = 'm')]
    pub motor: Option<String>,

    /// Filter by gearbox type
    #[arg(long = "type", short = 't')]
    pub reducer_type: Option<String>,

    /// Filter by series
    #[arg(long, short = 's')]
    pub series: Option<String>,

    /// Only gearboxes offering this ratio
    #[arg(long, short = 'r')]
    pub ratio: Option<String>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Gearbox id or model name (e.g. GPB042)
    pub id: String,
}

const LIST_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("model", "MODEL", 10),
    ColumnDef::new("type", "TYPE", 16),
    ColumnDef::new("bore", "BORE", 6),
    ColumnDef::new("ratios", "RATIOS", 30),
    ColumnDef::new("torque", "MAX TORQUE", 11),
    ColumnDef::new("fit", "FIT", 14),
];

pub fn run(cmd: ReducerCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ReducerCommands::List(args) => run_list(args, global),
        ReducerCommands::Show(args) => run_show(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(global)?;
    let catalog = workspace.catalog()?;
    let format = workspace.format(global);

    let motor = args
        .motor
        .as_deref()
        .map(|key| find_motor(&catalog, key))
        .transpose()?;
    let ratio = args.ratio.as_deref().map(parse_ratio).transpose()?;

    let pool: Vec<&Reducer> = match motor {
        Some(motor) => compatible_reducers(&catalog, motor),
        None => catalog.reducers.iter().collect(),
    };

    let reducers: Vec<&Reducer> = pool
        .into_iter()
        .filter(|r| {
            args.reducer_type
                .as_deref()
                .is_none_or(|t| r.reducer_type.eq_ignore_ascii_case(t))
        })
        .filter(|r| {
            args.series
                .as_deref()
                .is_none_or(|s| r.series.eq_ignore_ascii_case(s))
        })
        .filter(|r| ratio.is_none_or(|ratio| r.supports(ratio)))
        .collect();

    if args.count {
        println!("{}", reducers.len());
        return Ok(());
    }

    if print_structured(&reducers, format)? {
        return Ok(());
    }

    if reducers.is_empty() {
        println!("No gearboxes found.");
        return Ok(());
    }

    let rows: Vec<TableRow> = reducers
        .iter()
        .map(|r| {
            let fit = motor.map(|m| {
                match shaft_fit(&catalog.bushings, m.shaft_diameter, r.shaft_hole_diameter) {
                    ShaftFit::Direct => CellValue::Text("direct".to_string()),
                    ShaftFit::Bushing { bushing } => CellValue::Text(format!("bushing {}", bushing.code)),
                    ShaftFit::Incompatible => CellValue::Text("no fit".to_string()),
                }
            });
            let ratios: Vec<String> = r.supported_ratios.iter().map(|x| x.to_string()).collect();

            TableRow::new()
                .cell("model", CellValue::Id(r.model_name.clone()))
                .cell("type", CellValue::Type(r.reducer_type.clone()))
                .cell("bore", CellValue::Text(format_number(r.shaft_hole_diameter)))
                .cell("ratios", CellValue::Text(ratios.join(",")))
                .cell("torque", CellValue::Float(r.max_output_torque, 1))
                .cell("fit", fit.unwrap_or(CellValue::Empty))
        })
        .collect();

    let formatter = TableFormatter::new(LIST_COLUMNS, "gearbox");
    if global.quiet {
        formatter.without_summary().output(&rows, format);
    } else {
        formatter.output(&rows, format);
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(global)?;
    let catalog = workspace.catalog()?;
    let reducer = find_reducer(&catalog, &args.id)?;

    if print_structured(reducer, workspace.format(global))? {
        return Ok(());
    }

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("Model").bold(), style(&reducer.model_name).cyan());
    if !reducer.reducer_type.is_empty() {
        println!("{}: {}", style("Type").bold(), style(&reducer.reducer_type).magenta());
    }
    println!("{}: {}", style("Series").bold(), reducer.series);
    if reducer.is_hollow() {
        println!("{}: {}", style("Input bore").bold(), style("none (hollow rotary)").dim());
    } else {
        println!(
            "{}: {} mm",
            style("Input bore").bold(),
            format_number(reducer.shaft_hole_diameter)
        );
    }
    if let Some(rpm) = reducer.max_input_rpm {
        println!("{}: {} rpm", style("Max input speed").bold(), format_number(rpm));
    }
    if let Some(load) = reducer.allowed_radial_load {
        println!("{}: {} N", style("Radial load").bold(), format_number(load));
    }
    if let Some(load) = reducer.allowed_axial_load {
        println!("{}: {} N", style("Axial load").bold(), format_number(load));
    }
    println!("{}", style("─".repeat(60)).dim());

    let mut builder = Builder::default();
    builder.push_record(["Ratio", "Rated torque (N·m)", "Efficiency", "Stage"]);
    for (ratio, spec) in &reducer.ratio_data {
        builder.push_record([
            ratio.to_string(),
            format!("{:.1}", spec.torque),
            format!("{:.0}%", spec.efficiency * 100.0),
            spec.stage.clone(),
        ]);
    }
    println!("{}", builder.build().with(Style::markdown()));

    let shafts: Vec<String> = catalog
        .adapters
        .model(&reducer.model_name)
        .map(|m| m.shafts.iter().map(|s| s.key.to_string()).collect())
        .unwrap_or_default();
    if !shafts.is_empty() {
        println!();
        println!("{}: {}", style("Adapter shaft sizes").bold(), shafts.join(", "));
    }

    Ok(())
}
